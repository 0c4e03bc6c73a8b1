use auto_ops::{impl_op_ex, impl_op_ex_commutative};
use polars::prelude::*;

use crate::utils::enums::Component;

/// A three-vector of lazy column expressions.
#[derive(Clone)]
pub struct Vec3([Expr; 3]);
impl From<[Expr; 3]> for Vec3 {
    fn from(value: [Expr; 3]) -> Self {
        Self([
            value[0].clone().cast(DataType::Float64),
            value[1].clone().cast(DataType::Float64),
            value[2].clone().cast(DataType::Float64),
        ])
    }
}
impl Vec3 {
    /// The momentum columns `{name}_px`, `{name}_py` and `{name}_pz` of a particle.
    pub fn new<S: AsRef<str>>(name: S) -> Self {
        let name = name.as_ref();
        Self([
            col(Component::Px.column_name(name)).cast(DataType::Float64),
            col(Component::Py.column_name(name)).cast(DataType::Float64),
            col(Component::Pz.column_name(name)).cast(DataType::Float64),
        ])
    }
    pub fn alias<S: AsRef<str>>(&self, name: S) -> [Expr; 3] {
        let b = name.as_ref();
        [
            self.0[0].clone().alias(Component::Px.column_name(b)),
            self.0[1].clone().alias(Component::Py.column_name(b)),
            self.0[2].clone().alias(Component::Pz.column_name(b)),
        ]
    }
    pub fn x(&self) -> Expr {
        self.0[0].clone()
    }
    pub fn y(&self) -> Expr {
        self.0[1].clone()
    }
    pub fn z(&self) -> Expr {
        self.0[2].clone()
    }

    pub fn with_energy(&self, energy: &Expr) -> Vec4 {
        Vec4([self.x(), self.y(), self.z(), energy.clone()])
    }

    pub fn dot(&self, other: &Self) -> Expr {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z()
    }
    pub fn mag2(&self) -> Expr {
        self.dot(self)
    }
    pub fn mag(&self) -> Expr {
        self.mag2().sqrt()
    }
    pub fn add(&self, other: &Self) -> Self {
        Self([
            self.x() + other.x(),
            self.y() + other.y(),
            self.z() + other.z(),
        ])
    }
    pub fn sub(&self, other: &Self) -> Self {
        Self([
            self.x() - other.x(),
            self.y() - other.y(),
            self.z() - other.z(),
        ])
    }
    pub fn mul(&self, other: &Expr) -> Self {
        Self([
            self.x() * other.clone(),
            self.y() * other.clone(),
            self.z() * other.clone(),
        ])
    }
    pub fn neg(&self) -> Self {
        Self([-self.x(), -self.y(), -self.z()])
    }
}

impl_op_ex!(+ |a: &Vec3, b: &Vec3| -> Vec3 { a.add(b) });
impl_op_ex!(-|a: &Vec3, b: &Vec3| -> Vec3 { a.sub(b) });
impl_op_ex!(-|a: &Vec3| -> Vec3 { a.neg() });
impl_op_ex_commutative!(*|a: &Vec3, b: &Expr| -> Vec3 { a.mul(b) });

/// A four-momentum of lazy column expressions, stored as $`(p_x, p_y, p_z, E)`$.
#[derive(Clone)]
pub struct Vec4([Expr; 4]);
impl From<[Expr; 4]> for Vec4 {
    fn from(value: [Expr; 4]) -> Self {
        Self([
            value[0].clone().cast(DataType::Float64),
            value[1].clone().cast(DataType::Float64),
            value[2].clone().cast(DataType::Float64),
            value[3].clone().cast(DataType::Float64),
        ])
    }
}
impl Vec4 {
    /// The four columns `{name}_px`, `{name}_py`, `{name}_pz` and `{name}_e` of a particle.
    pub fn new<S: AsRef<str>>(name: S) -> Self {
        let name = name.as_ref();
        Self([
            col(Component::Px.column_name(name)).cast(DataType::Float64),
            col(Component::Py.column_name(name)).cast(DataType::Float64),
            col(Component::Pz.column_name(name)).cast(DataType::Float64),
            col(Component::E.column_name(name)).cast(DataType::Float64),
        ])
    }

    /// Sum of the four-momenta of the named particles. An empty list gives the zero vector.
    pub fn sum<I, S>(constituents: I) -> Vec4
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut it = constituents.into_iter();
        let mut total = if let Some(first) = it.next() {
            Vec4::new(first)
        } else {
            Vec4([lit(0.0), lit(0.0), lit(0.0), lit(0.0)])
        };
        for n in it {
            total = total.add(&Vec4::new(n));
        }
        total
    }

    /// Column expressions named after the labels of [`Component`], in `E, px, py, pz` order.
    pub fn labelled(&self) -> [Expr; 4] {
        [
            self.e().alias(Component::E.label()),
            self.px().alias(Component::Px.label()),
            self.py().alias(Component::Py.label()),
            self.pz().alias(Component::Pz.label()),
        ]
    }

    pub fn alias<S: AsRef<str>>(&self, name: S) -> [Expr; 4] {
        let b = name.as_ref();
        [
            self.e().alias(Component::E.column_name(b)),
            self.px().alias(Component::Px.column_name(b)),
            self.py().alias(Component::Py.column_name(b)),
            self.pz().alias(Component::Pz.column_name(b)),
        ]
    }
    pub fn px(&self) -> Expr {
        self.0[0].clone()
    }
    pub fn py(&self) -> Expr {
        self.0[1].clone()
    }
    pub fn pz(&self) -> Expr {
        self.0[2].clone()
    }
    pub fn e(&self) -> Expr {
        self.0[3].clone()
    }
    pub fn vec3(&self) -> Vec3 {
        Vec3([self.px(), self.py(), self.pz()])
    }
    /// $`E^2 - |\vec{p}|^2`$, which may be slightly negative through round-off.
    pub fn mag2(&self) -> Expr {
        self.e() * self.e() - self.vec3().mag2()
    }
    /// The invariant mass $`\sqrt{\max(0, E^2 - |\vec{p}|^2)}`$.
    ///
    /// Negative radicands are clamped to zero so that (nearly) on-shell massless particles do not
    /// turn into `NaN`.
    pub fn mag(&self) -> Expr {
        let m2 = self.mag2();
        when(m2.clone().lt(lit(0.0)))
            .then(lit(0.0))
            .otherwise(m2)
            .sqrt()
    }
    pub fn add(&self, other: &Self) -> Self {
        Self([
            self.px() + other.px(),
            self.py() + other.py(),
            self.pz() + other.pz(),
            self.e() + other.e(),
        ])
    }
    pub fn sub(&self, other: &Self) -> Self {
        Self([
            self.px() - other.px(),
            self.py() - other.py(),
            self.pz() - other.pz(),
            self.e() - other.e(),
        ])
    }
    pub fn neg(&self) -> Self {
        Self([-self.px(), -self.py(), -self.pz(), -self.e()])
    }
}

impl_op_ex!(+ |a: &Vec4, b: &Vec4| -> Vec4 { a.add(b) });
impl_op_ex!(-|a: &Vec4, b: &Vec4| -> Vec4 { a.sub(b) });
impl_op_ex!(-|a: &Vec4| -> Vec4 { a.neg() });
