use polars::prelude::*;

use crate::utils::{list_to_name, vectors::Vec4};

/// Invariant mass of the summed four-momenta of `constituents`, named `mass(a, b, ...)`.
pub fn mass<I, S>(constituents: I) -> Expr
where
    I: IntoIterator<Item = S> + Clone,
    S: AsRef<str>,
{
    Vec4::sum(constituents.clone())
        .mag()
        .alias(format!("mass({})", list_to_name(&constituents)))
}

/// Squared invariant mass of the summed four-momenta of `constituents`, without clamping.
pub fn mass2<I, S>(constituents: I) -> Expr
where
    I: IntoIterator<Item = S> + Clone,
    S: AsRef<str>,
{
    Vec4::sum(constituents.clone())
        .mag2()
        .alias(format!("mass2({})", list_to_name(&constituents)))
}

/// Total energy of `constituents`.
pub fn energy<I, S>(constituents: I) -> Expr
where
    I: IntoIterator<Item = S> + Clone,
    S: AsRef<str>,
{
    Vec4::sum(constituents.clone())
        .e()
        .alias(format!("energy({})", list_to_name(&constituents)))
}

/// Squared magnitude of the summed three-momentum of `constituents`.
pub fn rho2<I, S>(constituents: I) -> Expr
where
    I: IntoIterator<Item = S> + Clone,
    S: AsRef<str>,
{
    Vec4::sum(constituents.clone())
        .vec3()
        .mag2()
        .alias(format!("rho2({})", list_to_name(&constituents)))
}

/// Magnitude of the summed three-momentum of `constituents`.
pub fn rho<I, S>(constituents: I) -> Expr
where
    I: IntoIterator<Item = S> + Clone,
    S: AsRef<str>,
{
    Vec4::sum(constituents.clone())
        .vec3()
        .mag()
        .alias(format!("rho({})", list_to_name(&constituents)))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::tests::val1;

    fn two_body() -> DataFrame {
        df!(
            "a_e" => [3.0],
            "a_px" => [1.0],
            "a_py" => [2.0],
            "a_pz" => [0.0],
            "b_e" => [4.0],
            "b_px" => [-1.0],
            "b_py" => [0.0],
            "b_pz" => [2.0],
        )
        .unwrap()
    }

    #[test]
    fn test_names() {
        let res = two_body()
            .lazy()
            .select([
                mass(["a", "b"]),
                mass2(["a"]),
                energy(["b"]),
                rho(["a", "b"]),
                rho2(["b"]),
            ])
            .collect()
            .unwrap();
        let names: Vec<String> = res
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(
            names,
            ["mass(a, b)", "mass2(a)", "energy(b)", "rho(a, b)", "rho2(b)"]
        );
    }

    #[test]
    fn test_values() {
        let res = two_body()
            .lazy()
            .select([
                mass(["a", "b"]),
                mass2(["a"]),
                energy(["a", "b"]),
                rho(["a", "b"]),
                rho2(["b"]),
            ])
            .collect()
            .unwrap();
        // a + b = (E=7, p=(0, 2, 2))
        assert_relative_eq!(val1(&res, "mass(a, b)"), 41.0_f64.sqrt());
        assert_relative_eq!(val1(&res, "mass2(a)"), 4.0);
        assert_relative_eq!(val1(&res, "energy(a, b)"), 7.0);
        assert_relative_eq!(val1(&res, "rho(a, b)"), 8.0_f64.sqrt());
        assert_relative_eq!(val1(&res, "rho2(b)"), 5.0);
    }

    #[test]
    fn test_mass_is_idempotent() {
        let df = two_body();
        let first = df.clone().lazy().select([mass(["b"])]).collect().unwrap();
        let second = df.lazy().select([mass(["b"])]).collect().unwrap();
        assert!(first.equals(&second));
        assert_relative_eq!(val1(&first, "mass(b)"), 11.0_f64.sqrt());
    }
}
