use std::path::Path;

use indexmap::IndexSet;
use log::debug;
use polars::prelude::*;

use crate::{
    utils::{
        enums::{Component, ComponentOrder, FloatPrecision},
        vectors::Vec4,
    },
    PawianError, PawianResult,
};

/// Reading and writing the ASCII momentum-tuple format.
pub mod io;
/// Reading the momentum tuples stored in `pawianHists.root` files.
pub mod root;

/// Name of the optional per-event weight column.
pub const WEIGHT_COLUMN: &str = "weight";

/// A small weighted sample (two events of $`\pi^+ D^0 D^-`$) in the ASCII momentum-tuple format.
pub const SAMPLE_ASCII: &str = "\
0.99407
-0.00357645   0.0962561   0.0181079    0.170545
   0.224019    0.623156    0.215051     1.99057
  -0.174404   -0.719412   -0.233159      2.0243
0.990748
 -0.0328198   0.0524406   0.0310079    0.155783
  -0.619592    0.141315     0.32135     1.99619
   0.698477   -0.193756   -0.352357     2.03593
";

/// Particle names used by [`SAMPLE_ASCII`].
pub const SAMPLE_PARTICLES: &[&str] = &["pi+", "D0", "D-"];

/// Options for reading an ASCII momentum-tuple file.
///
/// # See Also
/// [`read_ascii`](crate::data::io::read_ascii), [`read_ascii_from`](crate::data::io::read_ascii_from)
#[derive(Default, Clone, Debug)]
pub struct AsciiReadOptions {
    /// Ordered particle names, one per record line of an event.
    pub particles: Option<Vec<String>>,
    /// Number of particles per event, used to generate names `"1"`, `"2"`, ... when no explicit
    /// names are given.
    pub n_particles: Option<usize>,
    /// Whether every event starts with a weight line. Detected from the first line when absent.
    pub weighted: Option<bool>,
    /// Order of the four values on a particle line.
    pub component_order: ComponentOrder,
}

impl AsciiReadOptions {
    /// Create a new [`Default`] set of [`AsciiReadOptions`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the particles of each event, in the order their lines appear. These take precedence
    /// over [`AsciiReadOptions::n_particles`].
    ///
    /// Only the number of names is checked against the file: a list of the right length in the
    /// wrong order silently mislabels the columns.
    pub fn particles<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.particles = Some(names.into_iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    /// Only give the number of particles per event. Particles are named `"1"` to `"n"`.
    pub fn n_particles(mut self, n: usize) -> Self {
        self.n_particles = Some(n);
        self
    }

    /// Skip weight detection and treat the file as weighted (or not).
    pub fn weighted(mut self, weighted: bool) -> Self {
        self.weighted = Some(weighted);
        self
    }

    /// Select the order of values on particle lines (defaults to [`ComponentOrder::EnergyFirst`]).
    pub fn component_order(mut self, order: ComponentOrder) -> Self {
        self.component_order = order;
        self
    }

    /// Resolve the particle names, falling back on a count inferred from the file.
    pub(crate) fn resolve_particles(&self, inferred: Option<usize>) -> PawianResult<Vec<String>> {
        if let Some(names) = &self.particles {
            return validate_particle_names(names.clone());
        }
        match self.n_particles.or(inferred) {
            Some(n) => validate_particle_names(numbered_particles(n)),
            None => Err(PawianError::UnknownParticleCount),
        }
    }

    /// Whether names or a count were given, so that the file does not need to be inspected.
    pub(crate) fn has_particle_count(&self) -> bool {
        self.particles.is_some() || self.n_particles.is_some()
    }
}

/// Options for writing a table to an ASCII momentum-tuple file.
#[derive(Clone, Debug)]
pub struct AsciiWriteOptions {
    /// Order of the four values on a particle line.
    pub component_order: ComponentOrder,
    /// Floating-point precision of the printed values.
    pub precision: FloatPrecision,
    /// Minimum width of every value on a particle line.
    pub width: usize,
}

impl Default for AsciiWriteOptions {
    fn default() -> Self {
        Self {
            component_order: ComponentOrder::default(),
            precision: FloatPrecision::default(),
            width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

impl AsciiWriteOptions {
    /// Create a new [`Default`] set of [`AsciiWriteOptions`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the order of values on particle lines (defaults to [`ComponentOrder::EnergyFirst`]).
    pub fn component_order(mut self, order: ComponentOrder) -> Self {
        self.component_order = order;
        self
    }

    /// Select the floating-point precision of printed values.
    pub fn precision(mut self, precision: FloatPrecision) -> Self {
        self.precision = precision;
        self
    }

    /// Override the minimum value width on particle lines; defaults to 11.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

const DEFAULT_COLUMN_WIDTH: usize = 11;

fn numbered_particles(n: usize) -> Vec<String> {
    (1..=n).map(|i| i.to_string()).collect()
}

pub(crate) fn validate_particle_names(names: Vec<String>) -> PawianResult<Vec<String>> {
    if names.is_empty() {
        return Err(PawianError::NoParticles);
    }
    let mut seen = IndexSet::with_capacity(names.len());
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(PawianError::DuplicateName { name: name.clone() });
        }
    }
    Ok(names)
}

/// Find the particles of a table from its column names.
///
/// A particle `p` is present when all of `p_e`, `p_px`, `p_py` and `p_pz` are. Particles are
/// ordered by the position of their energy column.
pub fn infer_particle_names<S: AsRef<str>>(column_names: &[S]) -> Vec<String> {
    let columns: IndexSet<&str> = column_names.iter().map(|s| s.as_ref()).collect();
    let energy_suffix = format!("_{}", Component::E.suffix());
    columns
        .iter()
        .filter_map(|column| column.strip_suffix(energy_suffix.as_str()))
        .filter(|particle| {
            Component::ALL
                .iter()
                .all(|component| columns.contains(component.column_name(particle).as_str()))
        })
        .map(str::to_string)
        .collect()
}

/// Create an empty table with the column layout of the given particles and `n_rows` rows of null
/// values. The result is unweighted.
pub fn skeleton_frame<S: AsRef<str>>(particles: &[S], n_rows: usize) -> PawianResult<DataFrame> {
    let particles =
        validate_particle_names(particles.iter().map(|s| s.as_ref().to_string()).collect())?;
    let columns = particles
        .iter()
        .flat_map(|particle| {
            Component::ALL.iter().map(move |component| {
                Column::full_null(
                    component.column_name(particle).into(),
                    n_rows,
                    &DataType::Float64,
                )
            })
        })
        .collect::<Vec<_>>();
    Ok(DataFrame::new(columns)?)
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
    )
}

/// Kinematic accessors for a [`DataFrame`] with Pawian's particle column layout.
///
/// The accessor borrows the table: filter or otherwise transform the [`DataFrame`] with polars and
/// wrap the result in a new accessor to query (or export) the reduced table.
///
/// ```ignore
/// let df = read_ascii("momentum_tuples_data.dat", &AsciiReadOptions::new().particles(["pi+", "D0", "D-"]))?;
/// let pwa = PwaAccessor::new(&df)?;
/// let m_dd = pwa.invariant_mass(&(pwa.particle("D0")? + pwa.particle("D-")?))?;
/// ```
#[derive(Debug, Clone)]
pub struct PwaAccessor<'a> {
    df: &'a DataFrame,
    particles: Vec<String>,
    has_weights: bool,
}

impl<'a> PwaAccessor<'a> {
    /// Validate that `df` looks like a Pawian table and attach the accessor to it.
    ///
    /// Columns that belong to no particle (other than `weight`) are ignored.
    pub fn new(df: &'a DataFrame) -> PawianResult<Self> {
        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let particles = infer_particle_names(column_names.as_slice());
        if particles.is_empty() {
            return Err(PawianError::InvalidSchema {
                reason: format!(
                    "no particle columns (<particle>_e, _px, _py, _pz) among {:?}",
                    column_names
                ),
            });
        }
        for particle in &particles {
            for component in Component::ALL {
                let name = component.column_name(particle);
                let dtype = df.column(&name)?.dtype();
                if !is_numeric(dtype) {
                    return Err(PawianError::InvalidSchema {
                        reason: format!("column \"{name}\" has non-numeric type {dtype}"),
                    });
                }
            }
        }
        let has_weights = match df.column(WEIGHT_COLUMN) {
            Ok(weights) if is_numeric(weights.dtype()) => true,
            Ok(weights) => {
                return Err(PawianError::InvalidSchema {
                    reason: format!(
                        "column \"{WEIGHT_COLUMN}\" has non-numeric type {}",
                        weights.dtype()
                    ),
                })
            }
            Err(_) => false,
        };
        let expected_width = 4 * particles.len() + usize::from(has_weights);
        if df.width() != expected_width {
            debug!(
                "ignoring {} column(s) outside the particle layout",
                df.width() - expected_width
            );
        }
        Ok(Self {
            df,
            particles,
            has_weights,
        })
    }

    /// The underlying table.
    pub fn dataframe(&self) -> &'a DataFrame {
        self.df
    }

    /// Number of events (rows).
    pub fn n_events(&self) -> usize {
        self.df.height()
    }

    /// Check if the table contains a `weight` column.
    pub fn has_weight_column(&self) -> bool {
        self.has_weights
    }

    /// Alias for [`PwaAccessor::has_weight_column`].
    pub fn has_weights(&self) -> bool {
        self.has_weights
    }

    /// Particle names in column order.
    pub fn particle_names(&self) -> &[String] {
        &self.particles
    }

    /// Alias for [`PwaAccessor::particle_names`].
    pub fn particles(&self) -> &[String] {
        self.particle_names()
    }

    /// Labels of the four columns of every particle, in column order.
    pub fn momentum_labels(&self) -> [&'static str; 4] {
        Component::ALL.map(|component| component.label())
    }

    /// The per-event weights.
    pub fn weights(&self) -> PawianResult<Series> {
        if !self.has_weights {
            return Err(PawianError::MissingWeights);
        }
        Ok(self
            .df
            .column(WEIGHT_COLUMN)?
            .as_materialized_series()
            .clone())
    }

    /// Alias for [`PwaAccessor::weights`] for fit intensity samples.
    pub fn intensities(&self) -> PawianResult<Series> {
        self.weights()
    }

    /// The four-momentum expression of a particle. Combine several with `+` to describe a
    /// system of particles.
    pub fn particle(&self, name: &str) -> PawianResult<Vec4> {
        self.check_particle(name)?;
        Ok(Vec4::new(name))
    }

    /// The `E`, `px`, `py` and `pz` columns of a single particle.
    pub fn select_particle(&self, name: &str) -> PawianResult<DataFrame> {
        let p4 = self.particle(name)?;
        Ok(self.lazy().select(p4.labelled()).collect()?)
    }

    /// The `px`, `py` and `pz` columns of a single particle.
    pub fn momentum_vector(&self, name: &str) -> PawianResult<DataFrame> {
        let p3 = self.particle(name)?.vec3();
        Ok(self
            .lazy()
            .select([
                p3.x().alias(Component::Px.label()),
                p3.y().alias(Component::Py.label()),
                p3.z().alias(Component::Pz.label()),
            ])
            .collect()?)
    }

    /// Per-event invariant mass of a four-momentum expression, with negative $`m^2`$ clamped to
    /// zero.
    pub fn invariant_mass(&self, p4: &Vec4) -> PawianResult<Series> {
        self.evaluate(p4.mag().alias("mass"))
    }

    /// Per-event squared invariant mass of a four-momentum expression (not clamped).
    pub fn invariant_mass2(&self, p4: &Vec4) -> PawianResult<Series> {
        self.evaluate(p4.mag2().alias("mass2"))
    }

    /// Energies of all particles, one column per particle.
    pub fn energy(&self) -> PawianResult<DataFrame> {
        self.per_particle(|p4| p4.e())
    }

    /// All momentum columns, `<particle>_px`, `<particle>_py` and `<particle>_pz` for every
    /// particle.
    pub fn p_xyz(&self) -> PawianResult<DataFrame> {
        let exprs = self
            .particles
            .iter()
            .flat_map(|particle| Vec4::new(particle).vec3().alias(particle))
            .collect::<Vec<_>>();
        Ok(self.lazy().select(exprs).collect()?)
    }

    /// Squared three-momentum magnitudes, one column per particle.
    pub fn rho2(&self) -> PawianResult<DataFrame> {
        self.per_particle(|p4| p4.vec3().mag2())
    }

    /// Three-momentum magnitudes, one column per particle.
    pub fn rho(&self) -> PawianResult<DataFrame> {
        self.per_particle(|p4| p4.vec3().mag())
    }

    /// Squared invariant masses, one column per particle.
    pub fn mass2(&self) -> PawianResult<DataFrame> {
        self.per_particle(|p4| p4.mag2())
    }

    /// Invariant masses, one column per particle.
    pub fn mass(&self) -> PawianResult<DataFrame> {
        self.per_particle(|p4| p4.mag())
    }

    /// Evaluate any column expression against the table.
    pub fn evaluate(&self, expr: Expr) -> PawianResult<Series> {
        let out = self.lazy().select([expr]).collect()?;
        out.select_at_idx(0)
            .map(|column| column.as_materialized_series().clone())
            .ok_or_else(|| PawianError::InvalidSchema {
                reason: "expression produced no column".to_string(),
            })
    }

    /// Keep only the events for which `predicate` holds, e.g. `col("weight").gt(lit(0.5))`.
    pub fn filter(&self, predicate: Expr) -> PawianResult<DataFrame> {
        Ok(self.lazy().filter(predicate).collect()?)
    }

    /// Write the table to an ASCII momentum-tuple file.
    pub fn write_ascii<P: AsRef<Path>>(
        &self,
        file_path: P,
        options: &AsciiWriteOptions,
    ) -> PawianResult<()> {
        io::write_ascii(self.df, file_path, options)
    }

    fn lazy(&self) -> LazyFrame {
        self.df.clone().lazy()
    }

    fn check_particle(&self, name: &str) -> PawianResult<()> {
        if self.particles.iter().any(|particle| particle == name) {
            Ok(())
        } else {
            Err(PawianError::UnknownParticle {
                name: name.to_string(),
            })
        }
    }

    fn per_particle<F>(&self, f: F) -> PawianResult<DataFrame>
    where
        F: Fn(&Vec4) -> Expr,
    {
        let exprs = self
            .particles
            .iter()
            .map(|particle| f(&Vec4::new(particle)).alias(particle.as_str()))
            .collect::<Vec<_>>();
        Ok(self.lazy().select(exprs).collect()?)
    }
}
