//! `pawian` is a small helper library for physicists working with the Pawian partial-wave-analysis framework. Pawian itself does the fitting; this crate takes care of the data on either side of it. Momentum-tuple files are loaded into [`polars`] [`DataFrame`](polars::prelude::DataFrame)s, kinematic quantities (energies, three-momenta, invariant masses) are computed from them as lazy column expressions, and the (possibly filtered) tables are written back out in the same ASCII format for the next Pawian run. A reader for the Boost-style configuration files Pawian emits is included as well.
//!
//! # Table of Contents
//! - [Quick Start](#quick-start)
//! - [Data Format](#data-format)
//! - [Configuration Files](#configuration-files)
//!
//! # Quick Start
//! Reading a file needs the names of the particles in the order their lines appear in each event:
//! ```rust
//! use pawian::{read_ascii_from, AsciiReadOptions, AsciiWriteOptions, PwaAccessor};
//! use pawian::data::{SAMPLE_ASCII, SAMPLE_PARTICLES};
//! use pawian::polars::prelude::*;
//!
//! # fn main() -> pawian::PawianResult<()> {
//! // read_ascii("~/pwa/momentum_tuples_data.dat", ...) reads from a path instead
//! let df = read_ascii_from(
//!     SAMPLE_ASCII.as_bytes(),
//!     &AsciiReadOptions::new().particles(SAMPLE_PARTICLES),
//! )?;
//! let pwa = PwaAccessor::new(&df)?;
//! assert!(pwa.has_weight_column());
//!
//! // invariant mass of the D0 D- system, one value per event
//! let m_dd = pwa.invariant_mass(&(pwa.particle("D0")? + pwa.particle("D-")?))?;
//! assert_eq!(m_dd.len(), 2);
//!
//! // keep the high-weight events and write them back out
//! let selected = pwa.filter(col("weight").gt(lit(0.993)))?;
//! let mut buffer = Vec::new();
//! pawian::write_ascii_to(&selected, &mut buffer, &AsciiWriteOptions::new())?;
//! assert_eq!(String::from_utf8_lossy(&buffer).lines().count(), 4);
//! # Ok(())
//! # }
//! ```
//!
//! Derived columns can also be built directly as expressions and used anywhere `polars` accepts
//! them, e.g. `df.lazy().with_column(pawian::mass(["D0", "D-"]))` adds a column named
//! `mass(D0, D-)`.
//!
//! # Data Format
//! Pawian's momentum tuples are plain text. Each event is an optional line holding the event
//! weight, followed by one line per particle with four whitespace-separated numbers, $`E`$,
//! $`p_x`$, $`p_y`$ and $`p_z`$ by default (files exported by Pawian itself order them as
//! $`p_x\,p_y\,p_z\,E`$; select that with [`ComponentOrder::EnergyLast`]). Every event has the same
//! particles in the same order. Blank lines are ignored.
//! ```text
//! 0.99407
//! -0.00357645   0.0962561   0.0181079    0.170545
//!    0.224019    0.623156    0.215051     1.99057
//!   -0.174404   -0.719412   -0.233159      2.0243
//! ```
//! Weighted files are detected from their first line, and in that case the number of particles
//! can also be inferred. Unweighted files need the particle names (or at least their count).
//!
//! In memory, a file becomes a table with an optional leading `weight` column followed by four
//! `Float64` columns for each particle:
//! | Column name   | Interpretation                      |
//! | ------------- | ----------------------------------- |
//! | `weight`      | Event weight (or fit intensity)     |
//! | `pi+_e`       | $`\pi^+`$ energy                    |
//! | `pi+_px`      | $`\pi^+`$ momentum (x-component)    |
//! | `pi+_py`      | $`\pi^+`$ momentum (y-component)    |
//! | `pi+_pz`      | $`\pi^+`$ momentum (z-component)    |
//! | `D0_e`        | $`D^0`$ energy                      |
//! | ...           | ...                                 |
//!
//! Any table with this layout (extra columns are ignored) can be wrapped in a [`PwaAccessor`] and
//! exported with [`write_ascii`].
//!
//! The momentum tuples Pawian stores in `pawianHists.root` after a fit are read into the same
//! layout with [`read_pawian_hists`], choosing the data or the fitted sample with [`HistType`].
//!
//! # Configuration Files
//! [`ConfigFile`] reads the subset of Boost `program_options` syntax used by Pawian: `key = value`
//! lines, `#` comments and `[section]` headers (giving keys like `section.key`). Options may be
//! repeated, and all of their values are kept:
//! ```rust
//! use pawian::ConfigFile;
//!
//! # fn main() -> pawian::PawianResult<()> {
//! let config: ConfigFile = "decay = a->b c\ndecay = b->d e\n[fit]\nmaxCalls = 500\n".parse()?;
//! assert_eq!(config.get_all("decay").len(), 2);
//! assert_eq!(config.get_parsed::<u32>("fit.maxCalls")?, Some(500));
//! # Ok(())
//! # }
//! ```
#![warn(clippy::perf, clippy::style, missing_docs)]

/// Methods for loading, inspecting and writing momentum-tuple data.
pub mod data {
    pub use pawian_core::data::io::{read_ascii, read_ascii_from, write_ascii, write_ascii_to};
    pub use pawian_core::data::root::read_pawian_hists;
    pub use pawian_core::data::{
        infer_particle_names, skeleton_frame, AsciiReadOptions, AsciiWriteOptions, PwaAccessor,
        SAMPLE_ASCII, SAMPLE_PARTICLES, WEIGHT_COLUMN,
    };
}
/// Utility functions, enums, and four-vector expressions
pub mod utils {
    pub use pawian_core::utils::*;
}
/// Boost-style configuration files
pub mod config {
    pub use pawian_core::config::*;
}

pub use pawian_core::config::ConfigFile;
pub use pawian_core::data::io::{read_ascii, read_ascii_from, write_ascii, write_ascii_to};
pub use pawian_core::data::root::read_pawian_hists;
pub use pawian_core::data::{skeleton_frame, AsciiReadOptions, AsciiWriteOptions, PwaAccessor};
pub use pawian_core::utils::enums::{Component, ComponentOrder, FloatPrecision, HistType};
pub use pawian_core::utils::variables::{energy, mass, mass2, rho, rho2};
pub use pawian_core::utils::vectors::{Vec3, Vec4};
pub use pawian_core::{PawianError, PawianResult};
pub use polars;
