use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::PawianError;

/// One of the four columns stored for every particle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    /// The energy $`E`$.
    E,
    /// The momentum along $`x`$.
    Px,
    /// The momentum along $`y`$.
    Py,
    /// The momentum along $`z`$.
    Pz,
}

impl Component {
    /// All components in table column order.
    pub const ALL: [Component; 4] = [Component::E, Component::Px, Component::Py, Component::Pz];

    /// The suffix appended to a particle name to form its column name, e.g. `D0_px`.
    pub fn suffix(&self) -> &'static str {
        match self {
            Component::E => "e",
            Component::Px => "px",
            Component::Py => "py",
            Component::Pz => "pz",
        }
    }

    /// The label used for this component in per-particle sub-tables.
    pub fn label(&self) -> &'static str {
        match self {
            Component::E => "E",
            Component::Px => "px",
            Component::Py => "py",
            Component::Pz => "pz",
        }
    }

    /// Full column name of this component for the given particle.
    pub fn column_name(&self, particle: &str) -> String {
        format!("{}_{}", particle, self.suffix())
    }
}

impl Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Order of the four values on a particle line of an ASCII momentum-tuple file.
///
/// The table layout is the same either way: this only affects how lines are tokenized and
/// written.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentOrder {
    /// `E px py pz`
    #[default]
    EnergyFirst,
    /// `px py pz E`, the layout of momentum tuples exported by Pawian itself.
    EnergyLast,
}

impl ComponentOrder {
    /// The components in the order they appear on a line.
    pub fn components(&self) -> [Component; 4] {
        match self {
            ComponentOrder::EnergyFirst => [Component::E, Component::Px, Component::Py, Component::Pz],
            ComponentOrder::EnergyLast => [Component::Px, Component::Py, Component::Pz, Component::E],
        }
    }
}

impl Display for ComponentOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentOrder::EnergyFirst => write!(f, "E px py pz"),
            ComponentOrder::EnergyLast => write!(f, "px py pz E"),
        }
    }
}

impl FromStr for ComponentOrder {
    type Err = PawianError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match squashed.as_str() {
            "energyfirst" | "first" | "epxpypz" => Ok(Self::EnergyFirst),
            "energylast" | "last" | "pxpypze" | "pawian" => Ok(Self::EnergyLast),
            _ => Err(PawianError::ParseError {
                name: s.to_string(),
                object: "ComponentOrder".to_string(),
            }),
        }
    }
}

/// Which set of momentum tuples to read from a `pawianHists.root` file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistType {
    /// The data sample that was fitted.
    #[default]
    Data,
    /// Phase-space events weighted by the fit result.
    Fitted,
}

impl HistType {
    /// Name of the tree holding these momentum tuples.
    pub fn tree_name(&self) -> &'static str {
        match self {
            HistType::Data => "_dataFourvecs",
            HistType::Fitted => "_fittedFourvecs",
        }
    }
}

impl Display for HistType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistType::Data => write!(f, "data"),
            HistType::Fitted => write!(f, "fitted"),
        }
    }
}

impl FromStr for HistType {
    type Err = PawianError;

    /// Accepts anything containing `dat` (`"data"`, `"dataFourvecs"`, ...) or `fit`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        if lower.contains("dat") {
            Ok(Self::Data)
        } else if lower.contains("fit") {
            Ok(Self::Fitted)
        } else {
            Err(PawianError::ParseError {
                name: s.to_string(),
                object: "HistType".to_string(),
            })
        }
    }
}

/// Precision used when printing floating-point values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FloatPrecision {
    /// Shortest representation that reads back as the same 32-bit float.
    F32,
    /// Shortest representation that reads back as the same 64-bit float.
    #[default]
    F64,
}

impl FloatPrecision {
    /// Format a value with this precision.
    pub fn format(&self, value: f64) -> String {
        match self {
            FloatPrecision::F32 => (value as f32).to_string(),
            FloatPrecision::F64 => value.to_string(),
        }
    }
}
