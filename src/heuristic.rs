use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::DqbfError;

/// Policy for choosing the next universal variable to eliminate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum UnivVarElimHeuristic {
    /// Sort once, by the number of dependent existential variables, at the start of elimination.
    NumOfDependenciesOnce,
    /// Pick the variable with the fewest dependents anew before every elimination.
    #[default]
    NumOfDependenciesContinuous,
}

impl FromStr for UnivVarElimHeuristic {
    type Err = DqbfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "once" | "num-of-dependencies-once" | "numofdependenciesonce" => Ok(Self::NumOfDependenciesOnce),
            "continuous" | "num-of-dependencies-continuous" | "numofdependenciescontinuous" => {
                Ok(Self::NumOfDependenciesContinuous)
            }
            _ => Err(DqbfError::UnsupportedHeuristic { name: s.to_string() }),
        }
    }
}

impl Display for UnivVarElimHeuristic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NumOfDependenciesOnce => write!(f, "once"),
            Self::NumOfDependenciesContinuous => write!(f, "continuous"),
        }
    }
}
