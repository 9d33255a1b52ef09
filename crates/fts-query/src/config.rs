//! Parser configuration.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Which dialect the parser accepts, and how adjacent items combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// The restricted CMIS contains() dialect.
    Cmis,
    /// Full dialect; adjacent items are implicitly ANDed.
    #[default]
    DefaultConjunction,
    /// Full dialect; adjacent items are implicitly ORed.
    DefaultDisjunction,
}

impl Mode {
    /// All modes, in declaration order.
    pub const ALL: [Self; 3] = [Self::Cmis, Self::DefaultConjunction, Self::DefaultDisjunction];

    /// The kebab-case name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cmis => "cmis",
            Self::DefaultConjunction => "default-conjunction",
            Self::DefaultDisjunction => "default-disjunction",
        }
    }

    /// True for the two full-dialect modes.
    pub fn is_fts(self) -> bool {
        !matches!(self, Self::Cmis)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown mode '{s}' (expected cmis, default-conjunction or default-disjunction)")
            })
    }
}

/// Settings fixed for the lifetime of a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Dialect and top-level implicit connective.
    pub mode: Mode,
    /// Whether adjacent items inside `field:( ... )` are ANDed (otherwise ORed).
    pub default_field_conjunction: bool,
}

impl ParserConfig {
    /// Creates a configuration.
    pub fn new(mode: Mode, default_field_conjunction: bool) -> Self {
        Self {
            mode,
            default_field_conjunction,
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new(Mode::default(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.mode, Mode::DefaultConjunction);
        assert!(config.default_field_conjunction);
    }

    #[test]
    fn mode_round_trips_through_str() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
        assert_eq!("CMIS".parse::<Mode>().unwrap(), Mode::Cmis);
        assert!("fuzzy".parse::<Mode>().is_err());
    }

    #[test]
    fn only_cmis_is_restricted() {
        assert!(!Mode::Cmis.is_fts());
        assert!(Mode::DefaultDisjunction.is_fts());
    }
}
