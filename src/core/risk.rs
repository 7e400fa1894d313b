//! Risk profiles
//!
//! Each risk level binds the thresholds that decide how aggressively
//! matches are covered:
//!
//! | level  | single | doubles | triples | value |
//! |--------|--------|---------|---------|-------|
//! | low    | 0.70   | 4       | 1       | 1.20  |
//! | medium | 0.60   | 6       | 2       | 1.10  |
//! | high   | 0.50   | 8       | 3       | 1.05  |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::OptimizeError;

/// Named risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub fn profile(self) -> RiskProfile {
        RiskProfile::for_level(self)
    }
}

impl FromStr for RiskLevel {
    type Err = OptimizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(OptimizeError::InvalidRiskLevel(other.to_string())),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold parameters for one risk level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub level: RiskLevel,
    /// Top probability at or above which a match is locked to one outcome
    pub min_prob_for_single: f64,
    /// Advisory cap on half-covers, not enforced by the reducer
    pub max_doubles: usize,
    /// Advisory cap on full-covers, not enforced by the reducer
    pub max_triples: usize,
    /// Minimum probability/streck ratio for adding an outcome on value
    pub value_threshold: f64,
}

impl RiskProfile {
    pub fn for_level(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Self {
                level,
                min_prob_for_single: 0.70,
                max_doubles: 4,
                max_triples: 1,
                value_threshold: 1.2,
            },
            RiskLevel::Medium => Self {
                level,
                min_prob_for_single: 0.60,
                max_doubles: 6,
                max_triples: 2,
                value_threshold: 1.1,
            },
            RiskLevel::High => Self {
                level,
                min_prob_for_single: 0.50,
                max_doubles: 8,
                max_triples: 3,
                value_threshold: 1.05,
            },
        }
    }

    /// Look up a profile by its name
    pub fn from_name(name: &str) -> Result<Self, OptimizeError> {
        Ok(Self::for_level(name.parse()?))
    }

    /// All profiles, lowest risk first
    pub fn all() -> Vec<RiskProfile> {
        RiskLevel::ALL.iter().map(|&l| Self::for_level(l)).collect()
    }
}

impl Default for RiskProfile {
    fn default() -> Self {
        Self::for_level(RiskLevel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_risk_levels() {
        assert_eq!("low".parse::<RiskLevel>().unwrap(), RiskLevel::Low);
        assert_eq!("medium".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert_eq!("high".parse::<RiskLevel>().unwrap(), RiskLevel::High);
    }

    #[test]
    fn test_parse_unknown_level() {
        let err = "extreme".parse::<RiskLevel>().unwrap_err();
        assert_eq!(err, OptimizeError::InvalidRiskLevel("extreme".to_string()));

        // Names are case-sensitive
        assert!("High".parse::<RiskLevel>().is_err());
        assert!("".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_profile_parameters() {
        let low = RiskProfile::for_level(RiskLevel::Low);
        assert!((low.min_prob_for_single - 0.70).abs() < 1e-12);
        assert_eq!(low.max_doubles, 4);
        assert_eq!(low.max_triples, 1);
        assert!((low.value_threshold - 1.2).abs() < 1e-12);

        let medium = RiskProfile::from_name("medium").unwrap();
        assert!((medium.min_prob_for_single - 0.60).abs() < 1e-12);
        assert_eq!(medium.max_doubles, 6);
        assert_eq!(medium.max_triples, 2);
        assert!((medium.value_threshold - 1.1).abs() < 1e-12);

        let high = RiskLevel::High.profile();
        assert!((high.min_prob_for_single - 0.50).abs() < 1e-12);
        assert_eq!(high.max_doubles, 8);
        assert_eq!(high.max_triples, 3);
        assert!((high.value_threshold - 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_thresholds_loosen_with_risk() {
        let profiles = RiskProfile::all();
        assert_eq!(profiles.len(), 3);
        for pair in profiles.windows(2) {
            assert!(pair[0].min_prob_for_single > pair[1].min_prob_for_single);
            assert!(pair[0].value_threshold > pair[1].value_threshold);
        }
    }

    #[test]
    fn test_default_is_medium() {
        assert_eq!(RiskProfile::default().level, RiskLevel::Medium);
        assert_eq!(RiskLevel::Medium.to_string(), "medium");
    }
}
