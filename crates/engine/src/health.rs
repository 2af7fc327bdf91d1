//! Health flags over attendance percentages.
//!
//! Thresholds are configurable per class type. Tutorials use a strict
//! pass/fail at 80% with no warning band; theory and lab classes get a
//! warning band between 75% and 80%.

use rollcall_core::ClassType;
use serde::{Deserialize, Serialize};

/// How healthy a subject's attendance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthFlag {
    Ok,
    Warning,
    Critical,
}

impl HealthFlag {
    /// A short marker for report rows.
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Ok => "🟢",
            Self::Warning => "🟡",
            Self::Critical => "🔴",
        }
    }
}

impl std::fmt::Display for HealthFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Percentage thresholds for one class type.
///
/// `critical_below <= warning_below`; a percentage below `critical_below` is
/// critical, below `warning_below` a warning, otherwise ok. Setting both
/// equal collapses the warning band into a strict pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthBands {
    pub critical_below: f64,
    pub warning_below: f64,
}

impl HealthBands {
    pub fn flag(&self, percent: f64) -> HealthFlag {
        if percent < self.critical_below {
            HealthFlag::Critical
        } else if percent < self.warning_below {
            HealthFlag::Warning
        } else {
            HealthFlag::Ok
        }
    }
}

fn default_graded() -> HealthBands {
    HealthBands {
        critical_below: 75.0,
        warning_below: 80.0,
    }
}

fn default_strict() -> HealthBands {
    HealthBands {
        critical_below: 80.0,
        warning_below: 80.0,
    }
}

/// Per-class-type health thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthPolicy {
    #[serde(default = "default_graded")]
    pub theory: HealthBands,

    /// Tutorials are strict pass/fail at 80 by default.
    #[serde(default = "default_strict")]
    pub tutorial: HealthBands,

    #[serde(default = "default_graded")]
    pub lab: HealthBands,
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            theory: default_graded(),
            tutorial: default_strict(),
            lab: default_graded(),
        }
    }
}

impl HealthPolicy {
    pub fn bands(&self, class_type: ClassType) -> HealthBands {
        match class_type {
            ClassType::Theory => self.theory,
            ClassType::Tutorial => self.tutorial,
            ClassType::Lab => self.lab,
        }
    }

    /// Flag a percentage under the thresholds for the given class type.
    pub fn flag(&self, percent: f64, class_type: ClassType) -> HealthFlag {
        self.bands(class_type).flag(percent)
    }
}
