//! Subject domain types.
//!
//! A Subject is one tracked course component (the theory lectures, the
//! tutorial slot, or the lab slot of a course) together with its attendance
//! counters. Derived thresholds (`total_classes`, `required_classes`) are
//! computed once at creation by the accounting engine and stored.

use crate::user::UserId;
use serde::{Deserialize, Serialize};

/// The kind of class a subject represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassType {
    Theory,
    Tutorial,
    Lab,
}

impl ClassType {
    /// The labels offered as suggested replies in the add-subject dialog.
    pub const CHOICES: [&'static str; 3] = ["Theory", "Tutorial", "Lab"];

    /// Parse a keyboard choice (case-insensitive).
    pub fn from_choice(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "theory" => Some(Self::Theory),
            "tutorial" => Some(Self::Tutorial),
            "lab" => Some(Self::Lab),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Theory => "theory",
            Self::Tutorial => "tutorial",
            Self::Lab => "lab",
        }
    }

    /// Weekly lab hours attached to this class type. Labs run two-hour
    /// sessions; everything else carries none.
    pub fn lab_hours(&self) -> u32 {
        match self {
            Self::Lab => 2,
            _ => 0,
        }
    }
}

impl std::fmt::Display for ClassType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClassType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_choice(s).ok_or_else(|| format!("unknown class type: {s}"))
    }
}

/// One tracked subject with its planned totals and attendance counters.
///
/// Counter invariant: `attended <= conducted <= total_classes`. The record
/// store enforces it on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// The user this subject belongs to.
    pub owner_id: UserId,

    /// Display name, unique per user (e.g. "Algorithms Lab").
    pub name: String,

    /// Base course group set at creation (e.g. "Algorithms" for both the
    /// theory and lab rows). Reports group rows by this, never by parsing
    /// the display name.
    pub group: String,

    pub class_type: ClassType,

    pub classes_per_week: u32,

    pub total_weeks: u32,

    /// `classes_per_week * total_weeks`.
    pub total_classes: u32,

    /// Minimum attended count to satisfy the 80% policy; always rounded up.
    pub required_classes: u32,

    /// Sessions the user was present for.
    pub attended: u32,

    /// Sessions that have been held so far.
    pub conducted: u32,

    /// Weekly lab hours (2 for labs, 0 otherwise).
    pub lab_hours: u32,
}

impl Subject {
    /// Build a fresh subject with zeroed counters. `required_classes` comes
    /// from the accounting engine; this constructor does not re-derive it.
    pub fn fresh(
        owner_id: UserId,
        name: impl Into<String>,
        group: impl Into<String>,
        class_type: ClassType,
        classes_per_week: u32,
        total_weeks: u32,
        required_classes: u32,
    ) -> Self {
        Self {
            owner_id,
            name: name.into(),
            group: group.into(),
            class_type,
            classes_per_week,
            total_weeks,
            total_classes: classes_per_week * total_weeks,
            required_classes,
            attended: 0,
            conducted: 0,
            lab_hours: class_type.lab_hours(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_type_from_choice() {
        assert_eq!(ClassType::from_choice("Lab"), Some(ClassType::Lab));
        assert_eq!(ClassType::from_choice("  theory "), Some(ClassType::Theory));
        assert_eq!(ClassType::from_choice("TUTORIAL"), Some(ClassType::Tutorial));
        assert_eq!(ClassType::from_choice("seminar"), None);
    }

    #[test]
    fn lab_hours_only_for_labs() {
        assert_eq!(ClassType::Lab.lab_hours(), 2);
        assert_eq!(ClassType::Theory.lab_hours(), 0);
        assert_eq!(ClassType::Tutorial.lab_hours(), 0);
    }

    #[test]
    fn fresh_subject_totals() {
        let s = Subject::fresh(
            UserId::new("1"),
            "Algo Lab",
            "Algo",
            ClassType::Lab,
            3,
            15,
            36,
        );
        assert_eq!(s.total_classes, 45);
        assert_eq!(s.required_classes, 36);
        assert_eq!(s.attended, 0);
        assert_eq!(s.conducted, 0);
        assert_eq!(s.lab_hours, 2);
    }

    #[test]
    fn subject_serialization_roundtrip() {
        let s = Subject::fresh(
            UserId::new("1"),
            "Networks",
            "Networks",
            ClassType::Theory,
            4,
            15,
            48,
        );
        let json = serde_json::to_string(&s).unwrap();
        let back: Subject = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "Networks");
        assert_eq!(back.class_type, ClassType::Theory);
        assert_eq!(back.total_classes, 60);
    }
}
