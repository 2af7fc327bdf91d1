//! Attendance accounting engine.
//!
//! Pure, stateless computations over a subject's counters: required-class
//! thresholds, attendance percentage, the remaining safe-absence budget, and
//! leave-impact projections.
//!
//! All functions are total over valid non-negative integer domains. The
//! engine does not validate counts — input validation belongs to the dialog
//! layer and the store's write boundary.

pub mod health;

pub use health::{HealthBands, HealthFlag, HealthPolicy};

/// Minimum attended count needed to satisfy the 80% attendance policy over
/// the subject's planned classes. Rounding is always up: the requirement is
/// never under-reported.
///
/// `ceil(0.8 * cpw * weeks)`, computed in integer arithmetic as
/// `ceil(4 * total / 5)`.
pub fn required_classes(classes_per_week: u32, total_weeks: u32) -> u32 {
    let total = classes_per_week * total_weeks;
    (4 * total).div_ceil(5)
}

/// Attendance percentage over conducted sessions.
///
/// An unconducted subject reports 100% — the optimistic default, not
/// "undefined".
pub fn attendance_percent(attended: u32, conducted: u32) -> f64 {
    if conducted == 0 {
        100.0
    } else {
        f64::from(attended) / f64::from(conducted) * 100.0
    }
}

/// How many more sessions the user may miss while still able to reach
/// `required_classes`.
///
/// `(total - required) - (conducted - attended)`. Zero or negative both mean
/// "no more bunks allowed"; only a positive value is safe.
pub fn remaining_safe_absences(
    total_classes: u32,
    required_classes: u32,
    conducted: u32,
    attended: u32,
) -> i64 {
    let max_absent = i64::from(total_classes) - i64::from(required_classes);
    let current_absent = i64::from(conducted) - i64::from(attended);
    max_absent - current_absent
}

/// Classes missed by being absent for `absent_days` instructional days,
/// assuming a 5-day week. Approximate by design, not a calendar-exact
/// projection.
///
/// `ceil(classes_per_week / 5 * absent_days)`.
pub fn leave_impact(classes_per_week: u32, absent_days: u32) -> u32 {
    (classes_per_week * absent_days).div_ceil(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_classes_standard_semester() {
        // 3 classes/week over 15 weeks: 45 total, 80% = 36 exactly.
        assert_eq!(required_classes(3, 15), 36);
    }

    #[test]
    fn required_classes_rounds_up() {
        // 42 total * 0.8 = 33.6 -> 34, never 33.
        assert_eq!(required_classes(3, 14), 34);
        // 4 total * 0.8 = 3.2 -> 4.
        assert_eq!(required_classes(4, 1), 4);
        // 11 total * 0.8 = 8.8 -> 9.
        assert_eq!(required_classes(11, 1), 9);
    }

    #[test]
    fn percent_of_unconducted_subject_is_optimistic() {
        assert_eq!(attendance_percent(0, 0), 100.0);
    }

    #[test]
    fn percent_basic() {
        assert_eq!(attendance_percent(8, 10), 80.0);
        assert_eq!(attendance_percent(10, 10), 100.0);
        assert_eq!(attendance_percent(0, 10), 0.0);
    }

    #[test]
    fn safe_absences_untouched_subject() {
        // 45 total, 36 required, nothing missed: 9 bunks in the budget.
        assert_eq!(remaining_safe_absences(45, 36, 10, 10), 9);
    }

    #[test]
    fn safe_absences_overdrawn() {
        // 10 absences against a budget of 9: one over, reported negative.
        assert_eq!(remaining_safe_absences(45, 36, 40, 30), -1);
    }

    #[test]
    fn safe_absences_exactly_spent() {
        assert_eq!(remaining_safe_absences(45, 36, 19, 10), 0);
    }

    #[test]
    fn leave_impact_rounds_up() {
        // 3 classes/week, 2 days off: 3/5*2 = 1.2 -> 2 classes missed.
        assert_eq!(leave_impact(3, 2), 2);
        // A full week off costs the full weekly load.
        assert_eq!(leave_impact(3, 5), 3);
        assert_eq!(leave_impact(4, 5), 4);
    }

    #[test]
    fn leave_impact_zero_days() {
        assert_eq!(leave_impact(3, 0), 0);
    }
}
