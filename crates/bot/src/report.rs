//! One-shot report rendering.
//!
//! Pure text builders over subject snapshots; the dispatcher fetches the
//! rows and these functions turn them into chat messages.

use rollcall_core::Subject;
use rollcall_engine::{self as engine, HealthPolicy};
use std::fmt::Write;

/// `/status` — attendance per subject, rows grouped by course.
pub fn status(subjects: &[Subject], policy: &HealthPolicy) -> String {
    let mut rows = subjects.to_vec();
    rows.sort_by(|a, b| (a.group.as_str(), a.name.as_str()).cmp(&(b.group.as_str(), b.name.as_str())));

    let mut msg = String::from("📊 Attendance Status\n");
    let mut current_group: Option<&str> = None;
    for s in &rows {
        if current_group != Some(s.group.as_str()) {
            current_group = Some(s.group.as_str());
            let _ = write!(msg, "\n📘 {}\n", s.group);
        }
        let percent = engine::attendance_percent(s.attended, s.conducted);
        let flag = policy.flag(percent, s.class_type);
        let _ = write!(
            msg,
            "{} {}: {}/{} → {:.1}%\n",
            flag.emoji(),
            s.name,
            s.attended,
            s.conducted,
            percent
        );
    }
    msg
}

/// `/canimiss` — remaining safe-absence budget per subject.
///
/// Zero and negative budgets both read "no bunks left"; a negative number is
/// never shown to the user.
pub fn can_i_miss(subjects: &[Subject]) -> String {
    let mut msg = String::from("🎯 Safe absences\n\n");
    for s in subjects {
        let remaining = engine::remaining_safe_absences(
            s.total_classes,
            s.required_classes,
            s.conducted,
            s.attended,
        );
        if remaining > 0 {
            let noun = if remaining == 1 { "bunk" } else { "bunks" };
            let _ = write!(msg, "{}: {remaining} {noun} left\n", s.name);
        } else {
            let _ = write!(msg, "{}: no bunks left ⚠️\n", s.name);
        }
    }
    msg
}

/// Leave-planner output: projected misses for `absent_days` days away.
pub fn leave_plan(subjects: &[Subject], absent_days: u32) -> String {
    let day_noun = if absent_days == 1 { "day" } else { "days" };
    let mut msg = format!("🏖️ If you take {absent_days} {day_noun} off:\n\n");
    for s in subjects {
        let missed = engine::leave_impact(s.classes_per_week, absent_days);
        let remaining = engine::remaining_safe_absences(
            s.total_classes,
            s.required_classes,
            s.conducted,
            s.attended,
        );
        let verdict = if i64::from(missed) <= remaining {
            "fits your budget"
        } else {
            "over budget ⚠️"
        };
        let noun = if missed == 1 { "class" } else { "classes" };
        let _ = write!(msg, "{}: misses {missed} {noun} — {verdict}\n", s.name);
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::{ClassType, UserId};

    fn subject(name: &str, group: &str, class_type: ClassType, attended: u32, conducted: u32) -> Subject {
        let mut s = Subject::fresh(UserId::new("1"), name, group, class_type, 3, 15, 36);
        s.attended = attended;
        s.conducted = conducted;
        s
    }

    #[test]
    fn status_groups_components_under_one_header() {
        let subjects = vec![
            subject("Algorithms Lab", "Algorithms", ClassType::Lab, 3, 5),
            subject("Algorithms", "Algorithms", ClassType::Theory, 8, 10),
            subject("Networks", "Networks", ClassType::Theory, 9, 10),
        ];
        let msg = status(&subjects, &HealthPolicy::default());

        assert_eq!(msg.matches("📘 Algorithms").count(), 1);
        assert!(msg.contains("Algorithms: 8/10 → 80.0%"));
        assert!(msg.contains("Algorithms Lab: 3/5 → 60.0%"));
        assert!(msg.contains("📘 Networks"));
        // 60% lab is critical, 80% theory is ok.
        assert!(msg.contains("🔴 Algorithms Lab"));
        assert!(msg.contains("🟢 Algorithms:"));
    }

    #[test]
    fn status_of_unconducted_subject_reads_100() {
        let subjects = vec![subject("Networks", "Networks", ClassType::Theory, 0, 0)];
        let msg = status(&subjects, &HealthPolicy::default());
        assert!(msg.contains("0/0 → 100.0%"));
    }

    #[test]
    fn overdrawn_budget_reads_no_bunks_left() {
        // 45 total, 36 required, 10 absences: one over budget.
        let msg = can_i_miss(&[subject("Algorithms", "Algorithms", ClassType::Theory, 30, 40)]);
        assert!(msg.contains("Algorithms: no bunks left"));
        assert!(!msg.contains('-'));
    }

    #[test]
    fn exactly_spent_budget_also_reads_no_bunks_left() {
        let msg = can_i_miss(&[subject("Algorithms", "Algorithms", ClassType::Theory, 10, 19)]);
        assert!(msg.contains("no bunks left"));
    }

    #[test]
    fn healthy_budget_counts_bunks() {
        let msg = can_i_miss(&[subject("Algorithms", "Algorithms", ClassType::Theory, 10, 10)]);
        assert!(msg.contains("Algorithms: 9 bunks left"));
    }

    #[test]
    fn leave_plan_flags_over_budget_subjects() {
        // Fresh subject: 9 in the budget, a 5-day week costs 3. Fine.
        let fresh = subject("Algorithms", "Algorithms", ClassType::Theory, 0, 0);
        // Overdrawn subject: any absence is over budget.
        let drained = subject("Networks", "Networks", ClassType::Theory, 30, 40);

        let msg = leave_plan(&[fresh, drained], 5);
        assert!(msg.contains("Algorithms: misses 3 classes — fits your budget"));
        assert!(msg.contains("Networks: misses 3 classes — over budget"));
    }
}
