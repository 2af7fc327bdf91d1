//! Canned curricula for the preset loader.
//!
//! Each batch is a fixed table of subjects with hardcoded weekly loads over
//! a 15-week term. Display names carry the component suffix ("... Lab");
//! the group field ties components of one course together for reports.

use rollcall_core::ClassType;

/// Term length for every preset batch.
pub const PRESET_WEEKS: u32 = 15;

pub struct PresetSubject {
    pub name: &'static str,
    pub group: &'static str,
    pub class_type: ClassType,
    pub classes_per_week: u32,
}

pub struct Batch {
    pub label: &'static str,
    pub subjects: &'static [PresetSubject],
}

const fn theory(name: &'static str, classes_per_week: u32) -> PresetSubject {
    PresetSubject {
        name,
        group: name,
        class_type: ClassType::Theory,
        classes_per_week,
    }
}

const fn tutorial(name: &'static str, group: &'static str) -> PresetSubject {
    PresetSubject {
        name,
        group,
        class_type: ClassType::Tutorial,
        classes_per_week: 1,
    }
}

const fn lab(name: &'static str, group: &'static str) -> PresetSubject {
    PresetSubject {
        name,
        group,
        class_type: ClassType::Lab,
        classes_per_week: 1,
    }
}

/// BTech Cybersecurity programme batches.
pub const BATCHES: &[Batch] = &[
    Batch {
        label: "Cybersecurity Sem 3",
        subjects: &[
            theory("Data Structures", 3),
            lab("Data Structures Lab", "Data Structures"),
            theory("Discrete Mathematics", 3),
            tutorial("Discrete Mathematics Tutorial", "Discrete Mathematics"),
            theory("Digital Logic Design", 3),
            lab("Digital Logic Design Lab", "Digital Logic Design"),
            theory("Computer Organization", 3),
            theory("Principles of Cyber Security", 3),
        ],
    },
    Batch {
        label: "Cybersecurity Sem 4",
        subjects: &[
            theory("Operating Systems", 3),
            lab("Operating Systems Lab", "Operating Systems"),
            theory("Database Systems", 3),
            lab("Database Systems Lab", "Database Systems"),
            theory("Computer Networks", 3),
            tutorial("Computer Networks Tutorial", "Computer Networks"),
            theory("Cryptography Fundamentals", 3),
            theory("Secure Coding", 2),
            lab("Secure Coding Lab", "Secure Coding"),
        ],
    },
];

/// Labels offered on the batch-selector keyboard.
pub fn batch_labels() -> Vec<String> {
    BATCHES.iter().map(|b| b.label.to_string()).collect()
}

/// Look a batch up by its keyboard label.
pub fn find(label: &str) -> Option<&'static Batch> {
    BATCHES.iter().find(|b| b.label == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_batch_is_findable_by_label() {
        for label in batch_labels() {
            assert!(find(&label).is_some(), "missing batch {label}");
        }
        assert!(find("Cybersecurity Sem 9").is_none());
    }

    #[test]
    fn component_names_are_unique_within_a_batch() {
        for batch in BATCHES {
            let mut names: Vec<_> = batch.subjects.iter().map(|s| s.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), batch.subjects.len(), "{}", batch.label);
        }
    }

    #[test]
    fn labs_and_tutorials_point_at_their_parent_group() {
        for batch in BATCHES {
            for subject in batch.subjects {
                match subject.class_type {
                    ClassType::Theory => assert_eq!(subject.name, subject.group),
                    _ => assert!(
                        subject.name.starts_with(subject.group),
                        "{} should belong to {}",
                        subject.name,
                        subject.group
                    ),
                }
            }
        }
    }

    #[test]
    fn weekly_loads_are_positive() {
        for batch in BATCHES {
            for subject in batch.subjects {
                assert!(subject.classes_per_week > 0);
            }
        }
    }
}
