use crate::models::GradingEntry;

pub const GRADING_SYSTEM: [GradingEntry; 8] = [
    GradingEntry {
        grade: "A",
        min: 80.0,
        max: 100.0,
        points: 4.0,
        description: "Excellent",
    },
    GradingEntry {
        grade: "B+",
        min: 75.0,
        max: 79.0,
        points: 3.5,
        description: "Very Good",
    },
    GradingEntry {
        grade: "B",
        min: 70.0,
        max: 74.0,
        points: 3.0,
        description: "Good",
    },
    GradingEntry {
        grade: "C+",
        min: 65.0,
        max: 69.0,
        points: 2.5,
        description: "Fairly Good",
    },
    GradingEntry {
        grade: "C",
        min: 60.0,
        max: 64.0,
        points: 2.0,
        description: "Average",
    },
    GradingEntry {
        grade: "D+",
        min: 55.0,
        max: 59.0,
        points: 1.5,
        description: "Below Average",
    },
    GradingEntry {
        grade: "D",
        min: 50.0,
        max: 54.0,
        points: 1.0,
        description: "Marginal Pass",
    },
    GradingEntry {
        grade: "F",
        min: 0.0,
        max: 49.0,
        points: 0.0,
        description: "Fail",
    },
];

pub fn grading_entry(grade: &str) -> Option<&'static GradingEntry> {
    GRADING_SYSTEM.iter().find(|entry| entry.grade == grade)
}

/// Scale labels sharing a leading letter, e.g. `["B+", "B"]` for 'B'.
pub fn grades_in_bucket(letter: char) -> Vec<&'static str> {
    GRADING_SYSTEM
        .iter()
        .filter(|entry| entry.grade.starts_with(letter))
        .map(|entry| entry.grade)
        .collect()
}

pub fn grade_points(grade: &str) -> f64 {
    grading_entry(grade).map(|entry| entry.points).unwrap_or(0.0)
}

pub fn grade_description(grade: &str) -> &'static str {
    grading_entry(grade)
        .map(|entry| entry.description)
        .unwrap_or("N/A")
}

/// Ranges are inclusive at both ends, so fractional scores that fall
/// between two bands (e.g. 79.5) map to "N/A".
pub fn grade_for_score(score: f64) -> &'static str {
    GRADING_SYSTEM
        .iter()
        .find(|entry| score >= entry.min && score <= entry.max)
        .map(|entry| entry.grade)
        .unwrap_or("N/A")
}
