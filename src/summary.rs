use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Course, Semester, SemesterStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressPoint {
    pub name: String,
    pub gpa: f64,
    pub credit_hours: u64,
}

/// Counts grades by their letter, so "B+" and "B" share a bucket.
pub fn grade_distribution(courses: &[Course]) -> BTreeMap<char, usize> {
    let mut buckets = BTreeMap::new();

    for course in courses {
        if let Some(letter) = course.graded().and_then(|g| g.chars().next()) {
            *buckets.entry(letter).or_insert(0) += 1;
        }
    }

    buckets
}

pub fn distribution_percentages(distribution: &BTreeMap<char, usize>) -> Vec<(char, f64)> {
    let total: usize = distribution.values().sum();
    distribution
        .iter()
        .map(|(letter, count)| {
            let pct = if total == 0 {
                0.0
            } else {
                100.0 * *count as f64 / total as f64
            };
            (*letter, pct)
        })
        .collect()
}

pub fn progress_series(semesters: &[Semester]) -> Vec<ProgressPoint> {
    let mut ordered: Vec<&Semester> = semesters
        .iter()
        .filter(|s| s.status != SemesterStatus::InProgress)
        .collect();
    ordered.sort_by(|a, b| a.start_date.cmp(&b.start_date));

    ordered
        .into_iter()
        .map(|s| ProgressPoint {
            name: s.name.clone(),
            gpa: s.gpa(),
            credit_hours: s.total_credits(),
        })
        .collect()
}
