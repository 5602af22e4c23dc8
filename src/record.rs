use serde::Serialize;

use crate::gpa;
use crate::models::{AcademicRecord, Course, Semester, SemesterStatus};

pub const WARNING_GPA: f64 = 2.0;

#[derive(Debug, Clone, Serialize)]
pub struct Standing {
    pub cumulative_gpa: f64,
    pub total_credit_hours: u64,
    pub classification: &'static str,
    pub academic_warning: bool,
    pub current_semester: Option<String>,
}

pub fn current_semester(record: &AcademicRecord) -> Option<&Semester> {
    record
        .semesters
        .iter()
        .find(|s| s.status == SemesterStatus::InProgress)
}

pub fn past_semesters(record: &AcademicRecord) -> Vec<&Semester> {
    let mut past: Vec<&Semester> = record
        .semesters
        .iter()
        .filter(|s| s.status == SemesterStatus::Completed)
        .collect();
    past.sort_by(|a, b| b.end_date.cmp(&a.end_date));
    past
}

/// Semesters with no completed, graded course (all results withheld or
/// unpublished) carry no GPA and are skipped.
pub fn has_academic_warning(record: &AcademicRecord) -> bool {
    past_semesters(record)
        .iter()
        .filter(|s| gpa::qualifying_credits(&s.courses) > 0)
        .take(2)
        .any(|s| s.gpa() < WARNING_GPA)
}

pub fn honors_classification(cgpa: f64) -> &'static str {
    if cgpa >= 3.75 {
        "First Class Honors"
    } else if cgpa >= 3.25 {
        "Second Class Upper"
    } else if cgpa >= 2.75 {
        "Second Class Lower"
    } else if cgpa >= 2.0 {
        "Pass"
    } else {
        "Academic Warning"
    }
}

pub fn all_courses(record: &AcademicRecord) -> Vec<Course> {
    record
        .semesters
        .iter()
        .flat_map(|s| s.courses.iter().cloned())
        .collect()
}

pub fn cumulative_gpa(record: &AcademicRecord) -> f64 {
    gpa::calculate_gpa(&all_courses(record))
}

pub fn total_credit_hours(record: &AcademicRecord) -> u64 {
    gpa::qualifying_credits(&all_courses(record))
}

/// Course codes compare case-insensitively.
pub fn same_code(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// When a course code appears in more than one semester, the attempt in the
/// semester that ended last wins, whatever the order of `record.semesters`.
pub fn find_course<'a>(record: &'a AcademicRecord, code: &str) -> Option<&'a Course> {
    record
        .semesters
        .iter()
        .flat_map(|s| s.courses.iter().map(move |c| (s.end_date, c)))
        .filter(|(_, c)| same_code(&c.code, code))
        .max_by_key(|(end_date, _)| *end_date)
        .map(|(_, c)| c)
}

pub fn standing(record: &AcademicRecord) -> Standing {
    let cumulative_gpa = cumulative_gpa(record);
    Standing {
        cumulative_gpa,
        total_credit_hours: total_credit_hours(record),
        classification: honors_classification(cumulative_gpa),
        academic_warning: has_academic_warning(record),
        current_semester: current_semester(record).map(|s| s.name.clone()),
    }
}
