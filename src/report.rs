use std::fmt::Write;

use chrono::NaiveDate;

use crate::grading;
use crate::models::{AcademicRecord, Semester, SemesterStatus};
use crate::record;
use crate::summary;

pub fn build_report(record: &AcademicRecord, as_of: NaiveDate) -> String {
    let standing = record::standing(record);
    let courses = record::all_courses(record);
    let distribution = summary::grade_distribution(&courses);
    let completed: Vec<Semester> = record
        .semesters
        .iter()
        .filter(|s| s.status == SemesterStatus::Completed)
        .cloned()
        .collect();
    let progress = summary::progress_series(&completed);

    let mut output = String::new();

    let _ = writeln!(output, "# Academic Standing Report");
    let _ = writeln!(
        output,
        "Generated for {} ({}, {} level {}) on {}",
        record.student_name, record.student_id, record.programme, record.level, as_of
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Standing");
    let _ = writeln!(output, "- CGPA: {:.2}", standing.cumulative_gpa);
    let _ = writeln!(output, "- Credit hours earned: {}", standing.total_credit_hours);
    let _ = writeln!(output, "- Classification: {}", standing.classification);
    if standing.academic_warning {
        let _ = writeln!(
            output,
            "- Academic warning: a recent semester GPA fell below {:.2}",
            record::WARNING_GPA
        );
    }
    if !record.awards.is_empty() {
        let names: Vec<&str> = record.awards.iter().map(|a| a.name.as_str()).collect();
        let _ = writeln!(output, "- Awards: {}", names.join(", "));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Current Semester");

    match record::current_semester(record) {
        Some(semester) => {
            let _ = writeln!(
                output,
                "{} ({} credits, ends {})",
                semester.name,
                semester.total_credits(),
                semester.end_date
            );
            for course in semester.courses.iter() {
                let _ = writeln!(
                    output,
                    "- {} {} ({} cr, {})",
                    course.code,
                    course.title,
                    course.credits,
                    course.status.as_str()
                );
            }
        }
        None => {
            let _ = writeln!(output, "No semester in progress.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Semester Progress");

    if progress.is_empty() {
        let _ = writeln!(output, "No completed semesters yet.");
    } else {
        let _ = writeln!(output, "| Semester | GPA | Credits |");
        let _ = writeln!(output, "|----------|-----|---------|");
        for point in progress.iter() {
            let _ = writeln!(
                output,
                "| {} | {:.2} | {} |",
                point.name, point.gpa, point.credit_hours
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Grade Distribution");

    if distribution.is_empty() {
        let _ = writeln!(output, "No graded courses.");
    } else {
        for (letter, pct) in summary::distribution_percentages(&distribution) {
            let count = distribution.get(&letter).copied().unwrap_or(0);
            let grades = grading::grades_in_bucket(letter);
            if grades.len() > 1 {
                let _ = writeln!(
                    output,
                    "- {} ({}): {} courses ({:.1}%)",
                    letter,
                    grades.join(", "),
                    count,
                    pct
                );
            } else {
                let _ = writeln!(output, "- {}: {} courses ({:.1}%)", letter, count, pct);
            }
        }
    }

    output
}
