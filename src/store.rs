use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::grading;
use crate::models::{AcademicRecord, Award, Course, CourseStatus, Semester, SemesterStatus};

fn date(y: i32, m: u32, d: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).with_context(|| format!("invalid date {y}-{m}-{d}"))
}

fn scored(code: &str, title: &str, credits: u32, score: f64, semester: &str) -> Course {
    let mut course = Course::new(code, title, credits, CourseStatus::Completed)
        .with_grade(grading::grade_for_score(score))
        .with_score(score);
    course.semester = Some(semester.to_string());
    course
}

fn pending(code: &str, title: &str, credits: u32, status: CourseStatus, semester: &str) -> Course {
    let mut course = Course::new(code, title, credits, status);
    course.semester = Some(semester.to_string());
    course
}

/// Demo record used when no record file exists yet.
pub fn mock_record() -> anyhow::Result<AcademicRecord> {
    let mut semesters = vec![
        Semester {
            id: "2023-1".to_string(),
            name: "First Semester 2023/2024".to_string(),
            academic_year: "2023/2024".to_string(),
            courses: vec![
                scored("CS101", "Introduction to Programming", 3, 86.0, "2023-1"),
                scored("MATH101", "Calculus I", 3, 72.0, "2023-1"),
                scored("ENG101", "Academic Writing", 2, 77.0, "2023-1"),
                scored("PHY101", "General Physics", 3, 63.0, "2023-1"),
            ],
            status: SemesterStatus::Completed,
            start_date: date(2023, 8, 28)?,
            end_date: date(2023, 12, 15)?,
        },
        Semester {
            id: "2023-2".to_string(),
            name: "Second Semester 2023/2024".to_string(),
            academic_year: "2023/2024".to_string(),
            courses: vec![
                scored("CS102", "Data Structures", 3, 81.0, "2023-2"),
                scored("MATH102", "Linear Algebra", 3, 68.0, "2023-2"),
                scored("STAT101", "Probability and Statistics", 3, 74.0, "2023-2"),
                scored("AFR101", "African Studies", 2, 58.0, "2023-2"),
            ],
            status: SemesterStatus::Completed,
            start_date: date(2024, 1, 15)?,
            end_date: date(2024, 5, 10)?,
        },
        Semester {
            id: "2024-1".to_string(),
            name: "First Semester 2024/2025".to_string(),
            academic_year: "2024/2025".to_string(),
            courses: vec![
                scored("CS201", "Algorithms", 3, 76.0, "2024-1"),
                scored("CS203", "Computer Organization", 3, 83.0, "2024-1"),
                scored("MATH201", "Discrete Mathematics", 3, 66.0, "2024-1"),
                scored("CS205", "Web Technologies", 2, 90.0, "2024-1"),
            ],
            status: SemesterStatus::Completed,
            start_date: date(2024, 8, 26)?,
            end_date: date(2024, 12, 13)?,
        },
        Semester {
            id: "2025-1".to_string(),
            name: "First Semester 2025/2026".to_string(),
            academic_year: "2025/2026".to_string(),
            courses: vec![
                pending("CS401", "Operating Systems", 3, CourseStatus::InProgress, "2025-1"),
                pending("CS403", "Software Engineering", 3, CourseStatus::InProgress, "2025-1"),
                pending("CS405", "Machine Learning", 3, CourseStatus::InProgress, "2025-1"),
            ],
            status: SemesterStatus::InProgress,
            start_date: date(2025, 8, 25)?,
            end_date: date(2025, 12, 12)?,
        },
        Semester {
            id: "2025-2".to_string(),
            name: "Second Semester 2025/2026".to_string(),
            academic_year: "2025/2026".to_string(),
            courses: vec![
                pending("CS402", "Distributed Systems", 3, CourseStatus::Upcoming, "2025-2"),
                pending("CS499", "Final Year Project", 6, CourseStatus::Upcoming, "2025-2"),
            ],
            status: SemesterStatus::Upcoming,
            start_date: date(2026, 1, 12)?,
            end_date: date(2026, 5, 8)?,
        },
    ];

    for semester in semesters.iter_mut() {
        for course in semester.courses.iter_mut() {
            course.year = Some(semester.academic_year.clone());
        }
    }

    Ok(AcademicRecord {
        student_id: "10987654".to_string(),
        student_name: "Kiara Patel".to_string(),
        programme: "BSc Computer Science".to_string(),
        level: 400,
        semesters,
        awards: vec![Award {
            name: "Dean's List".to_string(),
            awarded_on: date(2024, 6, 1)?,
            amount: None,
        }],
    })
}

pub fn load_record(path: &Path) -> anyhow::Result<AcademicRecord> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read record {}", path.display()))?;
    let record: AcademicRecord = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse record {}", path.display()))?;
    debug!(path = %path.display(), semesters = record.semesters.len(), "record loaded");
    Ok(record)
}

pub fn save_record(path: &Path, record: &AcademicRecord) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "record saved");
    Ok(())
}

/// Appends CSV course rows to their semesters, creating semesters on first sight.
/// Rows whose (semester_id, code) already exist are skipped.
pub fn import_courses_csv(record: &mut AcademicRecord, csv_path: &Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        semester_id: String,
        semester_name: String,
        academic_year: String,
        semester_status: SemesterStatus,
        start_date: NaiveDate,
        end_date: NaiveDate,
        code: String,
        title: String,
        credits: u32,
        grade: Option<String>,
        score: Option<f64>,
        status: CourseStatus,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;

        let index = match record.semesters.iter().position(|s| s.id == row.semester_id) {
            Some(index) => index,
            None => {
                record.semesters.push(Semester {
                    id: row.semester_id.clone(),
                    name: row.semester_name.clone(),
                    academic_year: row.academic_year.clone(),
                    courses: Vec::new(),
                    status: row.semester_status,
                    start_date: row.start_date,
                    end_date: row.end_date,
                });
                record.semesters.len() - 1
            }
        };
        let semester = &mut record.semesters[index];

        if semester.courses.iter().any(|c| crate::record::same_code(&c.code, &row.code)) {
            debug!(semester = %row.semester_id, code = %row.code, "course already present");
            continue;
        }

        // A score without a grade gets its grade from the scale.
        let grade = row
            .grade
            .filter(|g| !g.is_empty())
            .or_else(|| row.score.map(|s| grading::grade_for_score(s).to_string()))
            .filter(|g| g != "N/A");

        semester.courses.push(Course {
            code: row.code,
            title: row.title,
            credits: row.credits,
            grade,
            score: row.score,
            status: row.status,
            semester: Some(row.semester_id),
            year: Some(row.academic_year),
            is_retake: false,
            is_special_exam: false,
        });
        inserted += 1;
    }

    info!(inserted, path = %csv_path.display(), "courses imported");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    #[test]
    fn mock_record_has_one_current_semester() {
        let rec = mock_record().unwrap();
        let current = record::current_semester(&rec).unwrap();
        assert_eq!(current.id, "2025-1");
        assert_eq!(record::past_semesters(&rec).len(), 3);
        assert!(!record::has_academic_warning(&rec));
    }

    #[test]
    fn mock_grades_come_from_scores() {
        let rec = mock_record().unwrap();
        let course = record::find_course(&rec, "CS201").unwrap();
        assert_eq!(course.grade.as_deref(), Some("B+"));
        assert_eq!(course.year.as_deref(), Some("2024/2025"));
    }

    #[test]
    fn record_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("record.json");
        let rec = mock_record().unwrap();
        save_record(&path, &rec).unwrap();
        assert_eq!(load_record(&path).unwrap(), rec);
    }

    #[test]
    fn missing_record_reports_path() {
        let err = load_record(Path::new("/nonexistent/record.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/record.json"));
    }

    #[test]
    fn import_appends_and_skips_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.csv");
        std::fs::write(
            &path,
            "semester_id,semester_name,academic_year,semester_status,start_date,end_date,code,title,credits,grade,score,status\n\
             2024-2,Second Semester 2024/2025,2024/2025,completed,2025-01-13,2025-05-09,CS202,Theory of Computation,3,,71,completed\n\
             2024-2,Second Semester 2024/2025,2024/2025,completed,2025-01-13,2025-05-09,CS204,Databases,3,A,,completed\n\
             2024-1,First Semester 2024/2025,2024/2025,completed,2024-08-26,2024-12-13,CS201,Algorithms,3,A,,completed\n",
        )
        .unwrap();

        let mut rec = mock_record().unwrap();
        let inserted = import_courses_csv(&mut rec, &path).unwrap();
        assert_eq!(inserted, 2);

        let added = rec.semesters.iter().find(|s| s.id == "2024-2").unwrap();
        assert_eq!(added.courses.len(), 2);
        assert_eq!(added.courses[0].grade.as_deref(), Some("B"));
        assert_eq!(record::find_course(&rec, "CS201").unwrap().grade.as_deref(), Some("B+"));

        assert_eq!(import_courses_csv(&mut rec, &path).unwrap(), 0);
    }

    const CSV_HEADER: &str = "semester_id,semester_name,academic_year,semester_status,start_date,end_date,code,title,credits,grade,score,status\n";

    #[test]
    fn older_imported_attempt_does_not_shadow_latest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("older.csv");
        std::fs::write(
            &path,
            format!(
                "{CSV_HEADER}2022-2,Second Semester 2022/2023,2022/2023,completed,2023-01-16,2023-05-12,CS201,Algorithms,3,F,,completed\n"
            ),
        )
        .unwrap();

        let mut rec = mock_record().unwrap();
        assert_eq!(import_courses_csv(&mut rec, &path).unwrap(), 1);
        assert_eq!(rec.semesters.last().unwrap().id, "2022-2");

        let course = record::find_course(&rec, "CS201").unwrap();
        assert_eq!(course.semester.as_deref(), Some("2024-1"));
        assert_eq!(course.grade.as_deref(), Some("B+"));
    }

    #[test]
    fn duplicate_check_ignores_code_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lower.csv");
        std::fs::write(
            &path,
            format!(
                "{CSV_HEADER}2024-1,First Semester 2024/2025,2024/2025,completed,2024-08-26,2024-12-13,cs201,Algorithms,3,A,,completed\n"
            ),
        )
        .unwrap();

        let mut rec = mock_record().unwrap();
        assert_eq!(import_courses_csv(&mut rec, &path).unwrap(), 0);
        let semester = rec.semesters.iter().find(|s| s.id == "2024-1").unwrap();
        assert_eq!(semester.courses.len(), 4);
    }

    #[test]
    fn invalid_dates_are_errors() {
        let err = date(2023, 2, 30).unwrap_err();
        assert!(err.to_string().contains("invalid date 2023-2-30"));
        assert!(date(2024, 2, 29).is_ok());
    }
}
