use serde::{Deserialize, Serialize};

use crate::grading;
use crate::models::{Course, CourseStatus};

/// A hypothetical grade for an existing course, keyed by course code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeChange {
    pub course_code: String,
    pub grade: String,
}

/// A synthetic course used for custom and planned projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCourse {
    pub credits: u32,
    pub grade: String,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn qualifies(course: &Course) -> bool {
    course.status == CourseStatus::Completed && course.graded().is_some()
}

pub fn quality_points(courses: &[Course]) -> f64 {
    courses
        .iter()
        .filter(|c| qualifies(c))
        .map(|c| grading::grade_points(c.graded().unwrap_or_default()) * c.credits as f64)
        .sum()
}

/// Summed as u64 so no combination of u32 credit values can overflow.
pub fn qualifying_credits(courses: &[Course]) -> u64 {
    courses
        .iter()
        .filter(|c| qualifies(c))
        .map(|c| u64::from(c.credits))
        .sum()
}

/// Credit-weighted grade point average over completed, graded courses.
/// Returns 0 when nothing qualifies.
pub fn calculate_gpa(courses: &[Course]) -> f64 {
    let total_credits = qualifying_credits(courses);
    if total_credits == 0 {
        return 0.0;
    }

    round2(quality_points(courses) / total_credits as f64)
}

/// Completed courses with hypothetical grades swapped in. The input is left untouched.
pub fn apply_changes(courses: &[Course], changes: &[GradeChange]) -> Vec<Course> {
    courses
        .iter()
        .filter(|c| c.status == CourseStatus::Completed)
        .map(|course| {
            let mut course = course.clone();
            if let Some(change) = changes.iter().find(|ch| ch.course_code == course.code) {
                course.grade = Some(change.grade.clone());
            }
            course
        })
        .collect()
}

pub fn project_what_if(courses: &[Course], changes: &[GradeChange]) -> f64 {
    calculate_gpa(&apply_changes(courses, changes))
}

fn synthesize(entries: &[CustomCourse]) -> impl Iterator<Item = Course> + '_ {
    entries.iter().enumerate().map(|(index, entry)| {
        Course::new(
            &format!("CUSTOM-{}", index + 1),
            "Hypothetical course",
            entry.credits,
            CourseStatus::Completed,
        )
        .with_grade(&entry.grade)
    })
}

pub fn custom_gpa(entries: &[CustomCourse]) -> f64 {
    let courses: Vec<Course> = synthesize(entries).collect();
    calculate_gpa(&courses)
}

/// Existing completed work plus courses the student has yet to take.
pub fn project_with_planned(courses: &[Course], planned: &[CustomCourse]) -> f64 {
    let combined: Vec<Course> = courses
        .iter()
        .filter(|c| c.status == CourseStatus::Completed)
        .cloned()
        .chain(synthesize(planned))
        .collect();

    calculate_gpa(&combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(code: &str, credits: u32, grade: &str) -> Course {
        Course::new(code, "Course", credits, CourseStatus::Completed).with_grade(grade)
    }

    #[test]
    fn empty_list_is_zero() {
        assert_eq!(calculate_gpa(&[]), 0.0);
    }

    #[test]
    fn incomplete_courses_are_ignored() {
        let courses = vec![
            Course::new("CS301", "Compilers", 3, CourseStatus::InProgress).with_grade("A"),
            Course::new("CS302", "Networks", 3, CourseStatus::Upcoming),
            Course::new("CS303", "Graphics", 3, CourseStatus::Completed),
            Course::new("CS304", "Databases", 3, CourseStatus::Published).with_grade("B"),
        ];
        assert_eq!(calculate_gpa(&courses), 0.0);
    }

    #[test]
    fn single_course_takes_its_points() {
        assert_eq!(calculate_gpa(&[completed("CS101", 3, "A")]), 4.0);
    }

    #[test]
    fn credits_weight_the_average() {
        let courses = vec![completed("CS101", 3, "A"), completed("MATH101", 2, "C")];
        assert_eq!(calculate_gpa(&courses), 3.2);
    }

    #[test]
    fn result_is_rounded_to_two_places() {
        let courses = vec![
            completed("A1", 3, "A"),
            completed("A2", 3, "B+"),
            completed("A3", 3, "C+"),
        ];
        // (12 + 10.5 + 7.5) / 9 = 3.333...
        assert_eq!(calculate_gpa(&courses), 3.33);
    }

    #[test]
    fn empty_grade_does_not_count() {
        let courses = vec![completed("CS101", 3, "A"), completed("CS102", 3, "")];
        assert_eq!(calculate_gpa(&courses), 4.0);
    }

    #[test]
    fn what_if_without_changes_matches_baseline() {
        let courses = vec![completed("CS101", 3, "A"), completed("MATH101", 2, "C")];
        assert_eq!(project_what_if(&courses, &[]), calculate_gpa(&courses));
    }

    #[test]
    fn what_if_swaps_grades_without_mutating() {
        let courses = vec![completed("CS101", 3, "A"), completed("MATH101", 2, "C")];
        let changes = vec![GradeChange {
            course_code: "MATH101".to_string(),
            grade: "A".to_string(),
        }];
        assert_eq!(project_what_if(&courses, &changes), 4.0);
        assert_eq!(courses[1].grade.as_deref(), Some("C"));
    }

    #[test]
    fn what_if_ignores_unknown_codes() {
        let courses = vec![completed("CS101", 3, "B")];
        let changes = vec![GradeChange {
            course_code: "NOPE".to_string(),
            grade: "A".to_string(),
        }];
        assert_eq!(project_what_if(&courses, &changes), 3.0);
    }

    #[test]
    fn custom_entries_are_treated_as_completed() {
        let entries = vec![
            CustomCourse {
                credits: 3,
                grade: "A".to_string(),
            },
            CustomCourse {
                credits: 2,
                grade: "C".to_string(),
            },
        ];
        assert_eq!(custom_gpa(&entries), 3.2);
        assert_eq!(custom_gpa(&[]), 0.0);
    }

    #[test]
    fn planned_courses_extend_existing_work() {
        let courses = vec![
            completed("CS101", 3, "A"),
            Course::new("CS201", "Systems", 3, CourseStatus::InProgress),
        ];
        let planned = vec![CustomCourse {
            credits: 3,
            grade: "C".to_string(),
        }];
        assert_eq!(project_with_planned(&courses, &planned), 3.0);
    }

    #[test]
    fn huge_credit_values_do_not_overflow() {
        let entries = vec![
            CustomCourse {
                credits: u32::MAX,
                grade: "A".to_string(),
            },
            CustomCourse {
                credits: 1,
                grade: "C".to_string(),
            },
        ];
        assert_eq!(custom_gpa(&entries), 4.0);

        let courses = vec![
            completed("BIG1", u32::MAX, "B"),
            completed("BIG2", u32::MAX, "B"),
        ];
        assert_eq!(qualifying_credits(&courses), 2 * u64::from(u32::MAX));
        assert_eq!(calculate_gpa(&courses), 3.0);
    }

    #[test]
    fn quality_points_and_credits_agree_with_gpa() {
        let courses = vec![completed("CS101", 3, "A"), completed("MATH101", 2, "C")];
        assert_eq!(quality_points(&courses), 16.0);
        assert_eq!(qualifying_credits(&courses), 5);
    }
}
