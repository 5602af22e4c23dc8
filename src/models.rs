use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CourseStatus {
    Completed,
    InProgress,
    Upcoming,
    Failed,
    Withheld,
    Published,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in-progress",
            Self::Upcoming => "upcoming",
            Self::Failed => "failed",
            Self::Withheld => "withheld",
            Self::Published => "published",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub title: String,
    pub credits: u32,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    pub status: CourseStatus,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub is_retake: bool,
    #[serde(default)]
    pub is_special_exam: bool,
}

impl Course {
    pub fn new(code: &str, title: &str, credits: u32, status: CourseStatus) -> Self {
        Self {
            code: code.to_string(),
            title: title.to_string(),
            credits,
            grade: None,
            score: None,
            status,
            semester: None,
            year: None,
            is_retake: false,
            is_special_exam: false,
        }
    }

    pub fn with_grade(mut self, grade: &str) -> Self {
        self.grade = Some(grade.to_string());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Grade label, treating an empty string as no grade.
    pub fn graded(&self) -> Option<&str> {
        self.grade.as_deref().filter(|g| !g.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemesterStatus {
    Completed,
    InProgress,
    Upcoming,
}

impl SemesterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in-progress",
            Self::Upcoming => "upcoming",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    pub id: String,
    pub name: String,
    pub academic_year: String,
    pub courses: Vec<Course>,
    pub status: SemesterStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Semester {
    pub fn gpa(&self) -> f64 {
        crate::gpa::calculate_gpa(&self.courses)
    }

    pub fn total_credits(&self) -> u64 {
        self.courses.iter().map(|c| u64::from(c.credits)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub name: String,
    pub awarded_on: NaiveDate,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicRecord {
    pub student_id: String,
    pub student_name: String,
    pub programme: String,
    pub level: u32,
    pub semesters: Vec<Semester>,
    #[serde(default)]
    pub awards: Vec<Award>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradingEntry {
    pub grade: &'static str,
    pub min: f64,
    pub max: f64,
    pub points: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TranscriptKind {
    Official,
    Unofficial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryMethod {
    Electronic,
    Mail,
    Pickup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Waived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranscriptStatus {
    Submitted,
    Processing,
    Ready,
    Delivered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRequest {
    pub id: Uuid,
    pub kind: TranscriptKind,
    pub purpose: String,
    pub destination: String,
    pub copies: u32,
    pub delivery: DeliveryMethod,
    pub fee: f64,
    pub payment_status: PaymentStatus,
    pub status: TranscriptStatus,
    pub requested_on: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppealStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeAppeal {
    pub id: Uuid,
    pub course_code: String,
    pub current_grade: String,
    pub requested_grade: Option<String>,
    pub reason: String,
    pub status: AppealStatus,
    pub submitted_on: NaiveDate,
}
