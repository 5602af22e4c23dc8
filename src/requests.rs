use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::PortalError;
use crate::grading;
use crate::models::{
    AcademicRecord, AppealStatus, CourseStatus, DeliveryMethod, GradeAppeal, PaymentStatus,
    TranscriptKind, TranscriptRequest, TranscriptStatus,
};
use crate::record;

pub const MAX_COPIES: u32 = 10;
pub const MIN_APPEAL_REASON: usize = 20;

#[derive(Debug, Clone)]
pub struct TranscriptDraft {
    pub kind: TranscriptKind,
    pub purpose: String,
    pub destination: String,
    pub copies: u32,
    pub delivery: DeliveryMethod,
}

#[derive(Debug, Clone)]
pub struct AppealDraft {
    pub course_code: String,
    pub requested_grade: Option<String>,
    pub reason: String,
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn validate_transcript(draft: &TranscriptDraft) -> Result<(), PortalError> {
    if draft.purpose.trim().is_empty() {
        return Err(PortalError::validation("purpose", "Purpose is required"));
    }
    if draft.destination.trim().is_empty() {
        return Err(PortalError::validation("destination", "Destination is required"));
    }
    if draft.copies == 0 || draft.copies > MAX_COPIES {
        return Err(PortalError::validation(
            "copies",
            format!("Copies must be between 1 and {MAX_COPIES}"),
        ));
    }
    if draft.delivery == DeliveryMethod::Electronic && !looks_like_email(draft.destination.trim()) {
        return Err(PortalError::validation(
            "destination",
            "Electronic delivery needs a valid e-mail address",
        ));
    }
    Ok(())
}

pub fn transcript_fee(kind: TranscriptKind, copies: u32, official_fee: f64) -> f64 {
    match kind {
        TranscriptKind::Official => official_fee * copies as f64,
        TranscriptKind::Unofficial => 0.0,
    }
}

/// Returns the current grade of the course being appealed.
pub fn validate_appeal(record: &AcademicRecord, draft: &AppealDraft) -> Result<String, PortalError> {
    let course = record::find_course(record, draft.course_code.trim())
        .ok_or_else(|| PortalError::UnknownCourse(draft.course_code.clone()))?;

    if !matches!(
        course.status,
        CourseStatus::Completed | CourseStatus::Published
    ) {
        return Err(PortalError::NotAppealable {
            code: course.code.clone(),
            status: course.status.as_str().to_string(),
        });
    }

    let current = course
        .graded()
        .ok_or_else(|| PortalError::NotAppealable {
            code: course.code.clone(),
            status: "ungraded".to_string(),
        })?
        .to_string();

    if draft.reason.trim().chars().count() < MIN_APPEAL_REASON {
        return Err(PortalError::validation(
            "reason",
            format!("Reason must be at least {MIN_APPEAL_REASON} characters"),
        ));
    }

    if let Some(requested) = draft.requested_grade.as_deref() {
        if grading::grading_entry(requested).is_none() {
            return Err(PortalError::validation(
                "requested_grade",
                format!("{requested} is not on the grading scale"),
            ));
        }
        if requested == current {
            return Err(PortalError::validation(
                "requested_grade",
                "Requested grade matches the current grade",
            ));
        }
    }

    Ok(current)
}

/// Accepts transcript requests and grade appeals after a simulated round trip.
#[derive(Debug, Clone)]
pub struct RequestDesk {
    latency: Duration,
    official_fee: f64,
}

impl RequestDesk {
    pub fn new(latency: Duration, official_fee: f64) -> Self {
        Self {
            latency,
            official_fee,
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    pub async fn submit_transcript(
        &self,
        draft: TranscriptDraft,
    ) -> Result<TranscriptRequest, PortalError> {
        if let Err(err) = validate_transcript(&draft) {
            warn!(error = %err, "transcript request rejected");
            return Err(err);
        }

        tokio::time::sleep(self.latency).await;

        let fee = transcript_fee(draft.kind, draft.copies, self.official_fee);
        let payment_status = if fee > 0.0 {
            PaymentStatus::Pending
        } else {
            PaymentStatus::Waived
        };
        let request = TranscriptRequest {
            id: Uuid::new_v4(),
            kind: draft.kind,
            purpose: draft.purpose.trim().to_string(),
            destination: draft.destination.trim().to_string(),
            copies: draft.copies,
            delivery: draft.delivery,
            fee,
            payment_status,
            status: TranscriptStatus::Submitted,
            requested_on: Self::today(),
        };
        info!(id = %request.id, copies = request.copies, fee, "transcript request submitted");
        Ok(request)
    }

    pub async fn submit_appeal(
        &self,
        record: &AcademicRecord,
        draft: AppealDraft,
    ) -> Result<GradeAppeal, PortalError> {
        let current_grade = match validate_appeal(record, &draft) {
            Ok(grade) => grade,
            Err(err) => {
                warn!(error = %err, "grade appeal rejected");
                return Err(err);
            }
        };

        tokio::time::sleep(self.latency).await;

        let appeal = GradeAppeal {
            id: Uuid::new_v4(),
            course_code: draft.course_code.trim().to_uppercase(),
            current_grade,
            requested_grade: draft.requested_grade,
            reason: draft.reason.trim().to_string(),
            status: AppealStatus::Pending,
            submitted_on: Self::today(),
        };
        info!(id = %appeal.id, course = %appeal.course_code, "grade appeal submitted");
        Ok(appeal)
    }
}
