//! Core academy entities: courses, batches, invoices, demo bookings, and
//! published records (notices, events, exam grades, materials).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::events::DemoOutcome;

/// A course offered by the academy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Row identifier.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Marketing description.
    pub description: String,
    /// Monthly fee in the smallest currency unit.
    pub monthly_fee_cents: i64,
}

/// A scheduled group of students within a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// Row identifier.
    pub id: i32,
    /// Display name (e.g. "Evening Watercolour A").
    pub name: String,
    /// Course the batch belongs to.
    pub course_id: i32,
    /// Human-readable schedule line.
    pub schedule: String,
    /// Ids of enrolled students.
    pub student_ids: Vec<i32>,
}

/// Payment state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Raised but unpaid.
    Pending,
    /// Settled in full.
    Paid,
    /// Withdrawn.
    Cancelled,
}

impl InvoiceStatus {
    /// Database representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a database value, defaulting unrecognised values to `Pending`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "paid" => Self::Paid,
            "cancelled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }
}

/// An invoice raised against a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Row identifier.
    pub id: i32,
    /// Human-readable code (`INV-YEAR-NNNN`); absent only on legacy rows
    /// the startup backfill has not yet reached.
    pub invoice_number: Option<String>,
    /// Billed student.
    pub student_id: i32,
    /// Amount in the smallest currency unit.
    pub amount_cents: i64,
    /// Payment state.
    pub status: InvoiceStatus,
    /// Optional due date.
    pub due_on: Option<NaiveDate>,
}

/// Lifecycle state of a demo-class booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DemoStatus {
    /// Submitted by the prospect, not yet actioned.
    Requested,
    /// Confirmed by the academy.
    Confirmed,
    /// Cancelled by the academy.
    Cancelled,
    /// The demo class took place.
    Completed,
}

impl DemoStatus {
    /// Database representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Parse a database value, defaulting unrecognised values to
    /// `Requested`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "confirmed" => Self::Confirmed,
            "cancelled" => Self::Cancelled,
            "completed" => Self::Completed,
            _ => Self::Requested,
        }
    }

    /// The notification outcome for this status, if it triggers one.
    pub fn outcome(self) -> Option<DemoOutcome> {
        match self {
            Self::Requested => None,
            Self::Confirmed => Some(DemoOutcome::Confirmed),
            Self::Cancelled => Some(DemoOutcome::Cancelled),
            Self::Completed => Some(DemoOutcome::Completed),
        }
    }
}

/// A prospect's demo-class booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemoBooking {
    /// Row identifier.
    pub id: i32,
    /// Prospect name.
    pub name: String,
    /// Prospect email.
    pub email: String,
    /// Course the demo was booked for.
    pub course_id: i32,
    /// Lifecycle state.
    pub status: DemoStatus,
    /// Agreed slot, once scheduled.
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// A notice published to the academy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeRecord {
    /// Row identifier.
    pub id: i32,
    /// Headline.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Publication timestamp.
    pub created_at: DateTime<Utc>,
}

/// An announced academy event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcademyEvent {
    /// Row identifier.
    pub id: i32,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Scheduled start.
    pub starts_at: DateTime<Utc>,
}

/// A graded exam result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamGrade {
    /// Row identifier.
    pub id: i32,
    /// Graded student.
    pub student_id: i32,
    /// Exam display name.
    pub exam_name: String,
    /// Awarded grade.
    pub grade: String,
    /// Optional examiner remarks.
    pub remarks: Option<String>,
}

/// A book or study material shared with students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookMaterial {
    /// Row identifier.
    pub id: i32,
    /// Material title.
    pub title: String,
    /// Author or source.
    pub author: String,
    /// Course the material belongs to.
    pub course_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DemoStatus::Requested, None)]
    #[case(DemoStatus::Confirmed, Some(DemoOutcome::Confirmed))]
    #[case(DemoStatus::Cancelled, Some(DemoOutcome::Cancelled))]
    #[case(DemoStatus::Completed, Some(DemoOutcome::Completed))]
    fn only_actioned_statuses_notify(
        #[case] status: DemoStatus,
        #[case] expected: Option<DemoOutcome>,
    ) {
        assert_eq!(status.outcome(), expected);
    }

    #[rstest]
    #[case("pending", InvoiceStatus::Pending)]
    #[case("paid", InvoiceStatus::Paid)]
    #[case("cancelled", InvoiceStatus::Cancelled)]
    #[case("overdue", InvoiceStatus::Pending)]
    fn invoice_status_parses_defensively(#[case] raw: &str, #[case] expected: InvoiceStatus) {
        assert_eq!(InvoiceStatus::from_db(raw), expected);
    }
}
