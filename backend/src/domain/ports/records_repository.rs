//! Ports for published academy records: notices, events, exam grades, and
//! shared materials.
//!
//! These four stores share one error type; their write paths are structurally
//! identical and they are always wired together.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::academy::{AcademyEvent, BookMaterial, ExamGrade, NoticeRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by record store adapters.
    pub enum RecordStoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "record store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "record store query failed: {message}",
    }
}

/// Insertable notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotice {
    /// Headline.
    pub title: String,
    /// Body text.
    pub body: String,
}

/// Insertable academy event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAcademyEvent {
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Scheduled start.
    pub starts_at: DateTime<Utc>,
}

/// Insertable exam grade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExamGrade {
    /// Graded student.
    pub student_id: i32,
    /// Exam display name.
    pub exam_name: String,
    /// Awarded grade.
    pub grade: String,
    /// Optional examiner remarks.
    pub remarks: Option<String>,
}

/// Insertable shared material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookMaterial {
    /// Material title.
    pub title: String,
    /// Author or source.
    pub author: String,
    /// Course the material belongs to.
    pub course_id: i32,
}

/// Durable store for notices.
#[async_trait]
pub trait NoticeRepository: Send + Sync {
    /// Insert a notice and return the stored record.
    async fn create(&self, notice: NewNotice) -> Result<NoticeRecord, RecordStoreError>;

    /// List notices, newest first.
    async fn list(&self) -> Result<Vec<NoticeRecord>, RecordStoreError>;
}

/// Durable store for academy events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert an event and return the stored record.
    async fn create(&self, event: NewAcademyEvent) -> Result<AcademyEvent, RecordStoreError>;

    /// List events, soonest first.
    async fn list(&self) -> Result<Vec<AcademyEvent>, RecordStoreError>;
}

/// Durable store for exam grades.
#[async_trait]
pub trait ExamGradeRepository: Send + Sync {
    /// Insert a grade and return the stored record.
    async fn create(&self, grade: NewExamGrade) -> Result<ExamGrade, RecordStoreError>;
}

/// Durable store for shared materials.
#[async_trait]
pub trait MaterialRepository: Send + Sync {
    /// Insert a material and return the stored record.
    async fn create(&self, material: NewBookMaterial) -> Result<BookMaterial, RecordStoreError>;
}
