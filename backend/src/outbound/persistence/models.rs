//! Row structs mapping Diesel tables to and from domain types.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::academy::{
    AcademyEvent, Batch, BookMaterial, Course, DemoBooking, DemoStatus, ExamGrade, Invoice,
    InvoiceStatus, NoticeRecord,
};
use crate::domain::notification::{InAppNotification, NotificationKind};
use crate::domain::user::{Recipient, Role, User, UserStatus};

use super::schema::{
    academy_events, batches, book_materials, courses, demo_bookings, exam_grades, invoices,
    notices, notifications, users,
};

/// User projection used by account listings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role: Role::from_db(&row.role),
            status: UserStatus::from_db(&row.status),
        }
    }
}

/// Insertable user row.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

/// Narrow user projection for notification recipients.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipientRow {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<RecipientRow> for Recipient {
    fn from(row: RecipientRow) -> Self {
        Self {
            user_id: Some(row.id),
            name: row.name,
            email: row.email,
        }
    }
}

/// Course row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourseRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub monthly_fee_cents: i64,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            monthly_fee_cents: row.monthly_fee_cents,
        }
    }
}

/// Insertable course row.
#[derive(Debug, Insertable)]
#[diesel(table_name = courses)]
pub struct NewCourseRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub monthly_fee_cents: i64,
}

/// Batch row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = batches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BatchRow {
    pub id: i32,
    pub name: String,
    pub course_id: i32,
    pub student_ids: Vec<i32>,
    pub schedule: String,
}

impl From<BatchRow> for Batch {
    fn from(row: BatchRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            course_id: row.course_id,
            schedule: row.schedule,
            student_ids: row.student_ids,
        }
    }
}

/// Insertable batch row.
#[derive(Debug, Insertable)]
#[diesel(table_name = batches)]
pub struct NewBatchRow<'a> {
    pub name: &'a str,
    pub course_id: i32,
    pub student_ids: &'a [i32],
    pub schedule: &'a str,
}

/// Partial batch update; `None` fields keep their stored values.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = batches)]
pub struct BatchChangesRow {
    pub name: Option<String>,
    pub schedule: Option<String>,
    pub student_ids: Option<Vec<i32>>,
}

/// Invoice row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InvoiceRow {
    pub id: i32,
    pub student_id: i32,
    pub amount_cents: i64,
    pub status: String,
    pub due_on: Option<NaiveDate>,
    pub invoice_number: Option<String>,
}

impl From<InvoiceRow> for Invoice {
    fn from(row: InvoiceRow) -> Self {
        Self {
            id: row.id,
            invoice_number: row.invoice_number,
            student_id: row.student_id,
            amount_cents: row.amount_cents,
            status: InvoiceStatus::from_db(&row.status),
            due_on: row.due_on,
        }
    }
}

/// Insertable invoice row; the number is assigned before insert.
#[derive(Debug, Insertable)]
#[diesel(table_name = invoices)]
pub struct NewInvoiceRow<'a> {
    pub student_id: i32,
    pub amount_cents: i64,
    pub status: &'a str,
    pub due_on: Option<NaiveDate>,
    pub invoice_number: &'a str,
}

/// Demo-booking row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = demo_bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DemoBookingRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub course_id: i32,
    pub status: String,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl From<DemoBookingRow> for DemoBooking {
    fn from(row: DemoBookingRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            course_id: row.course_id,
            status: DemoStatus::from_db(&row.status),
            scheduled_at: row.scheduled_at,
        }
    }
}

/// Insertable demo-booking row.
#[derive(Debug, Insertable)]
#[diesel(table_name = demo_bookings)]
pub struct NewDemoBookingRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub course_id: i32,
    pub status: &'a str,
}

/// Notice row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NoticeRow {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<NoticeRow> for NoticeRecord {
    fn from(row: NoticeRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

/// Insertable notice row.
#[derive(Debug, Insertable)]
#[diesel(table_name = notices)]
pub struct NewNoticeRow<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

/// Academy event row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = academy_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AcademyEventRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
}

impl From<AcademyEventRow> for AcademyEvent {
    fn from(row: AcademyEventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            starts_at: row.starts_at,
        }
    }
}

/// Insertable academy event row.
#[derive(Debug, Insertable)]
#[diesel(table_name = academy_events)]
pub struct NewAcademyEventRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub starts_at: DateTime<Utc>,
}

/// Exam grade row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = exam_grades)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExamGradeRow {
    pub id: i32,
    pub student_id: i32,
    pub exam_name: String,
    pub grade: String,
    pub remarks: Option<String>,
}

impl From<ExamGradeRow> for ExamGrade {
    fn from(row: ExamGradeRow) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            exam_name: row.exam_name,
            grade: row.grade,
            remarks: row.remarks,
        }
    }
}

/// Insertable exam grade row.
#[derive(Debug, Insertable)]
#[diesel(table_name = exam_grades)]
pub struct NewExamGradeRow<'a> {
    pub student_id: i32,
    pub exam_name: &'a str,
    pub grade: &'a str,
    pub remarks: Option<&'a str>,
}

/// Book material row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = book_materials)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookMaterialRow {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub course_id: i32,
}

impl From<BookMaterialRow> for BookMaterial {
    fn from(row: BookMaterialRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            course_id: row.course_id,
        }
    }
}

/// Insertable book material row.
#[derive(Debug, Insertable)]
#[diesel(table_name = book_materials)]
pub struct NewBookMaterialRow<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub course_id: i32,
}

/// In-app notification row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for InAppNotification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            message: row.message,
            kind: NotificationKind::coerce(&row.kind),
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

/// Insertable in-app notification row.
#[derive(Debug, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotificationRow<'a> {
    pub user_id: i32,
    pub title: &'a str,
    pub message: &'a str,
    pub kind: &'a str,
}
