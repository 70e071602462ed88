//! In-memory port implementations for handler tests.
//!
//! Every store keeps its rows behind a `Mutex` and hands out sequential
//! ids, so handler tests can exercise the full request path without a
//! database. The queue records enqueued requests instead of delivering
//! them, making fan-out assertions synchronous.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::academy::{
    AcademyEvent, Batch, BookMaterial, Course, DemoBooking, DemoStatus, ExamGrade, Invoice,
    InvoiceStatus, NoticeRecord,
};
use crate::domain::events::NotificationRequest;
use crate::domain::notification::InAppNotification;
use crate::domain::ports::{
    BatchChange, BatchRepository, BatchStoreError, BatchUpdate, CourseRepository,
    CourseStoreError, DemoBookingChange, DemoBookingRepository, DemoBookingStoreError,
    DispatchError, EventRepository, ExamGradeRepository, InvoiceRepository, InvoiceStoreError,
    InvoiceTransition, MaterialRepository, NewAcademyEvent, NewBatch, NewBookMaterial, NewCourse,
    NewDemoBooking, NewExamGrade, NewInAppNotification, NewInvoice, NewNotice, NewUser,
    NotificationQueue, NotificationRepository, NotificationStoreError, NoticeRepository,
    PushTokenRepository, PushTokenStoreError, RecordStoreError, UserRepository, UserStoreError,
};
use crate::domain::schema_evolution::format_invoice_number;
use crate::domain::user::{User, UserStatus};
use crate::inbound::http::state::HttpState;

fn next_id<T>(rows: &[T]) -> i32 {
    i32::try_from(rows.len()).expect("test row counts stay small") + 1
}

/// Queue double recording requests instead of delivering them.
#[derive(Default)]
pub struct RecordingQueue {
    requests: Mutex<Vec<NotificationRequest>>,
}

impl RecordingQueue {
    /// Snapshot of everything enqueued so far.
    pub fn requests(&self) -> Vec<NotificationRequest> {
        self.requests.lock().expect("queue lock").clone()
    }
}

impl NotificationQueue for RecordingQueue {
    fn enqueue(&self, request: NotificationRequest) -> Result<(), DispatchError> {
        self.requests.lock().expect("queue lock").push(request);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError> {
        let mut rows = self.rows.lock().expect("state lock");
        if rows.iter().any(|existing| existing.email == user.email) {
            return Err(UserStoreError::duplicate_email(user.email));
        }
        let stored = User {
            id: next_id(&rows),
            name: user.name,
            email: user.email,
            role: user.role,
            status: UserStatus::Active,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn list_active(&self) -> Result<Vec<User>, UserStoreError> {
        Ok(self.rows.lock().expect("state lock").clone())
    }
}

#[derive(Default)]
pub struct MemoryCourses {
    rows: Mutex<Vec<Course>>,
}

#[async_trait]
impl CourseRepository for MemoryCourses {
    async fn create(&self, course: NewCourse) -> Result<Course, CourseStoreError> {
        let mut rows = self.rows.lock().expect("state lock");
        let stored = Course {
            id: next_id(&rows),
            name: course.name,
            description: course.description,
            monthly_fee_cents: course.monthly_fee_cents,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Course>, CourseStoreError> {
        Ok(self.rows.lock().expect("state lock").clone())
    }

    async fn find(&self, id: i32) -> Result<Option<Course>, CourseStoreError> {
        Ok(self
            .rows
            .lock()
            .expect("state lock")
            .iter()
            .find(|course| course.id == id)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryBatches {
    rows: Mutex<Vec<Batch>>,
}

#[async_trait]
impl BatchRepository for MemoryBatches {
    async fn create(&self, batch: NewBatch) -> Result<Batch, BatchStoreError> {
        let mut rows = self.rows.lock().expect("state lock");
        let stored = Batch {
            id: next_id(&rows),
            name: batch.name,
            course_id: batch.course_id,
            schedule: batch.schedule,
            student_ids: batch.student_ids,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i32, update: BatchUpdate) -> Result<BatchChange, BatchStoreError> {
        let mut rows = self.rows.lock().expect("state lock");
        let batch = rows
            .iter_mut()
            .find(|batch| batch.id == id)
            .ok_or(BatchStoreError::NotFound { id })?;
        let previous_student_ids = batch.student_ids.clone();
        if let Some(name) = update.name {
            batch.name = name;
        }
        if let Some(schedule) = update.schedule {
            batch.schedule = schedule;
        }
        if let Some(student_ids) = update.student_ids {
            batch.student_ids = student_ids;
        }
        Ok(BatchChange {
            previous_student_ids,
            batch: batch.clone(),
        })
    }

    async fn list(&self) -> Result<Vec<Batch>, BatchStoreError> {
        Ok(self.rows.lock().expect("state lock").clone())
    }
}

#[derive(Default)]
pub struct MemoryInvoices {
    rows: Mutex<Vec<Invoice>>,
}

#[async_trait]
impl InvoiceRepository for MemoryInvoices {
    async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceStoreError> {
        let mut rows = self.rows.lock().expect("state lock");
        let id = next_id(&rows);
        let stored = Invoice {
            id,
            invoice_number: Some(format_invoice_number(2025, i64::from(id))),
            student_id: invoice.student_id,
            amount_cents: invoice.amount_cents,
            status: invoice.status,
            due_on: invoice.due_on,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update_status(
        &self,
        id: i32,
        status: InvoiceStatus,
    ) -> Result<InvoiceTransition, InvoiceStoreError> {
        let mut rows = self.rows.lock().expect("state lock");
        let invoice = rows
            .iter_mut()
            .find(|invoice| invoice.id == id)
            .ok_or(InvoiceStoreError::NotFound { id })?;
        let previous_status = invoice.status;
        invoice.status = status;
        Ok(InvoiceTransition {
            previous_status,
            invoice: invoice.clone(),
        })
    }

    async fn list(&self) -> Result<Vec<Invoice>, InvoiceStoreError> {
        Ok(self.rows.lock().expect("state lock").clone())
    }
}

#[derive(Default)]
pub struct MemoryDemoBookings {
    rows: Mutex<Vec<DemoBooking>>,
}

#[async_trait]
impl DemoBookingRepository for MemoryDemoBookings {
    async fn create(&self, booking: NewDemoBooking) -> Result<DemoBooking, DemoBookingStoreError> {
        let mut rows = self.rows.lock().expect("state lock");
        let stored = DemoBooking {
            id: next_id(&rows),
            name: booking.name,
            email: booking.email,
            course_id: booking.course_id,
            status: DemoStatus::Requested,
            scheduled_at: None,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update_status(
        &self,
        id: i32,
        status: DemoStatus,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Result<DemoBookingChange, DemoBookingStoreError> {
        let mut rows = self.rows.lock().expect("state lock");
        let booking = rows
            .iter_mut()
            .find(|booking| booking.id == id)
            .ok_or(DemoBookingStoreError::NotFound { id })?;
        let previous_status = booking.status;
        booking.status = status;
        if scheduled_at.is_some() {
            booking.scheduled_at = scheduled_at;
        }
        Ok(DemoBookingChange {
            previous_status,
            booking: booking.clone(),
        })
    }

    async fn list(&self) -> Result<Vec<DemoBooking>, DemoBookingStoreError> {
        Ok(self.rows.lock().expect("state lock").clone())
    }
}

#[derive(Default)]
pub struct MemoryRecords {
    notices: Mutex<Vec<NoticeRecord>>,
    events: Mutex<Vec<AcademyEvent>>,
    grades: Mutex<Vec<ExamGrade>>,
    materials: Mutex<Vec<BookMaterial>>,
}

#[async_trait]
impl NoticeRepository for MemoryRecords {
    async fn create(&self, notice: NewNotice) -> Result<NoticeRecord, RecordStoreError> {
        let mut rows = self.notices.lock().expect("state lock");
        let stored = NoticeRecord {
            id: next_id(&rows),
            title: notice.title,
            body: notice.body,
            created_at: Utc::now(),
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<NoticeRecord>, RecordStoreError> {
        Ok(self.notices.lock().expect("state lock").clone())
    }
}

#[async_trait]
impl EventRepository for MemoryRecords {
    async fn create(&self, event: NewAcademyEvent) -> Result<AcademyEvent, RecordStoreError> {
        let mut rows = self.events.lock().expect("state lock");
        let stored = AcademyEvent {
            id: next_id(&rows),
            title: event.title,
            description: event.description,
            starts_at: event.starts_at,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<AcademyEvent>, RecordStoreError> {
        Ok(self.events.lock().expect("state lock").clone())
    }
}

#[async_trait]
impl ExamGradeRepository for MemoryRecords {
    async fn create(&self, grade: NewExamGrade) -> Result<ExamGrade, RecordStoreError> {
        let mut rows = self.grades.lock().expect("state lock");
        let stored = ExamGrade {
            id: next_id(&rows),
            student_id: grade.student_id,
            exam_name: grade.exam_name,
            grade: grade.grade,
            remarks: grade.remarks,
        };
        rows.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl MaterialRepository for MemoryRecords {
    async fn create(&self, material: NewBookMaterial) -> Result<BookMaterial, RecordStoreError> {
        let mut rows = self.materials.lock().expect("state lock");
        let stored = BookMaterial {
            id: next_id(&rows),
            title: material.title,
            author: material.author,
            course_id: material.course_id,
        };
        rows.push(stored.clone());
        Ok(stored)
    }
}

#[derive(Default)]
pub struct MemoryNotifications {
    rows: Mutex<Vec<InAppNotification>>,
}

#[async_trait]
impl NotificationRepository for MemoryNotifications {
    async fn insert(
        &self,
        notification: NewInAppNotification,
    ) -> Result<i32, NotificationStoreError> {
        let mut rows = self.rows.lock().expect("state lock");
        let id = next_id(&rows);
        rows.push(InAppNotification {
            id,
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            is_read: false,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<InAppNotification>, NotificationStoreError> {
        Ok(self
            .rows
            .lock()
            .expect("state lock")
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, notification_id: i32) -> Result<bool, NotificationStoreError> {
        let mut rows = self.rows.lock().expect("state lock");
        match rows.iter_mut().find(|row| row.id == notification_id) {
            Some(row) => {
                row.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: i32) -> Result<u64, NotificationStoreError> {
        let mut rows = self.rows.lock().expect("state lock");
        let mut updated = 0;
        for row in rows.iter_mut().filter(|row| row.user_id == user_id) {
            if !row.is_read {
                row.is_read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }
}

#[derive(Default)]
pub struct MemoryPushTokens {
    rows: Mutex<Vec<(i32, String, String, bool)>>,
}

impl MemoryPushTokens {
    /// Snapshot of `(user_id, token, device_type, is_active)` rows.
    pub fn rows(&self) -> Vec<(i32, String, String, bool)> {
        self.rows.lock().expect("state lock").clone()
    }
}

#[async_trait]
impl PushTokenRepository for MemoryPushTokens {
    async fn active_tokens(&self, user_id: i32) -> Result<Vec<String>, PushTokenStoreError> {
        Ok(self
            .rows
            .lock()
            .expect("state lock")
            .iter()
            .filter(|(owner, _, _, active)| *owner == user_id && *active)
            .map(|(_, token, _, _)| token.clone())
            .collect())
    }

    async fn upsert(
        &self,
        user_id: i32,
        token: &str,
        device_type: &str,
    ) -> Result<(), PushTokenStoreError> {
        let mut rows = self.rows.lock().expect("state lock");
        for row in rows.iter_mut() {
            if row.0 == user_id && row.1 == token {
                row.2 = device_type.to_owned();
                row.3 = true;
                return Ok(());
            }
        }
        rows.push((user_id, token.to_owned(), device_type.to_owned(), true));
        Ok(())
    }

    async fn deactivate(&self, user_id: i32, token: &str) -> Result<bool, PushTokenStoreError> {
        let mut rows = self.rows.lock().expect("state lock");
        for row in rows.iter_mut() {
            if row.0 == user_id && row.1 == token {
                row.3 = false;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Fully wired in-memory state plus handles for assertions.
pub struct TestHarness {
    /// State handed to handlers under test.
    pub state: HttpState,
    /// Recorded notification requests.
    pub queue: Arc<RecordingQueue>,
    /// Push token rows for upsert/deactivate assertions.
    pub push_tokens: Arc<MemoryPushTokens>,
    /// In-app notification rows.
    pub notifications: Arc<MemoryNotifications>,
}

impl TestHarness {
    /// Build a harness with empty stores.
    pub fn new() -> Self {
        let queue = Arc::new(RecordingQueue::default());
        let push_tokens = Arc::new(MemoryPushTokens::default());
        let notifications = Arc::new(MemoryNotifications::default());
        let records = Arc::new(MemoryRecords::default());
        let state = HttpState {
            users: Arc::new(MemoryUsers::default()),
            courses: Arc::new(MemoryCourses::default()),
            batches: Arc::new(MemoryBatches::default()),
            invoices: Arc::new(MemoryInvoices::default()),
            demo_bookings: Arc::new(MemoryDemoBookings::default()),
            notices: records.clone(),
            events: records.clone(),
            exam_grades: records.clone(),
            materials: records,
            notifications: notifications.clone(),
            push_tokens: push_tokens.clone(),
            notifier: queue.clone(),
        };
        Self {
            state,
            queue,
            push_tokens,
            notifications,
        }
    }
}
