//! PostgreSQL-backed adapters for the published record stores: notices,
//! events, exam grades, and shared materials.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::academy::{AcademyEvent, BookMaterial, ExamGrade, NoticeRecord};
use crate::domain::ports::{
    EventRepository, ExamGradeRepository, MaterialRepository, NewAcademyEvent, NewBookMaterial,
    NewExamGrade, NewNotice, NoticeRepository, RecordStoreError,
};

use super::diesel_error_mapping::{DbFailure, classify_diesel_error};
use super::models::{
    AcademyEventRow, BookMaterialRow, ExamGradeRow, NewAcademyEventRow, NewBookMaterialRow,
    NewExamGradeRow, NewNoticeRow, NoticeRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{academy_events, book_materials, exam_grades, notices};

/// Diesel-backed implementation of the record store ports.
///
/// One adapter implements all four traits; they share a pool and error
/// mapping and are always registered together.
#[derive(Clone)]
pub struct DieselRecordRepositories {
    pool: DbPool,
}

impl DieselRecordRepositories {
    /// Create a new adapter with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecordStoreError {
    RecordStoreError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> RecordStoreError {
    match classify_diesel_error(&error) {
        DbFailure::Connection => RecordStoreError::connection(error.to_string()),
        DbFailure::Query | DbFailure::UniqueViolation => {
            RecordStoreError::query(error.to_string())
        }
    }
}

#[async_trait]
impl NoticeRepository for DieselRecordRepositories {
    async fn create(&self, notice: NewNotice) -> Result<NoticeRecord, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewNoticeRow {
            title: &notice.title,
            body: &notice.body,
        };
        let stored: NoticeRow = diesel::insert_into(notices::table)
            .values(&row)
            .returning(NoticeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn list(&self) -> Result<Vec<NoticeRecord>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = notices::table
            .order(notices::created_at.desc())
            .select(NoticeRow::as_select())
            .load::<NoticeRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(NoticeRecord::from).collect())
    }
}

#[async_trait]
impl EventRepository for DieselRecordRepositories {
    async fn create(&self, event: NewAcademyEvent) -> Result<AcademyEvent, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAcademyEventRow {
            title: &event.title,
            description: &event.description,
            starts_at: event.starts_at,
        };
        let stored: AcademyEventRow = diesel::insert_into(academy_events::table)
            .values(&row)
            .returning(AcademyEventRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn list(&self) -> Result<Vec<AcademyEvent>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = academy_events::table
            .order(academy_events::starts_at.asc())
            .select(AcademyEventRow::as_select())
            .load::<AcademyEventRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(AcademyEvent::from).collect())
    }
}

#[async_trait]
impl ExamGradeRepository for DieselRecordRepositories {
    async fn create(&self, grade: NewExamGrade) -> Result<ExamGrade, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewExamGradeRow {
            student_id: grade.student_id,
            exam_name: &grade.exam_name,
            grade: &grade.grade,
            remarks: grade.remarks.as_deref(),
        };
        let stored: ExamGradeRow = diesel::insert_into(exam_grades::table)
            .values(&row)
            .returning(ExamGradeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }
}

#[async_trait]
impl MaterialRepository for DieselRecordRepositories {
    async fn create(&self, material: NewBookMaterial) -> Result<BookMaterial, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBookMaterialRow {
            title: &material.title,
            author: &material.author,
            course_id: material.course_id,
        };
        let stored: BookMaterialRow = diesel::insert_into(book_materials::table)
            .values(&row)
            .returning(BookMaterialRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }
}
