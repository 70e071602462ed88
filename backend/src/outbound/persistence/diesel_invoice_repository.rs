//! PostgreSQL-backed `InvoiceRepository` adapter.
//!
//! Invoice numbers are assigned at insert time from the same database
//! sequence the startup backfill uses, so the numeric suffix is monotonic
//! and never reused across either path.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;

use crate::domain::academy::{Invoice, InvoiceStatus};
use crate::domain::ports::{
    InvoiceRepository, InvoiceStoreError, InvoiceTransition, NewInvoice,
};
use crate::domain::schema_evolution::format_invoice_number;

use super::diesel_error_mapping::{DbFailure, classify_diesel_error};
use super::models::{InvoiceRow, NewInvoiceRow};
use super::pool::{DbPool, PoolError};
use super::schema::invoices;

/// Diesel-backed implementation of the `InvoiceRepository` port.
#[derive(Clone)]
pub struct DieselInvoiceRepository {
    pool: DbPool,
}

impl DieselInvoiceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> InvoiceStoreError {
    InvoiceStoreError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> InvoiceStoreError {
    match classify_diesel_error(&error) {
        DbFailure::Connection => InvoiceStoreError::connection(error.to_string()),
        DbFailure::Query | DbFailure::UniqueViolation => {
            InvoiceStoreError::query(error.to_string())
        }
    }
}

#[derive(QueryableByName)]
struct NextSequenceValue {
    #[diesel(sql_type = BigInt)]
    nextval: i64,
}

#[async_trait]
impl InvoiceRepository for DieselInvoiceRepository {
    async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let sequence: NextSequenceValue =
            diesel::sql_query("SELECT nextval('invoice_number_seq') AS nextval")
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        let number = format_invoice_number(Utc::now().year(), sequence.nextval);

        let row = NewInvoiceRow {
            student_id: invoice.student_id,
            amount_cents: invoice.amount_cents,
            status: invoice.status.as_str(),
            due_on: invoice.due_on,
            invoice_number: &number,
        };
        let stored: InvoiceRow = diesel::insert_into(invoices::table)
            .values(&row)
            .returning(InvoiceRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn update_status(
        &self,
        id: i32,
        status: InvoiceStatus,
    ) -> Result<InvoiceTransition, InvoiceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let previous: InvoiceRow = invoices::table
            .find(id)
            .select(InvoiceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or(InvoiceStoreError::NotFound { id })?;

        let stored: InvoiceRow = diesel::update(invoices::table.find(id))
            .set((
                invoices::status.eq(status.as_str()),
                invoices::updated_at.eq(diesel::dsl::now),
            ))
            .returning(InvoiceRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(InvoiceTransition {
            previous_status: InvoiceStatus::from_db(&previous.status),
            invoice: stored.into(),
        })
    }

    async fn list(&self) -> Result<Vec<Invoice>, InvoiceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = invoices::table
            .order(invoices::created_at.desc())
            .select(InvoiceRow::as_select())
            .load::<InvoiceRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Invoice::from).collect())
    }
}
