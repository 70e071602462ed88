//! Port abstraction for invoice persistence adapters.
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::academy::{Invoice, InvoiceStatus};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by invoice repository adapters.
    pub enum InvoiceStoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "invoice repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "invoice repository query failed: {message}",
        /// The referenced invoice does not exist.
        NotFound { id: i32 } => "invoice {id} not found",
    }
}

/// Insertable invoice record; the invoice number is assigned by the store
/// from the dedicated database sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    /// Billed student.
    pub student_id: i32,
    /// Amount in the smallest currency unit.
    pub amount_cents: i64,
    /// Initial payment state.
    pub status: InvoiceStatus,
    /// Optional due date.
    pub due_on: Option<NaiveDate>,
}

/// An applied status update together with the pre-update status, so callers
/// can detect the pending→paid transition.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceTransition {
    /// Status before the update.
    pub previous_status: InvoiceStatus,
    /// The invoice after the update.
    pub invoice: Invoice,
}

/// Durable store for invoices.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Insert an invoice, assigning its number, and return the stored
    /// record.
    async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceStoreError>;

    /// Update the payment status and report the previous one.
    async fn update_status(
        &self,
        id: i32,
        status: InvoiceStatus,
    ) -> Result<InvoiceTransition, InvoiceStoreError>;

    /// List all invoices, newest first.
    async fn list(&self) -> Result<Vec<Invoice>, InvoiceStoreError>;
}
