//! Port giving the schema evolver raw access to one database session.
//!
//! The adapter is expected to hold a dedicated, non-pooled connection for
//! the whole run so catalog queries and DDL observe one stable session.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by evolution store adapters.
    pub enum EvolutionStoreError {
        /// The dedicated connection could not be established or was lost.
        Connection { message: String } => "evolution store connection failed: {message}",
        /// An individual statement failed.
        Statement { message: String } => "schema statement failed: {message}",
    }
}

/// One column as reported by catalog introspection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CatalogColumn {
    /// Owning table name.
    pub table: String,
    /// Column name.
    pub column: String,
    /// Formatted SQL type.
    pub data_type: String,
}

/// Raw session operations required by the schema evolver.
#[async_trait]
pub trait EvolutionStore: Send {
    /// Execute one DDL or DML statement.
    async fn execute(&mut self, sql: &str) -> Result<(), EvolutionStoreError>;

    /// Whether `table.column` exists in the current schema.
    async fn column_exists(&mut self, table: &str, column: &str)
    -> Result<bool, EvolutionStoreError>;

    /// Catalog listing of the given tables' columns, for diagnostics.
    async fn list_columns(
        &mut self,
        tables: &[&str],
    ) -> Result<Vec<CatalogColumn>, EvolutionStoreError>;

    /// Step names recorded in the applied-steps ledger.
    async fn applied_steps(&mut self) -> Result<Vec<String>, EvolutionStoreError>;

    /// Record a step as applied in the ledger.
    async fn record_applied(&mut self, step_name: &str) -> Result<(), EvolutionStoreError>;

    /// Invoice ids lacking an invoice number, ordered by id ascending.
    async fn invoices_missing_number(&mut self) -> Result<Vec<i32>, EvolutionStoreError>;

    /// Draw the next value from the invoice number sequence.
    async fn next_invoice_sequence(&mut self) -> Result<i64, EvolutionStoreError>;

    /// Assign a generated invoice number to one row.
    async fn assign_invoice_number(
        &mut self,
        invoice_id: i32,
        number: &str,
    ) -> Result<(), EvolutionStoreError>;
}
