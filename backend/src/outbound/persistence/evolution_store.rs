//! PostgreSQL-backed `EvolutionStore` over one dedicated connection.
//!
//! The schema evolver deliberately bypasses the shared pool: it checks out
//! one `AsyncPgConnection` for its whole run so DDL and catalog queries
//! observe a single stable session, released when the store is dropped.

use async_trait::async_trait;
use diesel::sql_types::{Array, BigInt, Bool, Integer, Text};
use diesel::{QueryableByName, sql_query};
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{CatalogColumn, EvolutionStore, EvolutionStoreError};

/// Dedicated-session implementation of the `EvolutionStore` port.
pub struct DieselEvolutionStore {
    conn: AsyncPgConnection,
}

impl DieselEvolutionStore {
    /// Establish the dedicated connection.
    ///
    /// # Errors
    ///
    /// Returns `EvolutionStoreError::Connection` when the database cannot
    /// be reached; startup treats this as fatal.
    pub async fn connect(database_url: &str) -> Result<Self, EvolutionStoreError> {
        let conn = AsyncPgConnection::establish(database_url)
            .await
            .map_err(|err| EvolutionStoreError::connection(err.to_string()))?;
        Ok(Self { conn })
    }
}

fn map_statement_error(error: diesel::result::Error) -> EvolutionStoreError {
    EvolutionStoreError::statement(error.to_string())
}

#[derive(QueryableByName)]
struct ExistsRow {
    #[diesel(sql_type = Bool)]
    present: bool,
}

#[derive(QueryableByName)]
struct ColumnRow {
    #[diesel(sql_type = Text)]
    table_name: String,
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    data_type: String,
}

#[derive(QueryableByName)]
struct StepNameRow {
    #[diesel(sql_type = Text)]
    step_name: String,
}

#[derive(QueryableByName)]
struct IdRow {
    #[diesel(sql_type = Integer)]
    id: i32,
}

#[derive(QueryableByName)]
struct NextValRow {
    #[diesel(sql_type = BigInt)]
    nextval: i64,
}

#[async_trait]
impl EvolutionStore for DieselEvolutionStore {
    async fn execute(&mut self, sql: &str) -> Result<(), EvolutionStoreError> {
        sql_query(sql)
            .execute(&mut self.conn)
            .await
            .map_err(map_statement_error)?;
        Ok(())
    }

    async fn column_exists(
        &mut self,
        table: &str,
        column: &str,
    ) -> Result<bool, EvolutionStoreError> {
        let row: ExistsRow = sql_query(
            "SELECT EXISTS (\
               SELECT 1 FROM information_schema.columns \
               WHERE table_schema = current_schema() \
                 AND table_name = $1 \
                 AND column_name = $2\
             ) AS present",
        )
        .bind::<Text, _>(table)
        .bind::<Text, _>(column)
        .get_result(&mut self.conn)
        .await
        .map_err(map_statement_error)?;
        Ok(row.present)
    }

    async fn list_columns(
        &mut self,
        tables: &[&str],
    ) -> Result<Vec<CatalogColumn>, EvolutionStoreError> {
        let names: Vec<String> = tables.iter().map(|t| (*t).to_owned()).collect();
        let rows: Vec<ColumnRow> = sql_query(
            "SELECT \
               cls.relname AS table_name, \
               attr.attname AS column_name, \
               pg_catalog.format_type(attr.atttypid, attr.atttypmod) AS data_type \
             FROM pg_catalog.pg_attribute attr \
             JOIN pg_catalog.pg_class cls ON cls.oid = attr.attrelid \
             JOIN pg_catalog.pg_namespace ns ON ns.oid = cls.relnamespace \
             WHERE ns.nspname = current_schema() \
               AND cls.relname = ANY($1) \
               AND attr.attnum > 0 \
               AND NOT attr.attisdropped \
             ORDER BY cls.relname, attr.attnum",
        )
        .bind::<Array<Text>, _>(&names)
        .load(&mut self.conn)
        .await
        .map_err(map_statement_error)?;

        Ok(rows
            .into_iter()
            .map(|row| CatalogColumn {
                table: row.table_name,
                column: row.column_name,
                data_type: row.data_type,
            })
            .collect())
    }

    async fn applied_steps(&mut self) -> Result<Vec<String>, EvolutionStoreError> {
        let rows: Vec<StepNameRow> =
            sql_query("SELECT step_name FROM schema_evolution_ledger ORDER BY id")
                .load(&mut self.conn)
                .await
                .map_err(map_statement_error)?;
        Ok(rows.into_iter().map(|row| row.step_name).collect())
    }

    async fn record_applied(&mut self, step_name: &str) -> Result<(), EvolutionStoreError> {
        sql_query(
            "INSERT INTO schema_evolution_ledger (step_name) VALUES ($1) \
             ON CONFLICT (step_name) DO NOTHING",
        )
        .bind::<Text, _>(step_name)
        .execute(&mut self.conn)
        .await
        .map_err(map_statement_error)?;
        Ok(())
    }

    async fn invoices_missing_number(&mut self) -> Result<Vec<i32>, EvolutionStoreError> {
        let rows: Vec<IdRow> =
            sql_query("SELECT id FROM invoices WHERE invoice_number IS NULL ORDER BY id")
                .load(&mut self.conn)
                .await
                .map_err(map_statement_error)?;
        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    async fn next_invoice_sequence(&mut self) -> Result<i64, EvolutionStoreError> {
        let row: NextValRow = sql_query("SELECT nextval('invoice_number_seq') AS nextval")
            .get_result(&mut self.conn)
            .await
            .map_err(map_statement_error)?;
        Ok(row.nextval)
    }

    async fn assign_invoice_number(
        &mut self,
        invoice_id: i32,
        number: &str,
    ) -> Result<(), EvolutionStoreError> {
        sql_query("UPDATE invoices SET invoice_number = $1 WHERE id = $2")
            .bind::<Text, _>(number)
            .bind::<Integer, _>(invoice_id)
            .execute(&mut self.conn)
            .await
            .map_err(map_statement_error)?;
        Ok(())
    }
}
