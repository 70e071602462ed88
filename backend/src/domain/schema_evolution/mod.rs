//! Idempotent startup schema evolution.
//!
//! There is no external migration framework: the expected schema is defined
//! entirely by the ordered step catalog in [`steps`], and every process
//! start replays it against the live database. Steps already recorded in
//! the `schema_evolution_ledger` table are skipped unless marked
//! repeatable; all steps are individually idempotent, so a database
//! restored from an arbitrary earlier backup converges on the next boot.
//!
//! Failure semantics: a failing step is logged and tallied but never aborts
//! the run. The run itself is fatal only when the dedicated connection (or
//! the ledger table) cannot be established.

mod steps;

use std::collections::HashSet;

use chrono::{Datelike, Utc};
use tracing::{info, warn};

use crate::domain::ports::{CatalogColumn, EvolutionStore, EvolutionStoreError};

pub use steps::{LEDGER_DDL, MANAGED_TABLES, catalog};

/// What one evolution step does when applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// `CREATE TABLE IF NOT EXISTS ...`; idempotent by construction.
    EnsureTable {
        /// The full creation statement.
        ddl: &'static str,
    },
    /// `ALTER TABLE ... ADD COLUMN IF NOT EXISTS ...`.
    EnsureColumn {
        /// Target table.
        table: &'static str,
        /// Column to add.
        column: &'static str,
        /// Column type and default clause.
        definition: &'static str,
    },
    /// `CREATE SEQUENCE IF NOT EXISTS ...`.
    EnsureSequence {
        /// Sequence name.
        name: &'static str,
    },
    /// `CREATE [UNIQUE] INDEX IF NOT EXISTS ...`.
    EnsureIndex {
        /// The full index creation statement.
        ddl: &'static str,
    },
    /// Drop a named constraint if present, then re-add it only while the
    /// referenced column still exists.
    FixForeignKey {
        /// Target table.
        table: &'static str,
        /// Constraint name.
        constraint: &'static str,
        /// Referencing column.
        column: &'static str,
        /// Referenced table and column, e.g. `users(id)`.
        references: &'static str,
        /// `ON DELETE` action.
        on_delete: &'static str,
    },
    /// Assign `INV-YEAR-NNNN` codes to invoices lacking one, in id order,
    /// drawing suffixes solely from the invoice number sequence.
    BackfillInvoiceNumbers,
}

/// One named, independently idempotent evolution step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionStep {
    /// Unique name recorded in the ledger.
    pub name: &'static str,
    /// Whether the step runs on every boot regardless of the ledger.
    pub repeatable: bool,
    /// The work the step performs.
    pub action: StepAction,
}

impl EvolutionStep {
    /// A step that runs once and is then gated by the ledger.
    pub const fn once(name: &'static str, action: StepAction) -> Self {
        Self {
            name,
            repeatable: false,
            action,
        }
    }

    /// A step that runs on every boot.
    pub const fn repeatable(name: &'static str, action: StepAction) -> Self {
        Self {
            name,
            repeatable: true,
            action,
        }
    }
}

/// One failed step within an otherwise completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    /// Name of the failed step.
    pub name: &'static str,
    /// Failure description.
    pub message: String,
}

/// Outcome of one evolver run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvolutionReport {
    /// Steps executed this run.
    pub applied: Vec<&'static str>,
    /// Steps skipped because the ledger already records them.
    pub skipped: Vec<&'static str>,
    /// Steps that failed; the run continued past each.
    pub failed: Vec<StepFailure>,
    /// Columns present after the run but not before it.
    pub columns_added: Vec<CatalogColumn>,
}

/// Replays the step catalog against one database session.
#[derive(Debug, Clone, Copy)]
pub struct SchemaEvolver {
    backfill_year: i32,
}

impl Default for SchemaEvolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaEvolver {
    /// Evolver stamping backfilled invoice numbers with the current year.
    pub fn new() -> Self {
        Self {
            backfill_year: Utc::now().year(),
        }
    }

    /// Evolver stamping backfilled invoice numbers with a fixed year.
    pub const fn with_backfill_year(backfill_year: i32) -> Self {
        Self { backfill_year }
    }

    /// Run the full catalog.
    ///
    /// # Errors
    ///
    /// Returns an error only when the ledger table cannot be ensured or its
    /// contents cannot be read; individual step failures are reported in
    /// the returned [`EvolutionReport`] instead.
    pub async fn run<S: EvolutionStore>(
        &self,
        store: &mut S,
    ) -> Result<EvolutionReport, EvolutionStoreError> {
        store.execute(LEDGER_DDL).await?;
        let already_applied: HashSet<String> = store.applied_steps().await?.into_iter().collect();

        let columns_before = self.snapshot_columns(store, "before").await;

        let mut report = EvolutionReport::default();
        for step in catalog() {
            if !step.repeatable && already_applied.contains(step.name) {
                report.skipped.push(step.name);
                continue;
            }
            match self.apply(store, &step).await {
                Ok(()) => {
                    info!(step = step.name, "schema evolution step applied");
                    report.applied.push(step.name);
                    if !step.repeatable {
                        // A ledger write failure only costs a redundant (and
                        // idempotent) re-run on the next boot.
                        if let Err(err) = store.record_applied(step.name).await {
                            warn!(step = step.name, error = %err, "failed to record applied step");
                        }
                    }
                }
                Err(err) => {
                    warn!(step = step.name, error = %err, "schema evolution step failed");
                    report.failed.push(StepFailure {
                        name: step.name,
                        message: err.to_string(),
                    });
                }
            }
        }

        let columns_after = self.snapshot_columns(store, "after").await;
        if let (Some(before), Some(after)) = (columns_before, columns_after) {
            let known: HashSet<&CatalogColumn> = before.iter().collect();
            report.columns_added = after
                .into_iter()
                .filter(|column| !known.contains(column))
                .collect();
        }

        info!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            columns_added = report.columns_added.len(),
            "schema evolution completed"
        );
        Ok(report)
    }

    async fn apply<S: EvolutionStore>(
        &self,
        store: &mut S,
        step: &EvolutionStep,
    ) -> Result<(), EvolutionStoreError> {
        match &step.action {
            StepAction::EnsureTable { ddl } => store.execute(ddl).await,
            StepAction::EnsureColumn {
                table,
                column,
                definition,
            } => {
                let sql = format!(
                    "ALTER TABLE {table} ADD COLUMN IF NOT EXISTS {column} {definition}"
                );
                store.execute(&sql).await
            }
            StepAction::EnsureSequence { name } => {
                let sql = format!("CREATE SEQUENCE IF NOT EXISTS {name} START 1");
                store.execute(&sql).await
            }
            StepAction::EnsureIndex { ddl } => store.execute(ddl).await,
            StepAction::FixForeignKey {
                table,
                constraint,
                column,
                references,
                on_delete,
            } => {
                let drop_sql =
                    format!("ALTER TABLE {table} DROP CONSTRAINT IF EXISTS {constraint}");
                store.execute(&drop_sql).await?;
                if store.column_exists(table, column).await? {
                    let add_sql = format!(
                        "ALTER TABLE {table} ADD CONSTRAINT {constraint} \
                         FOREIGN KEY ({column}) REFERENCES {references} ON DELETE {on_delete}"
                    );
                    store.execute(&add_sql).await
                } else {
                    info!(
                        step = step.name,
                        table, column, "referenced column missing; constraint not re-added"
                    );
                    Ok(())
                }
            }
            StepAction::BackfillInvoiceNumbers => self.backfill_invoice_numbers(store).await,
        }
    }

    /// Assign codes to invoices lacking one, in insertion (id) order.
    ///
    /// The sequence is the sole source of the numeric suffix, so codes are
    /// monotonically increasing and never reused, even across interrupted
    /// backfills.
    async fn backfill_invoice_numbers<S: EvolutionStore>(
        &self,
        store: &mut S,
    ) -> Result<(), EvolutionStoreError> {
        let missing = store.invoices_missing_number().await?;
        if missing.is_empty() {
            return Ok(());
        }
        info!(count = missing.len(), "backfilling invoice numbers");
        for invoice_id in missing {
            let suffix = store.next_invoice_sequence().await?;
            let number = format_invoice_number(self.backfill_year, suffix);
            store.assign_invoice_number(invoice_id, &number).await?;
        }
        Ok(())
    }

    async fn snapshot_columns<S: EvolutionStore>(
        &self,
        store: &mut S,
        stage: &str,
    ) -> Option<Vec<CatalogColumn>> {
        match store.list_columns(MANAGED_TABLES).await {
            Ok(columns) => {
                info!(stage, columns = columns.len(), "schema column snapshot");
                Some(columns)
            }
            Err(err) => {
                // Diagnostics only; never affects control flow.
                warn!(stage, error = %err, "schema column snapshot failed");
                None
            }
        }
    }
}

/// Render an invoice code from the year and a sequence value.
pub fn format_invoice_number(year: i32, suffix: i64) -> String {
    format!("INV-{year}-{suffix:04}")
}

#[cfg(test)]
mod tests;
