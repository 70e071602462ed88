//! The ordered catalog of schema evolution steps.
//!
//! The list is monotonically additive across releases: steps are appended,
//! never edited or removed, and no step drops or renames a column. Each step
//! must stay safe to execute unboundedly often, because a database restored
//! from an older backup loses its ledger along with everything else.

use super::{EvolutionStep, StepAction};

/// Tables whose columns are listed in the before/after diagnostics.
pub const MANAGED_TABLES: &[&str] = &[
    "users",
    "courses",
    "batches",
    "invoices",
    "demo_bookings",
    "notices",
    "academy_events",
    "exam_grades",
    "book_materials",
    "notifications",
    "fcm_tokens",
    "salaries",
    "salary_payments",
    "event_notifications",
];

/// DDL creating the applied-steps ledger; executed unconditionally before
/// any step and therefore not itself a step.
pub const LEDGER_DDL: &str = "CREATE TABLE IF NOT EXISTS schema_evolution_ledger (\
     id SERIAL PRIMARY KEY, \
     step_name VARCHAR(128) NOT NULL UNIQUE, \
     applied_at TIMESTAMPTZ NOT NULL DEFAULT now())";

/// The current expected schema, as an ordered list of named steps.
pub fn catalog() -> Vec<EvolutionStep> {
    vec![
        EvolutionStep::once(
            "create_users",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS users (\
                     id SERIAL PRIMARY KEY, \
                     name VARCHAR(255) NOT NULL, \
                     email VARCHAR(255) NOT NULL, \
                     password_hash VARCHAR(255) NOT NULL, \
                     role VARCHAR(32) NOT NULL DEFAULT 'student', \
                     created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
                     updated_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            },
        ),
        EvolutionStep::once(
            "create_courses",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS courses (\
                     id SERIAL PRIMARY KEY, \
                     name VARCHAR(255) NOT NULL, \
                     description TEXT NOT NULL DEFAULT '', \
                     monthly_fee_cents BIGINT NOT NULL DEFAULT 0, \
                     created_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            },
        ),
        EvolutionStep::once(
            "create_batches",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS batches (\
                     id SERIAL PRIMARY KEY, \
                     name VARCHAR(255) NOT NULL, \
                     course_id INTEGER NOT NULL REFERENCES courses(id), \
                     student_ids INTEGER[] NOT NULL DEFAULT '{}', \
                     created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
                     updated_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            },
        ),
        EvolutionStep::once(
            "create_invoices",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS invoices (\
                     id SERIAL PRIMARY KEY, \
                     student_id INTEGER NOT NULL REFERENCES users(id), \
                     amount_cents BIGINT NOT NULL, \
                     status VARCHAR(32) NOT NULL DEFAULT 'pending', \
                     due_on DATE, \
                     created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
                     updated_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            },
        ),
        EvolutionStep::once(
            "create_demo_bookings",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS demo_bookings (\
                     id SERIAL PRIMARY KEY, \
                     name VARCHAR(255) NOT NULL, \
                     email VARCHAR(255) NOT NULL, \
                     course_id INTEGER NOT NULL REFERENCES courses(id), \
                     status VARCHAR(32) NOT NULL DEFAULT 'requested', \
                     created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
                     updated_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            },
        ),
        EvolutionStep::once(
            "create_notices",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS notices (\
                     id SERIAL PRIMARY KEY, \
                     title VARCHAR(255) NOT NULL, \
                     body TEXT NOT NULL, \
                     created_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            },
        ),
        EvolutionStep::once(
            "create_academy_events",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS academy_events (\
                     id SERIAL PRIMARY KEY, \
                     title VARCHAR(255) NOT NULL, \
                     description TEXT NOT NULL DEFAULT '', \
                     starts_at TIMESTAMPTZ NOT NULL, \
                     created_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            },
        ),
        EvolutionStep::once(
            "create_exam_grades",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS exam_grades (\
                     id SERIAL PRIMARY KEY, \
                     student_id INTEGER NOT NULL REFERENCES users(id), \
                     exam_name VARCHAR(255) NOT NULL, \
                     grade VARCHAR(16) NOT NULL, \
                     remarks TEXT, \
                     graded_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            },
        ),
        EvolutionStep::once(
            "create_book_materials",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS book_materials (\
                     id SERIAL PRIMARY KEY, \
                     title VARCHAR(255) NOT NULL, \
                     author VARCHAR(255) NOT NULL DEFAULT '', \
                     course_id INTEGER NOT NULL REFERENCES courses(id), \
                     created_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            },
        ),
        EvolutionStep::once(
            "create_notifications",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS notifications (\
                     id SERIAL PRIMARY KEY, \
                     user_id INTEGER NOT NULL, \
                     title VARCHAR(255) NOT NULL, \
                     message TEXT NOT NULL, \
                     kind VARCHAR(16) NOT NULL DEFAULT 'Info' \
                       CHECK (kind IN ('Info', 'Warning', 'Success', 'Error')), \
                     is_read BOOLEAN NOT NULL DEFAULT FALSE, \
                     created_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            },
        ),
        EvolutionStep::once(
            "create_fcm_tokens",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS fcm_tokens (\
                     id SERIAL PRIMARY KEY, \
                     user_id INTEGER NOT NULL, \
                     fcm_token TEXT NOT NULL, \
                     is_active BOOLEAN NOT NULL DEFAULT TRUE, \
                     created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
                     updated_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
                     UNIQUE (user_id, fcm_token))",
            },
        ),
        EvolutionStep::once(
            "create_salaries",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS salaries (\
                     id SERIAL PRIMARY KEY, \
                     teacher_id INTEGER NOT NULL, \
                     monthly_cents BIGINT NOT NULL DEFAULT 0, \
                     effective_from DATE NOT NULL, \
                     created_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            },
        ),
        EvolutionStep::once(
            "create_salary_payments",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS salary_payments (\
                     id SERIAL PRIMARY KEY, \
                     salary_id INTEGER NOT NULL, \
                     amount_cents BIGINT NOT NULL, \
                     paid_on DATE NOT NULL, \
                     created_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            },
        ),
        EvolutionStep::once(
            "create_event_notifications",
            StepAction::EnsureTable {
                ddl: "CREATE TABLE IF NOT EXISTS event_notifications (\
                     id SERIAL PRIMARY KEY, \
                     event_id INTEGER NOT NULL, \
                     user_id INTEGER NOT NULL, \
                     sent_at TIMESTAMPTZ NOT NULL DEFAULT now())",
            },
        ),
        // Columns added after the tables first shipped. ADD COLUMN IF NOT
        // EXISTS keeps these safe against databases restored from backups
        // taken at any earlier release.
        EvolutionStep::once(
            "users_add_status",
            StepAction::EnsureColumn {
                table: "users",
                column: "status",
                definition: "VARCHAR(32) NOT NULL DEFAULT 'active'",
            },
        ),
        EvolutionStep::once(
            "users_add_is_deleted",
            StepAction::EnsureColumn {
                table: "users",
                column: "is_deleted",
                definition: "BOOLEAN NOT NULL DEFAULT FALSE",
            },
        ),
        EvolutionStep::once(
            "users_add_email_unique_index",
            StepAction::EnsureIndex {
                ddl: "CREATE UNIQUE INDEX IF NOT EXISTS users_email_active_uniq \
                      ON users (lower(email)) WHERE NOT is_deleted",
            },
        ),
        EvolutionStep::once(
            "users_add_phone",
            StepAction::EnsureColumn {
                table: "users",
                column: "phone",
                definition: "VARCHAR(32)",
            },
        ),
        EvolutionStep::once(
            "batches_add_schedule",
            StepAction::EnsureColumn {
                table: "batches",
                column: "schedule",
                definition: "VARCHAR(255) NOT NULL DEFAULT ''",
            },
        ),
        EvolutionStep::once(
            "invoices_add_invoice_number",
            StepAction::EnsureColumn {
                table: "invoices",
                column: "invoice_number",
                definition: "VARCHAR(32)",
            },
        ),
        EvolutionStep::once(
            "demo_bookings_add_scheduled_at",
            StepAction::EnsureColumn {
                table: "demo_bookings",
                column: "scheduled_at",
                definition: "TIMESTAMPTZ",
            },
        ),
        EvolutionStep::once(
            "fcm_tokens_add_device_type",
            StepAction::EnsureColumn {
                table: "fcm_tokens",
                column: "device_type",
                definition: "VARCHAR(16) NOT NULL DEFAULT 'android'",
            },
        ),
        EvolutionStep::once(
            "create_invoice_number_seq",
            StepAction::EnsureSequence {
                name: "invoice_number_seq",
            },
        ),
        // Constraints recreated defensively: external restore scripts have
        // been seen dropping referenced columns, so the constraint is only
        // re-added while its column still exists.
        EvolutionStep::repeatable(
            "fix_fcm_tokens_user_fk",
            StepAction::FixForeignKey {
                table: "fcm_tokens",
                constraint: "fcm_tokens_user_id_fkey",
                column: "user_id",
                references: "users(id)",
                on_delete: "CASCADE",
            },
        ),
        EvolutionStep::repeatable(
            "fix_notifications_user_fk",
            StepAction::FixForeignKey {
                table: "notifications",
                constraint: "notifications_user_id_fkey",
                column: "user_id",
                references: "users(id)",
                on_delete: "CASCADE",
            },
        ),
        // Runs every boot so rows introduced by restores or manual inserts
        // pick up a number on the next start.
        EvolutionStep::repeatable("backfill_invoice_numbers", StepAction::BackfillInvoiceNumbers),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn step_names_are_unique() {
        let steps = catalog();
        let names: HashSet<&str> = steps.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), steps.len());
    }

    #[test]
    fn table_creation_precedes_column_additions() {
        let steps = catalog();
        let first_column_step = steps
            .iter()
            .position(|s| matches!(s.action, StepAction::EnsureColumn { .. }))
            .expect("catalog has column steps");
        let last_table_step = steps
            .iter()
            .rposition(|s| matches!(s.action, StepAction::EnsureTable { .. }))
            .expect("catalog has table steps");
        assert!(last_table_step < first_column_step);
    }

    #[test]
    fn every_create_is_guarded_by_if_not_exists() {
        for step in catalog() {
            if let StepAction::EnsureTable { ddl } = step.action {
                assert!(
                    ddl.starts_with("CREATE TABLE IF NOT EXISTS"),
                    "step {} must be idempotent",
                    step.name
                );
            }
        }
    }
}
