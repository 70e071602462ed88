//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match what the schema evolver produces. Column
//! order follows physical order: the base columns each table first shipped
//! with, then columns appended by later `ADD COLUMN IF NOT EXISTS` steps.
//!
//! # Maintenance
//!
//! When the evolver's step catalog grows, extend these definitions to
//! match. Rows are always read via `Selectable`, so only names and types
//! need to agree with the live schema.

diesel::table! {
    /// Academy accounts: admins, teachers, and students.
    users (id) {
        /// Primary key.
        id -> Int4,
        /// Full name.
        name -> Varchar,
        /// Contact email, unique among non-deleted accounts.
        email -> Varchar,
        /// bcrypt hash of the password.
        password_hash -> Varchar,
        /// Role: admin, teacher, or student.
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
        /// Activation status: active or inactive.
        status -> Varchar,
        /// Soft-deletion flag.
        is_deleted -> Bool,
        /// Optional contact phone.
        phone -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Course catalogue.
    courses (id) {
        /// Primary key.
        id -> Int4,
        /// Display name.
        name -> Varchar,
        /// Marketing description.
        description -> Text,
        /// Monthly fee in the smallest currency unit.
        monthly_fee_cents -> Int8,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Student groups within a course.
    batches (id) {
        /// Primary key.
        id -> Int4,
        /// Display name.
        name -> Varchar,
        /// Owning course.
        course_id -> Int4,
        /// Ids of enrolled students.
        student_ids -> Array<Int4>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
        /// Human-readable schedule line.
        schedule -> Varchar,
    }
}

diesel::table! {
    /// Invoices raised against students.
    invoices (id) {
        /// Primary key.
        id -> Int4,
        /// Billed student.
        student_id -> Int4,
        /// Amount in the smallest currency unit.
        amount_cents -> Int8,
        /// Payment state: pending, paid, or cancelled.
        status -> Varchar,
        /// Optional due date.
        due_on -> Nullable<Date>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
        /// Human-readable code; null only on rows the backfill has not
        /// reached.
        invoice_number -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Demo-class bookings from prospects.
    demo_bookings (id) {
        /// Primary key.
        id -> Int4,
        /// Prospect name.
        name -> Varchar,
        /// Prospect email.
        email -> Varchar,
        /// Course the demo was booked for.
        course_id -> Int4,
        /// Lifecycle state.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
        /// Agreed slot, once scheduled.
        scheduled_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Published notices.
    notices (id) {
        /// Primary key.
        id -> Int4,
        /// Headline.
        title -> Varchar,
        /// Body text.
        body -> Text,
        /// Publication timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Announced academy events.
    academy_events (id) {
        /// Primary key.
        id -> Int4,
        /// Event title.
        title -> Varchar,
        /// Event description.
        description -> Text,
        /// Scheduled start.
        starts_at -> Timestamptz,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Graded exam results.
    exam_grades (id) {
        /// Primary key.
        id -> Int4,
        /// Graded student.
        student_id -> Int4,
        /// Exam display name.
        exam_name -> Varchar,
        /// Awarded grade.
        grade -> Varchar,
        /// Optional examiner remarks.
        remarks -> Nullable<Text>,
        /// Grading timestamp.
        graded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Books and study materials shared with students.
    book_materials (id) {
        /// Primary key.
        id -> Int4,
        /// Material title.
        title -> Varchar,
        /// Author or source.
        author -> Varchar,
        /// Owning course.
        course_id -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// In-app notifications, one row per recipient per event.
    notifications (id) {
        /// Primary key.
        id -> Int4,
        /// Owning user.
        user_id -> Int4,
        /// Short headline.
        title -> Varchar,
        /// Full message body.
        message -> Text,
        /// Severity: Info, Warning, Success, or Error (CHECK-constrained).
        kind -> Varchar,
        /// Whether the user has opened the notification.
        is_read -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered FCM device tokens, unique per (user, token).
    fcm_tokens (id) {
        /// Primary key.
        id -> Int4,
        /// Owning user.
        user_id -> Int4,
        /// Provider-issued device token.
        fcm_token -> Text,
        /// Soft-deactivated when the provider reports the token gone.
        is_active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
        /// Reporting platform: android, ios, or web.
        device_type -> Varchar,
    }
}
