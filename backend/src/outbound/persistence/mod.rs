//! PostgreSQL persistence adapters built on Diesel and `diesel-async`.

mod diesel_batch_repository;
mod diesel_course_repository;
mod diesel_demo_booking_repository;
mod diesel_error_mapping;
mod diesel_invoice_repository;
mod diesel_notification_repository;
mod diesel_push_token_repository;
mod diesel_recipient_directory;
mod diesel_record_repositories;
mod diesel_user_repository;
mod evolution_store;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_batch_repository::DieselBatchRepository;
pub use diesel_course_repository::DieselCourseRepository;
pub use diesel_demo_booking_repository::DieselDemoBookingRepository;
pub use diesel_invoice_repository::DieselInvoiceRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_push_token_repository::DieselPushTokenRepository;
pub use diesel_recipient_directory::DieselRecipientDirectory;
pub use diesel_record_repositories::DieselRecordRepositories;
pub use diesel_user_repository::DieselUserRepository;
pub use evolution_store::DieselEvolutionStore;
pub use pool::{DbPool, PoolConfig, PoolError};
