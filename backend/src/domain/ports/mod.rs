//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod batch_repository;
mod course_repository;
mod demo_booking_repository;
mod evolution_store;
mod invoice_repository;
mod mailer;
mod notification_queue;
mod notification_repository;
mod push_gateway;
mod push_token_repository;
mod recipient_directory;
mod records_repository;
mod user_repository;

pub use batch_repository::{BatchChange, BatchRepository, BatchStoreError, BatchUpdate, NewBatch};
pub use course_repository::{CourseRepository, CourseStoreError, NewCourse};
pub use demo_booking_repository::{
    DemoBookingChange, DemoBookingRepository, DemoBookingStoreError, NewDemoBooking,
};
pub use evolution_store::{CatalogColumn, EvolutionStore, EvolutionStoreError};
pub use invoice_repository::{
    InvoiceRepository, InvoiceStoreError, InvoiceTransition, NewInvoice,
};
pub use mailer::{MailDeliveryError, Mailer, OutgoingEmail};
pub use notification_queue::{DispatchError, NotificationQueue};
pub use notification_repository::{
    NewInAppNotification, NotificationRepository, NotificationStoreError,
};
pub use push_gateway::{
    MulticastOutcome, PushDeliveryError, PushGateway, PushMessage, PushSendError, TokenDelivery,
};
pub use push_token_repository::{PushTokenRepository, PushTokenStoreError};
pub use recipient_directory::{RecipientDirectory, RecipientLookupError};
pub use records_repository::{
    EventRepository, ExamGradeRepository, MaterialRepository, NewAcademyEvent, NewBookMaterial,
    NewExamGrade, NewNotice, NoticeRepository, RecordStoreError,
};
pub use user_repository::{NewUser, UserRepository, UserStoreError};
