//! Domain layer: entities, services, and the ports they depend on.

pub mod academy;
pub mod error;
pub mod events;
pub mod fanout;
pub mod notification;
pub mod ports;
pub mod schema_evolution;
pub mod user;

pub use academy::{
    AcademyEvent, Batch, BookMaterial, Course, DemoBooking, DemoStatus, ExamGrade, Invoice,
    InvoiceStatus, NoticeRecord,
};
pub use error::{Error, ErrorCode};
pub use events::{DemoOutcome, DomainEvent, NotificationRequest, RenderedMessage};
pub use fanout::{DeliveryReport, NotificationFanout};
pub use notification::{InAppNotification, NotificationKind};
pub use schema_evolution::{EvolutionReport, SchemaEvolver};
pub use user::{Recipient, RecipientSelector, Role, User, UserStatus};
