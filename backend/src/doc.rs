//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: all inbound paths plus the domain schemas they
//! reference. The generated specification backs Swagger UI in debug builds.

use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atelier backend API",
        description = "Back-office HTTP interface for the fine-arts academy: \
                       accounts, courses, batches, invoices, demo bookings, \
                       published records, notifications, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::list_users,
        crate::inbound::http::courses::create_course,
        crate::inbound::http::courses::list_courses,
        crate::inbound::http::batches::create_batch,
        crate::inbound::http::batches::update_batch,
        crate::inbound::http::batches::list_batches,
        crate::inbound::http::invoices::create_invoice,
        crate::inbound::http::invoices::update_invoice,
        crate::inbound::http::invoices::list_invoices,
        crate::inbound::http::demo_bookings::create_demo_booking,
        crate::inbound::http::demo_bookings::update_demo_booking,
        crate::inbound::http::demo_bookings::list_demo_bookings,
        crate::inbound::http::notices::create_notice,
        crate::inbound::http::notices::list_notices,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::list_events,
        crate::inbound::http::exams::grade_exam,
        crate::inbound::http::materials::share_material,
        crate::inbound::http::fcm_tokens::register_token,
        crate::inbound::http::fcm_tokens::deactivate_token,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::notifications::mark_all_read,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::User,
        crate::domain::user::Role,
        crate::domain::user::UserStatus,
        crate::domain::Course,
        crate::domain::Batch,
        crate::domain::Invoice,
        crate::domain::InvoiceStatus,
        crate::domain::DemoBooking,
        crate::domain::DemoStatus,
        crate::domain::NoticeRecord,
        crate::domain::AcademyEvent,
        crate::domain::ExamGrade,
        crate::domain::BookMaterial,
        crate::domain::InAppNotification,
        crate::domain::NotificationKind,
        crate::inbound::http::users::RegisterRequest,
        crate::inbound::http::courses::CreateCourseRequest,
        crate::inbound::http::batches::CreateBatchRequest,
        crate::inbound::http::batches::UpdateBatchRequest,
        crate::inbound::http::invoices::CreateInvoiceRequest,
        crate::inbound::http::invoices::UpdateInvoiceRequest,
        crate::inbound::http::demo_bookings::CreateDemoBookingRequest,
        crate::inbound::http::demo_bookings::UpdateDemoBookingRequest,
        crate::inbound::http::notices::CreateNoticeRequest,
        crate::inbound::http::events::CreateEventRequest,
        crate::inbound::http::exams::GradeExamRequest,
        crate::inbound::http::materials::ShareMaterialRequest,
        crate::inbound::http::fcm_tokens::RegisterTokenRequest,
        crate::inbound::http::fcm_tokens::DeactivateTokenRequest,
    )),
    tags(
        (name = "users", description = "Registration and account listing"),
        (name = "courses", description = "Course catalogue"),
        (name = "batches", description = "Batch management and allocation"),
        (name = "invoices", description = "Invoicing and payment status"),
        (name = "demo-bookings", description = "Demo-class bookings"),
        (name = "notices", description = "Published notices"),
        (name = "events", description = "Academy events"),
        (name = "exams", description = "Exam grading"),
        (name = "materials", description = "Shared study materials"),
        (name = "fcm-tokens", description = "Push token registration"),
        (name = "notifications", description = "In-app notifications"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn document_includes_every_registered_path() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/v1/register"));
        assert!(paths.contains_key("/api/v1/batches/{id}"));
        assert!(paths.contains_key("/api/v1/invoices/{id}"));
        assert!(paths.contains_key("/health/ready"));
    }
}
