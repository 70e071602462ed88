//! Server construction and route wiring.

mod config;

pub use config::{ConfigError, ServerConfig};

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::batches::{create_batch, list_batches, update_batch};
use backend::inbound::http::courses::{create_course, list_courses};
use backend::inbound::http::demo_bookings::{
    create_demo_booking, list_demo_bookings, update_demo_booking,
};
use backend::inbound::http::events::{create_event, list_events};
use backend::inbound::http::exams::grade_exam;
use backend::inbound::http::fcm_tokens::{deactivate_token, register_token};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::invoices::{create_invoice, list_invoices, update_invoice};
use backend::inbound::http::materials::share_material;
use backend::inbound::http::notices::{create_notice, list_notices};
use backend::inbound::http::notifications::{list_notifications, mark_all_read, mark_read};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{list_users, register};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Construct an Actix HTTP server over the prepared adapter state.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    bind_addr: std::net::SocketAddr,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(http_state);

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .service(register)
            .service(list_users)
            .service(create_course)
            .service(list_courses)
            .service(create_batch)
            .service(update_batch)
            .service(list_batches)
            .service(create_invoice)
            .service(update_invoice)
            .service(list_invoices)
            .service(create_demo_booking)
            .service(update_demo_booking)
            .service(list_demo_bookings)
            .service(create_notice)
            .service(list_notices)
            .service(create_event)
            .service(list_events)
            .service(grade_exam)
            .service(share_material)
            .service(register_token)
            .service(deactivate_token)
            .service(list_notifications)
            .service(mark_read)
            .service(mark_all_read);

        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(http_state.clone())
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
