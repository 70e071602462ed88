//! Academy event handlers.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::Error;
use crate::domain::academy::AcademyEvent;
use crate::domain::events::DomainEvent;
use crate::domain::ports::NewAcademyEvent;
use crate::domain::user::RecipientSelector;
use crate::inbound::http::ApiResult;
use crate::inbound::http::notices::map_record_error;
use crate::inbound::http::state::HttpState;

/// Event body for `POST /api/v1/events`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Event title.
    pub title: String,
    /// Event description.
    #[serde(default)]
    pub description: String,
    /// Scheduled start.
    pub starts_at: DateTime<Utc>,
}

/// Announce an event and broadcast it to all active non-admin users.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event announced", body = AcademyEvent),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    payload: web::Json<CreateEventRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    if request.title.trim().is_empty() {
        return Err(Error::invalid_request("event title must not be empty"));
    }
    let event = state
        .events
        .create(NewAcademyEvent {
            title: request.title.trim().to_owned(),
            description: request.description,
            starts_at: request.starts_at,
        })
        .await
        .map_err(map_record_error)?;

    state.notify(
        DomainEvent::EventAnnounced {
            title: event.title.clone(),
            description: event.description.clone(),
            starts_at: event.starts_at,
        },
        RecipientSelector::Broadcast,
    );

    Ok(HttpResponse::Created().json(event))
}

/// List announced events.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    responses(
        (status = 200, description = "Events", body = [AcademyEvent]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["events"],
    operation_id = "listEvents"
)]
#[get("/events")]
pub async fn list_events(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<AcademyEvent>>> {
    let events = state.events.list().await.map_err(map_record_error)?;
    Ok(web::Json(events))
}
