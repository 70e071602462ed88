//! Demo-booking handlers.
//!
//! Prospects booking a demo class have no account yet, so status updates
//! reach them over email only (an external recipient); creating a booking
//! notifies nobody.

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::Error;
use crate::domain::academy::{DemoBooking, DemoStatus};
use crate::domain::events::DomainEvent;
use crate::domain::ports::{DemoBookingStoreError, NewDemoBooking};
use crate::domain::user::RecipientSelector;
use crate::inbound::http::ApiResult;
use crate::inbound::http::courses::map_course_error;
use crate::inbound::http::state::HttpState;

/// Booking body for `POST /api/v1/demo-bookings`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDemoBookingRequest {
    /// Prospect name.
    pub name: String,
    /// Prospect email.
    pub email: String,
    /// Course to demo.
    pub course_id: i32,
}

/// Status update body for `PUT /api/v1/demo-bookings/{id}`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDemoBookingRequest {
    /// New lifecycle status.
    pub status: DemoStatus,
    /// Agreed slot, usually set together with confirmation.
    pub scheduled_at: Option<DateTime<Utc>>,
}

fn map_booking_error(error: DemoBookingStoreError) -> Error {
    match error {
        DemoBookingStoreError::Connection { message } => Error::service_unavailable(message),
        DemoBookingStoreError::Query { message } => Error::internal(message),
        DemoBookingStoreError::NotFound { id } => {
            Error::not_found(format!("demo booking {id} not found"))
        }
    }
}

/// Book a demo class.
#[utoipa::path(
    post,
    path = "/api/v1/demo-bookings",
    request_body = CreateDemoBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = DemoBooking),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["demo-bookings"],
    operation_id = "createDemoBooking"
)]
#[post("/demo-bookings")]
pub async fn create_demo_booking(
    state: web::Data<HttpState>,
    payload: web::Json<CreateDemoBookingRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    if request.name.trim().is_empty() {
        return Err(Error::invalid_request("name must not be empty"));
    }
    if !request.email.contains('@') {
        return Err(Error::invalid_request("a valid email is required"));
    }
    let booking = state
        .demo_bookings
        .create(NewDemoBooking {
            name: request.name.trim().to_owned(),
            email: request.email.trim().to_owned(),
            course_id: request.course_id,
        })
        .await
        .map_err(map_booking_error)?;
    Ok(HttpResponse::Created().json(booking))
}

/// Update a booking's status, notifying the prospect on actioned states.
#[utoipa::path(
    put,
    path = "/api/v1/demo-bookings/{id}",
    request_body = UpdateDemoBookingRequest,
    params(("id" = i32, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking updated", body = DemoBooking),
        (status = 404, description = "Booking not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["demo-bookings"],
    operation_id = "updateDemoBooking"
)]
#[put("/demo-bookings/{id}")]
pub async fn update_demo_booking(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateDemoBookingRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let change = state
        .demo_bookings
        .update_status(path.into_inner(), request.status, request.scheduled_at)
        .await
        .map_err(map_booking_error)?;

    let status_changed = change.previous_status != change.booking.status;
    if let Some(outcome) = change.booking.status.outcome() {
        if status_changed {
            let course_name = state
                .courses
                .find(change.booking.course_id)
                .await
                .map_err(map_course_error)?
                .map(|course| course.name)
                .unwrap_or_else(|| "your chosen course".to_owned());
            state.notify(
                DomainEvent::DemoStatusChanged {
                    outcome,
                    course_name,
                },
                RecipientSelector::External {
                    name: change.booking.name.clone(),
                    email: change.booking.email.clone(),
                },
            );
        }
    }

    Ok(HttpResponse::Ok().json(change.booking))
}

/// List all bookings.
#[utoipa::path(
    get,
    path = "/api/v1/demo-bookings",
    responses(
        (status = 200, description = "Bookings", body = [DemoBooking]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["demo-bookings"],
    operation_id = "listDemoBookings"
)]
#[get("/demo-bookings")]
pub async fn list_demo_bookings(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<DemoBooking>>> {
    let bookings = state
        .demo_bookings
        .list()
        .await
        .map_err(map_booking_error)?;
    Ok(web::Json(bookings))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test as actix_test, web};
    use rstest::rstest;

    use super::*;
    use crate::domain::events::DemoOutcome;
    use crate::inbound::http::test_utils::TestHarness;

    fn test_app(
        harness: &TestHarness,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(harness.state.clone()))
            .service(
                web::scope("/api/v1")
                    .service(create_demo_booking)
                    .service(update_demo_booking),
            )
    }

    async fn book<S, B>(app: &S)
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse<B>,
                Error = actix_web::Error,
            >,
        B: actix_web::body::MessageBody,
    {
        let res = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/demo-bookings")
                .set_json(serde_json::json!({
                    "name": "Prospect P",
                    "email": "prospect@example.com",
                    "courseId": 1,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn creating_a_booking_notifies_nobody() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(test_app(&harness)).await;
        book(&app).await;
        assert!(harness.queue.requests().is_empty());
    }

    #[rstest]
    #[case("confirmed", DemoOutcome::Confirmed)]
    #[case("cancelled", DemoOutcome::Cancelled)]
    #[case("completed", DemoOutcome::Completed)]
    #[actix_web::test]
    async fn actioned_statuses_notify_the_prospect_externally(
        #[case] status: &str,
        #[case] expected: DemoOutcome,
    ) {
        let harness = TestHarness::new();
        let app = actix_test::init_service(test_app(&harness)).await;
        book(&app).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/demo-bookings/1")
                .set_json(serde_json::json!({ "status": status }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let requests = harness.queue.requests();
        assert_eq!(requests.len(), 1);
        match &requests[0].event {
            DomainEvent::DemoStatusChanged { outcome, .. } => assert_eq!(*outcome, expected),
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(
            requests[0].recipients,
            RecipientSelector::External {
                name: "Prospect P".to_owned(),
                email: "prospect@example.com".to_owned(),
            }
        );
    }

    #[actix_web::test]
    async fn repeating_the_same_status_sends_nothing_new() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(test_app(&harness)).await;
        book(&app).await;

        for _ in 0..2 {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::put()
                    .uri("/api/v1/demo-bookings/1")
                    .set_json(serde_json::json!({ "status": "confirmed" }))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK);
        }

        assert_eq!(harness.queue.requests().len(), 1);
    }
}
