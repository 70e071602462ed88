//! Notice publication handlers.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::Error;
use crate::domain::academy::NoticeRecord;
use crate::domain::events::DomainEvent;
use crate::domain::ports::{NewNotice, RecordStoreError};
use crate::domain::user::RecipientSelector;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Notice body for `POST /api/v1/notices`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoticeRequest {
    /// Headline.
    pub title: String,
    /// Body text.
    pub body: String,
}

pub(crate) fn map_record_error(error: RecordStoreError) -> Error {
    match error {
        RecordStoreError::Connection { message } => Error::service_unavailable(message),
        RecordStoreError::Query { message } => Error::internal(message),
    }
}

/// Publish a notice and broadcast it to all active non-admin users.
#[utoipa::path(
    post,
    path = "/api/v1/notices",
    request_body = CreateNoticeRequest,
    responses(
        (status = 201, description = "Notice published", body = NoticeRecord),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notices"],
    operation_id = "createNotice"
)]
#[post("/notices")]
pub async fn create_notice(
    state: web::Data<HttpState>,
    payload: web::Json<CreateNoticeRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    if request.title.trim().is_empty() {
        return Err(Error::invalid_request("notice title must not be empty"));
    }
    let notice = state
        .notices
        .create(NewNotice {
            title: request.title.trim().to_owned(),
            body: request.body,
        })
        .await
        .map_err(map_record_error)?;

    state.notify(
        DomainEvent::Notice {
            title: notice.title.clone(),
            body: notice.body.clone(),
        },
        RecipientSelector::Broadcast,
    );

    Ok(HttpResponse::Created().json(notice))
}

/// List published notices.
#[utoipa::path(
    get,
    path = "/api/v1/notices",
    responses(
        (status = 200, description = "Notices", body = [NoticeRecord]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notices"],
    operation_id = "listNotices"
)]
#[get("/notices")]
pub async fn list_notices(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<NoticeRecord>>> {
    let notices = state.notices.list().await.map_err(map_record_error)?;
    Ok(web::Json(notices))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test as actix_test, web};

    use super::*;
    use crate::inbound::http::test_utils::TestHarness;

    #[actix_web::test]
    async fn publishing_broadcasts_to_non_admins() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state.clone()))
                .service(web::scope("/api/v1").service(create_notice)),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/notices")
                .set_json(serde_json::json!({
                    "title": "Diwali break",
                    "body": "The academy is closed next week.",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let requests = harness.queue.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].recipients, RecipientSelector::Broadcast);
    }
}
