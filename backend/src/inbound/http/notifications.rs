//! In-app notification read endpoints.
//!
//! Rows are written by the fan-out worker; these handlers only read and
//! mark them.

use actix_web::{HttpResponse, get, put, web};
use serde_json::json;

use crate::domain::Error;
use crate::domain::notification::InAppNotification;
use crate::domain::ports::NotificationStoreError;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

fn map_notification_error(error: NotificationStoreError) -> Error {
    match error {
        NotificationStoreError::Connection { message } => Error::service_unavailable(message),
        NotificationStoreError::Query { message } => Error::internal(message),
    }
}

/// List a user's notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/notifications",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Notifications", body = [InAppNotification]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/users/{id}/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<InAppNotification>>> {
    let rows = state
        .notifications
        .list_for_user(path.into_inner())
        .await
        .map_err(map_notification_error)?;
    Ok(web::Json(rows))
}

/// Mark one notification read.
#[utoipa::path(
    put,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = i32, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked read"),
        (status = 404, description = "Notification not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[put("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let updated = state
        .notifications
        .mark_read(id)
        .await
        .map_err(map_notification_error)?;
    if updated {
        Ok(HttpResponse::Ok().json(json!({ "read": true })))
    } else {
        Err(Error::not_found(format!("notification {id} not found")))
    }
}

/// Mark all of a user's notifications read.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/notifications/read-all",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "All marked read"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markAllNotificationsRead"
)]
#[put("/users/{id}/notifications/read-all")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let updated = state
        .notifications
        .mark_all_read(path.into_inner())
        .await
        .map_err(map_notification_error)?;
    Ok(HttpResponse::Ok().json(json!({ "updated": updated })))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test as actix_test, web};

    use super::*;
    use crate::domain::notification::NotificationKind;
    use crate::domain::ports::{NewInAppNotification, NotificationRepository};
    use crate::inbound::http::test_utils::TestHarness;

    #[actix_web::test]
    async fn read_endpoints_cover_single_and_bulk_marking() {
        let harness = TestHarness::new();
        for title in ["one", "two"] {
            harness
                .notifications
                .insert(NewInAppNotification {
                    user_id: 9,
                    title: title.to_owned(),
                    message: "m".to_owned(),
                    kind: NotificationKind::Info,
                })
                .await
                .expect("insert succeeds");
        }

        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state.clone()))
                .service(
                    web::scope("/api/v1")
                        .service(list_notifications)
                        .service(mark_read)
                        .service(mark_all_read),
                ),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/notifications/1/read")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/notifications/99/read")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/users/9/notifications/read-all")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Vec<InAppNotification> = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/9/notifications")
                .to_request(),
        )
        .await;
        assert_eq!(body.len(), 2);
        assert!(body.iter().all(|row| row.is_read));
    }
}
