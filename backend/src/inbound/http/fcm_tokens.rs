//! FCM device-token registration handlers.

use actix_web::{HttpResponse, delete, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::Error;
use crate::domain::ports::PushTokenStoreError;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/v1/fcm-tokens`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTokenRequest {
    /// Owning user.
    pub user_id: i32,
    /// Provider-issued device token.
    pub fcm_token: String,
    /// Reporting platform; defaults to android.
    pub device_type: Option<String>,
}

/// Deactivation body for `DELETE /api/v1/fcm-tokens`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateTokenRequest {
    /// Owning user.
    pub user_id: i32,
    /// Token to soft-deactivate.
    pub fcm_token: String,
}

fn map_token_error(error: PushTokenStoreError) -> Error {
    match error {
        PushTokenStoreError::Connection { message } => Error::service_unavailable(message),
        PushTokenStoreError::Query { message } => Error::internal(message),
    }
}

/// Register a device token, reactivating it when already known.
#[utoipa::path(
    post,
    path = "/api/v1/fcm-tokens",
    request_body = RegisterTokenRequest,
    responses(
        (status = 200, description = "Token registered"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["fcm-tokens"],
    operation_id = "registerFcmToken"
)]
#[post("/fcm-tokens")]
pub async fn register_token(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterTokenRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    if request.fcm_token.trim().is_empty() {
        return Err(Error::invalid_request("fcm token must not be empty"));
    }
    let device_type = request.device_type.unwrap_or_else(|| "android".to_owned());
    state
        .push_tokens
        .upsert(request.user_id, request.fcm_token.trim(), &device_type)
        .await
        .map_err(map_token_error)?;
    Ok(HttpResponse::Ok().json(json!({ "registered": true })))
}

/// Soft-deactivate a device token.
#[utoipa::path(
    delete,
    path = "/api/v1/fcm-tokens",
    request_body = DeactivateTokenRequest,
    responses(
        (status = 200, description = "Token deactivated (or was already unknown)"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["fcm-tokens"],
    operation_id = "deactivateFcmToken"
)]
#[delete("/fcm-tokens")]
pub async fn deactivate_token(
    state: web::Data<HttpState>,
    payload: web::Json<DeactivateTokenRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let deactivated = state
        .push_tokens
        .deactivate(request.user_id, &request.fcm_token)
        .await
        .map_err(map_token_error)?;
    Ok(HttpResponse::Ok().json(json!({ "deactivated": deactivated })))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test as actix_test, web};

    use super::*;
    use crate::inbound::http::test_utils::TestHarness;

    #[actix_web::test]
    async fn register_reactivates_a_deactivated_token() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state.clone()))
                .service(
                    web::scope("/api/v1")
                        .service(register_token)
                        .service(deactivate_token),
                ),
        )
        .await;

        let register = serde_json::json!({
            "userId": 3,
            "fcmToken": "tok-a",
            "deviceType": "ios",
        });
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/fcm-tokens")
                .set_json(&register)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/v1/fcm-tokens")
                .set_json(serde_json::json!({ "userId": 3, "fcmToken": "tok-a" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            harness.push_tokens.rows(),
            vec![(3, "tok-a".to_owned(), "ios".to_owned(), false)]
        );

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/fcm-tokens")
                .set_json(&register)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            harness.push_tokens.rows(),
            vec![(3, "tok-a".to_owned(), "ios".to_owned(), true)]
        );
    }
}
