//! FCM HTTP v1 adapter for the `PushGateway` port.
//!
//! The port exposes multicast semantics; the v1 API accepts one token per
//! request, so a multicast fans out into per-token requests issued
//! concurrently and collected into one index-aligned outcome. Tokens the
//! provider reports as gone or invalid are flagged so the fan-out can
//! soft-deactivate them.

mod oauth;

use async_trait::async_trait;
use futures_util::future::join_all;
use serde_json::{Value, json};
use tracing::warn;

use crate::domain::ports::{
    MulticastOutcome, PushDeliveryError, PushGateway, PushMessage, PushSendError, TokenDelivery,
};

pub use oauth::{OauthTokenSource, ServiceAccountKey};

/// Android notification channel the mobile app registers at install time.
const ANDROID_CHANNEL_ID: &str = "atelier_notifications";

/// FCM HTTP v1 implementation of the `PushGateway` port.
pub struct FcmPushGateway {
    http: reqwest::Client,
    tokens: OauthTokenSource,
    endpoint: String,
}

impl FcmPushGateway {
    /// Build a gateway from a parsed service-account key.
    ///
    /// # Errors
    ///
    /// Returns `PushSendError::Auth` when the key's private key is
    /// malformed.
    pub fn new(key: ServiceAccountKey) -> Result<Self, PushSendError> {
        let http = reqwest::Client::new();
        let tokens = OauthTokenSource::new(http.clone(), key)?;
        let endpoint = format!(
            "https://fcm.googleapis.com/v1/projects/{}/messages:send",
            tokens.project_id()
        );
        Ok(Self {
            http,
            tokens,
            endpoint,
        })
    }

    /// Resolve credentials from the environment.
    ///
    /// `FIREBASE_SERVICE_ACCOUNT_JSON` (inline JSON) takes precedence over
    /// `GOOGLE_APPLICATION_CREDENTIALS` (a file path). Returns `None` when
    /// neither is set or the credentials are unusable — push is then
    /// disabled for the process lifetime, which callers log at startup.
    pub fn from_env() -> Option<Self> {
        let raw = match std::env::var("FIREBASE_SERVICE_ACCOUNT_JSON") {
            Ok(inline) => inline,
            Err(_) => {
                let path = std::env::var("GOOGLE_APPLICATION_CREDENTIALS").ok()?;
                match std::fs::read_to_string(&path) {
                    Ok(contents) => contents,
                    Err(err) => {
                        warn!(path, error = %err, "failed to read push credentials file");
                        return None;
                    }
                }
            }
        };
        let key: ServiceAccountKey = match serde_json::from_str(&raw) {
            Ok(key) => key,
            Err(err) => {
                warn!(error = %err, "malformed push service account credentials");
                return None;
            }
        };
        match Self::new(key) {
            Ok(gateway) => Some(gateway),
            Err(err) => {
                warn!(error = %err, "push gateway construction failed");
                None
            }
        }
    }

    fn message_body(token: &str, message: &PushMessage) -> Value {
        json!({
            "message": {
                "token": token,
                "notification": {
                    "title": message.title,
                    "body": message.body,
                },
                "android": {
                    "priority": "HIGH",
                    "notification": {
                        "sound": "default",
                        "channel_id": ANDROID_CHANNEL_ID,
                    },
                },
                "apns": {
                    "payload": {
                        "aps": {
                            "sound": "default",
                            "badge": 1,
                        },
                    },
                },
            }
        })
    }

    async fn send_one(&self, bearer: &str, token: &str, message: &PushMessage) -> TokenDelivery {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(bearer)
            .json(&Self::message_body(token, message))
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => TokenDelivery {
                success: true,
                error: None,
            },
            Ok(response) => {
                let status = response.status();
                let body: Value = response.json().await.unwrap_or(Value::Null);
                TokenDelivery {
                    success: false,
                    error: Some(classify_fcm_error(status.as_u16(), &body)),
                }
            }
            Err(err) => TokenDelivery {
                success: false,
                error: Some(PushDeliveryError::Provider {
                    message: err.to_string(),
                }),
            },
        }
    }
}

/// Map an FCM v1 error response onto the port's delivery error.
///
/// The v1 API reports dead registrations as `UNREGISTERED` (HTTP 404) and
/// structurally invalid tokens as `INVALID_ARGUMENT` (HTTP 400).
fn classify_fcm_error(status: u16, body: &Value) -> PushDeliveryError {
    let error_code = body
        .get("error")
        .and_then(|error| error.get("details"))
        .and_then(Value::as_array)
        .and_then(|details| {
            details
                .iter()
                .find_map(|detail| detail.get("errorCode").and_then(Value::as_str))
        });
    let rpc_status = body
        .get("error")
        .and_then(|error| error.get("status"))
        .and_then(Value::as_str);

    match (status, error_code, rpc_status) {
        (_, Some("UNREGISTERED"), _) | (404, _, _) | (_, _, Some("NOT_FOUND")) => {
            PushDeliveryError::Unregistered
        }
        (400, _, _) | (_, _, Some("INVALID_ARGUMENT")) => PushDeliveryError::InvalidToken,
        _ => PushDeliveryError::Provider {
            message: rpc_status
                .map(str::to_owned)
                .unwrap_or_else(|| format!("http status {status}")),
        },
    }
}

#[async_trait]
impl PushGateway for FcmPushGateway {
    async fn send_multicast(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<MulticastOutcome, PushSendError> {
        let bearer = self.tokens.bearer().await?;
        let deliveries = join_all(
            tokens
                .iter()
                .map(|token| self.send_one(&bearer, token, message)),
        )
        .await;
        Ok(MulticastOutcome { deliveries })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(404, json!({"error": {"status": "NOT_FOUND"}}), PushDeliveryError::Unregistered)]
    #[case(
        400,
        json!({"error": {"status": "INVALID_ARGUMENT"}}),
        PushDeliveryError::InvalidToken
    )]
    #[case(
        400,
        json!({"error": {"status": "INVALID_ARGUMENT", "details": [
            {"@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
             "errorCode": "UNREGISTERED"}
        ]}}),
        PushDeliveryError::Unregistered
    )]
    #[case(
        500,
        json!({"error": {"status": "INTERNAL"}}),
        PushDeliveryError::Provider { message: "INTERNAL".to_owned() }
    )]
    #[case(
        503,
        json!(null),
        PushDeliveryError::Provider { message: "http status 503".to_owned() }
    )]
    fn fcm_errors_classify_by_status_and_code(
        #[case] status: u16,
        #[case] body: serde_json::Value,
        #[case] expected: PushDeliveryError,
    ) {
        assert_eq!(classify_fcm_error(status, &body), expected);
    }

    #[test]
    fn message_body_shapes_android_and_apns_payloads() {
        let body = FcmPushGateway::message_body(
            "tok-1",
            &PushMessage {
                title: "Exam graded".to_owned(),
                body: "Charcoal I: A".to_owned(),
            },
        );
        assert_eq!(body["message"]["token"], "tok-1");
        assert_eq!(body["message"]["android"]["priority"], "HIGH");
        assert_eq!(
            body["message"]["android"]["notification"]["channel_id"],
            ANDROID_CHANNEL_ID
        );
        assert_eq!(body["message"]["apns"]["payload"]["aps"]["badge"], 1);
    }
}
