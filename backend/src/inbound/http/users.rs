//! Account registration and listing handlers.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::events::DomainEvent;
use crate::domain::ports::{NewUser, UserStoreError};
use crate::domain::user::{RecipientSelector, Role, User};
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Chosen password; stored only as a bcrypt hash.
    pub password: String,
    /// Optional role; defaults to student.
    pub role: Option<Role>,
}

fn map_user_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => Error::service_unavailable(message),
        UserStoreError::Query { message } => Error::internal(message),
        UserStoreError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
        }
    }
}

/// Register a new account.
///
/// The response is decided solely by the account insert; the welcome email
/// to the new user and the alert to administrators are fired-and-forgotten
/// afterwards.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    if request.name.trim().is_empty() {
        return Err(Error::invalid_request("name must not be empty"));
    }
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(Error::invalid_request("a valid email is required"));
    }
    if request.password.len() < 8 {
        return Err(Error::invalid_request(
            "password must be at least 8 characters",
        ));
    }

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;

    let user = state
        .users
        .create(NewUser {
            name: request.name.trim().to_owned(),
            email: request.email.trim().to_owned(),
            password_hash,
            role: request.role.unwrap_or(Role::Student),
        })
        .await
        .map_err(map_user_error)?;

    state.notify(
        DomainEvent::Welcome {
            student_name: user.name.clone(),
        },
        RecipientSelector::Ids(vec![user.id]),
    );
    state.notify(
        DomainEvent::RegistrationAlert {
            student_name: user.name.clone(),
            student_email: user.email.clone(),
        },
        RecipientSelector::Role(Role::Admin),
    );

    Ok(HttpResponse::Created().json(user))
}

/// List active accounts.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Active users", body = [User]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.users.list_active().await.map_err(map_user_error)?;
    Ok(web::Json(users))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test as actix_test, web};
    use rstest::rstest;

    use super::*;
    use crate::inbound::http::test_utils::TestHarness;

    fn body(password: &str, email: &str) -> serde_json::Value {
        serde_json::json!({
            "name": "Mira Kapoor",
            "email": email,
            "password": password,
        })
    }

    #[rstest]
    #[case("short", "mira@example.com")]
    #[case("long-enough", "not-an-email")]
    #[actix_web::test]
    async fn register_rejects_invalid_payloads(#[case] password: &str, #[case] email: &str) {
        let harness = TestHarness::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state.clone()))
                .service(web::scope("/api/v1").service(register)),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(body(password, email))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(harness.queue.requests().is_empty());
    }

    #[actix_web::test]
    async fn register_creates_account_and_fans_out_two_events() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state.clone()))
                .service(web::scope("/api/v1").service(register)),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(body("long-enough", "mira@example.com"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let requests = harness.queue.requests();
        assert_eq!(requests.len(), 2);
        assert!(matches!(requests[0].event, DomainEvent::Welcome { .. }));
        assert!(matches!(
            requests[1].event,
            DomainEvent::RegistrationAlert { .. }
        ));
        assert_eq!(
            requests[1].recipients,
            RecipientSelector::Role(Role::Admin)
        );
    }

    #[actix_web::test]
    async fn duplicate_email_maps_to_conflict() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state.clone()))
                .service(web::scope("/api/v1").service(register)),
        )
        .await;

        for _ in 0..2 {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/register")
                    .set_json(body("long-enough", "mira@example.com"))
                    .to_request(),
            )
            .await;
            if res.status() == StatusCode::CREATED {
                continue;
            }
            assert_eq!(res.status(), StatusCode::CONFLICT);
            return;
        }
        panic!("second registration should have conflicted");
    }
}
