//! Shared study-material handlers.

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;

use crate::domain::Error;
use crate::domain::academy::BookMaterial;
use crate::domain::events::DomainEvent;
use crate::domain::ports::NewBookMaterial;
use crate::domain::user::{RecipientSelector, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::notices::map_record_error;
use crate::inbound::http::state::HttpState;

/// Material body for `POST /api/v1/book-materials`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareMaterialRequest {
    /// Material title.
    pub title: String,
    /// Author or source.
    #[serde(default)]
    pub author: String,
    /// Owning course.
    pub course_id: i32,
    /// Students to notify; all active students when omitted.
    #[serde(default)]
    pub student_ids: Vec<i32>,
}

/// Share a material and notify the selected students.
#[utoipa::path(
    post,
    path = "/api/v1/book-materials",
    request_body = ShareMaterialRequest,
    responses(
        (status = 201, description = "Material shared", body = BookMaterial),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["materials"],
    operation_id = "shareMaterial"
)]
#[post("/book-materials")]
pub async fn share_material(
    state: web::Data<HttpState>,
    payload: web::Json<ShareMaterialRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    if request.title.trim().is_empty() {
        return Err(Error::invalid_request("material title must not be empty"));
    }
    let material = state
        .materials
        .create(NewBookMaterial {
            title: request.title.trim().to_owned(),
            author: request.author,
            course_id: request.course_id,
        })
        .await
        .map_err(map_record_error)?;

    let recipients = if request.student_ids.is_empty() {
        RecipientSelector::Role(Role::Student)
    } else {
        RecipientSelector::Ids(request.student_ids)
    };
    state.notify(
        DomainEvent::MaterialShared {
            title: material.title.clone(),
            author: material.author.clone(),
        },
        recipients,
    );

    Ok(HttpResponse::Created().json(material))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test as actix_test, web};

    use super::*;
    use crate::inbound::http::test_utils::TestHarness;

    #[actix_web::test]
    async fn explicit_student_lists_win_over_the_role_default() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state.clone()))
                .service(web::scope("/api/v1").service(share_material)),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/book-materials")
                .set_json(serde_json::json!({
                    "title": "Colour and Light",
                    "author": "J. Gurney",
                    "courseId": 1,
                    "studentIds": [5, 6],
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let requests = harness.queue.requests();
        assert_eq!(requests[0].recipients, RecipientSelector::Ids(vec![5, 6]));

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/book-materials")
                .set_json(serde_json::json!({
                    "title": "Perspective Made Easy",
                    "courseId": 1,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let requests = harness.queue.requests();
        assert_eq!(
            requests[1].recipients,
            RecipientSelector::Role(Role::Student)
        );
    }
}
