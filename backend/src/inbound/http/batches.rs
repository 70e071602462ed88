//! Batch management handlers.
//!
//! Allocation notifications go only to students who are new to the batch:
//! creation notifies the whole initial list, updates notify the set
//! difference against the previous list.

use actix_web::{HttpResponse, get, post, put, web};
use serde::Deserialize;

use crate::domain::Error;
use crate::domain::academy::Batch;
use crate::domain::events::DomainEvent;
use crate::domain::ports::{BatchStoreError, BatchUpdate, NewBatch};
use crate::domain::user::RecipientSelector;
use crate::inbound::http::ApiResult;
use crate::inbound::http::courses::map_course_error;
use crate::inbound::http::state::HttpState;

/// Batch creation body for `POST /api/v1/batches`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchRequest {
    /// Display name.
    pub name: String,
    /// Owning course.
    pub course_id: i32,
    /// Human-readable schedule line.
    #[serde(default)]
    pub schedule: String,
    /// Initially enrolled students.
    #[serde(default)]
    pub student_ids: Vec<i32>,
}

/// Batch update body for `PUT /api/v1/batches/{id}`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBatchRequest {
    /// New display name, when present.
    pub name: Option<String>,
    /// New schedule line, when present.
    pub schedule: Option<String>,
    /// Replacement student list, when present.
    pub student_ids: Option<Vec<i32>>,
}

fn map_batch_error(error: BatchStoreError) -> Error {
    match error {
        BatchStoreError::Connection { message } => Error::service_unavailable(message),
        BatchStoreError::Query { message } => Error::internal(message),
        BatchStoreError::NotFound { id } => Error::not_found(format!("batch {id} not found")),
    }
}

/// Students present in `current` but not in `previous`.
fn newly_added(previous: &[i32], current: &[i32]) -> Vec<i32> {
    current
        .iter()
        .filter(|id| !previous.contains(id))
        .copied()
        .collect()
}

async fn allocation_event(state: &HttpState, batch: &Batch) -> ApiResult<DomainEvent> {
    let course_name = state
        .courses
        .find(batch.course_id)
        .await
        .map_err(map_course_error)?
        .map(|course| course.name)
        .unwrap_or_else(|| format!("course {}", batch.course_id));
    Ok(DomainEvent::BatchAllocation {
        batch_name: batch.name.clone(),
        course_name,
        schedule: batch.schedule.clone(),
    })
}

/// Create a batch and notify its initial students.
#[utoipa::path(
    post,
    path = "/api/v1/batches",
    request_body = CreateBatchRequest,
    responses(
        (status = 201, description = "Batch created", body = Batch),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["batches"],
    operation_id = "createBatch"
)]
#[post("/batches")]
pub async fn create_batch(
    state: web::Data<HttpState>,
    payload: web::Json<CreateBatchRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    if request.name.trim().is_empty() {
        return Err(Error::invalid_request("batch name must not be empty"));
    }
    let batch = state
        .batches
        .create(NewBatch {
            name: request.name.trim().to_owned(),
            course_id: request.course_id,
            schedule: request.schedule,
            student_ids: request.student_ids,
        })
        .await
        .map_err(map_batch_error)?;

    if !batch.student_ids.is_empty() {
        let event = allocation_event(&state, &batch).await?;
        state.notify(event, RecipientSelector::Ids(batch.student_ids.clone()));
    }
    Ok(HttpResponse::Created().json(batch))
}

/// Update a batch and notify only newly added students.
#[utoipa::path(
    put,
    path = "/api/v1/batches/{id}",
    request_body = UpdateBatchRequest,
    params(("id" = i32, Path, description = "Batch id")),
    responses(
        (status = 200, description = "Batch updated", body = Batch),
        (status = 404, description = "Batch not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["batches"],
    operation_id = "updateBatch"
)]
#[put("/batches/{id}")]
pub async fn update_batch(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateBatchRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let change = state
        .batches
        .update(
            path.into_inner(),
            BatchUpdate {
                name: request.name,
                schedule: request.schedule,
                student_ids: request.student_ids,
            },
        )
        .await
        .map_err(map_batch_error)?;

    let added = newly_added(&change.previous_student_ids, &change.batch.student_ids);
    if !added.is_empty() {
        let event = allocation_event(&state, &change.batch).await?;
        state.notify(event, RecipientSelector::Ids(added));
    }
    Ok(HttpResponse::Ok().json(change.batch))
}

/// List all batches.
#[utoipa::path(
    get,
    path = "/api/v1/batches",
    responses(
        (status = 200, description = "Batches", body = [Batch]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["batches"],
    operation_id = "listBatches"
)]
#[get("/batches")]
pub async fn list_batches(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Batch>>> {
    let batches = state.batches.list().await.map_err(map_batch_error)?;
    Ok(web::Json(batches))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test as actix_test, web};
    use rstest::rstest;

    use super::*;
    use crate::inbound::http::test_utils::TestHarness;

    #[rstest]
    #[case(&[], &[1, 2], &[1, 2])]
    #[case(&[1, 2], &[1, 2, 3], &[3])]
    #[case(&[1, 2], &[1, 2], &[])]
    #[case(&[1, 2], &[2], &[])]
    #[case(&[1, 2], &[3, 1], &[3])]
    fn newly_added_is_a_set_difference(
        #[case] previous: &[i32],
        #[case] current: &[i32],
        #[case] expected: &[i32],
    ) {
        assert_eq!(newly_added(previous, current), expected);
    }

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
                    .service(create_batch)
                    .service(update_batch),
            )
    }

    #[actix_web::test]
    async fn updating_students_notifies_only_the_added_one() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(test_app(&harness)).await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/batches")
                .set_json(serde_json::json!({
                    "name": "Evening Watercolour A",
                    "courseId": 1,
                    "schedule": "Mon/Wed 18:00",
                    "studentIds": [1, 2],
                }))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);

        let updated = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/batches/1")
                .set_json(serde_json::json!({ "studentIds": [1, 2, 3] }))
                .to_request(),
        )
        .await;
        assert_eq!(updated.status(), StatusCode::OK);

        let requests = harness.queue.requests();
        assert_eq!(requests.len(), 2, "one per create, one per update");
        assert_eq!(requests[0].recipients, RecipientSelector::Ids(vec![1, 2]));
        assert_eq!(requests[1].recipients, RecipientSelector::Ids(vec![3]));
    }

    #[actix_web::test]
    async fn unchanged_student_list_sends_nothing() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(test_app(&harness)).await;

        let _ = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/batches")
                .set_json(serde_json::json!({
                    "name": "Evening Watercolour A",
                    "courseId": 1,
                    "studentIds": [1, 2],
                }))
                .to_request(),
        )
        .await;
        let before = harness.queue.requests().len();

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/batches/1")
                .set_json(serde_json::json!({ "name": "Evening Watercolour B" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(harness.queue.requests().len(), before);
    }
}
