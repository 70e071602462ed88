//! Course catalogue handlers.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::Error;
use crate::domain::academy::Course;
use crate::domain::ports::{CourseStoreError, NewCourse};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Course creation body for `POST /api/v1/courses`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    /// Display name.
    pub name: String,
    /// Marketing description.
    #[serde(default)]
    pub description: String,
    /// Monthly fee in the smallest currency unit.
    pub monthly_fee_cents: i64,
}

pub(crate) fn map_course_error(error: CourseStoreError) -> Error {
    match error {
        CourseStoreError::Connection { message } => Error::service_unavailable(message),
        CourseStoreError::Query { message } => Error::internal(message),
        CourseStoreError::NotFound { id } => Error::not_found(format!("course {id} not found")),
    }
}

/// Create a course.
#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["courses"],
    operation_id = "createCourse"
)]
#[post("/courses")]
pub async fn create_course(
    state: web::Data<HttpState>,
    payload: web::Json<CreateCourseRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    if request.name.trim().is_empty() {
        return Err(Error::invalid_request("course name must not be empty"));
    }
    if request.monthly_fee_cents < 0 {
        return Err(Error::invalid_request("monthly fee must not be negative"));
    }
    let course = state
        .courses
        .create(NewCourse {
            name: request.name.trim().to_owned(),
            description: request.description,
            monthly_fee_cents: request.monthly_fee_cents,
        })
        .await
        .map_err(map_course_error)?;
    Ok(HttpResponse::Created().json(course))
}

/// List all courses.
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    responses(
        (status = 200, description = "Courses", body = [Course]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["courses"],
    operation_id = "listCourses"
)]
#[get("/courses")]
pub async fn list_courses(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Course>>> {
    let courses = state.courses.list().await.map_err(map_course_error)?;
    Ok(web::Json(courses))
}
