//! Exam grading handlers.

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;

use crate::domain::Error;
use crate::domain::academy::ExamGrade;
use crate::domain::events::DomainEvent;
use crate::domain::ports::NewExamGrade;
use crate::domain::user::RecipientSelector;
use crate::inbound::http::ApiResult;
use crate::inbound::http::notices::map_record_error;
use crate::inbound::http::state::HttpState;

/// Grade body for `POST /api/v1/grade-exams`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeExamRequest {
    /// Graded student.
    pub student_id: i32,
    /// Exam display name.
    pub exam_name: String,
    /// Awarded grade.
    pub grade: String,
    /// Optional examiner remarks.
    pub remarks: Option<String>,
}

/// Record a grade and notify the student.
#[utoipa::path(
    post,
    path = "/api/v1/grade-exams",
    request_body = GradeExamRequest,
    responses(
        (status = 201, description = "Grade recorded", body = ExamGrade),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["exams"],
    operation_id = "gradeExam"
)]
#[post("/grade-exams")]
pub async fn grade_exam(
    state: web::Data<HttpState>,
    payload: web::Json<GradeExamRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    if request.exam_name.trim().is_empty() || request.grade.trim().is_empty() {
        return Err(Error::invalid_request("exam name and grade are required"));
    }
    let grade = state
        .exam_grades
        .create(NewExamGrade {
            student_id: request.student_id,
            exam_name: request.exam_name.trim().to_owned(),
            grade: request.grade.trim().to_owned(),
            remarks: request.remarks,
        })
        .await
        .map_err(map_record_error)?;

    state.notify(
        DomainEvent::ExamGraded {
            exam_name: grade.exam_name.clone(),
            grade: grade.grade.clone(),
        },
        RecipientSelector::Ids(vec![grade.student_id]),
    );

    Ok(HttpResponse::Created().json(grade))
}
