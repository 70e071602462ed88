//! Invoice handlers.
//!
//! A payment confirmation is sent exactly on the transition into `paid`:
//! creating an invoice as `pending` sends only the issuance notice, and
//! re-submitting `paid` for an already-paid invoice sends nothing.

use actix_web::{HttpResponse, get, post, put, web};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::Error;
use crate::domain::academy::{Invoice, InvoiceStatus};
use crate::domain::events::DomainEvent;
use crate::domain::ports::{InvoiceStoreError, NewInvoice};
use crate::domain::user::RecipientSelector;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Invoice creation body for `POST /api/v1/invoices`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    /// Billed student.
    pub student_id: i32,
    /// Amount in the smallest currency unit.
    pub amount_cents: i64,
    /// Initial status; defaults to pending.
    pub status: Option<InvoiceStatus>,
    /// Optional due date.
    pub due_on: Option<NaiveDate>,
}

/// Invoice update body for `PUT /api/v1/invoices/{id}`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceRequest {
    /// New payment status.
    pub status: InvoiceStatus,
}

fn map_invoice_error(error: InvoiceStoreError) -> Error {
    match error {
        InvoiceStoreError::Connection { message } => Error::service_unavailable(message),
        InvoiceStoreError::Query { message } => Error::internal(message),
        InvoiceStoreError::NotFound { id } => Error::not_found(format!("invoice {id} not found")),
    }
}

/// Whether a status change is the pending/cancelled → paid transition.
fn is_payment_transition(previous: InvoiceStatus, current: InvoiceStatus) -> bool {
    previous != InvoiceStatus::Paid && current == InvoiceStatus::Paid
}

fn number_for_event(invoice: &Invoice) -> String {
    invoice
        .invoice_number
        .clone()
        .unwrap_or_else(|| format!("#{}", invoice.id))
}

/// Raise an invoice against a student.
#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice created", body = Invoice),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "createInvoice"
)]
#[post("/invoices")]
pub async fn create_invoice(
    state: web::Data<HttpState>,
    payload: web::Json<CreateInvoiceRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    if request.amount_cents <= 0 {
        return Err(Error::invalid_request("amount must be positive"));
    }
    let status = request.status.unwrap_or(InvoiceStatus::Pending);
    let invoice = state
        .invoices
        .create(NewInvoice {
            student_id: request.student_id,
            amount_cents: request.amount_cents,
            status,
            due_on: request.due_on,
        })
        .await
        .map_err(map_invoice_error)?;

    state.notify(
        DomainEvent::InvoiceIssued {
            invoice_number: number_for_event(&invoice),
            amount_cents: invoice.amount_cents,
            due_on: invoice.due_on,
        },
        RecipientSelector::Ids(vec![invoice.student_id]),
    );

    Ok(HttpResponse::Created().json(invoice))
}

/// Update an invoice's payment status.
#[utoipa::path(
    put,
    path = "/api/v1/invoices/{id}",
    request_body = UpdateInvoiceRequest,
    params(("id" = i32, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice updated", body = Invoice),
        (status = 404, description = "Invoice not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "updateInvoice"
)]
#[put("/invoices/{id}")]
pub async fn update_invoice(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateInvoiceRequest>,
) -> ApiResult<HttpResponse> {
    let status = payload.into_inner().status;
    let transition = state
        .invoices
        .update_status(path.into_inner(), status)
        .await
        .map_err(map_invoice_error)?;

    if is_payment_transition(transition.previous_status, transition.invoice.status) {
        state.notify(
            DomainEvent::InvoicePaid {
                invoice_number: number_for_event(&transition.invoice),
                amount_cents: transition.invoice.amount_cents,
            },
            RecipientSelector::Ids(vec![transition.invoice.student_id]),
        );
    }

    Ok(HttpResponse::Ok().json(transition.invoice))
}

/// List all invoices.
#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    responses(
        (status = 200, description = "Invoices", body = [Invoice]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invoices"],
    operation_id = "listInvoices"
)]
#[get("/invoices")]
pub async fn list_invoices(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Invoice>>> {
    let invoices = state.invoices.list().await.map_err(map_invoice_error)?;
    Ok(web::Json(invoices))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test as actix_test, web};
    use rstest::rstest;

    use super::*;
    use crate::inbound::http::test_utils::TestHarness;

    #[rstest]
    #[case(InvoiceStatus::Pending, InvoiceStatus::Paid, true)]
    #[case(InvoiceStatus::Cancelled, InvoiceStatus::Paid, true)]
    #[case(InvoiceStatus::Paid, InvoiceStatus::Paid, false)]
    #[case(InvoiceStatus::Pending, InvoiceStatus::Cancelled, false)]
    #[case(InvoiceStatus::Paid, InvoiceStatus::Pending, false)]
    fn payment_transition_requires_entering_paid(
        #[case] previous: InvoiceStatus,
        #[case] current: InvoiceStatus,
        #[case] expected: bool,
    ) {
        assert_eq!(is_payment_transition(previous, current), expected);
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
                    .service(create_invoice)
                    .service(update_invoice),
            )
    }

    fn paid_confirmations(harness: &TestHarness) -> usize {
        harness
            .queue
            .requests()
            .iter()
            .filter(|request| matches!(request.event, DomainEvent::InvoicePaid { .. }))
            .count()
    }

    #[actix_web::test]
    async fn pending_invoice_sends_no_payment_confirmation() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(test_app(&harness)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/invoices")
                .set_json(serde_json::json!({
                    "studentId": 4,
                    "amountCents": 250_000,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        assert_eq!(paid_confirmations(&harness), 0);
        let requests = harness.queue.requests();
        assert_eq!(requests.len(), 1);
        assert!(matches!(
            requests[0].event,
            DomainEvent::InvoiceIssued { .. }
        ));
    }

    #[actix_web::test]
    async fn transition_to_paid_sends_exactly_one_confirmation() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(test_app(&harness)).await;

        let _ = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/invoices")
                .set_json(serde_json::json!({
                    "studentId": 4,
                    "amountCents": 250_000,
                }))
                .to_request(),
        )
        .await;

        // First update: pending -> paid fires the confirmation.
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/invoices/1")
                .set_json(serde_json::json!({ "status": "paid" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(paid_confirmations(&harness), 1);

        // Second identical update: already paid, nothing more is sent.
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/api/v1/invoices/1")
                .set_json(serde_json::json!({ "status": "paid" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(paid_confirmations(&harness), 1);

        let confirmation = harness
            .queue
            .requests()
            .into_iter()
            .find(|request| matches!(request.event, DomainEvent::InvoicePaid { .. }))
            .expect("confirmation enqueued");
        assert_eq!(confirmation.recipients, RecipientSelector::Ids(vec![4]));
    }
}
