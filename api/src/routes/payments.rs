//! Payment and refund endpoints. Settlement itself is driven by the
//! background worker, not by any route here.

use actix_web::{web, HttpResponse, Scope};
use uuid::Uuid;

use crate::dto::payment::{CreatePaymentRequest, DecideRefundRequest, RefundRequest};
use crate::errors::ApiResult;
use crate::extract::Auth;
use crate::state::AppState;

pub fn scope() -> Scope {
    web::scope("/payments")
        .route("", web::post().to(create))
        .route("", web::get().to(list_all))
        .route("/mine", web::get().to(list_mine))
        .route("/refunds", web::get().to(refund_queue))
        .route("/{id}", web::get().to(get))
        .route("/{id}/refund", web::post().to(request_refund))
        .route("/{id}/refund/decide", web::post().to(decide_refund))
}

async fn create(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    body: web::Json<CreatePaymentRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let payment = state
        .payments
        .create(
            &principal,
            body.apartment_id,
            body.booking_id,
            body.amount,
            body.method,
            body.currency,
        )
        .await?;
    Ok(HttpResponse::Created().json(payment))
}

async fn list_all(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let payments = state.payments.list_all(&principal).await?;
    Ok(HttpResponse::Ok().json(payments))
}

async fn list_mine(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let payments = state.payments.list_mine(&principal).await?;
    Ok(HttpResponse::Ok().json(payments))
}

async fn refund_queue(
    state: web::Data<AppState>,
    Auth(principal): Auth,
) -> ApiResult<HttpResponse> {
    let payments = state.payments.refund_queue(&principal).await?;
    Ok(HttpResponse::Ok().json(payments))
}

async fn get(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let payment = state.payments.get(&principal, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payment))
}

async fn request_refund(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<RefundRequest>,
) -> ApiResult<HttpResponse> {
    let payment = state
        .payments
        .request_refund(&principal, path.into_inner(), body.into_inner().reason)
        .await?;
    Ok(HttpResponse::Ok().json(payment))
}

async fn decide_refund(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<DecideRefundRequest>,
) -> ApiResult<HttpResponse> {
    let payment = state
        .payments
        .decide_refund(&principal, path.into_inner(), body.into_inner().approve)
        .await?;
    Ok(HttpResponse::Ok().json(payment))
}
