use actix_web::{web, HttpResponse, Scope};
use uuid::Uuid;

use crate::dto::inspection::{
    CompleteInspectionRequest, CreateInspectionRequest, DecideInspectionRequest,
    RescheduleInspectionRequest,
};
use crate::errors::ApiResult;
use crate::extract::Auth;
use crate::state::AppState;

pub fn scope() -> Scope {
    web::scope("/inspections")
        .route("", web::post().to(create))
        .route("", web::get().to(list_all))
        .route("/mine", web::get().to(list_mine))
        .route("/agent", web::get().to(list_for_agent))
        .route("/{id}/cancel", web::post().to(cancel))
        .route("/{id}/reschedule", web::put().to(reschedule))
        .route("/{id}/decide", web::post().to(decide))
        .route("/{id}/complete", web::post().to(complete))
}

async fn create(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    body: web::Json<CreateInspectionRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let request = state
        .inspections
        .create(
            &principal,
            body.apartment_id,
            body.date,
            body.time,
            body.message,
        )
        .await?;
    Ok(HttpResponse::Created().json(request))
}

async fn list_all(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let requests = state.inspections.list_all(&principal).await?;
    Ok(HttpResponse::Ok().json(requests))
}

async fn list_mine(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let requests = state.inspections.list_mine(&principal).await?;
    Ok(HttpResponse::Ok().json(requests))
}

async fn list_for_agent(
    state: web::Data<AppState>,
    Auth(principal): Auth,
) -> ApiResult<HttpResponse> {
    let requests = state.inspections.list_for_agent(&principal).await?;
    Ok(HttpResponse::Ok().json(requests))
}

async fn cancel(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let request = state
        .inspections
        .cancel(&principal, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(request))
}

async fn reschedule(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<RescheduleInspectionRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let request = state
        .inspections
        .reschedule(&principal, path.into_inner(), body.date, body.time)
        .await?;
    Ok(HttpResponse::Ok().json(request))
}

async fn decide(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<DecideInspectionRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let request = state
        .inspections
        .decide(
            &principal,
            path.into_inner(),
            body.approve,
            body.rejection_reason,
        )
        .await?;
    Ok(HttpResponse::Ok().json(request))
}

async fn complete(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<CompleteInspectionRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let request = state
        .inspections
        .complete(
            &principal,
            path.into_inner(),
            body.notes,
            body.follow_up_required,
        )
        .await?;
    Ok(HttpResponse::Ok().json(request))
}
