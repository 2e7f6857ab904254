//! Booking endpoints. Creation races on the apartment's availability flag;
//! losers get the same conflict response regardless of how close they were.

use actix_web::{web, HttpResponse, Scope};
use uuid::Uuid;

use rn_shared::types::MessageResponse;

use crate::dto::booking::{CreateBookingRequest, DecideBookingRequest};
use crate::errors::ApiResult;
use crate::extract::Auth;
use crate::state::AppState;

pub fn scope() -> Scope {
    web::scope("/bookings")
        .route("", web::post().to(create))
        .route("", web::get().to(list_all))
        .route("/mine", web::get().to(list_mine))
        .route("/agent", web::get().to(list_for_agent))
        .route("/{id}", web::get().to(get))
        .route("/{id}", web::delete().to(admin_delete))
        .route("/{id}/cancel", web::post().to(cancel))
        .route("/{id}/decide", web::post().to(decide))
}

async fn create(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    body: web::Json<CreateBookingRequest>,
) -> ApiResult<HttpResponse> {
    let booking = state
        .bookings
        .create(&principal, body.into_inner().apartment_id)
        .await?;
    Ok(HttpResponse::Created().json(booking))
}

async fn list_all(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let bookings = state.bookings.list_all(&principal).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

async fn list_mine(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let bookings = state.bookings.list_mine(&principal).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

async fn list_for_agent(
    state: web::Data<AppState>,
    Auth(principal): Auth,
) -> ApiResult<HttpResponse> {
    let bookings = state.bookings.list_for_agent(&principal).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

async fn get(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let booking = state.bookings.get(&principal, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(booking))
}

async fn cancel(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.bookings.cancel(&principal, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Booking cancelled successfully")))
}

async fn decide(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<DecideBookingRequest>,
) -> ApiResult<HttpResponse> {
    let booking = state
        .bookings
        .decide(&principal, path.into_inner(), body.into_inner().status)
        .await?;
    Ok(HttpResponse::Ok().json(booking))
}

async fn admin_delete(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .bookings
        .admin_delete(&principal, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Booking deleted successfully")))
}
