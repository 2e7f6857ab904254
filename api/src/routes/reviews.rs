use actix_web::{web, HttpResponse, Scope};
use uuid::Uuid;
use validator::Validate;

use rn_shared::types::MessageResponse;

use crate::dto::review::{CreateReviewRequest, RespondToReviewRequest, UpdateReviewRequest};
use crate::errors::{validation_failed, ApiResult};
use crate::extract::Auth;
use crate::state::AppState;

pub fn scope() -> Scope {
    web::scope("/reviews")
        .route("", web::post().to(create))
        .route("/mine", web::get().to(list_mine))
        .route("/apartment/{apartment_id}", web::get().to(list_by_apartment))
        .route("/{id}", web::put().to(update))
        .route("/{id}", web::delete().to(delete))
        .route("/{id}/respond", web::post().to(respond))
}

async fn create(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    body: web::Json<CreateReviewRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(validation_failed)?;
    let review = state
        .reviews
        .create(&principal, body.apartment_id, body.rating, body.comment)
        .await?;
    Ok(HttpResponse::Created().json(review))
}

async fn list_mine(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let reviews = state.reviews.list_mine(&principal).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// Public read; listing pages show reviews without a session
async fn list_by_apartment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let reviews = state.reviews.list_by_apartment(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

async fn update(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<UpdateReviewRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let review = state
        .reviews
        .update(&principal, path.into_inner(), body.rating, body.comment)
        .await?;
    Ok(HttpResponse::Ok().json(review))
}

async fn delete(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.reviews.delete(&principal, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Review deleted successfully")))
}

async fn respond(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<RespondToReviewRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(validation_failed)?;
    let review = state
        .reviews
        .respond(&principal, path.into_inner(), body.response)
        .await?;
    Ok(HttpResponse::Ok().json(review))
}
