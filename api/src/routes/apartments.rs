//! Listing endpoints. Browsing and single-listing reads are public; every
//! mutation goes through the `Auth` extractor.

use actix_web::{web, HttpResponse, Scope};
use uuid::Uuid;
use validator::Validate;

use rn_core::services::{NewApartment, UpdateApartment};
use rn_shared::types::MessageResponse;

use crate::dto::apartment::{ApartmentQuery, CreateApartmentRequest, UpdateApartmentRequest};
use crate::errors::{validation_failed, ApiResult};
use crate::extract::Auth;
use crate::state::AppState;

pub fn scope() -> Scope {
    web::scope("/apartments")
        .route("", web::get().to(list))
        .route("", web::post().to(create))
        .route("/mine", web::get().to(list_mine))
        .route("/{id}", web::get().to(get))
        .route("/{id}", web::put().to(update))
        .route("/{id}", web::delete().to(delete))
}

async fn list(
    state: web::Data<AppState>,
    query: web::Query<ApartmentQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let page = state
        .apartments
        .list(query.filter(), query.pagination())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

async fn create(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    body: web::Json<CreateApartmentRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    body.validate().map_err(validation_failed)?;
    let apartment = state
        .apartments
        .create(
            &principal,
            NewApartment {
                location: body.location,
                price: body.price,
                category: body.category,
                description: body.description,
                images: body.images,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(apartment))
}

async fn list_mine(state: web::Data<AppState>, Auth(principal): Auth) -> ApiResult<HttpResponse> {
    let apartments = state.apartments.list_mine(&principal).await?;
    Ok(HttpResponse::Ok().json(apartments))
}

async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> ApiResult<HttpResponse> {
    let apartment = state.apartments.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(apartment))
}

async fn update(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
    body: web::Json<UpdateApartmentRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let apartment = state
        .apartments
        .update(
            &principal,
            path.into_inner(),
            UpdateApartment {
                location: body.location,
                price: body.price,
                category: body.category,
                description: body.description,
                images: body.images,
                availability: body.availability,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(apartment))
}

async fn delete(
    state: web::Data<AppState>,
    Auth(principal): Auth,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.apartments.delete(&principal, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Apartment deleted successfully")))
}
