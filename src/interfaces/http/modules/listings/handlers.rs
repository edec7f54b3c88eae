//! Listing API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CreateListingRequest, ListListingsParams, ListingDto, ListingSummaryDto, QuoteDto,
    QuoteRequest, UpdateListingRequest,
};
use crate::application::{BookingService, ListingService, ReviewService};
use crate::interfaces::http::common::{
    api_error, ApiError, ApiResponse, ApiResult, PaginatedResponse, PaginationQuery,
    ValidatedJson,
};
use crate::interfaces::http::modules::reviews::ReviewSummaryDto;
use crate::shared::validate_pagination;

#[derive(Clone)]
pub struct ListingHandlerState {
    pub listings: Arc<ListingService>,
    pub bookings: Arc<BookingService>,
    pub reviews: Arc<ReviewService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/listings",
    tag = "Listings",
    params(ListListingsParams),
    responses(
        (status = 200, description = "Listing page, newest first", body = ApiResponse<PaginatedResponse<ListingSummaryDto>>),
        (status = 400, description = "Unknown property type")
    )
)]
pub async fn list_listings(
    State(state): State<ListingHandlerState>,
    Query(params): Query<ListListingsParams>,
) -> ApiResult<PaginatedResponse<ListingSummaryDto>> {
    let filter = params.filter().map_err(api_error)?;
    let page = validate_pagination(params.page, params.limit);
    let result = state.listings.list(filter, page).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        ListingSummaryDto::from,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/listings",
    tag = "Listings",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ApiResponse<ListingDto>),
        (status = 400, description = "Field rule violated"),
        (status = 404, description = "Host not found"),
        (status = 422, description = "Invalid fields")
    )
)]
pub async fn create_listing(
    State(state): State<ListingHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateListingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ListingDto>>), ApiError> {
    let draft = request.into_draft().map_err(api_error)?;
    let view = state.listings.create(draft).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(view.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}",
    tag = "Listings",
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing details", body = ApiResponse<ListingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_listing(
    State(state): State<ListingHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<ListingDto> {
    let view = state.listings.get(id).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(view.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/listings/{id}",
    tag = "Listings",
    params(("id" = i32, Path, description = "Listing ID")),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Listing updated", body = ApiResponse<ListingDto>),
        (status = 400, description = "Field rule violated"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_listing(
    State(state): State<ListingHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateListingRequest>,
) -> ApiResult<ListingDto> {
    let update = request.into_update().map_err(api_error)?;
    let view = state.listings.update(id, update).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(view.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/listings/{id}",
    tag = "Listings",
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing deactivated", body = ApiResponse<ListingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn deactivate_listing(
    State(state): State<ListingHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<ListingDto> {
    let view = state.listings.deactivate(id).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(view.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/listings/{id}/quote",
    tag = "Listings",
    params(("id" = i32, Path, description = "Listing ID")),
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Price for the stay", body = ApiResponse<QuoteDto>),
        (status = 400, description = "Invalid dates or guest count"),
        (status = 404, description = "Not found")
    )
)]
pub async fn quote_listing(
    State(state): State<ListingHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<QuoteRequest>,
) -> ApiResult<QuoteDto> {
    let quote = state
        .bookings
        .quote(id, request.check_in, request.check_out, request.num_guests)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(QuoteDto::new(
        id,
        request.check_in,
        request.check_out,
        quote,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}/reviews",
    tag = "Listings",
    params(("id" = i32, Path, description = "Listing ID"), PaginationQuery),
    responses(
        (status = 200, description = "Reviews of the listing", body = ApiResponse<PaginatedResponse<ReviewSummaryDto>>),
        (status = 404, description = "Not found")
    )
)]
pub async fn listing_reviews(
    State(state): State<ListingHandlerState>,
    Path(id): Path<i32>,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<PaginatedResponse<ReviewSummaryDto>> {
    let filter = state.listings.reviews_filter(id).await.map_err(api_error)?;
    let result = state
        .reviews
        .list(filter, query.params())
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        ReviewSummaryDto::from,
    ))))
}
