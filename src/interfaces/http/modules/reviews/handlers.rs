//! Review API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CreateReviewRequest, HostResponseRequest, ListReviewsParams, ReviewDto, ReviewSummaryDto,
};
use crate::application::ReviewService;
use crate::interfaces::http::common::{
    api_error, ApiError, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::shared::validate_pagination;

#[derive(Clone)]
pub struct ReviewHandlerState {
    pub reviews: Arc<ReviewService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    tag = "Reviews",
    params(ListReviewsParams),
    responses(
        (status = 200, description = "Review page, newest first", body = ApiResponse<PaginatedResponse<ReviewSummaryDto>>)
    )
)]
pub async fn list_reviews(
    State(state): State<ReviewHandlerState>,
    Query(params): Query<ListReviewsParams>,
) -> ApiResult<PaginatedResponse<ReviewSummaryDto>> {
    let page = validate_pagination(params.page, params.limit);
    let result = state
        .reviews
        .list(params.filter(), page)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        ReviewSummaryDto::from,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<ReviewDto>),
        (status = 400, description = "Booking not completed, wrong reviewer or rating out of range"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking already reviewed")
    )
)]
pub async fn create_review(
    State(state): State<ReviewHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewDto>>), ApiError> {
    let view = state
        .reviews
        .create(request.into())
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(view.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review details", body = ApiResponse<ReviewDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_review(
    State(state): State<ReviewHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<ReviewDto> {
    let view = state.reviews.get(id).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(view.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}/response",
    tag = "Reviews",
    params(("id" = i32, Path, description = "Review ID")),
    request_body = HostResponseRequest,
    responses(
        (status = 200, description = "Host response recorded", body = ApiResponse<ReviewDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn respond_to_review(
    State(state): State<ReviewHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<HostResponseRequest>,
) -> ApiResult<ReviewDto> {
    let view = state
        .reviews
        .respond(id, request.host_response)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(view.into())))
}
