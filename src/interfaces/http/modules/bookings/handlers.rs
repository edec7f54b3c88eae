//! Booking API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    BookingDto, BookingSummaryDto, CreateBookingRequest, ListBookingsParams, UpdateStatusRequest,
};
use crate::application::BookingService;
use crate::domain::{BookingStatus, DomainError};
use crate::interfaces::http::common::{
    api_error, ApiError, ApiResponse, ApiResult, PaginatedResponse, ValidatedJson,
};
use crate::shared::validate_pagination;

#[derive(Clone)]
pub struct BookingHandlerState {
    pub bookings: Arc<BookingService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    params(ListBookingsParams),
    responses(
        (status = 200, description = "Booking page, newest first", body = ApiResponse<PaginatedResponse<BookingSummaryDto>>),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn list_bookings(
    State(state): State<BookingHandlerState>,
    Query(params): Query<ListBookingsParams>,
) -> ApiResult<PaginatedResponse<BookingSummaryDto>> {
    let filter = params.filter().map_err(api_error)?;
    let page = validate_pagination(params.page, params.limit);
    let result = state.bookings.list(filter, page).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        BookingSummaryDto::from,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created as PENDING", body = ApiResponse<BookingDto>),
        (status = 400, description = "Invalid dates or guest count"),
        (status = 404, description = "Listing or guest not found"),
        (status = 409, description = "Dates overlap an existing booking")
    )
)]
pub async fn create_booking(
    State(state): State<BookingHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingDto>>), ApiError> {
    let view = state
        .bookings
        .create(request.into())
        .await
        .map_err(api_error)?;
    let dto = BookingDto::from_view(view, state.bookings.today());
    Ok((StatusCode::CREATED, Json(ApiResponse::success(dto))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<BookingDto> {
    let view = state.bookings.get(id).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(BookingDto::from_view(
        view,
        state.bookings.today(),
    ))))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}/status",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status replaced", body = ApiResponse<BookingDto>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_booking_status(
    State(state): State<BookingHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<BookingDto> {
    let status: BookingStatus = request
        .status
        .parse()
        .map_err(|e| api_error(DomainError::from(e)))?;
    let view = state
        .bookings
        .set_status(id, status)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(BookingDto::from_view(
        view,
        state.bookings.today(),
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<BookingDto>),
        (status = 400, description = "Cancellation window closed"),
        (status = 404, description = "Not found")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<BookingDto> {
    let view = state.bookings.cancel(id).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(BookingDto::from_view(
        view,
        state.bookings.today(),
    ))))
}
