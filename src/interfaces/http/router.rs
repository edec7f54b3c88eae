//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{BookingService, ListingService, ReviewService, UserService};
use crate::config::CorsConfig;
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse};
use crate::shared::SharedClock;

use super::modules::{bookings, health, listings, metrics, request_id, reviews, users};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Listings
        listings::list_listings,
        listings::create_listing,
        listings::get_listing,
        listings::update_listing,
        listings::deactivate_listing,
        listings::quote_listing,
        listings::listing_reviews,
        // Bookings
        bookings::list_bookings,
        bookings::create_booking,
        bookings::get_booking,
        bookings::update_booking_status,
        bookings::cancel_booking,
        // Reviews
        reviews::list_reviews,
        reviews::create_review,
        reviews::get_review,
        reviews::respond_to_review,
    ),
    components(
        schemas(
            ApiResponse<String>,
            PaginatedResponse<users::UserDto>,
            PaginatedResponse<listings::ListingSummaryDto>,
            PaginatedResponse<bookings::BookingSummaryDto>,
            PaginatedResponse<reviews::ReviewSummaryDto>,
            health::HealthResponse,
            health::StorageHealth,
            users::UserDto,
            users::UserSummaryDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            listings::ListingDto,
            listings::ListingSummaryDto,
            listings::CreateListingRequest,
            listings::UpdateListingRequest,
            listings::QuoteRequest,
            listings::QuoteDto,
            bookings::BookingDto,
            bookings::BookingSummaryDto,
            bookings::CreateBookingRequest,
            bookings::UpdateStatusRequest,
            reviews::ReviewDto,
            reviews::ReviewSummaryDto,
            reviews::CreateReviewRequest,
            reviews::HostResponseRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service and storage health"),
        (name = "Users", description = "User accounts: hosts and guests"),
        (name = "Listings", description = "Property listings, price quotes and listing reviews"),
        (name = "Bookings", description = "Reservations and their status lifecycle"),
        (name = "Reviews", description = "Verified guest reviews and host responses"),
    ),
    info(
        title = "Staybook API",
        version = "1.0.0",
        description = "REST API for a short-stay booking marketplace",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Everything the router needs to build its handler states
#[derive(Clone)]
pub struct ApiContext {
    pub repos: Arc<dyn RepositoryProvider>,
    pub clock: SharedClock,
    /// Pinged by `/health`; `None` for in-memory storage
    pub db: Option<DatabaseConnection>,
    pub prometheus: PrometheusHandle,
    pub cors: CorsConfig,
    pub strict_overlap_check: bool,
    pub password_hash_cost: u32,
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if config.allow_all {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let user_service = Arc::new(
        UserService::new(ctx.repos.clone(), ctx.clock.clone())
            .with_hash_cost(ctx.password_hash_cost),
    );
    let listing_service = Arc::new(ListingService::new(ctx.repos.clone(), ctx.clock.clone()));
    let booking_service = Arc::new(
        BookingService::new(ctx.repos.clone(), ctx.clock.clone())
            .with_strict_overlap_check(ctx.strict_overlap_check),
    );
    let review_service = Arc::new(ReviewService::new(ctx.repos.clone(), ctx.clock.clone()));

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .with_state(users::UserHandlerState { user_service });

    let listing_routes = Router::new()
        .route(
            "/",
            get(listings::list_listings).post(listings::create_listing),
        )
        .route(
            "/{id}",
            get(listings::get_listing)
                .put(listings::update_listing)
                .delete(listings::deactivate_listing),
        )
        .route("/{id}/quote", post(listings::quote_listing))
        .route("/{id}/reviews", get(listings::listing_reviews))
        .with_state(listings::ListingHandlerState {
            listings: listing_service,
            bookings: booking_service.clone(),
            reviews: review_service.clone(),
        });

    let booking_routes = Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/status", put(bookings::update_booking_status))
        .route("/{id}/cancel", post(bookings::cancel_booking))
        .with_state(bookings::BookingHandlerState {
            bookings: booking_service,
        });

    let review_routes = Router::new()
        .route("/", get(reviews::list_reviews).post(reviews::create_review))
        .route("/{id}", get(reviews::get_review))
        .route("/{id}/response", put(reviews::respond_to_review))
        .with_state(reviews::ReviewHandlerState {
            reviews: review_service,
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState::new(ctx.db.clone()));

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: ctx.prometheus.clone(),
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/listings", listing_routes)
        .nest("/api/v1/bookings", booking_routes)
        .nest("/api/v1/reviews", review_routes)
        .route_layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&ctx.cors))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::shared::FixedClock;

    fn today() -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn app() -> Router {
        create_api_router(ApiContext {
            repos: Arc::new(InMemoryStorage::new()),
            clock: Arc::new(FixedClock::on(today())),
            db: None,
            prometheus: PrometheusBuilder::new().build_recorder().handle(),
            cors: CorsConfig::default(),
            strict_overlap_check: true,
            password_hash_cost: 4,
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn create_user(app: &Router, name: &str) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/users",
            Some(json!({
                "username": name,
                "email": format!("{name}@example.com"),
                "password": "password123"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn create_listing(app: &Router, host_id: i64) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/listings",
            Some(json!({
                "host_id": host_id,
                "title": "Canal loft",
                "property_type": "APARTMENT",
                "address": "1 Canal St",
                "city": "Amsterdam",
                "country": "Netherlands",
                "bedrooms": 1,
                "bathrooms": 1,
                "price_per_night": "100.00"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn health_reports_memory_storage() {
        let app = app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["storage"]["backend"], "memory");
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let app = app();
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn create_user_validation() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/users",
            Some(json!({"username": "", "email": "nope", "password": "short"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/users")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        create_user(&app, "alice").await;
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/users",
            Some(json!({
                "username": "alice",
                "email": "other@example.com",
                "password": "password123"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn missing_resources_are_404() {
        let app = app();
        for uri in [
            "/api/v1/users/99",
            "/api/v1/listings/99",
            "/api/v1/bookings/99",
            "/api/v1/reviews/99",
            "/api/v1/listings/99/reviews",
        ] {
            let (status, body) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["success"], false);
        }
    }

    #[tokio::test]
    async fn quote_prices_the_stay() {
        let app = app();
        let host = create_user(&app, "host").await;
        let listing = create_listing(&app, host).await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/v1/listings/{listing}/quote"),
            Some(json!({"check_in": "2026-11-01", "check_out": "2026-11-04", "num_guests": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["num_nights"], 3);
        assert_eq!(body["data"]["total_price"], "300.00");

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/v1/listings/{listing}/quote"),
            Some(json!({"check_in": "2026-10-01", "check_out": "2026-10-04"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_listing_price_is_rejected() {
        let app = app();
        let host = create_user(&app, "host").await;

        for price in ["100000000.00", "79228162514264337593543950335"] {
            let (status, body) = send(
                &app,
                "POST",
                "/api/v1/listings",
                Some(json!({
                    "host_id": host,
                    "title": "Palace",
                    "property_type": "VILLA",
                    "address": "1 Royal Way",
                    "city": "Monaco",
                    "country": "Monaco",
                    "bedrooms": 9,
                    "bathrooms": 9,
                    "price_per_night": price
                })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{price}: {body}");
            assert_eq!(body["success"], false);
        }

        let (_, body) = send(&app, "GET", "/api/v1/listings", None).await;
        assert_eq!(body["data"]["total"], 0);
    }

    #[tokio::test]
    async fn listing_filters_and_deactivation() {
        let app = app();
        let host = create_user(&app, "host").await;
        let listing = create_listing(&app, host).await;

        let (_, body) = send(&app, "GET", "/api/v1/listings?city=amsterdam", None).await;
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["items"][0]["host_username"], "host");

        let (status, _) = send(&app, "GET", "/api/v1/listings?property_type=castle", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "DELETE", &format!("/api/v1/listings/{listing}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_active"], false);
        assert_eq!(body["data"]["is_available"], false);

        let (_, body) = send(&app, "GET", "/api/v1/listings", None).await;
        assert_eq!(body["data"]["total"], 0);
        let (_, body) = send(&app, "GET", "/api/v1/listings?active=false", None).await;
        assert_eq!(body["data"]["total"], 1);
    }

    #[tokio::test]
    async fn booking_to_review_flow() {
        let app = app();
        let host = create_user(&app, "host").await;
        let guest = create_user(&app, "guest").await;
        let listing = create_listing(&app, host).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/bookings",
            Some(json!({
                "listing_id": listing,
                "guest_id": guest,
                "check_in": "2026-11-01",
                "check_out": "2026-11-04",
                "num_guests": 2
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let data = &body["data"];
        assert_eq!(data["status"], "PENDING");
        assert_eq!(data["num_nights"], 3);
        assert_eq!(data["total_price"], "300.00");
        assert_eq!(data["days_until_checkin"], 17);
        assert_eq!(data["can_cancel"], true);
        assert_eq!(data["listing_detail"]["title"], "Canal loft");
        let booking = data["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/bookings",
            Some(json!({
                "listing_id": listing,
                "guest_id": guest,
                "check_in": "2026-11-03",
                "check_out": "2026-11-06"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let review_body = json!({
            "booking_id": booking,
            "reviewer_id": guest,
            "rating": 5,
            "comment": "Lovely stay"
        });
        let (status, _) = send(&app, "POST", "/api/v1/reviews", Some(review_body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/v1/bookings/{booking}/status"),
            Some(json!({"status": "completed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "COMPLETED");

        let (status, body) = send(&app, "POST", "/api/v1/reviews", Some(review_body.clone())).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["data"]["is_verified"], true);
        assert_eq!(body["data"]["has_host_responded"], false);
        let review = body["data"]["id"].as_i64().unwrap();

        let (status, _) = send(&app, "POST", "/api/v1/reviews", Some(review_body)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/v1/reviews/{review}/response"),
            Some(json!({"host_response": "Thanks for staying!"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["has_host_responded"], true);

        let (_, body) = send(&app, "GET", &format!("/api/v1/listings/{listing}"), None).await;
        assert_eq!(body["data"]["review_count"], 1);
        assert_eq!(body["data"]["average_rating"], 5.0);

        let (_, body) = send(&app, "GET", &format!("/api/v1/listings/{listing}/reviews"), None).await;
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["items"][0]["reviewer_username"], "guest");
    }

    #[tokio::test]
    async fn cancel_respects_window() {
        let app = app();
        let host = create_user(&app, "host").await;
        let guest = create_user(&app, "guest").await;
        let listing = create_listing(&app, host).await;

        let mut ids = Vec::new();
        for (check_in, check_out) in [("2026-10-16", "2026-10-18"), ("2026-12-01", "2026-12-03")] {
            let (status, body) = send(
                &app,
                "POST",
                "/api/v1/bookings",
                Some(json!({
                    "listing_id": listing,
                    "guest_id": guest,
                    "check_in": check_in,
                    "check_out": check_out
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            ids.push(body["data"]["id"].as_i64().unwrap());
        }

        let (status, _) = send(&app, "POST", &format!("/api/v1/bookings/{}/cancel", ids[0]), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "POST", &format!("/api/v1/bookings/{}/cancel", ids[1]), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "CANCELLED");
        assert_eq!(body["data"]["can_cancel"], false);

        let (_, body) = send(&app, "GET", "/api/v1/bookings?status=cancelled", None).await;
        assert_eq!(body["data"]["total"], 1);
    }
}
