//! Router assembly

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::middleware::require_auth;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/refresh", post(handlers::auth::refresh));

    let protected_routes = Router::new()
        // Auth
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route("/api/v1/auth/me", get(handlers::auth::me))
        // Dashboards
        .route("/api/v1/dashboards/tenders/tabs", get(handlers::dashboards::tabs))
        .route("/api/v1/dashboards/tenders/buckets", get(handlers::dashboards::bucket_counts))
        .route("/api/v1/dashboards/tenders/{tab}", get(handlers::dashboards::tab))
        // Payment requests & instruments
        .route("/api/v1/payment-requests", post(handlers::instruments::create_request))
        .route("/api/v1/payment-requests/{id}", get(handlers::instruments::get_request))
        .route(
            "/api/v1/payment-requests/{id}/instruments",
            get(handlers::instruments::list_instruments)
                .post(handlers::instruments::create_instrument),
        )
        .route(
            "/api/v1/tenders/{id}/payment-requests",
            get(handlers::instruments::list_requests_for_tender),
        )
        .route("/api/v1/instruments/{id}", get(handlers::instruments::get_instrument))
        .route("/api/v1/instruments/{id}/transition", post(handlers::instruments::transition))
        .route("/api/v1/instruments/{id}/reject", post(handlers::instruments::reject))
        .route("/api/v1/instruments/{id}/resubmit", post(handlers::instruments::resubmit))
        .route("/api/v1/instruments/{id}/actions", get(handlers::instruments::available_actions))
        .route("/api/v1/instruments/{id}/history", get(handlers::instruments::history))
        // Timers
        .route("/api/v1/timers", get(handlers::timers::list))
        .route("/api/v1/timers/start", post(handlers::timers::start))
        .route("/api/v1/timers/stop", post(handlers::timers::stop))
        .route("/api/v1/timers/pause", post(handlers::timers::pause))
        .route("/api/v1/timers/resume", post(handlers::timers::resume))
        .route("/api/v1/timers/cancel", post(handlers::timers::cancel))
        .route("/api/v1/timers/extend", post(handlers::timers::extend))
        .route(
            "/api/v1/timers/{entity_type}/{entity_id}/{stage}/events",
            get(handlers::timers::events),
        )
        // Workflows
        .route("/api/v1/workflows/{code}/instantiate", post(handlers::workflows::instantiate))
        .route(
            "/api/v1/workflows/{code}/steps/{step_key}/complete",
            post(handlers::workflows::complete_step),
        )
        // Business calendar
        .route("/api/v1/calendar/business-end", get(handlers::calendar::business_end))
        .route("/api/v1/calendar/working-day", get(handlers::calendar::is_working_day))
        // Follow-ups
        .route(
            "/api/v1/follow-ups",
            get(handlers::follow_ups::list).post(handlers::follow_ups::create),
        )
        .route("/api/v1/follow-ups/summary/amounts", get(handlers::follow_ups::amount_summary))
        .route(
            "/api/v1/follow-ups/{id}",
            get(handlers::follow_ups::get)
                .patch(handlers::follow_ups::update)
                .delete(handlers::follow_ups::remove),
        )
        .route("/api/v1/follow-ups/{id}/status", patch(handlers::follow_ups::update_status))
        // Couriers
        .route(
            "/api/v1/couriers",
            get(handlers::couriers::list).post(handlers::couriers::create),
        )
        .route("/api/v1/couriers/{id}", get(handlers::couriers::get))
        .route("/api/v1/couriers/{id}/dispatch", post(handlers::couriers::dispatch))
        .route("/api/v1/couriers/{id}/delivery", post(handlers::couriers::record_delivery))
        .route("/api/v1/couriers/{id}/reject", post(handlers::couriers::reject))
        // Imprest
        .route("/api/v1/imprest/summary", get(handlers::imprest::employee_summary))
        .route("/api/v1/imprest/transactions/{user_id}", get(handlers::imprest::transactions))
        .route("/api/v1/imprest/vouchers", get(handlers::imprest::vouchers))
        .route("/api/v1/imprest/{id}/approve", post(handlers::imprest::approve))
        .route("/api/v1/imprest/{id}/reject", post(handlers::imprest::reject))
        // Costing approvals
        .route("/api/v1/costing/approvals", get(handlers::costing::approval_dashboard))
        .route("/api/v1/costing/{id}/approve", post(handlers::costing::approve))
        .route("/api/v1/costing/{id}/reject", post(handlers::costing::reject))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state)
}
