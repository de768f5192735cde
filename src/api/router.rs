use super::handlers::{self, LedgerState};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// All API routes over one shared ledger service
pub fn create_router(service: LedgerState) -> Router {
    // The form is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/expenses", get(handlers::list_expenses))
        .route("/budget", get(handlers::get_budget))
        .route(
            "/expense",
            post(handlers::add_expense).delete(handlers::delete_expense),
        )
        .with_state(service)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
