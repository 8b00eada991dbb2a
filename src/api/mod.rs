use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod error;
pub mod events;
pub mod shifts;
pub mod transactions;
pub mod users;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn event_bus(
        &self,
    ) -> &tokio::sync::broadcast::Sender<crate::domain::events::NotificationEvent> {
        &self.shared.event_bus
    }
}

#[must_use]
pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState { shared })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/login", post(users::login))
        .route("/users/{id}/suspend", post(users::suspend_user))
        .route("/users/{id}/recall", post(users::recall_user))
        .route("/shifts", get(shifts::list_shifts))
        .route("/shifts/clock-in", post(shifts::clock_in))
        .route("/shifts/clock-out", post(shifts::clock_out))
        .route("/shifts/active/{user_id}", get(shifts::active_shift))
        .route("/shifts/{id}", patch(shifts::update_shift))
        .route("/transactions", get(transactions::list_transactions))
        .route("/transactions", post(transactions::create_transaction))
        .route("/transactions/stats", get(transactions::daily_stats))
        .route(
            "/transactions/leaderboard",
            get(transactions::mpesa_leaderboard),
        )
        .route("/transactions/{id}", patch(transactions::update_transaction))
        .route(
            "/transactions/{id}",
            delete(transactions::delete_transaction),
        )
        .route("/clients-served", get(transactions::clients_served))
        .merge(events::router())
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
