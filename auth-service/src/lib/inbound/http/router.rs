use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::profile::profile;
use super::handlers::register::register;
use super::middleware::require_bearer;
use crate::account::ports::AuthServicePort;

pub struct AppState<AS: AuthServicePort> {
    pub auth_service: Arc<AS>,
}

// Derived Clone would demand AS: Clone.
impl<AS: AuthServicePort> Clone for AppState<AS> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
        }
    }
}

pub fn create_router<AS: AuthServicePort>(auth_service: Arc<AS>) -> Router {
    let state = AppState { auth_service };

    let public_routes = Router::new()
        .route("/api/auth/reg", post(register::<AS>))
        .route("/api/auth/login", post(login::<AS>))
        .route("/api/auth/logout", post(logout::<AS>));

    let protected_routes = Router::new()
        .route("/api/user/profile", get(profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer::<AS>,
        ));

    // Headers stay out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
