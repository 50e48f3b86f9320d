pub mod error;
pub mod handlers;

use crate::core::calculator::PackCalculator;
use crate::core::CatalogStore;
use crate::utils::error::Result;
use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct AppState<C: CatalogStore> {
    pub calculator: Arc<PackCalculator<C>>,
}

impl<C: CatalogStore> AppState<C> {
    pub fn new(calculator: PackCalculator<C>) -> Self {
        Self {
            calculator: Arc::new(calculator),
        }
    }
}

impl<C: CatalogStore> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            calculator: Arc::clone(&self.calculator),
        }
    }
}

pub fn router<C: CatalogStore + 'static>(state: AppState<C>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/packages", get(handlers::list_packages::<C>))
        .route("/package", post(handlers::add_package::<C>))
        .route("/package/{id}", delete(handlers::delete_package::<C>))
        .route("/calculate", post(handlers::calculate::<C>))
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

/// Permissive CORS; preflight requests are answered without routing.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("3600"));
    response
}

pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("HTTP server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("HTTP server stopped");
    Ok(())
}
