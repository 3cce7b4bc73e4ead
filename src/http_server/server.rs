//! # HTTP Server
//!
//! Main HTTP server combining the forms and health routers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{extract::Request, middleware, middleware::Next, response::Response, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::form_routes::{form_routes, FormsState};
use super::health_routes::health_routes;
use crate::observability::{log_event_with_fields, Event};
use crate::store::FormStore;

/// HTTP Server for the forms API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over the given store
    pub fn new(config: HttpServerConfig, store: Arc<dyn FormStore>) -> Self {
        let router = build_router(&config, store);
        Self { config, router }
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        log_event_with_fields(Event::Serving, &[("addr", addr.to_string().as_str())]);
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

/// Build the combined router with all endpoints
pub fn build_router(config: &HttpServerConfig, store: Arc<dyn FormStore>) -> Router {
    let forms_state = Arc::new(FormsState::new(store));

    // Configure CORS from config
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(health_routes())
        .nest("/api/forms", form_routes(forms_state))
        .layer(middleware::from_fn(log_request))
        .layer(cors)
}

/// Emit one structured line per completed request
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    let elapsed_ms = started.elapsed().as_millis().to_string();
    log_event_with_fields(
        Event::RequestCompleted,
        &[
            ("method", method.as_str()),
            ("path", path.as_str()),
            ("status", status.as_str()),
            ("elapsed_ms", elapsed_ms.as_str()),
        ],
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryFormStore;

    fn store() -> Arc<dyn FormStore> {
        Arc::new(InMemoryFormStore::new())
    }

    #[tokio::test]
    async fn test_start_rejects_unparseable_host() {
        let config = HttpServerConfig {
            host: "not a host".to_string(),
            ..HttpServerConfig::default()
        };
        let err = HttpServer::new(config, store()).start().await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_router_builds_with_permissive_cors() {
        let config = HttpServerConfig {
            cors_origins: Vec::new(),
            ..HttpServerConfig::default()
        };
        let _router = build_router(&config, store());
    }
}
