//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (request ID, tracing, timeouts, body limit, panics)
//! - Gate the submit route behind the rate limiter
//! - Run the idle-client sweeper next to the server
//! - Serve until the shutdown broadcast fires

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::clock::{Clock, SystemClock};
use crate::config::IntakeConfig;
use crate::http::form::form_handler;
use crate::http::handlers::{health_handler, submit_handler};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::{json_error_bodies, ApiError};
use crate::security::headers::with_security_headers;
use crate::security::rate_limit::{rate_limit_middleware, run_sweeper, SlidingWindowLimiter};
use crate::sink::SubmissionSink;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn SubmissionSink>,
    pub clock: Arc<dyn Clock>,
}

/// HTTP server for the intake service.
pub struct IntakeServer {
    router: Router,
    config: IntakeConfig,
    limiter: Arc<SlidingWindowLimiter>,
}

impl IntakeServer {
    /// Create a server that reads the system clock.
    pub fn new(config: IntakeConfig, sink: Arc<dyn SubmissionSink>) -> Self {
        Self::with_clock(config, sink, Arc::new(SystemClock))
    }

    /// Create a server with an explicit clock (tests advance it by hand).
    pub fn with_clock(
        config: IntakeConfig,
        sink: Arc<dyn SubmissionSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let limiter = Arc::new(SlidingWindowLimiter::from_config(
            &config.rate_limit,
            clock.clone(),
        ));
        let state = AppState { sink, clock };
        let router = Self::build_router(&config, state, limiter.clone());

        Self {
            router,
            config,
            limiter,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        config: &IntakeConfig,
        state: AppState,
        limiter: Arc<SlidingWindowLimiter>,
    ) -> Router {
        let mut submit = Router::new().route("/api/submit", post(submit_handler));
        if config.rate_limit.enabled {
            submit = submit.route_layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ));
        }

        let mut router = submit.route("/health", get(health_handler));
        if config.form.enabled {
            router = router.route("/", get(form_handler));
        }

        let mut router = router
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::map_response(json_error_bodies));

        if config.security.enable_headers {
            router = with_security_headers(router);
        }

        router
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// The fully layered router. Useful for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The limiter shared by the submit route.
    pub fn limiter(&self) -> Arc<SlidingWindowLimiter> {
        self.limiter.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rate_limit_enabled = self.config.rate_limit.enabled,
            max_submissions = self.config.rate_limit.max_submissions,
            window_secs = self.config.rate_limit.window_secs,
            "HTTP server starting"
        );

        if self.config.rate_limit.enabled && self.config.rate_limit.sweep_interval_secs > 0 {
            tokio::spawn(run_sweeper(
                self.limiter.clone(),
                Duration::from_secs(self.config.rate_limit.sweep_interval_secs),
                shutdown.resubscribe(),
            ));
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Handler panicked");
    ApiError::SaveFailed.into_response()
}
