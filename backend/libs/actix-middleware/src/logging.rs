//! Logging middleware
//!
//! Emits one `tracing` event per completed request. Server errors and slow
//! requests are logged at `warn`, everything else at `info`.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::time::{Duration, Instant};

const DEFAULT_SLOW_REQUEST: Duration = Duration::from_millis(500);

/// Middleware that logs HTTP requests and responses
#[derive(Clone)]
pub struct Logging {
    slow_threshold: Duration,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            slow_threshold: DEFAULT_SLOW_REQUEST,
        }
    }
}

impl Logging {
    pub fn with_slow_threshold(slow_threshold: Duration) -> Self {
        Self { slow_threshold }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Logging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggingService {
            service,
            slow_threshold: self.slow_threshold,
        }))
    }
}

pub struct LoggingService<S> {
    service: S,
    slow_threshold: Duration,
}

impl<S, B> Service<ServiceRequest> for LoggingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();
        let slow_threshold = self.slow_threshold;

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let elapsed = start.elapsed();
            let status = res.status();

            if status.is_server_error() || elapsed >= slow_threshold {
                tracing::warn!(
                    method = %method,
                    path = %path,
                    status = %status.as_u16(),
                    duration_ms = elapsed.as_millis() as u64,
                    "HTTP request completed"
                );
            } else {
                tracing::info!(
                    method = %method,
                    path = %path,
                    status = %status.as_u16(),
                    duration_ms = elapsed.as_millis() as u64,
                    "HTTP request completed"
                );
            }

            Ok(res)
        })
    }
}
