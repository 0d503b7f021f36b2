use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use prometheus::{Encoder, HistogramVec, IntCounterVec, IntGauge, TextEncoder};
use std::rc::Rc;
use std::time::Instant;

/// Route label for requests that matched no registered resource.
pub const UNMATCHED_ROUTE: &str = "unmatched";

lazy_static::lazy_static! {
    pub static ref API_REQUESTS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "connect_api_requests_total",
        "API requests served, by route pattern and status",
        &["method", "route", "status"]
    ).expect("Prometheus metrics registration should succeed at startup");

    /// Handlers do a handful of store round trips, so buckets stop at a few seconds.
    pub static ref API_REQUEST_SECONDS: HistogramVec = prometheus::register_histogram_vec!(
        "connect_api_request_duration_seconds",
        "API request latency, by route pattern",
        &["method", "route"],
        vec![0.002, 0.005, 0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.5]
    ).expect("Prometheus metrics registration should succeed at startup");

    pub static ref API_REQUESTS_IN_FLIGHT: IntGauge = prometheus::register_int_gauge!(
        "connect_api_requests_in_flight",
        "API requests currently being handled"
    ).expect("Prometheus metrics registration should succeed at startup");
}

/// Records request counts, latency and in-flight requests.
///
/// The route label is the matched pattern (`/api/posts/{id}`), never the raw
/// path, so post and comment ids do not become label values.
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = MetricsMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

/// Decrements the in-flight gauge when the request future finishes or is dropped.
struct InFlight;

impl InFlight {
    fn enter() -> Self {
        API_REQUESTS_IN_FLIGHT.inc();
        InFlight
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        API_REQUESTS_IN_FLIGHT.dec();
    }
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let method = req.method().as_str().to_owned();

        Box::pin(async move {
            let _in_flight = InFlight::enter();
            let start = Instant::now();

            let res = service.call(req).await?;
            let route = res
                .request()
                .match_pattern()
                .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());
            let status = res.status().as_str().to_owned();

            API_REQUESTS_TOTAL
                .with_label_values(&[&method, &route, &status])
                .inc();
            API_REQUEST_SECONDS
                .with_label_values(&[&method, &route])
                .observe(start.elapsed().as_secs_f64());

            Ok(res)
        })
    }
}

/// Render every registered metric in the Prometheus text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!(error = %e, "failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
