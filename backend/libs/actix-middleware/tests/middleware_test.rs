use actix_middleware::metrics::{
    API_REQUESTS_IN_FLIGHT, API_REQUESTS_TOTAL, API_REQUEST_SECONDS, UNMATCHED_ROUTE,
};
use actix_middleware::{serve_metrics, Logging, MetricsMiddleware};
use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use std::time::Duration;

async fn item(path: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().body(path.into_inner())
}

#[actix_web::test]
async fn test_metrics_label_by_route_pattern() {
    let app = test::init_service(
        App::new()
            .wrap(MetricsMiddleware)
            .route("/items/{id}", web::get().to(item))
            .route("/metrics", web::get().to(serve_metrics)),
    )
    .await;

    let counted = || {
        API_REQUESTS_TOTAL
            .with_label_values(&["GET", "/items/{id}", "200"])
            .get()
    };
    let timed = || {
        API_REQUEST_SECONDS
            .with_label_values(&["GET", "/items/{id}"])
            .get_sample_count()
    };
    let unmatched = || {
        API_REQUESTS_TOTAL
            .with_label_values(&["GET", UNMATCHED_ROUTE, "404"])
            .get()
    };
    let (count_before, timed_before, unmatched_before) = (counted(), timed(), unmatched());
    let in_flight_before = API_REQUESTS_IN_FLIGHT.get();

    for id in ["a", "b"] {
        let req = test::TestRequest::get()
            .uri(&format!("/items/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/nowhere/7").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(counted() - count_before, 2);
    assert_eq!(timed() - timed_before, 2);
    assert_eq!(unmatched() - unmatched_before, 1);
    assert_eq!(API_REQUESTS_IN_FLIGHT.get(), in_flight_before);

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("connect_api_requests_total"));
    assert!(text.contains("connect_api_request_duration_seconds_bucket"));
    assert!(text.contains("route=\"/items/{id}\""));
    assert!(!text.contains("/items/a"));
}

#[actix_web::test]
async fn test_logging_passes_responses_through() {
    let app = test::init_service(
        App::new()
            .wrap(Logging::with_slow_threshold(Duration::ZERO))
            .route("/items/{id}", web::get().to(item)),
    )
    .await;

    let req = test::TestRequest::get().uri("/items/42").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "42".as_bytes());

    let req = test::TestRequest::get().uri("/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
