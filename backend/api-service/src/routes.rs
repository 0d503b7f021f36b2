/// Route table and shared application state
use crate::db::Stores;
use crate::error::AppError;
use crate::handlers::{health, posts, users};
use crate::openapi::ApiDoc;
use crate::services::{PostService, UserService};
use actix_middleware::{serve_metrics, JwtAuthMiddleware};
use actix_web::{web, HttpResponse};
use utoipa::OpenApi;

/// Register state and every route on an `App`. Post routes and the current
/// account route require a valid bearer token signed with `jwt_secret`.
pub fn configure(cfg: &mut web::ServiceConfig, stores: Stores, jwt_secret: &str) {
    let auth = JwtAuthMiddleware::new(jwt_secret);

    cfg.app_data(web::Data::new(PostService::new(stores.clone())))
        .app_data(web::Data::new(UserService::new(stores.clone())))
        .app_data(web::Data::new(stores))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AppError::BadRequest(format!("Invalid request body: {}", err)).into()
        }))
        .route("/metrics", web::get().to(serve_metrics))
        .route(ApiDoc::openapi_json_path(), web::get().to(openapi_json))
        .route("/api/health", web::get().to(health::health_summary))
        .route("/api/health/live", web::get().to(health::liveness_check))
        .route("/api/users", web::post().to(users::register))
        .service(
            web::scope("/api/auth")
                .wrap(auth.clone())
                .route("", web::get().to(users::current_user)),
        )
        .service(
            web::scope("/api/posts")
                .wrap(auth)
                .service(
                    web::resource("")
                        .route(web::get().to(posts::list_posts))
                        .route(web::post().to(posts::create_post)),
                )
                .route("/like/{id}", web::put().to(posts::like_post))
                .route("/unlike/{id}", web::put().to(posts::unlike_post))
                .route("/comment/{id}", web::post().to(posts::add_comment))
                .route(
                    "/comment/{id}/{comment_id}",
                    web::delete().to(posts::delete_comment),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(posts::get_post))
                        .route(web::delete().to(posts::delete_post)),
                ),
        );
}

async fn openapi_json() -> actix_web::Result<HttpResponse> {
    let body = ApiDoc::openapi().to_json().map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}
