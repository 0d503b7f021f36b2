/// OpenAPI documentation for the Connect API
use crate::handlers::{posts, users};
use crate::models::{Comment, Like, Post, User};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Connect API",
        version = "0.1.0",
        description = "Posts, likes and comments for the Connect social network, plus account registration.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Development server"),
    ),
    paths(
        posts::list_posts,
        posts::get_post,
        posts::create_post,
        posts::delete_post,
        posts::like_post,
        posts::unlike_post,
        posts::add_comment,
        posts::delete_comment,
        users::register,
        users::current_user,
    ),
    components(schemas(
        Post,
        Like,
        Comment,
        User,
        posts::CreatePostRequest,
        posts::CreateCommentRequest,
        users::RegisterRequest,
    )),
    tags(
        (name = "posts", description = "Post creation, retrieval, deletion and likes"),
        (name = "comments", description = "Comments on posts"),
        (name = "users", description = "Registration and current account"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("HS256 token from the identity issuer"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/openapi.json"
    }
}
