/// Post handlers - HTTP endpoints for posts, likes and comments
use super::parse_id;
use crate::error::{AppError, Result};
use crate::models::{Comment, Like, Post};
use crate::services::posts::{comment_not_found, PostService};
use crate::validation::{is_present, Rule, Validate};
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub text: String,
}

impl Validate for CreatePostRequest {
    fn rules() -> Vec<Rule<Self>> {
        vec![Rule::new(
            "text",
            |req: &Self| is_present(&req.text),
            "Text is required",
        )]
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub text: String,
}

impl Validate for CreateCommentRequest {
    fn rules() -> Vec<Rule<Self>> {
        vec![Rule::new(
            "text",
            |req: &Self| is_present(&req.text),
            "Text is required",
        )]
    }
}

/// List all posts, newest first
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    responses(
        (status = 200, description = "All posts", body = [Post]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_posts(service: web::Data<PostService>, _caller: UserId) -> Result<HttpResponse> {
    let posts = service.list_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Get a post by ID
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "The post", body = Post),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_post(
    service: web::Data<PostService>,
    _caller: UserId,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&post_id, AppError::post_not_found)?;
    let post = service.get_post(post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Create a new post
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Created post", body = Post),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    service: web::Data<PostService>,
    caller: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let post = service.create_post(caller.0, &req.text).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post owned by the caller
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Removed post", body = Post),
        (status = 401, description = "User not authorized"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    service: web::Data<PostService>,
    caller: UserId,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&post_id, AppError::post_not_found)?;
    let removed = service.delete_post(caller.0, post_id).await?;
    Ok(HttpResponse::Ok().json(removed))
}

/// Like a post
#[utoipa::path(
    put,
    path = "/api/posts/like/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Updated like list", body = [Like]),
        (status = 400, description = "Post already liked"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn like_post(
    service: web::Data<PostService>,
    caller: UserId,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&post_id, AppError::post_not_found)?;
    let likes: Vec<Like> = service.like_post(caller.0, post_id).await?;
    Ok(HttpResponse::Ok().json(likes))
}

/// Remove the caller's like from a post
#[utoipa::path(
    put,
    path = "/api/posts/unlike/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Updated like list", body = [Like]),
        (status = 400, description = "Post has not yet been liked"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn unlike_post(
    service: web::Data<PostService>,
    caller: UserId,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let post_id = parse_id(&post_id, AppError::post_not_found)?;
    let likes = service.unlike_post(caller.0, post_id).await?;
    Ok(HttpResponse::Ok().json(likes))
}

/// Comment on a post
#[utoipa::path(
    post,
    path = "/api/posts/comment/{id}",
    tag = "comments",
    params(("id" = String, Path, description = "Post ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Updated comment list", body = [Comment]),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Post or user not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_comment(
    service: web::Data<PostService>,
    caller: UserId,
    post_id: web::Path<String>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let post_id = parse_id(&post_id, AppError::post_not_found)?;
    let comments: Vec<Comment> = service.add_comment(caller.0, post_id, &req.text).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// Delete one of the caller's comments
#[utoipa::path(
    delete,
    path = "/api/posts/comment/{id}/{comment_id}",
    tag = "comments",
    params(
        ("id" = String, Path, description = "Post ID"),
        ("comment_id" = String, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Remaining comments", body = [Comment]),
        (status = 401, description = "User not authorized"),
        (status = 404, description = "Post or comment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_comment(
    service: web::Data<PostService>,
    caller: UserId,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let post_id = parse_id(&post_id, AppError::post_not_found)?;
    let comment_id = parse_id(&comment_id, comment_not_found)?;

    let comments = service.delete_comment(caller.0, post_id, comment_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}
