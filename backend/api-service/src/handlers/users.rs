/// User handlers - registration and current account
use crate::error::Result;
use crate::models::User;
use crate::services::UserService;
use crate::validation::{has_min_chars, is_email, is_present, Rule, Validate, MIN_PASSWORD_LENGTH};
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Checked for length only; credentials are held by the identity issuer.
    #[serde(default)]
    pub password: String,
}

impl Validate for RegisterRequest {
    fn rules() -> Vec<Rule<Self>> {
        vec![
            Rule::new("name", |r: &Self| is_present(&r.name), "Name is required"),
            Rule::new(
                "email",
                |r: &Self| is_email(&r.email),
                "Please include a valid email",
            ),
            Rule::new(
                "password",
                |r: &Self| has_min_chars(&r.password, MIN_PASSWORD_LENGTH),
                "Password must be 6 or more characters",
            ),
        ]
    }
}

/// Register a user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Created account", body = User),
        (status = 400, description = "Validation failed or user already exists")
    )
)]
pub async fn register(
    service: web::Data<UserService>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let user = service.register(&req.name, &req.email).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Get the authenticated caller's account
#[utoipa::path(
    get,
    path = "/api/auth",
    tag = "users",
    responses(
        (status = 200, description = "Current account", body = User),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn current_user(
    service: web::Data<UserService>,
    caller: UserId,
) -> Result<HttpResponse> {
    let user = service.get_user(caller.0).await?;
    Ok(HttpResponse::Ok().json(user))
}
