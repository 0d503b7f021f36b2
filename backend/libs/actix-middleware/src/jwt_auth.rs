use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error, HttpMessage, HttpResponse, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

/// Header accepted in addition to `Authorization: Bearer` for older clients.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// JWT claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Authenticated caller, stored in request extensions by [`JwtAuthMiddleware`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No token, authorization denied")]
    MissingToken,

    #[error("Invalid Authorization header format")]
    InvalidScheme,

    #[error("Token is not valid")]
    InvalidToken,

    #[error("Token is not valid: malformed user id")]
    MalformedSubject,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
            "status": self.status_code().as_u16(),
        }))
    }
}

/// JWT Authentication Middleware
///
/// Validates HS256 tokens signed with the shared secret and inserts the
/// caller's [`UserId`] into the request extensions. Requests without a valid
/// token are answered with 401 before reaching the handler.
#[derive(Clone)]
pub struct JwtAuthMiddleware {
    key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl JwtAuthMiddleware {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation: Arc::new(validation),
        }
    }

    /// Decode and verify a raw token (without any scheme prefix).
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!("JWT validation failed: {}", e);
                AuthError::InvalidToken
            })
    }

    fn authenticate(&self, req: &ServiceRequest) -> Result<UserId, AuthError> {
        let token = extract_token(req)?;
        let claims = self.validate_token(token)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
            tracing::error!("Invalid user_id UUID in token: {}", e);
            AuthError::MalformedSubject
        })?;

        Ok(UserId(user_id))
    }
}

fn extract_token(req: &ServiceRequest) -> Result<&str, AuthError> {
    if let Some(header) = req.headers().get("Authorization") {
        let value = header.to_str().map_err(|_| AuthError::InvalidScheme)?;
        return value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidScheme);
    }

    req.headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = JwtAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            auth: self.clone(),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    auth: JwtAuthMiddleware,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.auth.authenticate(&req) {
            Ok(user_id) => {
                req.extensions_mut().insert(user_id);
                let service = self.service.clone();
                Box::pin(async move {
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                })
            }
            Err(err) => {
                tracing::debug!(path = %req.path(), "rejecting unauthenticated request: {}", err);
                let response = req.error_response(err).map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

impl actix_web::FromRequest for UserId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<UserId>() {
            Some(user_id) => ready(Ok(*user_id)),
            None => ready(Err(AuthError::MissingToken.into())),
        }
    }
}
