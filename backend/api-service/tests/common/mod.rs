#![allow(dead_code)]

use actix_middleware::Claims;
use actix_web::web;
use api_service::db::Stores;
use api_service::models::User;
use api_service::routes;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

pub const SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Route table over the given stores, signed with [`SECRET`].
pub fn app_config(stores: Stores) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| routes::configure(cfg, stores, SECRET)
}

pub async fn seed_user(stores: &Stores, name: &str, email: &str) -> User {
    let user = User::new(name, email);
    stores
        .users
        .insert_user(&user)
        .await
        .expect("seed user");
    user
}

pub fn token_with_expiry(user_id: Uuid, expires_in_seconds: i64, secret: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + expires_in_seconds,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("sign test token")
}

pub fn token_for(user_id: Uuid) -> String {
    token_with_expiry(user_id, 3600, SECRET)
}

pub fn bearer(user_id: Uuid) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(user_id)))
}
