/// Connect API Service Library
///
/// Posts, likes and comments for the Connect social network, plus account
/// registration. Post routes sit behind bearer-token authentication.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `routes`: route table and shared state
/// - `services`: business logic layer
/// - `db`: store traits with Postgres and in-memory backends
/// - `models`: users, posts, likes and comments
/// - `validation`: ordered field rules for request bodies
/// - `error`: error types and their HTTP rendering
/// - `config`: configuration from the environment
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod validation;

pub use config::Config;
pub use error::{AppError, Result};
