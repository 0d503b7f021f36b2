mod common;

use actix_web::{http::StatusCode, test, App};
use api_service::db::{MemoryStore, PostMutation, PostStore, Stores};
use api_service::models::{Post, User};
use api_service::services::PostService;
use api_service::{AppError, Result};
use async_trait::async_trait;
use common::{app_config, seed_user};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Post store that hands control back to the scheduler around every read and
/// mutation, so concurrent requests interleave at the worst points.
struct YieldingPostStore {
    inner: Arc<MemoryStore>,
}

#[async_trait]
impl PostStore for YieldingPostStore {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        self.inner.list_posts().await
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        let post = self.inner.find_post(id).await;
        tokio::task::yield_now().await;
        post
    }

    async fn insert_post(&self, post: &Post) -> Result<()> {
        self.inner.insert_post(post).await
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        self.inner.delete_post(id).await
    }

    async fn update_post(&self, id: Uuid, mutation: PostMutation) -> Result<Option<Post>> {
        tokio::task::yield_now().await;
        self.inner.update_post(id, mutation).await
    }

    async fn health_check(&self) -> Result<()> {
        self.inner.health_check().await
    }
}

/// Store whose ping always fails, as if the database were down.
struct UnreachablePostStore;

#[async_trait]
impl PostStore for UnreachablePostStore {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        Err(unreachable_store())
    }

    async fn find_post(&self, _id: Uuid) -> Result<Option<Post>> {
        Err(unreachable_store())
    }

    async fn insert_post(&self, _post: &Post) -> Result<()> {
        Err(unreachable_store())
    }

    async fn delete_post(&self, _id: Uuid) -> Result<bool> {
        Err(unreachable_store())
    }

    async fn update_post(&self, _id: Uuid, _mutation: PostMutation) -> Result<Option<Post>> {
        Err(unreachable_store())
    }

    async fn health_check(&self) -> Result<()> {
        Err(unreachable_store())
    }
}

fn unreachable_store() -> AppError {
    AppError::Database("connection refused".to_string())
}

fn yielding_stores() -> Stores {
    let memory = Arc::new(MemoryStore::default());
    Stores {
        users: memory.clone(),
        posts: Arc::new(YieldingPostStore { inner: memory }),
    }
}

async fn seeded_post(stores: &Stores) -> (PostService, Post, User, User) {
    let jane = seed_user(stores, "Jane", "jane@example.com").await;
    let bob = seed_user(stores, "Bob", "bob@example.com").await;
    let service = PostService::new(stores.clone());
    let post = service.create_post(jane.id, "hello").await.unwrap();
    (service, post, jane, bob)
}

#[tokio::test]
async fn test_concurrent_likes_from_different_users_both_persist() {
    let stores = yielding_stores();
    let (service, post, jane, bob) = seeded_post(&stores).await;

    let (first, second) = tokio::join!(
        service.like_post(jane.id, post.id),
        service.like_post(bob.id, post.id),
    );
    first.unwrap();
    second.unwrap();

    let stored = stores.posts.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored.likes.len(), 2);
    assert!(stored.is_liked_by(jane.id));
    assert!(stored.is_liked_by(bob.id));
}

#[tokio::test]
async fn test_concurrent_comments_both_persist() {
    let stores = yielding_stores();
    let (service, post, jane, bob) = seeded_post(&stores).await;

    let (first, second) = tokio::join!(
        service.add_comment(jane.id, post.id, "from jane"),
        service.add_comment(bob.id, post.id, "from bob"),
    );
    first.unwrap();
    second.unwrap();

    let stored = stores.posts.find_post(post.id).await.unwrap().unwrap();
    let mut texts: Vec<&str> = stored.comments.iter().map(|c| c.text.as_str()).collect();
    texts.sort_unstable();
    assert_eq!(texts, vec!["from bob", "from jane"]);
}

#[tokio::test]
async fn test_unlike_racing_a_like_keeps_the_other_users_like() {
    let stores = yielding_stores();
    let (service, post, jane, bob) = seeded_post(&stores).await;
    service.like_post(jane.id, post.id).await.unwrap();

    let (unliked, liked) = tokio::join!(
        service.unlike_post(jane.id, post.id),
        service.like_post(bob.id, post.id),
    );
    unliked.unwrap();
    liked.unwrap();

    let stored = stores.posts.find_post(post.id).await.unwrap().unwrap();
    assert!(!stored.is_liked_by(jane.id));
    assert!(stored.is_liked_by(bob.id));
    assert_eq!(stored.likes.len(), 1);
}

#[tokio::test]
async fn test_comment_delete_racing_a_new_comment_keeps_the_new_one() {
    let stores = yielding_stores();
    let (service, post, jane, bob) = seeded_post(&stores).await;
    let comments = service.add_comment(jane.id, post.id, "first").await.unwrap();
    let first = comments[0].id;

    let (deleted, added) = tokio::join!(
        service.delete_comment(jane.id, post.id, first),
        service.add_comment(bob.id, post.id, "second"),
    );
    deleted.unwrap();
    added.unwrap();

    let stored = stores.posts.find_post(post.id).await.unwrap().unwrap();
    let texts: Vec<&str> = stored.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["second"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_parallel_likes_lose_nothing() {
    let stores = yielding_stores();
    let (service, post, _, _) = seeded_post(&stores).await;

    let likers: Vec<Uuid> = (0..32).map(|_| Uuid::new_v4()).collect();
    let tasks: Vec<_> = likers
        .iter()
        .map(|&user| {
            let service = service.clone();
            tokio::spawn(async move { service.like_post(user, post.id).await })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let stored = stores.posts.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored.likes.len(), likers.len());
    assert!(likers.iter().all(|&user| stored.is_liked_by(user)));
}

#[actix_web::test]
async fn test_health_reports_unavailable_store() {
    let stores = Stores {
        users: Arc::new(MemoryStore::default()),
        posts: Arc::new(UnreachablePostStore),
    };
    let app = test::init_service(App::new().configure(app_config(stores))).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["error"], "Store unavailable");
    assert_eq!(body["service"], "api-service");

    let req = test::TestRequest::get().uri("/api/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
