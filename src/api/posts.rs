//! Post CRUD API endpoints.
//!
//! - POST `/` - Create a post (authenticated)
//! - GET `/` - List all posts, oldest first
//! - GET `/{uuid}` - Get a single post
//! - DELETE `/{uuid}` - Delete own post (authenticated, owner only)

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ResultExt, validate_uuid};
use crate::auth::{Auth, HasAuthState};
use crate::db::{Database, Post};
use crate::jwt::AccessTokenCodec;

/// Maximum post length in characters.
const MAX_POST_LEN: usize = 140;

#[derive(Clone)]
pub struct PostsState {
    pub db: Database,
    pub codec: Arc<AccessTokenCodec>,
}

impl HasAuthState for PostsState {
    fn codec(&self) -> &AccessTokenCodec {
        &self.codec
    }
}

pub fn router(state: PostsState) -> Router {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/{uuid}", get(get_post).delete(delete_post))
        .with_state(state)
}

#[derive(Deserialize)]
struct CreatePostRequest {
    body: String,
}

#[derive(Serialize)]
struct PostResponse {
    id: String,
    body: String,
    user_id: String,
    created_at: String,
    updated_at: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.uuid,
            body: post.body,
            user_id: post.author_uuid,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

async fn create_post(
    State(state): State<PostsState>,
    Auth(subject): Auth,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.body.chars().count() > MAX_POST_LEN {
        return Err(ApiError::bad_request("Post is too long"));
    }

    let user = state
        .db
        .users()
        .get_by_uuid(&subject.to_string())
        .await
        .db_err("Failed to get user")?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    let uuid = uuid::Uuid::new_v4().to_string();
    state
        .db
        .posts()
        .create(&uuid, user.id, &payload.body)
        .await
        .db_err("Failed to create post")?;

    let post = state
        .db
        .posts()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to load created post")?
        .ok_or_else(|| ApiError::internal("Failed to create post"))?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

async fn list_posts(State(state): State<PostsState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state
        .db
        .posts()
        .list_all()
        .await
        .db_err("Failed to list posts")?;

    let posts: Vec<PostResponse> = posts.into_iter().map(PostResponse::from).collect();
    Ok((StatusCode::OK, Json(posts)))
}

async fn get_post(
    State(state): State<PostsState>,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    validate_uuid(&uuid)?;

    let post = state
        .db
        .posts()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to get post")?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok((StatusCode::OK, Json(PostResponse::from(post))))
}

async fn delete_post(
    State(state): State<PostsState>,
    Auth(subject): Auth,
    Path(uuid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    validate_uuid(&uuid)?;

    let post = state
        .db
        .posts()
        .get_by_uuid(&uuid)
        .await
        .db_err("Failed to get post")?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if post.author_uuid != subject.to_string() {
        return Err(ApiError::forbidden("You can only delete your own posts"));
    }

    let deleted = state
        .db
        .posts()
        .delete(post.id)
        .await
        .db_err("Failed to delete post")?;

    if !deleted {
        return Err(ApiError::not_found("Post not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
