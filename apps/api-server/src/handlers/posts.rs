//! Post handlers.

use actix_web::{HttpResponse, web};

use remarks_core::domain::Post;
use remarks_core::service::CreatePost;
use remarks_shared::dto::{CreatePostRequest, PostResponse};

use crate::middleware::error::{AppResult, Traced};
use crate::observability::RequestId;
use crate::state::AppState;

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        title: post.title,
        content: post.content,
        created_at: post.created_at.to_rfc3339(),
        allow_comments: post.allow_comments,
        comments: post.comments.iter().map(ToString::to_string).collect(),
    }
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .comments
        .create_post(CreatePost {
            title: req.title,
            content: req.content,
            allow_comments: req.allow_comments,
        })
        .await
        .traced(&request_id)?;

    tracing::info!(
        request_id = request_id.as_str(),
        post_id = %post.id,
        allow_comments = post.allow_comments,
        "Post created"
    );

    Ok(HttpResponse::Created().json(post_response(post)))
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    request_id: RequestId,
) -> AppResult<HttpResponse> {
    let posts = state
        .comments
        .list_posts()
        .await
        .traced(&request_id)?;
    let body: Vec<PostResponse> = posts.into_iter().map(post_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    request_id: RequestId,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state
        .comments
        .get_post(&id)
        .await
        .traced(&request_id)?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}
