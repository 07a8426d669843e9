//! Comment handlers.

use actix_web::{HttpResponse, web};

use remarks_core::domain::Comment;
use remarks_core::service::{CreateComment, ListComments};
use remarks_shared::dto::{
    CommentResponse, CommentsQuery, CreateCommentRequest, PageCountResponse,
};

use crate::middleware::error::{AppResult, Traced};
use crate::observability::RequestId;
use crate::state::AppState;

fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id.to_string(),
        post_id: comment.post_id.to_string(),
        parent_comment_id: comment.parent_comment_id.map(|id| id.to_string()),
        content: comment.content,
        created_at: comment.created_at.to_rfc3339(),
        replies: comment.replies.iter().map(ToString::to_string).collect(),
    }
}

fn comment_list(comments: Vec<Comment>) -> Vec<CommentResponse> {
    comments.into_iter().map(comment_response).collect()
}

/// POST /api/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let comment = state
        .comments
        .create_comment(CreateComment {
            post_id: req.post_id,
            parent_comment_id: req.parent_comment_id,
            content: req.content,
        })
        .await
        .traced(&request_id)?;

    tracing::info!(
        request_id = request_id.as_str(),
        comment_id = %comment.id,
        post_id = %comment.post_id,
        reply = !comment.is_top_level(),
        "Comment created"
    );

    Ok(HttpResponse::Created().json(comment_response(comment)))
}

/// GET /api/posts/{id}/comments?page=k
pub async fn list_comments(
    state: web::Data<AppState>,
    request_id: RequestId,
    post_id: web::Path<String>,
    query: web::Query<CommentsQuery>,
) -> AppResult<HttpResponse> {
    let comments = state
        .comments
        .list_comments(ListComments {
            post_id: post_id.into_inner(),
            page: query.page,
        })
        .await
        .traced(&request_id)?;

    Ok(HttpResponse::Ok().json(comment_list(comments)))
}

/// GET /api/posts/{id}/comments/pages
pub async fn count_comment_pages(
    state: web::Data<AppState>,
    request_id: RequestId,
    post_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let pages = state
        .comments
        .count_comment_pages(&post_id)
        .await
        .traced(&request_id)?;

    Ok(HttpResponse::Ok().json(PageCountResponse { pages }))
}

/// GET /api/comments/{id}
pub async fn get_comment(
    state: web::Data<AppState>,
    request_id: RequestId,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .get_comment(&id)
        .await
        .traced(&request_id)?;

    Ok(HttpResponse::Ok().json(comment_response(comment)))
}

/// GET /api/comments/{id}/replies
pub async fn get_replies(
    state: web::Data<AppState>,
    request_id: RequestId,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let replies = state
        .comments
        .get_replies(&id)
        .await
        .traced(&request_id)?;

    Ok(HttpResponse::Ok().json(comment_list(replies)))
}
