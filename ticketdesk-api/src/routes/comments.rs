/// Ticket comments
///
/// # Endpoints
///
/// - `POST /tickets/:id/comments/` - Comment as the authenticated user
/// - `GET /tickets/:id/comments/` - List comments (public)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use ticketdesk_shared::{
    auth::middleware::CurrentUser,
    db::pool,
    models::{comment::Comment, ticket::Ticket},
};
use tracing::info;

/// Create comment request
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// Add a comment to an existing ticket
///
/// # Errors
///
/// - `404 Not Found`: Ticket does not exist
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(ticket_id): Path<i64>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<Json<Comment>> {
    let mut tx = pool::begin_write(&state.db).await?;
    if !Ticket::exists(&mut tx, ticket_id).await? {
        return Err(ApiError::NotFound("Ticket not found".to_string()));
    }

    let comment = Comment::create(&mut tx, req.text, ticket_id, user.id).await?;
    tx.commit().await?;

    info!(
        comment_id = comment.id,
        ticket_id,
        user_id = user.id,
        "Added comment"
    );

    Ok(Json(comment))
}

/// List a ticket's comments in creation order
///
/// An unknown ticket has no comments.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(ticket_id): Path<i64>,
) -> ApiResult<Json<Vec<Comment>>> {
    let mut conn = state.db.acquire().await?;
    let comments = Comment::list_by_ticket(&mut conn, ticket_id).await?;

    Ok(Json(comments))
}
