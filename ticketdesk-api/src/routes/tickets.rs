/// Ticket endpoints
///
/// Any authenticated user may read and change any ticket. Mutations check
/// existence first and run inside one transaction with the check.
///
/// # Endpoints
///
/// - `POST /tickets/` - Create a ticket owned by the caller
/// - `GET /tickets/?skip=0&limit=10` - List tickets in creation order
/// - `GET /tickets/:id` - Read a ticket
/// - `PUT /tickets/:id` - Partially update a ticket
/// - `DELETE /tickets/:id` - Delete a ticket and its comments

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Deserializer};
use ticketdesk_shared::{
    auth::middleware::CurrentUser,
    db::pool,
    models::ticket::{CreateTicket, Ticket, TicketPatch},
};
use tracing::info;
use validator::Validate;

const DEFAULT_LIMIT: u32 = 10;

/// Create ticket request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketRequest {
    #[validate(length(max = 100, message = "Title must be at most 100 characters"))]
    pub title: String,

    pub description: String,

    #[validate(length(max = 100, message = "Platform must be at most 100 characters"))]
    pub platform: String,

    /// Free-text name of whoever reported the issue
    #[validate(length(max = 100, message = "Username must be at most 100 characters"))]
    pub username: String,

    #[validate(length(
        max = 100,
        message = "Restaurant branch must be at most 100 characters"
    ))]
    pub restaurant_branch: String,
}

/// Partial update request
///
/// Absent fields are left alone. An explicit `null` is rejected since no
/// ticket field is nullable; send `""` to clear a field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTicketRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub platform: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub username: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub restaurant_branch: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub status: Option<Option<String>>,
}

/// Distinguishes a present `null` (`Some(None)`) from an absent field (`None`)
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Unwraps one patch field, recording null and over-length values
fn patch_field(
    name: &str,
    value: Option<Option<String>>,
    max_len: Option<usize>,
    errors: &mut Vec<ValidationErrorDetail>,
) -> Option<String> {
    match value? {
        None => {
            errors.push(ValidationErrorDetail::new(name, "Field may not be null"));
            None
        }
        Some(v) => {
            if let Some(max) = max_len {
                if v.chars().count() > max {
                    errors.push(ValidationErrorDetail::new(
                        name,
                        format!("Must be at most {} characters", max),
                    ));
                }
            }
            Some(v)
        }
    }
}

impl UpdateTicketRequest {
    /// Converts to a storage patch, or a 422 listing every bad field
    pub fn into_patch(self) -> ApiResult<TicketPatch> {
        let mut errors = Vec::new();

        let patch = TicketPatch {
            title: patch_field("title", self.title, Some(100), &mut errors),
            description: patch_field("description", self.description, None, &mut errors),
            platform: patch_field("platform", self.platform, Some(100), &mut errors),
            username: patch_field("username", self.username, Some(100), &mut errors),
            restaurant_branch: patch_field(
                "restaurant_branch",
                self.restaurant_branch,
                Some(100),
                &mut errors,
            ),
            status: patch_field("status", self.status, Some(20), &mut errors),
        };

        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(ApiError::ValidationError(errors))
        }
    }
}

/// Pagination query
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

fn ticket_not_found() -> ApiError {
    ApiError::NotFound("Ticket not found".to_string())
}

/// Create a ticket owned by the authenticated user
///
/// The ticket starts in status "unassigned".
pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateTicketRequest>,
) -> ApiResult<Json<Ticket>> {
    req.validate()?;

    let mut tx = pool::begin_write(&state.db).await?;
    let ticket = Ticket::create(
        &mut tx,
        CreateTicket {
            title: req.title,
            description: req.description,
            platform: req.platform,
            username: req.username,
            restaurant_branch: req.restaurant_branch,
        },
        user.id,
    )
    .await?;
    tx.commit().await?;

    info!(ticket_id = ticket.id, user_id = user.id, "Created ticket");

    Ok(Json(ticket))
}

/// List tickets in creation order
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Ticket>>> {
    let skip = i64::from(query.skip.unwrap_or(0));
    let limit = i64::from(query.limit.unwrap_or(DEFAULT_LIMIT));

    let mut conn = state.db.acquire().await?;
    let tickets = Ticket::list(&mut conn, skip, limit).await?;

    Ok(Json(tickets))
}

/// Read one ticket
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Ticket>> {
    let mut conn = state.db.acquire().await?;
    let ticket = Ticket::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(ticket_not_found)?;

    Ok(Json(ticket))
}

/// Partially update a ticket
///
/// Only the fields present in the body change; `updated_at` is always
/// refreshed.
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTicketRequest>,
) -> ApiResult<Json<Ticket>> {
    let patch = req.into_patch()?;

    let mut tx = pool::begin_write(&state.db).await?;
    if !Ticket::exists(&mut tx, id).await? {
        return Err(ticket_not_found());
    }

    let ticket = Ticket::update(&mut tx, id, patch)
        .await?
        .ok_or_else(ticket_not_found)?;
    tx.commit().await?;

    info!(ticket_id = ticket.id, status = %ticket.status, "Updated ticket");

    Ok(Json(ticket))
}

/// Delete a ticket and return its last state
pub async fn delete_ticket(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Ticket>> {
    let mut tx = pool::begin_write(&state.db).await?;
    if !Ticket::exists(&mut tx, id).await? {
        return Err(ticket_not_found());
    }

    let ticket = Ticket::delete(&mut tx, id)
        .await?
        .ok_or_else(ticket_not_found)?;
    tx.commit().await?;

    info!(ticket_id = ticket.id, "Deleted ticket");

    Ok(Json(ticket))
}
