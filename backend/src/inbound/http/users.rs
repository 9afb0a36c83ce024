//! User directory handlers.
//!
//! ```text
//! GET /api/v1/users
//! ```
//!
//! Read-only listing of active publishers with per-status territory counts,
//! used by assignment pickers in the client.

use actix_web::{get, web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Error, UserSummary};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Wire shape for one user in the directory listing.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub congregation_id: Option<Uuid>,
    pub assigned_territories: i64,
    pub available_territories: i64,
    pub completed_territories: i64,
    pub returned_territories: i64,
}

impl From<UserSummary> for UserResponse {
    fn from(summary: UserSummary) -> Self {
        let name = summary.user.display_name().to_owned();
        Self {
            id: summary.user.id,
            name,
            email: summary.user.email,
            role: summary.user.role.as_str().to_owned(),
            congregation_id: summary.user.congregation_id,
            assigned_territories: summary.assigned_territories,
            available_territories: summary.available_territories,
            completed_territories: summary.completed_territories,
            returned_territories: summary.returned_territories,
        }
    }
}

/// List active users with territory counts.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Active users", body = [UserResponse]),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "list_users"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let summaries = state.users.list_users().await?;
    let users: Vec<UserResponse> = summaries.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(users))
}
