use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;

use crate::database::DbPool;
use crate::error::ApiError;
use crate::models::file_requests::FileRequest;
use crate::models::files::File;
use crate::models::users::User;
use crate::repositories::file_requests;
use crate::requests::query::RequestListQuery;

#[derive(Serialize)]
struct RequestEntry {
    #[serde(flatten)]
    request: FileRequest,
    file: File,
    user: User,
}

/// GET /staff/requests
/// File requests in the given status (pending by default), newest first,
/// each with the referenced file and the requesting user.
pub async fn list_requests(
    pool: web::Data<DbPool>,
    query: web::Query<RequestListQuery>,
) -> Result<HttpResponse, ApiError> {
    let status = query
        .into_inner()
        .status
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "pending".to_string());

    let rows = file_requests::list_by_status(&pool, &status)?;

    let requests: Vec<RequestEntry> = rows
        .into_iter()
        .map(|(request, file, user)| RequestEntry {
            request,
            file,
            user,
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "requests": requests,
        "status": status,
    })))
}
