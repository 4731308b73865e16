use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    models::auth::AuthenticatedUser,
    services::backup::{json_rows_to_csv, BackupService, EXPORTABLE_TABLES},
    state::AppState,
};

use super::{internal_error, require_admin};

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// GET /backup/{table}?format=json|csv — admin export of one table
pub async fn export_table(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(table): Path<String>,
    Query(params): Query<ExportQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    require_admin(&user)?;

    if !EXPORTABLE_TABLES.contains(&table.as_str()) {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Unknown table: {table}") })),
        ));
    }

    let rows = BackupService::export_table(&state.db, &table)
        .await
        .map_err(internal_error)?;

    match params.format.as_deref().unwrap_or("json") {
        "csv" => {
            let csv = json_rows_to_csv(&rows).map_err(internal_error)?;
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{table}.csv\""),
                    ),
                ],
                csv,
            )
                .into_response())
        }
        "json" => Ok(Json(rows).into_response()),
        other => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("Unsupported format: {other}") })),
        )),
    }
}

/// GET /backup/full — every exportable table in one JSON document
pub async fn export_all(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_admin(&user)?;
    BackupService::export_all(&state.db)
        .await
        .map(Json)
        .map_err(internal_error)
}
