// src/handlers/logs.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::log::{Log, LogFiltro},
};

// GET /api/logs
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Logs",
    params(LogFiltro),
    responses(
        (status = 200, description = "Log de atividades, mais recentes primeiro", body = Vec<Log>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_logs(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Query(filtro): Query<LogFiltro>,
) -> Result<impl IntoResponse, ApiError> {
    let logs = app_state
        .log_service
        .listar(&ator, filtro)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(logs))
}
