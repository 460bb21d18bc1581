// src/handlers/bug_reports.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::bug_report::{
        BugMessage, BugReport, BugReportDetalhe, CreateBugMessagePayload, CreateBugReportPayload,
        UpdateBugStatusPayload,
    },
};

#[utoipa::path(
    get,
    path = "/api/bug-reports",
    tag = "BugReports",
    responses((status = 200, description = "Reports do usuário (todos, para administradores)", body = Vec<BugReport>)),
    security(("api_jwt" = []))
)]
pub async fn listar_bug_reports(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let reports = app_state
        .bug_report_service
        .listar(&ator)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(reports))
}

#[utoipa::path(
    get,
    path = "/api/bug-reports/{id}",
    tag = "BugReports",
    params(("id" = Uuid, Path, description = "ID do bug report")),
    responses(
        (status = 200, description = "Report com as mensagens", body = BugReportDetalhe),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar_bug_report(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detalhe = app_state
        .bug_report_service
        .detalhe(&ator, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(detalhe))
}

#[utoipa::path(
    post,
    path = "/api/bug-reports",
    tag = "BugReports",
    request_body = CreateBugReportPayload,
    responses((status = 201, description = "Report aberto", body = BugReport)),
    security(("api_jwt" = []))
)]
pub async fn criar_bug_report(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Json(payload): Json<CreateBugReportPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let report = app_state
        .bug_report_service
        .criar(&ator, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(report)))
}

#[utoipa::path(
    patch,
    path = "/api/bug-reports/{id}/status",
    tag = "BugReports",
    request_body = UpdateBugStatusPayload,
    params(("id" = Uuid, Path, description = "ID do bug report")),
    responses(
        (status = 200, description = "Status alterado", body = BugReport),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar_status_bug_report(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBugStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .bug_report_service
        .atualizar_status(&ator, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(report))
}

#[utoipa::path(
    delete,
    path = "/api/bug-reports/{id}",
    tag = "BugReports",
    params(("id" = Uuid, Path, description = "ID do bug report")),
    responses((status = 204, description = "Report excluído")),
    security(("api_jwt" = []))
)]
pub async fn excluir_bug_report(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .bug_report_service
        .excluir(&ator, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// --- CHAT ---

#[utoipa::path(
    get,
    path = "/api/bug-reports/{id}/mensagens",
    tag = "BugReports",
    params(("id" = Uuid, Path, description = "ID do bug report")),
    responses((status = 200, description = "Mensagens em ordem cronológica", body = Vec<BugMessage>)),
    security(("api_jwt" = []))
)]
pub async fn listar_mensagens(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mensagens = app_state
        .bug_report_service
        .listar_mensagens(&ator, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(mensagens))
}

#[utoipa::path(
    post,
    path = "/api/bug-reports/{id}/mensagens",
    tag = "BugReports",
    request_body = CreateBugMessagePayload,
    params(("id" = Uuid, Path, description = "ID do bug report")),
    responses((status = 201, description = "Mensagem enviada", body = BugMessage)),
    security(("api_jwt" = []))
)]
pub async fn enviar_mensagem(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateBugMessagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mensagem = app_state
        .bug_report_service
        .enviar_mensagem(&ator, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(mensagem)))
}
