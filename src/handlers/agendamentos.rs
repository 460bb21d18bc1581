// src/handlers/agendamentos.rs

use axum::{
    extract::{Path, Query, State},
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
    models::agendamento::{Agendamento, AgendamentoFiltro, CreateAgendamentoPayload, UpdateAgendamentoPayload},
};

#[utoipa::path(
    get,
    path = "/api/agendamentos",
    tag = "Agendamentos",
    params(AgendamentoFiltro),
    responses((status = 200, description = "Agenda", body = Vec<Agendamento>)),
    security(("api_jwt" = []))
)]
pub async fn listar_agendamentos(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Query(filtro): Query<AgendamentoFiltro>,
) -> Result<impl IntoResponse, ApiError> {
    let agendamentos = app_state
        .agendamento_service
        .listar(&ator, filtro)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(agendamentos))
}

#[utoipa::path(
    get,
    path = "/api/agendamentos/{id}",
    tag = "Agendamentos",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses(
        (status = 200, description = "Agendamento", body = Agendamento),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar_agendamento(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let agendamento = app_state
        .agendamento_service
        .buscar(&ator, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(agendamento))
}

#[utoipa::path(
    post,
    path = "/api/agendamentos",
    tag = "Agendamentos",
    request_body = CreateAgendamentoPayload,
    responses(
        (status = 201, description = "Agendamento criado", body = Agendamento),
        (status = 403, description = "Corretor só agenda para si")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_agendamento(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Json(payload): Json<CreateAgendamentoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let agendamento = app_state
        .agendamento_service
        .criar(&ator, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(agendamento)))
}

#[utoipa::path(
    put,
    path = "/api/agendamentos/{id}",
    tag = "Agendamentos",
    request_body = UpdateAgendamentoPayload,
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses((status = 200, description = "Agendamento atualizado", body = Agendamento)),
    security(("api_jwt" = []))
)]
pub async fn atualizar_agendamento(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAgendamentoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let agendamento = app_state
        .agendamento_service
        .atualizar(&ator, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(agendamento))
}

#[utoipa::path(
    delete,
    path = "/api/agendamentos/{id}",
    tag = "Agendamentos",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    responses((status = 204, description = "Agendamento excluído")),
    security(("api_jwt" = []))
)]
pub async fn excluir_agendamento(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .agendamento_service
        .excluir(&ator, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
