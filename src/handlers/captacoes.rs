// src/handlers/captacoes.rs

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
    models::captacao::{Captacao, CreateCaptacaoPayload, UpdateCaptacaoPayload},
};

#[utoipa::path(
    get,
    path = "/api/captacoes",
    tag = "Captacoes",
    responses((status = 200, description = "Captações visíveis ao usuário", body = Vec<Captacao>)),
    security(("api_jwt" = []))
)]
pub async fn listar_captacoes(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let captacoes = app_state
        .captacao_service
        .listar(&ator)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(captacoes))
}

#[utoipa::path(
    get,
    path = "/api/captacoes/{id}",
    tag = "Captacoes",
    params(("id" = Uuid, Path, description = "ID da captação")),
    responses(
        (status = 200, description = "Captação", body = Captacao),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar_captacao(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let captacao = app_state
        .captacao_service
        .buscar(&ator, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(captacao))
}

#[utoipa::path(
    post,
    path = "/api/captacoes",
    tag = "Captacoes",
    request_body = CreateCaptacaoPayload,
    responses((status = 201, description = "Captação cadastrada", body = Captacao)),
    security(("api_jwt" = []))
)]
pub async fn criar_captacao(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Json(payload): Json<CreateCaptacaoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let captacao = app_state
        .captacao_service
        .criar(&ator, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(captacao)))
}

#[utoipa::path(
    put,
    path = "/api/captacoes/{id}",
    tag = "Captacoes",
    request_body = UpdateCaptacaoPayload,
    params(("id" = Uuid, Path, description = "ID da captação")),
    responses((status = 200, description = "Captação atualizada", body = Captacao)),
    security(("api_jwt" = []))
)]
pub async fn atualizar_captacao(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCaptacaoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let captacao = app_state
        .captacao_service
        .atualizar(&ator, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(captacao))
}

#[utoipa::path(
    delete,
    path = "/api/captacoes/{id}",
    tag = "Captacoes",
    params(("id" = Uuid, Path, description = "ID da captação")),
    responses((status = 204, description = "Captação excluída")),
    security(("api_jwt" = []))
)]
pub async fn excluir_captacao(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .captacao_service
        .excluir(&ator, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
