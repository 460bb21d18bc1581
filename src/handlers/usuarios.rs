// src/handlers/usuarios.rs

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
    models::usuario::{CorretorResumo, CreateUsuarioPayload, UpdateUsuarioPayload, Usuario},
};

// GET /api/usuarios
#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuarios",
    responses(
        (status = 200, description = "Lista de usuários", body = Vec<Usuario>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_usuarios(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let usuarios = app_state
        .usuario_service
        .listar(&ator)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(usuarios))
}

// GET /api/usuarios/{id}
#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário", body = Usuario),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar_usuario(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let usuario = app_state
        .usuario_service
        .buscar(&ator, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(usuario))
}

// POST /api/usuarios
#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "Usuarios",
    request_body = CreateUsuarioPayload,
    responses(
        (status = 201, description = "Usuário criado", body = Usuario),
        (status = 403, description = "Sem permissão para conceder o papel"),
        (status = 409, description = "E-mail ou username já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_usuario(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Json(payload): Json<CreateUsuarioPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let usuario = app_state
        .usuario_service
        .criar(&ator, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(usuario)))
}

// PUT /api/usuarios/{id}
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    request_body = UpdateUsuarioPayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário atualizado", body = Usuario),
        (status = 403, description = "Sem permissão sobre este usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar_usuario(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUsuarioPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let usuario = app_state
        .usuario_service
        .atualizar(&ator, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(usuario))
}

// DELETE /api/usuarios/{id}
#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário excluído"),
        (status = 403, description = "Sem permissão ou auto-exclusão")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir_usuario(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .usuario_service
        .excluir(&ator, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/corretores
#[utoipa::path(
    get,
    path = "/api/corretores",
    tag = "Usuarios",
    responses((status = 200, description = "Corretores ativos", body = Vec<CorretorResumo>)),
    security(("api_jwt" = []))
)]
pub async fn listar_corretores(
    State(app_state): State<AppState>,
    locale: Locale,
    _usuario: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let corretores = app_state
        .usuario_service
        .listar_corretores()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(corretores))
}
