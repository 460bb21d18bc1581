// src/handlers/clientes.rs

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
    models::cliente::{
        AtribuirClientePayload, Cliente, ClienteFiltro, ClienteHistorico, ClientePagina, CreateClientePayload,
        UpdateClientePayload,
    },
};

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    params(ClienteFiltro),
    responses((status = 200, description = "Página de clientes", body = ClientePagina)),
    security(("api_jwt" = []))
)]
pub async fn listar_clientes(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Query(filtro): Query<ClienteFiltro>,
) -> Result<impl IntoResponse, ApiError> {
    let pagina = app_state
        .cliente_service
        .listar(&ator, filtro)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(pagina))
}

// GET /api/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Cliente),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let cliente = app_state
        .cliente_service
        .buscar(&ator, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(cliente))
}

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = CreateClientePayload,
    responses(
        (status = 201, description = "Cliente cadastrado", body = Cliente),
        (status = 409, description = "Telefone já cadastrado (envie `forcar: true` para ignorar)")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Json(payload): Json<CreateClientePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let cliente = app_state
        .cliente_service
        .criar(&ator, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(cliente)))
}

// PUT /api/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    request_body = UpdateClientePayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = Cliente),
        (status = 403, description = "Cliente de outro corretor"),
        (status = 409, description = "Telefone já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let cliente = app_state
        .cliente_service
        .atualizar(&ator, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(cliente))
}

// DELETE /api/clientes/{id}
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 204, description = "Cliente excluído")),
    security(("api_jwt" = []))
)]
pub async fn excluir_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .cliente_service
        .excluir(&ator, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/clientes/{id}/atribuir
#[utoipa::path(
    post,
    path = "/api/clientes/{id}/atribuir",
    tag = "Clientes",
    request_body = AtribuirClientePayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Atribuição registrada", body = Cliente),
        (status = 400, description = "Corretor inválido ou inativo"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn atribuir_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtribuirClientePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let cliente = app_state
        .cliente_service
        .atribuir(&ator, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(cliente))
}

// GET /api/clientes/{id}/historico
#[utoipa::path(
    get,
    path = "/api/clientes/{id}/historico",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 200, description = "Histórico de atribuições e de status", body = ClienteHistorico)),
    security(("api_jwt" = []))
)]
pub async fn historico_cliente(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let historico = app_state
        .cliente_service
        .historico(&ator, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(historico))
}
