// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        auth::{AlterarSenhaPayload, AuthResponse, LoginPayload},
        usuario::Usuario,
    },
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas"),
        (status = 403, description = "Usuário inativo"),
        (status = 429, description = "Muitas tentativas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let resposta = app_state
        .auth_service
        .login(&payload.login, &payload.senha)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(resposta))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário logado", body = Usuario),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn me(AuthenticatedUser(usuario): AuthenticatedUser) -> Json<Usuario> {
    Json(usuario)
}

// POST /api/auth/alterar-senha
#[utoipa::path(
    post,
    path = "/api/auth/alterar-senha",
    tag = "Auth",
    request_body = AlterarSenhaPayload,
    responses(
        (status = 204, description = "Senha alterada"),
        (status = 400, description = "Senha atual incorreta")
    ),
    security(("api_jwt" = []))
)]
pub async fn alterar_senha(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(usuario): AuthenticatedUser,
    Json(payload): Json<AlterarSenhaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    app_state
        .auth_service
        .alterar_senha(&usuario, &payload.senha_atual, &payload.nova_senha)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
