use std::collections::HashMap;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::common::i18n::{traduzir, IDIOMA_PADRAO};
use crate::middleware::i18n::Locale;
use crate::models::permissao::PermissaoInvalida;

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Permissão inválida: {0}")]
    PermissaoInvalida(#[from] PermissaoInvalida),

    // Entrada sintaticamente válida mas recusada pela regra de negócio
    #[error("Entrada inválida: {0}")]
    InvalidInput(&'static str),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário inativo")]
    UsuarioInativo,

    #[error("Acesso negado: {0}")]
    Forbidden(&'static str),

    #[error("Recurso não encontrado: {0}")]
    NotFound(&'static str),

    #[error("Telefone já cadastrado para o cliente {cliente_id}")]
    TelefoneDuplicado { cliente_id: Uuid, nome: String },

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Username já existe")]
    UsernameAlreadyExists,

    #[error("Muitas requisições")]
    TooManyRequests { retry_after_secs: u64 },

    // Variante para erros de banco de dados (exemplo com sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// O erro no formato que sai pela API.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: String,
    pub details: Option<Value>,
    pub retry_after_secs: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, error: impl Into<String>) -> Self {
        Self {
            status,
            code,
            error: error.into(),
            details: None,
            retry_after_secs: None,
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::PermissaoInvalida(_)
            | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::UsuarioInativo | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::TelefoneDuplicado { .. }
            | AppError::EmailAlreadyExists
            | AppError::UsernameAlreadyExists => StatusCode::CONFLICT,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte para o formato da API, traduzindo a mensagem para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status();

        match self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ApiError {
                    details: Some(json!(details)),
                    ..ApiError::new(status, "VALIDATION_ERROR", traduzir(lang, "validation"))
                }
            }
            AppError::PermissaoInvalida(e) => ApiError {
                details: Some(json!({ "permissao": e.to_string() })),
                ..ApiError::new(status, "INVALID_ROLES", traduzir(lang, "invalid_roles"))
            },
            AppError::InvalidInput(chave) => ApiError::new(status, "INVALID_INPUT", traduzir(lang, chave)),
            AppError::InvalidCredentials => {
                ApiError::new(status, "INVALID_CREDENTIALS", traduzir(lang, "invalid_credentials"))
            }
            AppError::InvalidToken => ApiError::new(status, "INVALID_TOKEN", traduzir(lang, "invalid_token")),
            AppError::UsuarioInativo => ApiError::new(status, "INACTIVE_USER", traduzir(lang, "inactive_user")),
            AppError::Forbidden(chave) => ApiError::new(status, "FORBIDDEN", traduzir(lang, chave)),
            AppError::NotFound(recurso) => ApiError::new(
                status,
                "NOT_FOUND",
                traduzir(lang, &format!("not_found.{recurso}")),
            ),
            AppError::TelefoneDuplicado { cliente_id, nome } => ApiError {
                details: Some(json!({ "cliente_id": cliente_id, "nome": nome })),
                ..ApiError::new(status, "TELEFONE_DUPLICADO", traduzir(lang, "duplicate_phone"))
            },
            AppError::EmailAlreadyExists => {
                ApiError::new(status, "EMAIL_DUPLICADO", traduzir(lang, "duplicate_email"))
            }
            AppError::UsernameAlreadyExists => {
                ApiError::new(status, "USERNAME_DUPLICADO", traduzir(lang, "duplicate_username"))
            }
            AppError::TooManyRequests { retry_after_secs } => ApiError {
                retry_after_secs: Some(*retry_after_secs),
                ..ApiError::new(status, "RATE_LIMIT_EXCEEDED", traduzir(lang, "too_many_requests"))
            },

            // Todos os outros erros viram 500. O detalhe vai pro log, nunca pro cliente.
            e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                ApiError::new(status, "INTERNAL_ERROR", traduzir(lang, "internal"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.error, "code": self.code });
        if let Some(details) = self.details {
            body["details"] = details;
        }

        let mut response = (self.status, Json(body)).into_response();
        if let Some(secs) = self.retry_after_secs {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

// Quando não temos o Locale à mão (ex.: extratores), respondemos no idioma padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale(IDIOMA_PADRAO.to_string())).into_response()
    }
}

/// Traduz violações de unicidade do Postgres em erros de domínio.
pub fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some(c) if c.contains("username") => AppError::UsernameAlreadyExists,
                _ => AppError::EmailAlreadyExists,
            };
        }
    }
    AppError::DatabaseError(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt() -> Locale {
        Locale("pt".into())
    }

    #[test]
    fn status_http_por_variante() {
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("forbidden").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::UsuarioInativo.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("cliente").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::TooManyRequests { retry_after_secs: 3 }.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn telefone_duplicado_leva_o_cliente_existente_nos_detalhes() {
        let id = Uuid::new_v4();
        let api = AppError::TelefoneDuplicado { cliente_id: id, nome: "Maria".into() }.to_api_error(&pt());
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.code, "TELEFONE_DUPLICADO");
        let details = api.details.unwrap();
        assert_eq!(details["nome"], "Maria");
        assert_eq!(details["cliente_id"], id.to_string());
    }

    #[test]
    fn erro_interno_nao_vaza_detalhes() {
        let api = AppError::InternalServerError(anyhow::anyhow!("senha do banco: 123")).to_api_error(&pt());
        assert_eq!(api.error, "Ocorreu um erro inesperado.");
        assert!(api.details.is_none());
    }

    #[test]
    fn rate_limit_define_retry_after() {
        let response = AppError::TooManyRequests { retry_after_secs: 42 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "42");
    }

    #[test]
    fn mensagem_em_ingles() {
        let api = AppError::NotFound("captacao").to_api_error(&Locale("en".into()));
        assert_eq!(api.error, "Lead not found.");
    }
}
