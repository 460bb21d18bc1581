// src/models/captacao.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Compartilhado com os bug reports (que usam também `critica`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "prioridade", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Prioridade {
    Baixa,
    Media,
    Alta,
    Critica,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "captacao_objetivo", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Objetivo {
    Venda,
    Locacao,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Captacao {
    pub id: Uuid,
    #[schema(example = "Apartamento 3 quartos - Moema")]
    pub titulo: String,
    #[schema(example = "Zona Sul")]
    pub regiao: Option<String>,
    #[schema(value_type = Option<f64>, example = 820000.0)]
    pub valor_estimado: Option<Decimal>,
    pub prioridade: Prioridade,
    pub objetivo: Objetivo,
    pub observacoes: Option<String>,
    pub usuario_id: Option<Uuid>,
    pub usuario_nome: Option<String>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCaptacaoPayload {
    #[validate(length(min = 3, message = "O título deve ter no mínimo 3 caracteres."))]
    pub titulo: String,
    pub regiao: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub valor_estimado: Option<Decimal>,
    pub prioridade: Option<Prioridade>,
    pub objetivo: Option<Objetivo>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCaptacaoPayload {
    #[validate(length(min = 3, message = "O título deve ter no mínimo 3 caracteres."))]
    pub titulo: Option<String>,
    pub regiao: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub valor_estimado: Option<Decimal>,
    pub prioridade: Option<Prioridade>,
    pub objetivo: Option<Objetivo>,
    pub observacoes: Option<String>,
}
