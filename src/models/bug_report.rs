// src/models/bug_report.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::captacao::Prioridade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "bug_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BugStatus {
    Aberto,
    EmAndamento,
    Resolvido,
    Fechado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "bug_categoria", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BugCategoria {
    Interface,
    Funcionalidade,
    Desempenho,
    Outro,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BugReport {
    pub id: Uuid,
    #[schema(example = "Filtro de status não funciona")]
    pub titulo: String,
    pub descricao: String,
    pub prioridade: Prioridade,
    pub status: BugStatus,
    pub categoria: BugCategoria,
    pub usuario_id: Option<Uuid>,
    pub usuario_nome: Option<String>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

// Mensagem do chat de um bug report
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BugMessage {
    pub id: Uuid,
    pub bug_report_id: Uuid,
    pub usuario_id: Option<Uuid>,
    pub usuario_nome: Option<String>,
    pub mensagem: String,
    pub criado_em: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BugReportDetalhe {
    #[serde(flatten)]
    pub report: BugReport,
    pub mensagens: Vec<BugMessage>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBugReportPayload {
    #[validate(length(min = 3, max = 200, message = "O título deve ter entre 3 e 200 caracteres."))]
    pub titulo: String,
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub descricao: String,
    pub prioridade: Option<Prioridade>,
    pub categoria: Option<BugCategoria>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBugStatusPayload {
    pub status: BugStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBugMessagePayload {
    #[validate(length(min = 1, max = 5000, message = "A mensagem deve ter entre 1 e 5000 caracteres."))]
    pub mensagem: String,
}
