// src/models/agendamento.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "agendamento_tipo", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AgendamentoTipo {
    Visita,
    Reuniao,
    Ligacao,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "agendamento_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AgendamentoStatus {
    Agendado,
    Confirmado,
    Realizado,
    Cancelado,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Agendamento {
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub cliente_nome: String,
    pub corretor_id: Uuid,
    pub corretor_nome: String,
    #[schema(value_type = String, format = Date, example = "2025-03-14")]
    pub data: NaiveDate,
    #[schema(value_type = String, example = "14:30:00")]
    pub hora: NaiveTime,
    pub tipo: AgendamentoTipo,
    pub status: AgendamentoStatus,
    pub local: Option<String>,
    pub observacoes: Option<String>,
    pub criado_em: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAgendamentoPayload {
    pub cliente_id: Uuid,
    // Vazio = o próprio usuário logado
    pub corretor_id: Option<Uuid>,
    #[schema(value_type = String, format = Date, example = "2025-03-14")]
    pub data: NaiveDate,
    #[schema(value_type = String, example = "14:30")]
    pub hora: NaiveTime,
    pub tipo: Option<AgendamentoTipo>,
    #[validate(length(max = 200, message = "O local deve ter no máximo 200 caracteres."))]
    pub local: Option<String>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAgendamentoPayload {
    #[schema(value_type = Option<String>, format = Date)]
    pub data: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub hora: Option<NaiveTime>,
    pub tipo: Option<AgendamentoTipo>,
    pub status: Option<AgendamentoStatus>,
    #[validate(length(max = 200, message = "O local deve ter no máximo 200 caracteres."))]
    pub local: Option<String>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AgendamentoFiltro {
    #[param(value_type = Option<String>, format = Date)]
    pub data_inicio: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub data_fim: Option<NaiveDate>,
    pub corretor_id: Option<Uuid>,
    pub cliente_id: Option<Uuid>,
    pub status: Option<AgendamentoStatus>,
}
