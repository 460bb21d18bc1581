// src/models/cliente.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::validacao::nome_valido;

// --- ENUMS ---

// Mapeia o CREATE TYPE cliente_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "cliente_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClienteStatus {
    Novo,
    EmAtendimento,
    VisitaAgendada,
    Proposta,
    Fechado,
    Perdido,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "cliente_interesse", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Interesse {
    Compra,
    Venda,
    Aluguel,
    Investimento,
}

// --- CLIENTE ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Cliente {
    pub id: Uuid,
    #[schema(example = "João Pereira")]
    pub nome: String,

    // Campos de contato: ficam `null` para quem só pode visualizar
    #[schema(example = "(11) 98888-7777")]
    pub telefone: Option<String>,
    pub email: Option<String>,

    pub interesse: Option<Interesse>,
    #[schema(value_type = Option<f64>, example = 450000.0)]
    pub valor: Option<Decimal>,
    pub status: ClienteStatus,
    pub tags: Vec<String>,
    pub observacoes: Option<String>,

    pub atribuido_a: Option<Uuid>,
    pub cadastrado_por: Option<Uuid>,
    pub data_atribuicao: Option<DateTime<Utc>>,
    pub primeiro_contato: Option<DateTime<Utc>>,
    pub ultimo_contato: Option<DateTime<Utc>>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

// --- HISTÓRICO ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClienteAtribuicao {
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub corretor_anterior: Option<Uuid>,
    pub corretor_anterior_nome: Option<String>,
    pub corretor_novo: Option<Uuid>,
    pub corretor_novo_nome: Option<String>,
    pub atribuido_por: Option<Uuid>,
    pub atribuido_por_nome: Option<String>,
    pub criado_em: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClienteStatusHistorico {
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub status_anterior: ClienteStatus,
    pub status_novo: ClienteStatus,
    pub alterado_por: Option<Uuid>,
    pub alterado_por_nome: Option<String>,
    pub criado_em: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClienteHistorico {
    pub atribuicoes: Vec<ClienteAtribuicao>,
    pub status: Vec<ClienteStatusHistorico>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClientePayload {
    #[validate(custom(function = "nome_valido"))]
    pub nome: String,

    #[validate(length(min = 8, max = 30, message = "Telefone inválido."))]
    #[schema(example = "(11) 98888-7777")]
    pub telefone: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub interesse: Option<Interesse>,
    #[schema(value_type = Option<f64>)]
    pub valor: Option<Decimal>,
    pub status: Option<ClienteStatus>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub observacoes: Option<String>,

    // Só administradores escolhem o corretor na criação
    pub atribuido_a: Option<Uuid>,

    // Ignora a checagem de telefone duplicado
    #[serde(default)]
    pub forcar: bool,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClientePayload {
    #[validate(custom(function = "nome_valido"))]
    pub nome: Option<String>,

    #[validate(length(min = 8, max = 30, message = "Telefone inválido."))]
    pub telefone: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub interesse: Option<Interesse>,
    #[schema(value_type = Option<f64>)]
    pub valor: Option<Decimal>,
    pub status: Option<ClienteStatus>,
    pub tags: Option<Vec<String>>,
    pub observacoes: Option<String>,

    #[serde(default)]
    pub forcar: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AtribuirClientePayload {
    // `null` remove a atribuição
    pub corretor_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClienteFiltro {
    pub status: Option<ClienteStatus>,
    pub atribuido_a: Option<Uuid>,
    /// Trecho do nome ou do telefone
    pub busca: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientePagina {
    pub dados: Vec<Cliente>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
