// src/models/log.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// Ações registradas no log de atividades
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acao {
    Login,
    Criar,
    Editar,
    Excluir,
    Atribuir,
    AlterarStatus,
    AlterarSenha,
}

impl Acao {
    pub fn as_str(&self) -> &'static str {
        match self {
            Acao::Login => "login",
            Acao::Criar => "criar",
            Acao::Editar => "editar",
            Acao::Excluir => "excluir",
            Acao::Atribuir => "atribuir",
            Acao::AlterarStatus => "alterar_status",
            Acao::AlterarSenha => "alterar_senha",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modulo {
    Auth,
    Usuarios,
    Clientes,
    Captacoes,
    Agendamentos,
    BugReports,
}

impl Modulo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modulo::Auth => "auth",
            Modulo::Usuarios => "usuarios",
            Modulo::Clientes => "clientes",
            Modulo::Captacoes => "captacoes",
            Modulo::Agendamentos => "agendamentos",
            Modulo::BugReports => "bug-reports",
        }
    }
}

// O que os serviços mandam gravar
#[derive(Debug, Clone)]
pub struct NovoLog {
    pub acao: Acao,
    pub modulo: Modulo,
    pub descricao: String,
    pub usuario_logado: Option<Uuid>,
    pub usuario_afetado: Option<Uuid>,
}

impl NovoLog {
    pub fn new(acao: Acao, modulo: Modulo, usuario_logado: Uuid, descricao: impl Into<String>) -> Self {
        Self {
            acao,
            modulo,
            descricao: descricao.into(),
            usuario_logado: Some(usuario_logado),
            usuario_afetado: None,
        }
    }

    pub fn afetando(mut self, usuario: Uuid) -> Self {
        self.usuario_afetado = Some(usuario);
        self
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Log {
    pub id: Uuid,
    #[schema(example = "atribuir")]
    pub acao: String,
    #[schema(example = "clientes")]
    pub modulo: String,
    pub descricao: String,
    pub usuario_logado: Option<Uuid>,
    pub usuario_logado_nome: Option<String>,
    pub usuario_afetado: Option<Uuid>,
    pub usuario_afetado_nome: Option<String>,
    pub criado_em: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogFiltro {
    pub modulo: Option<String>,
    pub usuario_id: Option<Uuid>,
    pub limit: Option<i64>,
}
