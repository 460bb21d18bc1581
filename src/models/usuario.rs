// src/models/usuario.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::validacao::nome_valido, models::permissao::RoleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "usuario_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UsuarioStatus {
    Ativo,
    Inativo,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Usuario {
    pub id: Uuid,
    #[schema(example = "Ana Souza")]
    pub nome: String,
    #[schema(example = "ana@imobiliaria.com")]
    pub email: String,
    #[schema(example = "ana.souza")]
    pub username: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub senha_hash: String,

    #[sqlx(try_from = "String")]
    #[schema(value_type = String, example = "admin,corretor")]
    pub permissao: RoleSet,

    pub status: UsuarioStatus,
    pub telefone: Option<String>,
    pub departamento: Option<String>,
    pub ultimo_acesso: Option<DateTime<Utc>>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

impl Usuario {
    pub fn is_ativo(&self) -> bool {
        self.status == UsuarioStatus::Ativo
    }
}

// Versão pública, usada na listagem de corretores (dropdown de atribuição)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CorretorResumo {
    pub id: Uuid,
    #[schema(example = "Carlos Lima")]
    pub nome: String,
    pub departamento: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUsuarioPayload {
    #[validate(custom(function = "nome_valido"))]
    pub nome: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 3, max = 50, message = "O username deve ter entre 3 e 50 caracteres."))]
    pub username: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,

    #[schema(value_type = String, example = "corretor")]
    pub permissao: RoleSet,

    pub status: Option<UsuarioStatus>,
    pub telefone: Option<String>,
    pub departamento: Option<String>,
}

// Todos os campos opcionais: só o que vier é alterado
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUsuarioPayload {
    #[validate(custom(function = "nome_valido"))]
    pub nome: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    #[validate(length(min = 3, max = 50, message = "O username deve ter entre 3 e 50 caracteres."))]
    pub username: Option<String>,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: Option<String>,

    #[schema(value_type = Option<String>, example = "corretor,visualizar")]
    pub permissao: Option<RoleSet>,

    pub status: Option<UsuarioStatus>,
    pub telefone: Option<String>,
    pub departamento: Option<String>,
}

impl UpdateUsuarioPayload {
    /// Campos que só um administrador pode alterar.
    pub fn altera_campos_administrativos(&self) -> bool {
        self.permissao.is_some() || self.status.is_some() || self.username.is_some()
    }
}
