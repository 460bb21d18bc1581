// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::usuario::Usuario;

// Dados para login: aceita username ou e-mail
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "Informe o usuário ou e-mail."))]
    #[schema(example = "ana.souza")]
    pub login: String,

    #[validate(length(min = 1, message = "Informe a senha."))]
    pub senha: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AlterarSenhaPayload {
    #[validate(length(min = 1, message = "Informe a senha atual."))]
    pub senha_atual: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub nova_senha: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub usuario: Usuario,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
