// src/db/usuario_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::{
        permissao::RoleSet,
        usuario::{CorretorResumo, Usuario, UsuarioStatus},
    },
};

// Filtro por papel sobre a coluna `permissao` (texto separado por vírgulas)
const TEM_PAPEL: &str = "(',' || permissao || ',') LIKE ('%,' || $1 || ',%')";

// Dados para inserir um usuário (senha já em hash)
pub struct NovoUsuario<'a> {
    pub nome: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub senha_hash: &'a str,
    pub permissao: &'a RoleSet,
    pub status: UsuarioStatus,
    pub telefone: Option<&'a str>,
    pub departamento: Option<&'a str>,
}

// O repositório de usuários, responsável por todas as interações com a tabela 'usuarios'
#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Usuario>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(usuario)
    }

    /// Login aceita o username ou o e-mail (sem diferenciar maiúsculas no e-mail).
    pub async fn find_by_login(&self, login: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios WHERE username = $1 OR LOWER(email) = LOWER($1) LIMIT 1",
        )
        .bind(login.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(usuario)
    }

    pub async fn list(&self) -> Result<Vec<Usuario>, AppError> {
        let usuarios = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios ORDER BY nome ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(usuarios)
    }

    /// Corretores ativos, só com os campos públicos.
    pub async fn list_corretores(&self) -> Result<Vec<CorretorResumo>, AppError> {
        let corretores = sqlx::query_as::<_, CorretorResumo>(&format!(
            "SELECT id, nome, departamento FROM usuarios
             WHERE status = 'ativo' AND {TEM_PAPEL}
             ORDER BY nome ASC"
        ))
        .bind("corretor")
        .fetch_all(&self.pool)
        .await?;

        Ok(corretores)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM usuarios")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    /// Trava as linhas dos head-admins ativos até o fim da transação e devolve
    /// quantos são. Duas rebaixas concorrentes se serializam aqui.
    pub async fn lock_head_admins_ativos<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // FOR UPDATE não combina com COUNT(*): busca os ids e conta aqui
        let ids: Vec<(Uuid,)> = sqlx::query_as(&format!(
            "SELECT id FROM usuarios WHERE status = 'ativo' AND {TEM_PAPEL} FOR UPDATE"
        ))
        .bind("head-admin")
        .fetch_all(executor)
        .await?;

        Ok(ids.len() as i64)
    }

    // Cria um novo usuário no banco de dados
    pub async fn create<'e, E>(&self, executor: E, novo: NovoUsuario<'_>) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (
                nome, email, username, senha_hash, permissao, status, telefone, departamento
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(novo.nome)
        .bind(novo.email)
        .bind(novo.username)
        .bind(novo.senha_hash)
        .bind(novo.permissao.to_string())
        .bind(novo.status)
        .bind(novo.telefone)
        .bind(novo.departamento)
        .fetch_one(executor)
        .await
        // Converte erro de violação de chave única em um erro mais amigável
        .map_err(map_unique_violation)
    }

    /// Regrava os campos editáveis a partir do estado já mesclado pelo serviço.
    pub async fn update<'e, E>(&self, executor: E, usuario: &Usuario) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios SET
                nome = $2, email = $3, username = $4, senha_hash = $5, permissao = $6,
                status = $7, telefone = $8, departamento = $9, atualizado_em = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(usuario.id)
        .bind(&usuario.nome)
        .bind(&usuario.email)
        .bind(&usuario.username)
        .bind(&usuario.senha_hash)
        .bind(usuario.permissao.to_string())
        .bind(usuario.status)
        .bind(&usuario.telefone)
        .bind(&usuario.departamento)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)
    }

    pub async fn update_senha<'e, E>(&self, executor: E, id: Uuid, senha_hash: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE usuarios SET senha_hash = $2, atualizado_em = NOW() WHERE id = $1")
            .bind(id)
            .bind(senha_hash)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn touch_ultimo_acesso(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE usuarios SET ultimo_acesso = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
