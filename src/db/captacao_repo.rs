// src/db/captacao_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        captacao::{Captacao, Objetivo, Prioridade},
        permissao::Escopo,
    },
};

pub struct DadosCaptacao<'a> {
    pub titulo: &'a str,
    pub regiao: Option<&'a str>,
    pub valor_estimado: Option<Decimal>,
    pub prioridade: Prioridade,
    pub objetivo: Objetivo,
    pub observacoes: Option<&'a str>,
}

#[derive(Clone)]
pub struct CaptacaoRepository {
    pool: PgPool,
}

impl CaptacaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Captacao>, AppError> {
        let captacao = sqlx::query_as::<_, Captacao>(
            r#"
            SELECT c.*, u.nome AS usuario_nome
            FROM captacoes c
            LEFT JOIN usuarios u ON u.id = c.usuario_id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(captacao)
    }

    pub async fn list(&self, escopo: Escopo) -> Result<Vec<Captacao>, AppError> {
        let usuario_id = match escopo {
            Escopo::Todos => None,
            Escopo::Proprios(id) => Some(id),
        };

        let captacoes = sqlx::query_as::<_, Captacao>(
            r#"
            SELECT c.*, u.nome AS usuario_nome
            FROM captacoes c
            LEFT JOIN usuarios u ON u.id = c.usuario_id
            WHERE ($1::uuid IS NULL OR c.usuario_id = $1)
            ORDER BY c.criado_em DESC
            "#,
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(captacoes)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        dados: DadosCaptacao<'_>,
        usuario_id: Uuid,
    ) -> Result<Captacao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let captacao = sqlx::query_as::<_, Captacao>(
            r#"
            WITH nova AS (
                INSERT INTO captacoes (
                    titulo, regiao, valor_estimado, prioridade, objetivo, observacoes, usuario_id
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            SELECT nova.*, u.nome AS usuario_nome
            FROM nova
            LEFT JOIN usuarios u ON u.id = nova.usuario_id
            "#,
        )
        .bind(dados.titulo)
        .bind(dados.regiao)
        .bind(dados.valor_estimado)
        .bind(dados.prioridade)
        .bind(dados.objetivo)
        .bind(dados.observacoes)
        .bind(usuario_id)
        .fetch_one(executor)
        .await?;

        Ok(captacao)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, dados: DadosCaptacao<'_>) -> Result<Captacao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let captacao = sqlx::query_as::<_, Captacao>(
            r#"
            WITH alterada AS (
                UPDATE captacoes SET
                    titulo = $2, regiao = $3, valor_estimado = $4, prioridade = $5,
                    objetivo = $6, observacoes = $7, atualizado_em = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT alterada.*, u.nome AS usuario_nome
            FROM alterada
            LEFT JOIN usuarios u ON u.id = alterada.usuario_id
            "#,
        )
        .bind(id)
        .bind(dados.titulo)
        .bind(dados.regiao)
        .bind(dados.valor_estimado)
        .bind(dados.prioridade)
        .bind(dados.objetivo)
        .bind(dados.observacoes)
        .fetch_one(executor)
        .await?;

        Ok(captacao)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM captacoes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
