// src/db/bug_report_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        bug_report::{BugCategoria, BugMessage, BugReport, BugStatus},
        captacao::Prioridade,
        permissao::Escopo,
    },
};

const SELECT_REPORT: &str = r#"
    SELECT b.*, u.nome AS usuario_nome
    FROM bug_reports b
    LEFT JOIN usuarios u ON u.id = b.usuario_id
"#;

#[derive(Clone)]
pub struct BugReportRepository {
    pool: PgPool,
}

impl BugReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<BugReport>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let report = sqlx::query_as::<_, BugReport>(&format!("{SELECT_REPORT} WHERE b.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(report)
    }

    pub async fn list(&self, escopo: Escopo) -> Result<Vec<BugReport>, AppError> {
        let usuario_id = match escopo {
            Escopo::Todos => None,
            Escopo::Proprios(id) => Some(id),
        };

        let reports = sqlx::query_as::<_, BugReport>(&format!(
            "{SELECT_REPORT} WHERE ($1::uuid IS NULL OR b.usuario_id = $1) ORDER BY b.criado_em DESC"
        ))
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        titulo: &str,
        descricao: &str,
        prioridade: Prioridade,
        categoria: BugCategoria,
        usuario_id: Uuid,
    ) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO bug_reports (titulo, descricao, prioridade, categoria, usuario_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(titulo)
        .bind(descricao)
        .bind(prioridade)
        .bind(categoria)
        .bind(usuario_id)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    pub async fn update_status<'e, E>(&self, executor: E, id: Uuid, status: BugStatus) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE bug_reports SET status = $2, atualizado_em = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM bug_reports WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // --- MENSAGENS (chat) ---

    pub async fn list_mensagens(&self, bug_report_id: Uuid) -> Result<Vec<BugMessage>, AppError> {
        let mensagens = sqlx::query_as::<_, BugMessage>(
            r#"
            SELECT m.id, m.bug_report_id, m.usuario_id, u.nome AS usuario_nome, m.mensagem, m.criado_em
            FROM bug_report_mensagens m
            LEFT JOIN usuarios u ON u.id = m.usuario_id
            WHERE m.bug_report_id = $1
            ORDER BY m.criado_em ASC
            "#,
        )
        .bind(bug_report_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(mensagens)
    }

    pub async fn create_mensagem<'e, E>(
        &self,
        executor: E,
        bug_report_id: Uuid,
        usuario_id: Uuid,
        mensagem: &str,
    ) -> Result<BugMessage, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mensagem = sqlx::query_as::<_, BugMessage>(
            r#"
            WITH nova AS (
                INSERT INTO bug_report_mensagens (bug_report_id, usuario_id, mensagem)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT nova.id, nova.bug_report_id, nova.usuario_id, u.nome AS usuario_nome,
                   nova.mensagem, nova.criado_em
            FROM nova
            LEFT JOIN usuarios u ON u.id = nova.usuario_id
            "#,
        )
        .bind(bug_report_id)
        .bind(usuario_id)
        .bind(mensagem)
        .fetch_one(executor)
        .await?;

        Ok(mensagem)
    }
}
