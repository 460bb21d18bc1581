// src/db/log_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::log::{Log, LogFiltro, NovoLog},
};

#[derive(Clone)]
pub struct LogRepository {
    pool: PgPool,
}

impl LogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grava uma linha no log de atividades. Recebe o executor para entrar
    /// na mesma transação da alteração que está sendo registrada.
    pub async fn registrar<'e, E>(&self, executor: E, log: &NovoLog) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO logs (acao, modulo, descricao, usuario_logado, usuario_afetado)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(log.acao.as_str())
        .bind(log.modulo.as_str())
        .bind(&log.descricao)
        .bind(log.usuario_logado)
        .bind(log.usuario_afetado)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list(&self, filtro: &LogFiltro, limit: i64) -> Result<Vec<Log>, AppError> {
        let logs = sqlx::query_as::<_, Log>(
            r#"
            SELECT
                l.id, l.acao, l.modulo, l.descricao,
                l.usuario_logado, ul.nome AS usuario_logado_nome,
                l.usuario_afetado, ua.nome AS usuario_afetado_nome,
                l.criado_em
            FROM logs l
            LEFT JOIN usuarios ul ON ul.id = l.usuario_logado
            LEFT JOIN usuarios ua ON ua.id = l.usuario_afetado
            WHERE ($1::text IS NULL OR l.modulo = $1)
              AND ($2::uuid IS NULL OR l.usuario_logado = $2 OR l.usuario_afetado = $2)
            ORDER BY l.criado_em DESC
            LIMIT $3
            "#,
        )
        .bind(filtro.modulo.as_deref())
        .bind(filtro.usuario_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
