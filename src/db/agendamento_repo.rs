// src/db/agendamento_repo.rs

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        agendamento::{Agendamento, AgendamentoFiltro, AgendamentoStatus, AgendamentoTipo},
        permissao::Escopo,
    },
};

// Agendamento + nomes do cliente e do corretor
const SELECT_AGENDAMENTO: &str = r#"
    SELECT
        a.id, a.cliente_id, c.nome AS cliente_nome,
        a.corretor_id, u.nome AS corretor_nome,
        a.data, a.hora, a.tipo, a.status, a.local, a.observacoes, a.criado_em
    FROM agendamentos a
    JOIN clientes c ON c.id = a.cliente_id
    JOIN usuarios u ON u.id = a.corretor_id
"#;

pub struct DadosAgendamento<'a> {
    pub cliente_id: Uuid,
    pub corretor_id: Uuid,
    pub data: NaiveDate,
    pub hora: NaiveTime,
    pub tipo: AgendamentoTipo,
    pub status: AgendamentoStatus,
    pub local: Option<&'a str>,
    pub observacoes: Option<&'a str>,
}

#[derive(Clone)]
pub struct AgendamentoRepository {
    pool: PgPool,
}

impl AgendamentoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Agendamento>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let agendamento = sqlx::query_as::<_, Agendamento>(&format!("{SELECT_AGENDAMENTO} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(agendamento)
    }

    pub async fn list(&self, filtro: &AgendamentoFiltro, escopo: Escopo) -> Result<Vec<Agendamento>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_AGENDAMENTO);
        qb.push(" WHERE 1 = 1");

        // No escopo próprio, o filtro de corretor é ignorado
        match escopo {
            Escopo::Proprios(corretor_id) => {
                qb.push(" AND a.corretor_id = ").push_bind(corretor_id);
            }
            Escopo::Todos => {
                if let Some(corretor_id) = filtro.corretor_id {
                    qb.push(" AND a.corretor_id = ").push_bind(corretor_id);
                }
            }
        }

        if let Some(cliente_id) = filtro.cliente_id {
            qb.push(" AND a.cliente_id = ").push_bind(cliente_id);
        }
        if let Some(inicio) = filtro.data_inicio {
            qb.push(" AND a.data >= ").push_bind(inicio);
        }
        if let Some(fim) = filtro.data_fim {
            qb.push(" AND a.data <= ").push_bind(fim);
        }
        if let Some(status) = filtro.status {
            qb.push(" AND a.status = ").push_bind(status);
        }

        qb.push(" ORDER BY a.data ASC, a.hora ASC");

        let agendamentos = qb.build_query_as::<Agendamento>().fetch_all(&self.pool).await?;
        Ok(agendamentos)
    }

    pub async fn create<'e, E>(&self, executor: E, dados: DadosAgendamento<'_>) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO agendamentos (
                cliente_id, corretor_id, data, hora, tipo, status, local, observacoes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(dados.cliente_id)
        .bind(dados.corretor_id)
        .bind(dados.data)
        .bind(dados.hora)
        .bind(dados.tipo)
        .bind(dados.status)
        .bind(dados.local)
        .bind(dados.observacoes)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, dados: DadosAgendamento<'_>) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE agendamentos SET
                data = $2, hora = $3, tipo = $4, status = $5, local = $6, observacoes = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(dados.data)
        .bind(dados.hora)
        .bind(dados.tipo)
        .bind(dados.status)
        .bind(dados.local)
        .bind(dados.observacoes)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM agendamentos WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
