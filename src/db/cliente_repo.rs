// src/db/cliente_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{error::AppError, telefone},
    models::{
        cliente::{
            Cliente, ClienteAtribuicao, ClienteFiltro, ClienteStatus, ClienteStatusHistorico, Interesse,
        },
        permissao::Escopo,
    },
};

// Mesma expressão do índice idx_clientes_telefone_digitos
const TELEFONE_DIGITOS: &str = r"regexp_replace(telefone, '\D', '', 'g')";

pub struct NovoCliente<'a> {
    pub nome: &'a str,
    pub telefone: &'a str,
    pub email: Option<&'a str>,
    pub interesse: Option<Interesse>,
    pub valor: Option<Decimal>,
    pub status: ClienteStatus,
    pub tags: &'a [String],
    pub observacoes: Option<&'a str>,
    pub atribuido_a: Option<Uuid>,
    pub cadastrado_por: Uuid,
}

#[derive(Clone)]
pub struct ClienteRepository {
    pool: PgPool,
}

impl ClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Cliente>, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(cliente)
    }

    /// Trava a linha até o fim da transação (alterações concorrentes no mesmo cliente).
    pub async fn find_by_id_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(cliente)
    }

    /// Procura outro cliente com o mesmo telefone, comparando só os dígitos.
    pub async fn find_by_telefone<'e, E>(
        &self,
        executor: E,
        telefone: &str,
        excluir: Option<Uuid>,
    ) -> Result<Option<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let digitos = telefone::normalizar(telefone);
        if digitos.is_empty() {
            return Ok(None);
        }

        let cliente = sqlx::query_as::<_, Cliente>(&format!(
            "SELECT * FROM clientes
             WHERE {TELEFONE_DIGITOS} = $1
               AND ($2::uuid IS NULL OR id <> $2)
             ORDER BY criado_em ASC
             LIMIT 1"
        ))
        .bind(digitos)
        .bind(excluir)
        .fetch_optional(executor)
        .await?;

        Ok(cliente)
    }

    fn push_filtros(qb: &mut QueryBuilder<'_, Postgres>, filtro: &ClienteFiltro, escopo: Escopo) {
        qb.push(" WHERE 1 = 1");

        if let Escopo::Proprios(usuario_id) = escopo {
            qb.push(" AND (cadastrado_por = ")
                .push_bind(usuario_id)
                .push(" OR atribuido_a = ")
                .push_bind(usuario_id)
                .push(")");
        }

        if let Some(status) = filtro.status {
            qb.push(" AND status = ").push_bind(status);
        }

        if let Some(atribuido_a) = filtro.atribuido_a {
            qb.push(" AND atribuido_a = ").push_bind(atribuido_a);
        }

        if let Some(busca) = filtro.busca.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            qb.push(" AND (nome ILIKE ").push_bind(format!("%{busca}%"));

            let digitos = telefone::normalizar(busca);
            if !digitos.is_empty() {
                qb.push(" OR ")
                    .push(TELEFONE_DIGITOS)
                    .push(" LIKE ")
                    .push_bind(format!("%{digitos}%"));
            }
            qb.push(")");
        }
    }

    pub async fn list(
        &self,
        filtro: &ClienteFiltro,
        escopo: Escopo,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Cliente>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM clientes");
        Self::push_filtros(&mut qb, filtro, escopo);
        qb.push(" ORDER BY criado_em DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let clientes = qb.build_query_as::<Cliente>().fetch_all(&self.pool).await?;
        Ok(clientes)
    }

    pub async fn count(&self, filtro: &ClienteFiltro, escopo: Escopo) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM clientes");
        Self::push_filtros(&mut qb, filtro, escopo);

        let (total,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(total)
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn create<'e, E>(&self, executor: E, novo: NovoCliente<'_>) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            INSERT INTO clientes (
                nome, telefone, email, interesse, valor, status, tags, observacoes,
                atribuido_a, cadastrado_por, data_atribuicao
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                CASE WHEN $9::uuid IS NULL THEN NULL ELSE NOW() END
            )
            RETURNING *
            "#,
        )
        .bind(novo.nome)
        .bind(novo.telefone)
        .bind(novo.email)
        .bind(novo.interesse)
        .bind(novo.valor)
        .bind(novo.status)
        .bind(novo.tags)
        .bind(novo.observacoes)
        .bind(novo.atribuido_a)
        .bind(novo.cadastrado_por)
        .fetch_one(executor)
        .await?;

        Ok(cliente)
    }

    /// Regrava os campos editáveis (a atribuição tem rota própria).
    pub async fn update<'e, E>(&self, executor: E, cliente: &Cliente) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let atualizado = sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes SET
                nome = $2, telefone = $3, email = $4, interesse = $5, valor = $6,
                status = $7, tags = $8, observacoes = $9,
                primeiro_contato = $10, ultimo_contato = $11, atualizado_em = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(cliente.id)
        .bind(&cliente.nome)
        .bind(&cliente.telefone)
        .bind(&cliente.email)
        .bind(cliente.interesse)
        .bind(cliente.valor)
        .bind(cliente.status)
        .bind(&cliente.tags)
        .bind(&cliente.observacoes)
        .bind(cliente.primeiro_contato)
        .bind(cliente.ultimo_contato)
        .fetch_one(executor)
        .await?;

        Ok(atualizado)
    }

    pub async fn set_atribuicao<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        corretor_id: Option<Uuid>,
    ) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes SET
                atribuido_a = $2,
                data_atribuicao = CASE WHEN $2::uuid IS NULL THEN NULL ELSE NOW() END,
                atualizado_em = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(corretor_id)
        .fetch_one(executor)
        .await?;

        Ok(cliente)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  HISTÓRICO (atribuições e status)
    // =========================================================================

    pub async fn insert_atribuicao<'e, E>(
        &self,
        executor: E,
        cliente_id: Uuid,
        corretor_anterior: Option<Uuid>,
        corretor_novo: Option<Uuid>,
        atribuido_por: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO cliente_atribuicoes (cliente_id, corretor_anterior, corretor_novo, atribuido_por)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(cliente_id)
        .bind(corretor_anterior)
        .bind(corretor_novo)
        .bind(atribuido_por)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn insert_status_historico<'e, E>(
        &self,
        executor: E,
        cliente_id: Uuid,
        status_anterior: ClienteStatus,
        status_novo: ClienteStatus,
        alterado_por: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO cliente_status_historico (cliente_id, status_anterior, status_novo, alterado_por)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(cliente_id)
        .bind(status_anterior)
        .bind(status_novo)
        .bind(alterado_por)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list_atribuicoes(&self, cliente_id: Uuid) -> Result<Vec<ClienteAtribuicao>, AppError> {
        let historico = sqlx::query_as::<_, ClienteAtribuicao>(
            r#"
            SELECT
                h.id, h.cliente_id,
                h.corretor_anterior, ua.nome AS corretor_anterior_nome,
                h.corretor_novo, un.nome AS corretor_novo_nome,
                h.atribuido_por, up.nome AS atribuido_por_nome,
                h.criado_em
            FROM cliente_atribuicoes h
            LEFT JOIN usuarios ua ON ua.id = h.corretor_anterior
            LEFT JOIN usuarios un ON un.id = h.corretor_novo
            LEFT JOIN usuarios up ON up.id = h.atribuido_por
            WHERE h.cliente_id = $1
            ORDER BY h.criado_em DESC
            "#,
        )
        .bind(cliente_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(historico)
    }

    pub async fn list_status_historico(&self, cliente_id: Uuid) -> Result<Vec<ClienteStatusHistorico>, AppError> {
        let historico = sqlx::query_as::<_, ClienteStatusHistorico>(
            r#"
            SELECT
                h.id, h.cliente_id, h.status_anterior, h.status_novo,
                h.alterado_por, u.nome AS alterado_por_nome, h.criado_em
            FROM cliente_status_historico h
            LEFT JOIN usuarios u ON u.id = h.alterado_por
            WHERE h.cliente_id = $1
            ORDER BY h.criado_em DESC
            "#,
        )
        .bind(cliente_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(historico)
    }
}
