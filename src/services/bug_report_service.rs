// src/services/bug_report_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BugReportRepository, LogRepository},
    models::{
        bug_report::{
            BugCategoria, BugMessage, BugReport, BugReportDetalhe, BugStatus, CreateBugMessagePayload,
            CreateBugReportPayload,
        },
        captacao::Prioridade,
        log::{Acao, Modulo, NovoLog},
        usuario::Usuario,
    },
    services::authorization::{escopo_bug_reports, pode_acessar_bug_report},
};

#[derive(Clone)]
pub struct BugReportService {
    repo: BugReportRepository,
    log_repo: LogRepository,
    pool: PgPool,
}

impl BugReportService {
    pub fn new(repo: BugReportRepository, log_repo: LogRepository, pool: PgPool) -> Self {
        Self { repo, log_repo, pool }
    }

    pub async fn listar(&self, ator: &Usuario) -> Result<Vec<BugReport>, AppError> {
        self.repo.list(escopo_bug_reports(ator)).await
    }

    async fn carregar(&self, ator: &Usuario, id: Uuid) -> Result<BugReport, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .filter(|r| pode_acessar_bug_report(ator, r))
            .ok_or(AppError::NotFound("bug_report"))
    }

    pub async fn detalhe(&self, ator: &Usuario, id: Uuid) -> Result<BugReportDetalhe, AppError> {
        let report = self.carregar(ator, id).await?;
        let mensagens = self.repo.list_mensagens(id).await?;
        Ok(BugReportDetalhe { report, mensagens })
    }

    /// Qualquer usuário ativo pode abrir um report, inclusive o somente-visualizar.
    pub async fn criar(&self, ator: &Usuario, payload: CreateBugReportPayload) -> Result<BugReport, AppError> {
        let mut tx = self.pool.begin().await?;

        let id = self
            .repo
            .create(
                &mut *tx,
                payload.titulo.trim(),
                payload.descricao.trim(),
                payload.prioridade.unwrap_or(Prioridade::Media),
                payload.categoria.unwrap_or(BugCategoria::Outro),
                ator.id,
            )
            .await?;

        self.log_repo
            .registrar(
                &mut *tx,
                &NovoLog::new(
                    Acao::Criar,
                    Modulo::BugReports,
                    ator.id,
                    format!("Bug report '{}' aberto", payload.titulo.trim()),
                ),
            )
            .await?;

        let report = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("bug_report"))?;

        tx.commit().await?;

        tracing::info!("🐞 Bug report {} aberto por {}", id, ator.username);
        Ok(report)
    }

    pub async fn atualizar_status(&self, ator: &Usuario, id: Uuid, status: BugStatus) -> Result<BugReport, AppError> {
        if !ator.permissao.is_admin() {
            return Err(AppError::Forbidden("forbidden.bug_status"));
        }

        let mut tx = self.pool.begin().await?;

        let atual = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("bug_report"))?;

        if atual.status == status {
            return Ok(atual);
        }

        self.repo.update_status(&mut *tx, id, status).await?;

        let mut log = NovoLog::new(
            Acao::AlterarStatus,
            Modulo::BugReports,
            ator.id,
            format!("Bug report '{}': {:?} -> {:?}", atual.titulo, atual.status, status),
        );
        if let Some(autor) = atual.usuario_id {
            log = log.afetando(autor);
        }
        self.log_repo.registrar(&mut *tx, &log).await?;

        let report = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("bug_report"))?;

        tx.commit().await?;
        Ok(report)
    }

    pub async fn excluir(&self, ator: &Usuario, id: Uuid) -> Result<(), AppError> {
        let report = self.carregar(ator, id).await?;

        let mut tx = self.pool.begin().await?;
        self.repo.delete(&mut *tx, id).await?;
        self.log_repo
            .registrar(
                &mut *tx,
                &NovoLog::new(
                    Acao::Excluir,
                    Modulo::BugReports,
                    ator.id,
                    format!("Bug report '{}' excluído", report.titulo),
                ),
            )
            .await?;
        tx.commit().await?;

        Ok(())
    }

    pub async fn listar_mensagens(&self, ator: &Usuario, id: Uuid) -> Result<Vec<BugMessage>, AppError> {
        self.carregar(ator, id).await?;
        self.repo.list_mensagens(id).await
    }

    pub async fn enviar_mensagem(
        &self,
        ator: &Usuario,
        id: Uuid,
        payload: CreateBugMessagePayload,
    ) -> Result<BugMessage, AppError> {
        let report = self.carregar(ator, id).await?;

        let mut tx = self.pool.begin().await?;

        let mensagem = self
            .repo
            .create_mensagem(&mut *tx, id, ator.id, payload.mensagem.trim())
            .await?;

        let mut log = NovoLog::new(
            Acao::Criar,
            Modulo::BugReports,
            ator.id,
            format!("Mensagem no bug report '{}'", report.titulo),
        );
        if let Some(autor) = report.usuario_id.filter(|autor| *autor != ator.id) {
            log = log.afetando(autor);
        }
        self.log_repo.registrar(&mut *tx, &log).await?;

        tx.commit().await?;
        Ok(mensagem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::authorization::fixtures::usuario_no_banco;

    #[sqlx::test]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn mensagem_no_chat_fica_registrada(pool: PgPool) {
        let service =
            BugReportService::new(BugReportRepository::new(pool.clone()), LogRepository::new(pool.clone()), pool.clone());
        let autor = usuario_no_banco(&pool, "corretor").await;
        let admin = usuario_no_banco(&pool, "admin").await;

        let report = service
            .criar(
                &autor,
                CreateBugReportPayload {
                    titulo: "Filtro de status não funciona".into(),
                    descricao: "Ao filtrar por proposta a lista vem vazia".into(),
                    prioridade: None,
                    categoria: None,
                },
            )
            .await
            .unwrap();

        let mensagem = service
            .enviar_mensagem(&admin, report.id, CreateBugMessagePayload { mensagem: "  Verificando.  ".into() })
            .await
            .unwrap();
        assert_eq!(mensagem.mensagem, "Verificando.");
        assert_eq!(mensagem.usuario_id, Some(admin.id));

        let (logs,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM logs WHERE modulo = 'bug-reports' AND usuario_logado = $1 AND usuario_afetado = $2",
        )
        .bind(admin.id)
        .bind(autor.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(logs, 1);
    }
}
