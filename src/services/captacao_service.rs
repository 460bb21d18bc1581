// src/services/captacao_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{captacao_repo::DadosCaptacao, CaptacaoRepository, LogRepository},
    models::{
        captacao::{Captacao, CreateCaptacaoPayload, Objetivo, Prioridade, UpdateCaptacaoPayload},
        log::{Acao, Modulo, NovoLog},
        usuario::Usuario,
    },
    services::authorization::{escopo_captacoes, exigir_escrita, pode_alterar_captacao, pode_ver_captacao},
};

#[derive(Clone)]
pub struct CaptacaoService {
    repo: CaptacaoRepository,
    log_repo: LogRepository,
    pool: PgPool,
}

impl CaptacaoService {
    pub fn new(repo: CaptacaoRepository, log_repo: LogRepository, pool: PgPool) -> Self {
        Self { repo, log_repo, pool }
    }

    pub async fn listar(&self, ator: &Usuario) -> Result<Vec<Captacao>, AppError> {
        self.repo.list(escopo_captacoes(ator)).await
    }

    pub async fn buscar(&self, ator: &Usuario, id: Uuid) -> Result<Captacao, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|c| pode_ver_captacao(ator, c))
            .ok_or(AppError::NotFound("captacao"))
    }

    pub async fn criar(&self, ator: &Usuario, payload: CreateCaptacaoPayload) -> Result<Captacao, AppError> {
        exigir_escrita(ator)?;

        let mut tx = self.pool.begin().await?;

        let captacao = self
            .repo
            .create(
                &mut *tx,
                DadosCaptacao {
                    titulo: payload.titulo.trim(),
                    regiao: payload.regiao.as_deref(),
                    valor_estimado: payload.valor_estimado,
                    prioridade: payload.prioridade.unwrap_or(Prioridade::Media),
                    objetivo: payload.objetivo.unwrap_or(Objetivo::Venda),
                    observacoes: payload.observacoes.as_deref(),
                },
                ator.id,
            )
            .await?;

        self.log_repo
            .registrar(
                &mut *tx,
                &NovoLog::new(Acao::Criar, Modulo::Captacoes, ator.id, format!("Captação '{}' cadastrada", captacao.titulo)),
            )
            .await?;

        tx.commit().await?;
        Ok(captacao)
    }

    pub async fn atualizar(
        &self,
        ator: &Usuario,
        id: Uuid,
        payload: UpdateCaptacaoPayload,
    ) -> Result<Captacao, AppError> {
        let atual = self.buscar(ator, id).await?;
        if !pode_alterar_captacao(ator, &atual) {
            return Err(AppError::Forbidden("forbidden"));
        }

        let titulo = payload.titulo.unwrap_or(atual.titulo);
        let regiao = payload.regiao.or(atual.regiao);
        let observacoes = payload.observacoes.or(atual.observacoes);

        let mut tx = self.pool.begin().await?;

        let captacao = self
            .repo
            .update(
                &mut *tx,
                id,
                DadosCaptacao {
                    titulo: titulo.trim(),
                    regiao: regiao.as_deref(),
                    valor_estimado: payload.valor_estimado.or(atual.valor_estimado),
                    prioridade: payload.prioridade.unwrap_or(atual.prioridade),
                    objetivo: payload.objetivo.unwrap_or(atual.objetivo),
                    observacoes: observacoes.as_deref(),
                },
            )
            .await?;

        self.log_repo
            .registrar(
                &mut *tx,
                &NovoLog::new(Acao::Editar, Modulo::Captacoes, ator.id, format!("Captação '{}' alterada", captacao.titulo)),
            )
            .await?;

        tx.commit().await?;
        Ok(captacao)
    }

    pub async fn excluir(&self, ator: &Usuario, id: Uuid) -> Result<(), AppError> {
        let atual = self.buscar(ator, id).await?;
        if !pode_alterar_captacao(ator, &atual) {
            return Err(AppError::Forbidden("forbidden"));
        }

        let mut tx = self.pool.begin().await?;
        self.repo.delete(&mut *tx, id).await?;
        self.log_repo
            .registrar(
                &mut *tx,
                &NovoLog::new(Acao::Excluir, Modulo::Captacoes, ator.id, format!("Captação '{}' excluída", atual.titulo)),
            )
            .await?;
        tx.commit().await?;

        Ok(())
    }
}
