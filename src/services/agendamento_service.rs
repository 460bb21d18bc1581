// src/services/agendamento_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{agendamento_repo::DadosAgendamento, AgendamentoRepository, ClienteRepository, LogRepository, UsuarioRepository},
    models::{
        agendamento::{
            Agendamento, AgendamentoFiltro, AgendamentoStatus, AgendamentoTipo, CreateAgendamentoPayload,
            UpdateAgendamentoPayload,
        },
        log::{Acao, Modulo, NovoLog},
        usuario::Usuario,
    },
    services::authorization::{
        escopo_agendamentos, exigir_escrita, pode_agendar_para, pode_alterar_agendamento, pode_ver_agendamento,
        pode_ver_cliente, precisa_validar_corretor,
    },
};

#[derive(Clone)]
pub struct AgendamentoService {
    repo: AgendamentoRepository,
    cliente_repo: ClienteRepository,
    usuario_repo: UsuarioRepository,
    log_repo: LogRepository,
    pool: PgPool,
}

impl AgendamentoService {
    pub fn new(
        repo: AgendamentoRepository,
        cliente_repo: ClienteRepository,
        usuario_repo: UsuarioRepository,
        log_repo: LogRepository,
        pool: PgPool,
    ) -> Self {
        Self { repo, cliente_repo, usuario_repo, log_repo, pool }
    }

    pub async fn listar(&self, ator: &Usuario, filtro: AgendamentoFiltro) -> Result<Vec<Agendamento>, AppError> {
        self.repo.list(&filtro, escopo_agendamentos(ator)).await
    }

    pub async fn buscar(&self, ator: &Usuario, id: Uuid) -> Result<Agendamento, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .filter(|a| pode_ver_agendamento(ator, a))
            .ok_or(AppError::NotFound("agendamento"))
    }

    pub async fn criar(&self, ator: &Usuario, payload: CreateAgendamentoPayload) -> Result<Agendamento, AppError> {
        exigir_escrita(ator)?;

        let corretor_id = payload.corretor_id.unwrap_or(ator.id);
        if !pode_agendar_para(ator, corretor_id) {
            return Err(AppError::Forbidden("forbidden.agendamento_outro_corretor"));
        }

        // Só agenda para clientes que o usuário enxerga
        let cliente = self
            .cliente_repo
            .find_by_id(payload.cliente_id)
            .await?
            .filter(|c| pode_ver_cliente(ator, c))
            .ok_or(AppError::NotFound("cliente"))?;

        let mut tx = self.pool.begin().await?;

        if precisa_validar_corretor(ator, corretor_id) {
            self.usuario_repo
                .find_by_id(&mut *tx, corretor_id)
                .await?
                .filter(|u| u.is_ativo() && u.permissao.is_corretor())
                .ok_or(AppError::InvalidInput("invalid.corretor"))?;
        }

        let id = self
            .repo
            .create(
                &mut *tx,
                DadosAgendamento {
                    cliente_id: cliente.id,
                    corretor_id,
                    data: payload.data,
                    hora: payload.hora,
                    tipo: payload.tipo.unwrap_or(AgendamentoTipo::Visita),
                    status: AgendamentoStatus::Agendado,
                    local: payload.local.as_deref(),
                    observacoes: payload.observacoes.as_deref(),
                },
            )
            .await?;

        let mut log = NovoLog::new(
            Acao::Criar,
            Modulo::Agendamentos,
            ator.id,
            format!("Agendamento com {} em {} às {}", cliente.nome, payload.data, payload.hora.format("%H:%M")),
        );
        if corretor_id != ator.id {
            log = log.afetando(corretor_id);
        }
        self.log_repo.registrar(&mut *tx, &log).await?;

        let agendamento = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("agendamento"))?;

        tx.commit().await?;
        Ok(agendamento)
    }

    pub async fn atualizar(
        &self,
        ator: &Usuario,
        id: Uuid,
        payload: UpdateAgendamentoPayload,
    ) -> Result<Agendamento, AppError> {
        let atual = self.buscar(ator, id).await?;
        if !pode_alterar_agendamento(ator, &atual) {
            return Err(AppError::Forbidden("forbidden.agendamento_outro_corretor"));
        }

        let local = payload.local.or(atual.local);
        let observacoes = payload.observacoes.or(atual.observacoes);
        let status = payload.status.unwrap_or(atual.status);

        let mut tx = self.pool.begin().await?;

        self.repo
            .update(
                &mut *tx,
                id,
                DadosAgendamento {
                    cliente_id: atual.cliente_id,
                    corretor_id: atual.corretor_id,
                    data: payload.data.unwrap_or(atual.data),
                    hora: payload.hora.unwrap_or(atual.hora),
                    tipo: payload.tipo.unwrap_or(atual.tipo),
                    status,
                    local: local.as_deref(),
                    observacoes: observacoes.as_deref(),
                },
            )
            .await?;

        let acao = if status != atual.status { Acao::AlterarStatus } else { Acao::Editar };
        self.log_repo
            .registrar(
                &mut *tx,
                &NovoLog::new(
                    acao,
                    Modulo::Agendamentos,
                    ator.id,
                    format!("Agendamento com {} alterado ({:?})", atual.cliente_nome, status),
                ),
            )
            .await?;

        let agendamento = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("agendamento"))?;

        tx.commit().await?;
        Ok(agendamento)
    }

    pub async fn excluir(&self, ator: &Usuario, id: Uuid) -> Result<(), AppError> {
        let atual = self.buscar(ator, id).await?;
        if !pode_alterar_agendamento(ator, &atual) {
            return Err(AppError::Forbidden("forbidden.agendamento_outro_corretor"));
        }

        let mut tx = self.pool.begin().await?;
        self.repo.delete(&mut *tx, id).await?;
        self.log_repo
            .registrar(
                &mut *tx,
                &NovoLog::new(
                    Acao::Excluir,
                    Modulo::Agendamentos,
                    ator.id,
                    format!("Agendamento com {} em {} excluído", atual.cliente_nome, atual.data),
                ),
            )
            .await?;
        tx.commit().await?;

        Ok(())
    }
}
