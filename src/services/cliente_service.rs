// src/services/cliente_service.rs

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::{error::AppError, paginacao},
    db::{cliente_repo::NovoCliente, ClienteRepository, LogRepository, UsuarioRepository},
    models::{
        cliente::{
            AtribuirClientePayload, Cliente, ClienteFiltro, ClienteHistorico, ClientePagina, ClienteStatus,
            CreateClientePayload, UpdateClientePayload,
        },
        log::{Acao, Modulo, NovoLog},
        usuario::Usuario,
    },
    services::authorization::{
        aplicar_visibilidade, escopo_clientes, exigir_admin, exigir_escrita, pode_alterar_cliente,
        pode_ver_cliente, precisa_validar_corretor,
    },
};

/// Efeitos de uma troca de status nos marcos de contato do cliente.
/// `primeiro_contato` só é marcado na primeira saída de `novo`.
pub fn aplicar_troca_de_status(cliente: &mut Cliente, novo_status: ClienteStatus, agora: DateTime<Utc>) -> bool {
    if cliente.status == novo_status {
        return false;
    }

    if cliente.status == ClienteStatus::Novo && cliente.primeiro_contato.is_none() {
        cliente.primeiro_contato = Some(agora);
    }
    cliente.ultimo_contato = Some(agora);
    cliente.status = novo_status;
    true
}

#[derive(Clone)]
pub struct ClienteService {
    repo: ClienteRepository,
    usuario_repo: UsuarioRepository,
    log_repo: LogRepository,
    pool: PgPool,
}

impl ClienteService {
    pub fn new(
        repo: ClienteRepository,
        usuario_repo: UsuarioRepository,
        log_repo: LogRepository,
        pool: PgPool,
    ) -> Self {
        Self { repo, usuario_repo, log_repo, pool }
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn listar(&self, ator: &Usuario, filtro: ClienteFiltro) -> Result<ClientePagina, AppError> {
        let escopo = escopo_clientes(ator);
        let (limit, offset) = paginacao::limites(filtro.page, filtro.limit);

        let dados = self.repo.list(&filtro, escopo, limit, offset).await?;
        let total = self.repo.count(&filtro, escopo).await?;

        Ok(ClientePagina {
            dados: dados.into_iter().map(|c| aplicar_visibilidade(ator, c)).collect(),
            total,
            page: offset / limit + 1,
            limit,
        })
    }

    /// Fora do escopo de leitura o cliente "não existe" para o usuário.
    async fn carregar_visivel(&self, ator: &Usuario, id: Uuid) -> Result<Cliente, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|c| pode_ver_cliente(ator, c))
            .ok_or(AppError::NotFound("cliente"))
    }

    pub async fn buscar(&self, ator: &Usuario, id: Uuid) -> Result<Cliente, AppError> {
        let cliente = self.carregar_visivel(ator, id).await?;
        Ok(aplicar_visibilidade(ator, cliente))
    }

    pub async fn historico(&self, ator: &Usuario, id: Uuid) -> Result<ClienteHistorico, AppError> {
        self.carregar_visivel(ator, id).await?;

        Ok(ClienteHistorico {
            atribuicoes: self.repo.list_atribuicoes(id).await?,
            status: self.repo.list_status_historico(id).await?,
        })
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    async fn validar_corretor(&self, conn: &mut PgConnection, corretor_id: Uuid) -> Result<Usuario, AppError> {
        self.usuario_repo
            .find_by_id(conn, corretor_id)
            .await?
            .filter(|u| u.is_ativo() && u.permissao.is_corretor())
            .ok_or(AppError::InvalidInput("invalid.corretor"))
    }

    async fn checar_telefone(
        &self,
        conn: &mut PgConnection,
        telefone: &str,
        excluir: Option<Uuid>,
    ) -> Result<(), AppError> {
        if let Some(existente) = self.repo.find_by_telefone(conn, telefone, excluir).await? {
            return Err(AppError::TelefoneDuplicado {
                cliente_id: existente.id,
                nome: existente.nome,
            });
        }
        Ok(())
    }

    pub async fn criar(&self, ator: &Usuario, payload: CreateClientePayload) -> Result<Cliente, AppError> {
        exigir_escrita(ator)?;

        // Admin escolhe (ou não) o corretor; corretor fica com o próprio cliente
        let atribuido_a = if ator.permissao.is_admin() {
            payload.atribuido_a
        } else if payload.atribuido_a.is_some_and(|id| id != ator.id) {
            return Err(AppError::Forbidden("forbidden.admin_only"));
        } else {
            Some(ator.id)
        };

        let mut tx = self.pool.begin().await?;

        if let Some(corretor_id) = atribuido_a {
            if precisa_validar_corretor(ator, corretor_id) {
                self.validar_corretor(&mut tx, corretor_id).await?;
            }
        }

        if !payload.forcar {
            self.checar_telefone(&mut tx, &payload.telefone, None).await?;
        }

        let cliente = self
            .repo
            .create(
                &mut *tx,
                NovoCliente {
                    nome: payload.nome.trim(),
                    telefone: payload.telefone.trim(),
                    email: payload.email.as_deref(),
                    interesse: payload.interesse,
                    valor: payload.valor,
                    status: payload.status.unwrap_or(ClienteStatus::Novo),
                    tags: &payload.tags,
                    observacoes: payload.observacoes.as_deref(),
                    atribuido_a,
                    cadastrado_por: ator.id,
                },
            )
            .await?;

        if let Some(corretor_id) = atribuido_a {
            self.repo
                .insert_atribuicao(&mut *tx, cliente.id, None, Some(corretor_id), ator.id)
                .await?;
        }

        let mut log = NovoLog::new(
            Acao::Criar,
            Modulo::Clientes,
            ator.id,
            format!(
                "Cliente {} cadastrado{}",
                cliente.nome,
                if payload.forcar { " (telefone duplicado forçado)" } else { "" }
            ),
        );
        if let Some(corretor_id) = atribuido_a {
            log = log.afetando(corretor_id);
        }
        self.log_repo.registrar(&mut *tx, &log).await?;

        tx.commit().await?;

        tracing::info!("📇 Cliente {} cadastrado por {}", cliente.id, ator.username);
        Ok(cliente)
    }

    pub async fn atualizar(
        &self,
        ator: &Usuario,
        id: Uuid,
        payload: UpdateClientePayload,
    ) -> Result<Cliente, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut cliente = self
            .repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .filter(|c| pode_ver_cliente(ator, c))
            .ok_or(AppError::NotFound("cliente"))?;

        if !pode_alterar_cliente(ator, &cliente) {
            return Err(AppError::Forbidden("forbidden.cliente"));
        }

        if let Some(telefone) = payload.telefone {
            if !payload.forcar {
                self.checar_telefone(&mut tx, &telefone, Some(id)).await?;
            }
            cliente.telefone = Some(telefone.trim().to_string());
        }
        if let Some(nome) = payload.nome {
            cliente.nome = nome.trim().to_string();
        }
        if let Some(email) = payload.email {
            cliente.email = Some(email);
        }
        if let Some(interesse) = payload.interesse {
            cliente.interesse = Some(interesse);
        }
        if let Some(valor) = payload.valor {
            cliente.valor = Some(valor);
        }
        if let Some(tags) = payload.tags {
            cliente.tags = tags;
        }
        if let Some(observacoes) = payload.observacoes {
            cliente.observacoes = Some(observacoes);
        }

        let status_anterior = cliente.status;
        let mudou_status = payload
            .status
            .is_some_and(|novo| aplicar_troca_de_status(&mut cliente, novo, Utc::now()));

        let atualizado = self.repo.update(&mut *tx, &cliente).await?;

        // Uma alteração, um registro de atividade
        let log = if mudou_status {
            self.repo
                .insert_status_historico(&mut *tx, id, status_anterior, atualizado.status, ator.id)
                .await?;
            NovoLog::new(
                Acao::AlterarStatus,
                Modulo::Clientes,
                ator.id,
                format!("Cliente {} alterado: status {:?} -> {:?}", atualizado.nome, status_anterior, atualizado.status),
            )
        } else {
            NovoLog::new(Acao::Editar, Modulo::Clientes, ator.id, format!("Cliente {} alterado", atualizado.nome))
        };
        self.log_repo.registrar(&mut *tx, &log).await?;

        tx.commit().await?;
        Ok(atualizado)
    }

    pub async fn excluir(&self, ator: &Usuario, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let cliente = self
            .repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .filter(|c| pode_ver_cliente(ator, c))
            .ok_or(AppError::NotFound("cliente"))?;

        if !pode_alterar_cliente(ator, &cliente) {
            return Err(AppError::Forbidden("forbidden.cliente"));
        }

        self.repo.delete(&mut *tx, id).await?;
        self.log_repo
            .registrar(
                &mut *tx,
                &NovoLog::new(Acao::Excluir, Modulo::Clientes, ator.id, format!("Cliente {} excluído", cliente.nome)),
            )
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Atribui (ou remove, com `None`) o corretor responsável e registra o histórico.
    pub async fn atribuir(
        &self,
        ator: &Usuario,
        id: Uuid,
        payload: AtribuirClientePayload,
    ) -> Result<Cliente, AppError> {
        exigir_admin(ator)?;

        let mut tx = self.pool.begin().await?;

        let cliente = self
            .repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("cliente"))?;

        // Mesmo corretor: nada muda, nada vai pro histórico
        if cliente.atribuido_a == payload.corretor_id {
            return Ok(cliente);
        }

        let corretor = match payload.corretor_id {
            Some(corretor_id) => Some(self.validar_corretor(&mut tx, corretor_id).await?),
            None => None,
        };

        let atualizado = self
            .repo
            .set_atribuicao(&mut *tx, id, payload.corretor_id)
            .await?;

        self.repo
            .insert_atribuicao(&mut *tx, id, cliente.atribuido_a, payload.corretor_id, ator.id)
            .await?;

        let descricao = match &corretor {
            Some(c) => format!("Cliente {} atribuído a {}", atualizado.nome, c.nome),
            None => format!("Atribuição do cliente {} removida", atualizado.nome),
        };
        let mut log = NovoLog::new(Acao::Atribuir, Modulo::Clientes, ator.id, descricao);
        if let Some(corretor_id) = payload.corretor_id {
            log = log.afetando(corretor_id);
        }
        self.log_repo.registrar(&mut *tx, &log).await?;

        tx.commit().await?;

        tracing::info!(
            "🔁 Cliente {} atribuído: {:?} -> {:?} (por {})",
            id,
            cliente.atribuido_a,
            payload.corretor_id,
            ator.username
        );
        Ok(atualizado)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::authorization::fixtures::{cliente, usuario_no_banco};

    #[test]
    fn primeira_saida_de_novo_marca_primeiro_contato() {
        let mut c = cliente(None, None);
        let t1 = Utc::now();

        assert!(aplicar_troca_de_status(&mut c, ClienteStatus::EmAtendimento, t1));
        assert_eq!(c.primeiro_contato, Some(t1));
        assert_eq!(c.ultimo_contato, Some(t1));

        let t2 = t1 + chrono::Duration::hours(1);
        assert!(aplicar_troca_de_status(&mut c, ClienteStatus::Proposta, t2));
        assert_eq!(c.primeiro_contato, Some(t1));
        assert_eq!(c.ultimo_contato, Some(t2));
        assert_eq!(c.status, ClienteStatus::Proposta);
    }

    #[test]
    fn mesmo_status_nao_e_troca() {
        let mut c = cliente(None, None);
        assert!(!aplicar_troca_de_status(&mut c, ClienteStatus::Novo, Utc::now()));
        assert!(c.ultimo_contato.is_none());
        assert!(c.primeiro_contato.is_none());
    }

    #[test]
    fn voltar_para_novo_nao_apaga_primeiro_contato() {
        let mut c = cliente(None, None);
        let t1 = Utc::now();
        aplicar_troca_de_status(&mut c, ClienteStatus::EmAtendimento, t1);
        aplicar_troca_de_status(&mut c, ClienteStatus::Novo, t1 + chrono::Duration::minutes(5));

        let t3 = t1 + chrono::Duration::minutes(10);
        aplicar_troca_de_status(&mut c, ClienteStatus::EmAtendimento, t3);
        assert_eq!(c.primeiro_contato, Some(t1));
        assert_eq!(c.ultimo_contato, Some(t3));
    }

    // --- Com banco (cargo test -- --ignored, DATABASE_URL apontando para um Postgres) ---

    fn servico(pool: &PgPool) -> ClienteService {
        ClienteService::new(
            ClienteRepository::new(pool.clone()),
            UsuarioRepository::new(pool.clone()),
            LogRepository::new(pool.clone()),
            pool.clone(),
        )
    }

    fn novo(nome: &str, telefone: &str) -> CreateClientePayload {
        CreateClientePayload {
            nome: nome.into(),
            telefone: telefone.into(),
            email: None,
            interesse: None,
            valor: None,
            status: None,
            tags: vec![],
            observacoes: None,
            atribuido_a: None,
            forcar: false,
        }
    }

    async fn logs_de_clientes(pool: &PgPool) -> i64 {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM logs WHERE modulo = 'clientes'")
            .fetch_one(pool)
            .await
            .unwrap();
        total
    }

    #[sqlx::test]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn telefone_duplicado_aponta_o_cliente_existente(pool: PgPool) {
        let service = servico(&pool);
        let admin = usuario_no_banco(&pool, "admin").await;

        let primeiro = service.criar(&admin, novo("Maria Souza", "(11) 98888-7777")).await.unwrap();

        match service.criar(&admin, novo("Outra Maria", "11988887777")).await {
            Err(AppError::TelefoneDuplicado { cliente_id, nome }) => {
                assert_eq!(cliente_id, primeiro.id);
                assert_eq!(nome, "Maria Souza");
            }
            outro => panic!("esperava telefone duplicado, veio {outro:?}"),
        }

        let forcado = CreateClientePayload {
            forcar: true,
            ..novo("Outra Maria", "11 98888 7777")
        };
        assert!(service.criar(&admin, forcado).await.is_ok());
    }

    #[sqlx::test]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn atribuir_grava_historico_e_data(pool: PgPool) {
        let service = servico(&pool);
        let admin = usuario_no_banco(&pool, "admin").await;
        let corretor = usuario_no_banco(&pool, "corretor").await;

        let criado = service.criar(&admin, novo("Paulo Reis", "(21) 97777-1111")).await.unwrap();
        assert_eq!(criado.atribuido_a, None);

        let para = |corretor_id| AtribuirClientePayload { corretor_id };

        let atribuido = service.atribuir(&admin, criado.id, para(Some(corretor.id))).await.unwrap();
        assert_eq!(atribuido.atribuido_a, Some(corretor.id));
        assert!(atribuido.data_atribuicao.is_some());

        let historico = service.historico(&admin, criado.id).await.unwrap();
        assert_eq!(historico.atribuicoes.len(), 1);
        assert_eq!(historico.atribuicoes[0].corretor_anterior, None);
        assert_eq!(historico.atribuicoes[0].corretor_novo, Some(corretor.id));
        assert_eq!(historico.atribuicoes[0].atribuido_por, Some(admin.id));

        // Mesmo corretor de novo: nada no histórico
        service.atribuir(&admin, criado.id, para(Some(corretor.id))).await.unwrap();
        assert_eq!(service.historico(&admin, criado.id).await.unwrap().atribuicoes.len(), 1);

        let sem_corretor = service.atribuir(&admin, criado.id, para(None)).await.unwrap();
        assert_eq!(sem_corretor.atribuido_a, None);
        assert_eq!(sem_corretor.data_atribuicao, None);

        let historico = service.historico(&admin, criado.id).await.unwrap();
        assert_eq!(historico.atribuicoes.len(), 2);
        assert!(historico
            .atribuicoes
            .iter()
            .any(|a| a.corretor_anterior == Some(corretor.id) && a.corretor_novo.is_none()));
    }

    #[sqlx::test]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn so_corretor_ativo_recebe_cliente(pool: PgPool) {
        let service = servico(&pool);
        let admin = usuario_no_banco(&pool, "admin").await;
        let visualizador = usuario_no_banco(&pool, "visualizar").await;

        let para_si = CreateClientePayload {
            atribuido_a: Some(admin.id),
            ..novo("Lúcia Prado", "(31) 96666-2222")
        };
        assert!(matches!(
            service.criar(&admin, para_si).await,
            Err(AppError::InvalidInput("invalid.corretor"))
        ));

        let criado = service.criar(&admin, novo("Lúcia Prado", "(31) 96666-2222")).await.unwrap();
        let resultado = service
            .atribuir(&admin, criado.id, AtribuirClientePayload { corretor_id: Some(visualizador.id) })
            .await;
        assert!(matches!(resultado, Err(AppError::InvalidInput("invalid.corretor"))));
    }

    #[sqlx::test]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn corretor_nao_altera_cliente_de_outro(pool: PgPool) {
        let service = servico(&pool);
        let dono = usuario_no_banco(&pool, "corretor").await;
        let colega = usuario_no_banco(&pool, "corretor,visualizar").await;
        let outro = usuario_no_banco(&pool, "corretor").await;

        let criado = service.criar(&dono, novo("Rita Campos", "(41) 95555-3333")).await.unwrap();
        assert_eq!(criado.atribuido_a, Some(dono.id));

        let mudanca = || UpdateClientePayload {
            observacoes: Some("ligar amanhã".into()),
            ..Default::default()
        };

        // Enxerga tudo, mas só altera os próprios
        assert!(matches!(
            service.atualizar(&colega, criado.id, mudanca()).await,
            Err(AppError::Forbidden("forbidden.cliente"))
        ));
        // Fora do escopo de leitura o cliente não aparece
        assert!(matches!(
            service.atualizar(&outro, criado.id, mudanca()).await,
            Err(AppError::NotFound("cliente"))
        ));
        assert!(service.atualizar(&dono, criado.id, mudanca()).await.is_ok());
    }

    #[sqlx::test]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn troca_de_status_gera_um_unico_log(pool: PgPool) {
        let service = servico(&pool);
        let corretor = usuario_no_banco(&pool, "corretor").await;

        let criado = service.criar(&corretor, novo("Bruno Alves", "(51) 94444-5555")).await.unwrap();
        let antes = logs_de_clientes(&pool).await;

        let atualizado = service
            .atualizar(
                &corretor,
                criado.id,
                UpdateClientePayload {
                    status: Some(ClienteStatus::EmAtendimento),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(atualizado.primeiro_contato.is_some());

        assert_eq!(logs_de_clientes(&pool).await, antes + 1);
        let historico = service.historico(&corretor, criado.id).await.unwrap();
        assert_eq!(historico.status.len(), 1);
    }
}
