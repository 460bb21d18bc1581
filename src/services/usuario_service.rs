// src/services/usuario_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AdminInicial,
    db::{usuario_repo::NovoUsuario, LogRepository, UsuarioRepository},
    models::{
        log::{Acao, Modulo, NovoLog},
        permissao::{Permissao, RoleSet},
        usuario::{CorretorResumo, CreateUsuarioPayload, UpdateUsuarioPayload, Usuario, UsuarioStatus},
    },
    services::{
        auth::hash_senha,
        authorization::{exigir_admin, pode_conceder, pode_gerenciar_usuario},
    },
};

#[derive(Clone)]
pub struct UsuarioService {
    repo: UsuarioRepository,
    log_repo: LogRepository,
    pool: PgPool,
}

impl UsuarioService {
    pub fn new(repo: UsuarioRepository, log_repo: LogRepository, pool: PgPool) -> Self {
        Self { repo, log_repo, pool }
    }

    pub async fn listar(&self, ator: &Usuario) -> Result<Vec<Usuario>, AppError> {
        exigir_admin(ator)?;
        self.repo.list().await
    }

    pub async fn listar_corretores(&self) -> Result<Vec<CorretorResumo>, AppError> {
        self.repo.list_corretores().await
    }

    pub async fn buscar(&self, ator: &Usuario, id: Uuid) -> Result<Usuario, AppError> {
        if ator.id != id {
            exigir_admin(ator)?;
        }

        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("usuario"))
    }

    pub async fn criar(&self, ator: &Usuario, payload: CreateUsuarioPayload) -> Result<Usuario, AppError> {
        exigir_admin(ator)?;
        if !pode_conceder(&ator.permissao, &payload.permissao) {
            return Err(AppError::Forbidden("forbidden.grant_role"));
        }

        let senha_hash = hash_senha(&payload.senha).await?;

        let mut tx = self.pool.begin().await?;

        let novo = self
            .repo
            .create(
                &mut *tx,
                NovoUsuario {
                    nome: payload.nome.trim(),
                    email: payload.email.trim(),
                    username: payload.username.trim(),
                    senha_hash: &senha_hash,
                    permissao: &payload.permissao,
                    status: payload.status.unwrap_or(UsuarioStatus::Ativo),
                    telefone: payload.telefone.as_deref(),
                    departamento: payload.departamento.as_deref(),
                },
            )
            .await?;

        self.log_repo
            .registrar(
                &mut *tx,
                &NovoLog::new(
                    Acao::Criar,
                    Modulo::Usuarios,
                    ator.id,
                    format!("Usuário {} criado com permissão '{}'", novo.username, novo.permissao),
                )
                .afetando(novo.id),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("👤 Usuário {} criado por {}", novo.username, ator.username);
        Ok(novo)
    }

    pub async fn atualizar(
        &self,
        ator: &Usuario,
        id: Uuid,
        payload: UpdateUsuarioPayload,
    ) -> Result<Usuario, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut alvo = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("usuario"))?;

        let proprio = ator.id == alvo.id;

        if proprio && !ator.permissao.is_admin() {
            // Perfil próprio: nada de mexer em papel, status ou username
            if payload.altera_campos_administrativos() {
                return Err(AppError::Forbidden("forbidden.admin_only"));
            }
        } else {
            exigir_admin(ator)?;
            if !proprio && !pode_gerenciar_usuario(&ator.permissao, &alvo.permissao) {
                return Err(AppError::Forbidden("forbidden.manage_admin"));
            }
        }

        // Reenviar os mesmos papéis não é uma concessão
        if let Some(novos) = &payload.permissao {
            if *novos != alvo.permissao && !pode_conceder(&ator.permissao, novos) {
                return Err(AppError::Forbidden("forbidden.grant_role"));
            }
        }

        // Não deixa o sistema sem um head-admin ativo
        let perde_head_admin = alvo.permissao.is_head_admin()
            && alvo.is_ativo()
            && (payload.permissao.as_ref().is_some_and(|p| !p.is_head_admin())
                || payload.status == Some(UsuarioStatus::Inativo));
        if perde_head_admin && self.repo.lock_head_admins_ativos(&mut *tx).await? <= 1 {
            return Err(AppError::Forbidden("forbidden.last_head_admin"));
        }

        let mut alteracoes: Vec<&str> = Vec::new();
        if let Some(nome) = payload.nome {
            alvo.nome = nome.trim().to_string();
            alteracoes.push("nome");
        }
        if let Some(email) = payload.email {
            alvo.email = email.trim().to_string();
            alteracoes.push("email");
        }
        if let Some(username) = payload.username {
            alvo.username = username.trim().to_string();
            alteracoes.push("username");
        }
        if let Some(senha) = payload.senha {
            alvo.senha_hash = hash_senha(&senha).await?;
            alteracoes.push("senha");
        }
        if let Some(permissao) = payload.permissao {
            alvo.permissao = permissao;
            alteracoes.push("permissao");
        }
        if let Some(status) = payload.status {
            alvo.status = status;
            alteracoes.push("status");
        }
        if let Some(telefone) = payload.telefone {
            alvo.telefone = Some(telefone);
            alteracoes.push("telefone");
        }
        if let Some(departamento) = payload.departamento {
            alvo.departamento = Some(departamento);
            alteracoes.push("departamento");
        }

        let atualizado = self.repo.update(&mut *tx, &alvo).await?;

        self.log_repo
            .registrar(
                &mut *tx,
                &NovoLog::new(
                    Acao::Editar,
                    Modulo::Usuarios,
                    ator.id,
                    format!("Usuário {} alterado ({})", atualizado.username, alteracoes.join(", ")),
                )
                .afetando(atualizado.id),
            )
            .await?;

        tx.commit().await?;
        Ok(atualizado)
    }

    pub async fn excluir(&self, ator: &Usuario, id: Uuid) -> Result<(), AppError> {
        exigir_admin(ator)?;
        if ator.id == id {
            return Err(AppError::Forbidden("forbidden.self_delete"));
        }

        let mut tx = self.pool.begin().await?;

        let alvo = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("usuario"))?;

        if !pode_gerenciar_usuario(&ator.permissao, &alvo.permissao) {
            return Err(AppError::Forbidden("forbidden.manage_admin"));
        }

        self.repo.delete(&mut *tx, id).await?;

        // O usuário não existe mais: o log guarda só o nome na descrição
        self.log_repo
            .registrar(
                &mut *tx,
                &NovoLog::new(
                    Acao::Excluir,
                    Modulo::Usuarios,
                    ator.id,
                    format!("Usuário {} ({}) excluído", alvo.nome, alvo.username),
                ),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("🗑️ Usuário {} excluído por {}", alvo.username, ator.username);
        Ok(())
    }

    /// Com o banco vazio, cria o head-admin configurado no ambiente.
    pub async fn garantir_admin_inicial(&self, admin: &AdminInicial) -> Result<(), AppError> {
        if self.repo.count().await? > 0 {
            return Ok(());
        }

        let senha_hash = hash_senha(&admin.senha).await?;
        let permissao = RoleSet::single(Permissao::HeadAdmin);

        let criado = self
            .repo
            .create(
                &self.pool,
                NovoUsuario {
                    nome: &admin.nome,
                    email: &admin.email,
                    username: &admin.username,
                    senha_hash: &senha_hash,
                    permissao: &permissao,
                    status: UsuarioStatus::Ativo,
                    telefone: None,
                    departamento: None,
                },
            )
            .await?;

        tracing::info!("✅ Head-admin inicial '{}' criado", criado.username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::authorization::fixtures::usuario_no_banco;

    // cargo test -- --ignored, com DATABASE_URL apontando para um Postgres

    fn servico(pool: &PgPool) -> UsuarioService {
        UsuarioService::new(UsuarioRepository::new(pool.clone()), LogRepository::new(pool.clone()), pool.clone())
    }

    fn rebaixar_para(papeis: &str) -> UpdateUsuarioPayload {
        UpdateUsuarioPayload {
            permissao: Some(RoleSet::parse(papeis).unwrap()),
            ..Default::default()
        }
    }

    #[sqlx::test]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn ultimo_head_admin_nao_e_rebaixado_nem_inativado(pool: PgPool) {
        let service = servico(&pool);
        let head = usuario_no_banco(&pool, "head-admin").await;

        assert!(matches!(
            service.atualizar(&head, head.id, rebaixar_para("admin")).await,
            Err(AppError::Forbidden("forbidden.last_head_admin"))
        ));

        let inativar = UpdateUsuarioPayload {
            status: Some(UsuarioStatus::Inativo),
            ..Default::default()
        };
        assert!(matches!(
            service.atualizar(&head, head.id, inativar).await,
            Err(AppError::Forbidden("forbidden.last_head_admin"))
        ));

        // Com outro head-admin ativo, rebaixar passa
        usuario_no_banco(&pool, "head-admin").await;
        let rebaixado = service.atualizar(&head, head.id, rebaixar_para("admin")).await.unwrap();
        assert!(!rebaixado.permissao.is_head_admin());
    }

    #[sqlx::test]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn ninguem_exclui_a_si_mesmo(pool: PgPool) {
        let service = servico(&pool);
        let head = usuario_no_banco(&pool, "head-admin").await;
        let admin = usuario_no_banco(&pool, "admin").await;

        for ator in [&head, &admin] {
            assert!(matches!(
                service.excluir(ator, ator.id).await,
                Err(AppError::Forbidden("forbidden.self_delete"))
            ));
        }

        // Admin comum não mexe em outro administrador
        assert!(matches!(
            service.excluir(&admin, head.id).await,
            Err(AppError::Forbidden("forbidden.manage_admin"))
        ));
        service.excluir(&head, admin.id).await.unwrap();
        assert!(service.buscar(&head, admin.id).await.is_err());
    }
}
