// src/services/authorization.rs

//! Regras de acesso. Funções puras sobre o usuário logado e o registro
//! alvo; os serviços chamam estas funções antes de tocar no banco.

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        agendamento::Agendamento,
        bug_report::BugReport,
        captacao::Captacao,
        cliente::Cliente,
        permissao::{Escopo, Permissao, RoleSet},
        usuario::Usuario,
    },
};

// =============================================================================
//  PAPÉIS
// =============================================================================

pub fn exigir_admin(ator: &Usuario) -> Result<(), AppError> {
    if ator.permissao.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("forbidden.admin_only"))
    }
}

/// Só quem é admin ou corretor cria/altera registros de negócio.
pub fn exigir_escrita(ator: &Usuario) -> Result<(), AppError> {
    if ator.permissao.is_admin() || ator.permissao.is_corretor() {
        Ok(())
    } else {
        Err(AppError::Forbidden("forbidden.readonly"))
    }
}

/// head-admin gerencia qualquer conta; admin só contas sem papel administrativo.
pub fn pode_gerenciar_usuario(ator: &RoleSet, alvo: &RoleSet) -> bool {
    if ator.is_head_admin() {
        return true;
    }
    ator.is_admin() && !alvo.is_admin()
}

/// Só o head-admin concede admin/head-admin.
pub fn pode_conceder(ator: &RoleSet, novos: &RoleSet) -> bool {
    if ator.is_head_admin() {
        return true;
    }
    ator.is_admin() && !novos.is_admin()
}

// =============================================================================
//  CLIENTES
// =============================================================================

pub fn escopo_clientes(ator: &Usuario) -> Escopo {
    if ator.permissao.is_admin() || ator.permissao.contains(Permissao::Visualizar) {
        Escopo::Todos
    } else {
        Escopo::Proprios(ator.id)
    }
}

fn vinculado_ao_cliente(usuario_id: Uuid, cliente: &Cliente) -> bool {
    cliente.cadastrado_por == Some(usuario_id) || cliente.atribuido_a == Some(usuario_id)
}

pub fn pode_ver_cliente(ator: &Usuario, cliente: &Cliente) -> bool {
    match escopo_clientes(ator) {
        Escopo::Todos => true,
        Escopo::Proprios(id) => vinculado_ao_cliente(id, cliente),
    }
}

pub fn pode_alterar_cliente(ator: &Usuario, cliente: &Cliente) -> bool {
    if ator.permissao.is_admin() {
        return true;
    }
    ator.permissao.is_corretor() && vinculado_ao_cliente(ator.id, cliente)
}

/// Perfil somente-visualizar não vê os dados de contato nem o valor.
pub fn aplicar_visibilidade(ator: &Usuario, mut cliente: Cliente) -> Cliente {
    if ator.permissao.is_somente_visualizar() {
        cliente.telefone = None;
        cliente.email = None;
        cliente.valor = None;
    }
    cliente
}

// =============================================================================
//  CAPTAÇÕES
// =============================================================================

pub fn escopo_captacoes(ator: &Usuario) -> Escopo {
    escopo_clientes(ator)
}

pub fn pode_ver_captacao(ator: &Usuario, captacao: &Captacao) -> bool {
    match escopo_captacoes(ator) {
        Escopo::Todos => true,
        Escopo::Proprios(id) => captacao.usuario_id == Some(id),
    }
}

pub fn pode_alterar_captacao(ator: &Usuario, captacao: &Captacao) -> bool {
    ator.permissao.is_admin() || (ator.permissao.is_corretor() && captacao.usuario_id == Some(ator.id))
}

// =============================================================================
//  AGENDAMENTOS
// =============================================================================

pub fn escopo_agendamentos(ator: &Usuario) -> Escopo {
    escopo_clientes(ator)
}

pub fn pode_ver_agendamento(ator: &Usuario, agendamento: &Agendamento) -> bool {
    match escopo_agendamentos(ator) {
        Escopo::Todos => true,
        Escopo::Proprios(id) => agendamento.corretor_id == id,
    }
}

pub fn pode_alterar_agendamento(ator: &Usuario, agendamento: &Agendamento) -> bool {
    ator.permissao.is_admin() || (ator.permissao.is_corretor() && agendamento.corretor_id == ator.id)
}

/// Corretor agenda só para si; admin agenda para qualquer corretor.
pub fn pode_agendar_para(ator: &Usuario, corretor_id: Uuid) -> bool {
    ator.permissao.is_admin() || (ator.permissao.is_corretor() && corretor_id == ator.id)
}

/// Quem recebe cliente ou agendamento precisa ser corretor ativo. Só dispensa
/// a consulta quando o próprio ator, já autenticado e ativo, é corretor.
pub fn precisa_validar_corretor(ator: &Usuario, corretor_id: Uuid) -> bool {
    corretor_id != ator.id || !ator.permissao.is_corretor()
}

// =============================================================================
//  BUG REPORTS
// =============================================================================

pub fn escopo_bug_reports(ator: &Usuario) -> Escopo {
    if ator.permissao.is_admin() {
        Escopo::Todos
    } else {
        Escopo::Proprios(ator.id)
    }
}

// Ver, conversar e excluir: o autor ou um administrador
pub fn pode_acessar_bug_report(ator: &Usuario, report: &BugReport) -> bool {
    ator.permissao.is_admin() || report.usuario_id == Some(ator.id)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::Utc;
    use uuid::Uuid;

    use sqlx::PgPool;

    use crate::{
        db::{usuario_repo::NovoUsuario, UsuarioRepository},
        models::{
            cliente::{Cliente, ClienteStatus},
            permissao::RoleSet,
            usuario::{Usuario, UsuarioStatus},
        },
    };

    pub fn usuario(permissao: &str) -> Usuario {
        Usuario {
            id: Uuid::new_v4(),
            nome: format!("Usuário {permissao}"),
            email: format!("{}@teste.com", Uuid::new_v4()),
            username: Uuid::new_v4().to_string(),
            senha_hash: String::new(),
            permissao: RoleSet::parse(permissao).unwrap(),
            status: UsuarioStatus::Ativo,
            telefone: None,
            departamento: None,
            ultimo_acesso: None,
            criado_em: Utc::now(),
            atualizado_em: Utc::now(),
        }
    }

    /// Grava no banco um usuário ativo com os papéis dados.
    pub async fn usuario_no_banco(pool: &PgPool, permissao: &str) -> Usuario {
        let modelo = usuario(permissao);
        UsuarioRepository::new(pool.clone())
            .create(
                pool,
                NovoUsuario {
                    nome: &modelo.nome,
                    email: &modelo.email,
                    username: &modelo.username,
                    senha_hash: "hash-de-teste",
                    permissao: &modelo.permissao,
                    status: UsuarioStatus::Ativo,
                    telefone: None,
                    departamento: None,
                },
            )
            .await
            .unwrap()
    }

    pub fn cliente(cadastrado_por: Option<Uuid>, atribuido_a: Option<Uuid>) -> Cliente {
        Cliente {
            id: Uuid::new_v4(),
            nome: "João Pereira".into(),
            telefone: Some("(11) 98888-7777".into()),
            email: Some("joao@email.com".into()),
            interesse: None,
            valor: Some(rust_decimal::Decimal::new(450_000, 0)),
            status: ClienteStatus::Novo,
            tags: vec![],
            observacoes: None,
            atribuido_a,
            cadastrado_por,
            data_atribuicao: None,
            primeiro_contato: None,
            ultimo_contato: None,
            criado_em: Utc::now(),
            atualizado_em: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{cliente, usuario};
    use super::*;

    fn roles(s: &str) -> RoleSet {
        RoleSet::parse(s).unwrap()
    }

    #[test]
    fn apenas_head_admin_gerencia_administradores() {
        assert!(pode_gerenciar_usuario(&roles("head-admin"), &roles("admin")));
        assert!(pode_gerenciar_usuario(&roles("head-admin"), &roles("head-admin")));
        assert!(!pode_gerenciar_usuario(&roles("admin"), &roles("admin")));
        assert!(!pode_gerenciar_usuario(&roles("admin"), &roles("head-admin")));
        assert!(!pode_gerenciar_usuario(&roles("admin"), &roles("corretor,admin")));
        assert!(pode_gerenciar_usuario(&roles("admin"), &roles("corretor")));
        assert!(pode_gerenciar_usuario(&roles("admin"), &roles("visualizar")));
        assert!(!pode_gerenciar_usuario(&roles("corretor"), &roles("visualizar")));
        assert!(!pode_gerenciar_usuario(&roles("visualizar"), &roles("corretor")));
    }

    #[test]
    fn admin_nao_concede_papeis_administrativos() {
        assert!(pode_conceder(&roles("admin"), &roles("corretor,visualizar")));
        assert!(!pode_conceder(&roles("admin"), &roles("admin")));
        assert!(!pode_conceder(&roles("admin"), &roles("corretor,head-admin")));
        assert!(pode_conceder(&roles("head-admin"), &roles("admin")));
        assert!(!pode_conceder(&roles("corretor"), &roles("corretor")));
    }

    #[test]
    fn corretor_enxerga_e_altera_so_os_proprios_clientes() {
        let corretor = usuario("corretor");
        let outro = usuario("corretor");

        let cadastrado = cliente(Some(corretor.id), None);
        let atribuido = cliente(Some(outro.id), Some(corretor.id));
        let alheio = cliente(Some(outro.id), Some(outro.id));

        assert_eq!(escopo_clientes(&corretor), Escopo::Proprios(corretor.id));
        assert!(pode_alterar_cliente(&corretor, &cadastrado));
        assert!(pode_alterar_cliente(&corretor, &atribuido));
        assert!(!pode_alterar_cliente(&corretor, &alheio));
        assert!(!pode_ver_cliente(&corretor, &alheio));
    }

    #[test]
    fn admin_altera_qualquer_cliente() {
        let admin = usuario("admin");
        let c = cliente(None, None);
        assert_eq!(escopo_clientes(&admin), Escopo::Todos);
        assert!(pode_alterar_cliente(&admin, &c));
    }

    #[test]
    fn visualizar_le_tudo_sem_contato_e_nao_altera() {
        let leitor = usuario("visualizar");
        let c = cliente(Some(leitor.id), Some(leitor.id));

        assert_eq!(escopo_clientes(&leitor), Escopo::Todos);
        assert!(!pode_alterar_cliente(&leitor, &c));
        assert!(exigir_escrita(&leitor).is_err());

        let visto = aplicar_visibilidade(&leitor, c);
        assert!(visto.telefone.is_none());
        assert!(visto.email.is_none());
        assert!(visto.valor.is_none());
        assert_eq!(visto.nome, "João Pereira");
    }

    #[test]
    fn visualizar_com_corretor_mantem_contato() {
        let ator = usuario("corretor,visualizar");
        let visto = aplicar_visibilidade(&ator, cliente(None, None));
        assert!(visto.telefone.is_some());
        // O papel visualizar amplia a leitura, mas não a escrita
        assert_eq!(escopo_clientes(&ator), Escopo::Todos);
        assert!(!pode_alterar_cliente(&ator, &cliente(None, None)));
    }

    #[test]
    fn corretor_so_agenda_para_si() {
        let corretor = usuario("corretor");
        let admin = usuario("admin");
        let outro = Uuid::new_v4();

        assert!(pode_agendar_para(&corretor, corretor.id));
        assert!(!pode_agendar_para(&corretor, outro));
        assert!(pode_agendar_para(&admin, outro));
        assert!(!pode_agendar_para(&usuario("visualizar"), outro));
    }

    #[test]
    fn admin_sem_papel_de_corretor_nao_se_atribui() {
        let admin = usuario("admin");
        let admin_corretor = usuario("admin,corretor");
        let corretor = usuario("corretor");

        assert!(precisa_validar_corretor(&admin, admin.id));
        assert!(!precisa_validar_corretor(&admin_corretor, admin_corretor.id));
        assert!(!precisa_validar_corretor(&corretor, corretor.id));
        assert!(precisa_validar_corretor(&corretor, Uuid::new_v4()));
    }

    #[test]
    fn exigir_admin_rejeita_corretor() {
        assert!(exigir_admin(&usuario("head-admin")).is_ok());
        assert!(exigir_admin(&usuario("admin")).is_ok());
        assert!(matches!(
            exigir_admin(&usuario("corretor")),
            Err(AppError::Forbidden("forbidden.admin_only"))
        ));
    }

    #[test]
    fn captacao_so_do_dono_ou_de_admin() {
        let dono = usuario("corretor");
        let captacao = Captacao {
            id: Uuid::new_v4(),
            titulo: "Casa térrea".into(),
            regiao: None,
            valor_estimado: None,
            prioridade: crate::models::captacao::Prioridade::Media,
            objetivo: crate::models::captacao::Objetivo::Venda,
            observacoes: None,
            usuario_id: Some(dono.id),
            usuario_nome: None,
            criado_em: chrono::Utc::now(),
            atualizado_em: chrono::Utc::now(),
        };

        assert!(pode_alterar_captacao(&dono, &captacao));
        assert!(pode_alterar_captacao(&usuario("admin"), &captacao));
        assert!(!pode_alterar_captacao(&usuario("corretor"), &captacao));
        assert!(!pode_ver_captacao(&usuario("corretor"), &captacao));
        assert!(pode_ver_captacao(&usuario("visualizar"), &captacao));
        assert!(!pode_alterar_captacao(&usuario("visualizar"), &captacao));
    }

    #[test]
    fn bug_reports_do_autor_ou_de_admin() {
        let autor = usuario("visualizar");
        assert_eq!(escopo_bug_reports(&autor), Escopo::Proprios(autor.id));
        assert_eq!(escopo_bug_reports(&usuario("admin")), Escopo::Todos);
    }
}
