// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::alterar_senha,

        // --- Usuários ---
        handlers::usuarios::listar_usuarios,
        handlers::usuarios::buscar_usuario,
        handlers::usuarios::criar_usuario,
        handlers::usuarios::atualizar_usuario,
        handlers::usuarios::excluir_usuario,
        handlers::usuarios::listar_corretores,

        // --- Clientes ---
        handlers::clientes::listar_clientes,
        handlers::clientes::buscar_cliente,
        handlers::clientes::criar_cliente,
        handlers::clientes::atualizar_cliente,
        handlers::clientes::excluir_cliente,
        handlers::clientes::atribuir_cliente,
        handlers::clientes::historico_cliente,

        // --- Captações ---
        handlers::captacoes::listar_captacoes,
        handlers::captacoes::buscar_captacao,
        handlers::captacoes::criar_captacao,
        handlers::captacoes::atualizar_captacao,
        handlers::captacoes::excluir_captacao,

        // --- Agendamentos ---
        handlers::agendamentos::listar_agendamentos,
        handlers::agendamentos::buscar_agendamento,
        handlers::agendamentos::criar_agendamento,
        handlers::agendamentos::atualizar_agendamento,
        handlers::agendamentos::excluir_agendamento,

        // --- Bug reports ---
        handlers::bug_reports::listar_bug_reports,
        handlers::bug_reports::buscar_bug_report,
        handlers::bug_reports::criar_bug_report,
        handlers::bug_reports::atualizar_status_bug_report,
        handlers::bug_reports::excluir_bug_report,
        handlers::bug_reports::listar_mensagens,
        handlers::bug_reports::enviar_mensagem,

        // --- Logs ---
        handlers::logs::listar_logs,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::LoginPayload,
            models::auth::AlterarSenhaPayload,
            models::auth::AuthResponse,

            // --- Usuários ---
            models::usuario::UsuarioStatus,
            models::usuario::Usuario,
            models::usuario::CorretorResumo,
            models::usuario::CreateUsuarioPayload,
            models::usuario::UpdateUsuarioPayload,

            // --- Clientes ---
            models::cliente::ClienteStatus,
            models::cliente::Interesse,
            models::cliente::Cliente,
            models::cliente::ClientePagina,
            models::cliente::ClienteAtribuicao,
            models::cliente::ClienteStatusHistorico,
            models::cliente::ClienteHistorico,
            models::cliente::CreateClientePayload,
            models::cliente::UpdateClientePayload,
            models::cliente::AtribuirClientePayload,

            // --- Captações ---
            models::captacao::Prioridade,
            models::captacao::Objetivo,
            models::captacao::Captacao,
            models::captacao::CreateCaptacaoPayload,
            models::captacao::UpdateCaptacaoPayload,

            // --- Agendamentos ---
            models::agendamento::AgendamentoTipo,
            models::agendamento::AgendamentoStatus,
            models::agendamento::Agendamento,
            models::agendamento::CreateAgendamentoPayload,
            models::agendamento::UpdateAgendamentoPayload,

            // --- Bug reports ---
            models::bug_report::BugStatus,
            models::bug_report::BugCategoria,
            models::bug_report::BugReport,
            models::bug_report::BugMessage,
            models::bug_report::BugReportDetalhe,
            models::bug_report::CreateBugReportPayload,
            models::bug_report::UpdateBugStatusPayload,
            models::bug_report::CreateBugMessagePayload,

            // --- Logs ---
            models::log::Log,
        )
    ),
    tags(
        (name = "Auth", description = "Login e dados do usuário logado"),
        (name = "Usuarios", description = "Gestão de usuários e corretores"),
        (name = "Clientes", description = "Clientes, atribuições e histórico"),
        (name = "Captacoes", description = "Captação de imóveis"),
        (name = "Agendamentos", description = "Visitas, reuniões e ligações"),
        (name = "BugReports", description = "Reports de problemas e conversa com o suporte"),
        (name = "Logs", description = "Log de atividades")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
