pub mod agendamento_service;
pub mod auth;
pub mod authorization;
pub mod bug_report_service;
pub mod captacao_service;
pub mod cliente_service;
pub mod log_service;
pub mod usuario_service;
