pub mod agendamento;
pub mod auth;
pub mod bug_report;
pub mod captacao;
pub mod cliente;
pub mod log;
pub mod permissao;
pub mod usuario;
