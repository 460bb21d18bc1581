pub mod agendamentos;
pub mod auth;
pub mod bug_reports;
pub mod captacoes;
pub mod clientes;
pub mod logs;
pub mod usuarios;
