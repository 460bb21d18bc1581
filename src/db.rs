pub mod agendamento_repo;
pub use agendamento_repo::AgendamentoRepository;
pub mod bug_report_repo;
pub use bug_report_repo::BugReportRepository;
pub mod captacao_repo;
pub use captacao_repo::CaptacaoRepository;
pub mod cliente_repo;
pub use cliente_repo::ClienteRepository;
pub mod log_repo;
pub use log_repo::LogRepository;
pub mod usuario_repo;
pub use usuario_repo::UsuarioRepository;
