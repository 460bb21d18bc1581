pub mod error;
pub mod i18n;
pub mod paginacao;
pub mod telefone;
pub mod validacao;
