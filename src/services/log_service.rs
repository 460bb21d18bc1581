// src/services/log_service.rs

use crate::{
    common::error::AppError,
    db::LogRepository,
    models::{
        log::{Log, LogFiltro},
        usuario::Usuario,
    },
    services::authorization::exigir_admin,
};

const LIMITE_PADRAO: i64 = 100;
const LIMITE_MAXIMO: i64 = 500;

pub fn limite_logs(pedido: Option<i64>) -> i64 {
    pedido.unwrap_or(LIMITE_PADRAO).clamp(1, LIMITE_MAXIMO)
}

#[derive(Clone)]
pub struct LogService {
    repo: LogRepository,
}

impl LogService {
    pub fn new(repo: LogRepository) -> Self {
        Self { repo }
    }

    pub async fn listar(&self, ator: &Usuario, filtro: LogFiltro) -> Result<Vec<Log>, AppError> {
        exigir_admin(ator)?;
        let limit = limite_logs(filtro.limit);
        self.repo.list(&filtro, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limite_padrao_e_teto() {
        assert_eq!(limite_logs(None), 100);
        assert_eq!(limite_logs(Some(20)), 20);
        assert_eq!(limite_logs(Some(10_000)), 500);
        assert_eq!(limite_logs(Some(0)), 1);
    }
}
