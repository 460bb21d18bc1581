// src/common/paginacao.rs

pub const LIMITE_PADRAO: i64 = 50;
pub const LIMITE_MAXIMO: i64 = 200;

/// Converte `page`/`limit` da query em (limit, offset) já saneados.
pub fn limites(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(LIMITE_PADRAO).clamp(1, LIMITE_MAXIMO);
    let page = page.unwrap_or(1).max(1);
    (limit, (page - 1).saturating_mul(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aplica_padrao_e_teto() {
        assert_eq!(limites(None, None), (50, 0));
        assert_eq!(limites(Some(3), Some(20)), (20, 40));
        assert_eq!(limites(Some(0), Some(10_000)), (200, 0));
        assert_eq!(limites(Some(-2), Some(0)), (1, 0));

        // Página absurda satura em vez de estourar
        let (limit, offset) = limites(Some(i64::MAX), Some(200));
        assert_eq!(limit, 200);
        assert_eq!(offset, i64::MAX);
    }
}
