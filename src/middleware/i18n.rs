// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::IDIOMA_PADRAO;

// Extrator de idioma, usado para traduzir as mensagens de erro
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(Locale(idioma_preferido(
            parts
                .headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|header_value| header_value.to_str().ok()),
        )))
    }
}

// "pt-BR" -> "pt", "en-US,en;q=0.9" -> "en"
fn idioma_preferido(header: Option<&str>) -> String {
    header
        .and_then(|header_str| {
            accept_language::parse(header_str)
                .first()
                .and_then(|tag| tag.split('-').next())
                .map(str::to_lowercase)
        })
        .unwrap_or_else(|| IDIOMA_PADRAO.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pega_o_idioma_de_maior_peso() {
        assert_eq!(idioma_preferido(Some("en-US,pt;q=0.5")), "en");
        assert_eq!(idioma_preferido(Some("pt-BR")), "pt");
        assert_eq!(idioma_preferido(None), "pt");
    }
}
