// src/common/validacao.rs

use validator::ValidationError;

/// Nomes contam sem os espaços das pontas, que são removidos ao gravar.
pub fn nome_valido(nome: &str) -> Result<(), ValidationError> {
    if nome.trim().chars().count() < 2 {
        let mut err = ValidationError::new("length");
        err.add_param("min".into(), &2);
        err.message = Some("O nome deve ter no mínimo 2 caracteres.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;
    use crate::models::cliente::{CreateClientePayload, UpdateClientePayload};

    fn payload(nome: &str) -> CreateClientePayload {
        CreateClientePayload {
            nome: nome.into(),
            telefone: "(11) 98888-7777".into(),
            email: None,
            interesse: None,
            valor: None,
            status: None,
            tags: vec![],
            observacoes: None,
            atribuido_a: None,
            forcar: false,
        }
    }

    #[test]
    fn conta_o_nome_sem_espacos_nas_pontas() {
        assert!(nome_valido("   ").is_err());
        assert!(nome_valido(" a ").is_err());
        assert!(nome_valido("  Ana ").is_ok());
        assert!(nome_valido("Zé").is_ok());
    }

    #[test]
    fn payloads_de_cliente_rejeitam_nome_em_branco() {
        let erros = payload("   ").validate().unwrap_err();
        assert!(erros.field_errors().contains_key("nome"));
        assert!(payload("  Ana ").validate().is_ok());

        let update = UpdateClientePayload {
            nome: Some("  ".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(UpdateClientePayload::default().validate().is_ok());
    }
}
