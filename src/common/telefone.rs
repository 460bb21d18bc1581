// src/common/telefone.rs

/// Mantém só os dígitos: "(11) 98888-7777" e "11988887777" são o mesmo telefone.
pub fn normalizar(telefone: &str) -> String {
    telefone.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_formatacao() {
        assert_eq!(normalizar("(11) 98888-7777"), "11988887777");
        assert_eq!(normalizar("+55 11 98888 7777"), "5511988887777");
        assert_eq!(normalizar("sem numero"), "");
    }
}
