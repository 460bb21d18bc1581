// src/common/i18n.rs

// Catálogo de mensagens da API. A chave é estável (o frontend pode usá-la),
// o texto depende do idioma pedido no Accept-Language.

pub const IDIOMA_PADRAO: &str = "pt";

pub fn traduzir(lang: &str, chave: &str) -> &'static str {
    let (pt, en) = match chave {
        "validation" => ("Um ou mais campos são inválidos.", "One or more fields are invalid."),
        "invalid_credentials" => ("Usuário ou senha inválidos.", "Invalid username or password."),
        "invalid_token" => (
            "Token de autenticação inválido ou ausente.",
            "Missing or invalid authentication token.",
        ),
        "inactive_user" => ("Usuário inativo.", "User is inactive."),
        "too_many_requests" => (
            "Muitas tentativas. Tente novamente mais tarde.",
            "Too many attempts. Try again later.",
        ),
        "duplicate_phone" => (
            "Já existe um cliente com este telefone.",
            "A client with this phone number already exists.",
        ),
        "duplicate_email" => ("Este e-mail já está em uso.", "This e-mail is already in use."),
        "duplicate_username" => ("Este username já está em uso.", "This username is already in use."),
        "invalid_roles" => ("Permissão inválida.", "Invalid role."),

        // --- 403 ---
        "forbidden" => (
            "Você não tem permissão para realizar esta ação.",
            "You are not allowed to perform this action.",
        ),
        "forbidden.admin_only" => (
            "Apenas administradores podem realizar esta ação.",
            "Only administrators can perform this action.",
        ),
        "forbidden.manage_admin" => (
            "Apenas o head-admin pode alterar ou excluir administradores.",
            "Only the head-admin can edit or delete administrators.",
        ),
        "forbidden.grant_role" => (
            "Você não pode conceder esta permissão.",
            "You cannot grant this role.",
        ),
        "forbidden.cliente" => (
            "Você só pode alterar clientes cadastrados por você ou atribuídos a você.",
            "You can only change clients you created or that are assigned to you.",
        ),
        "forbidden.readonly" => (
            "Seu perfil é somente de visualização.",
            "Your profile is read-only.",
        ),
        "forbidden.self_delete" => (
            "Você não pode excluir a sua própria conta.",
            "You cannot delete your own account.",
        ),
        "forbidden.last_head_admin" => (
            "O último head-admin ativo não pode ser removido ou rebaixado.",
            "The last active head-admin cannot be removed or demoted.",
        ),
        "forbidden.agendamento_outro_corretor" => (
            "Você só pode criar agendamentos para você mesmo.",
            "You can only create appointments for yourself.",
        ),
        "forbidden.bug_status" => (
            "Apenas administradores podem alterar o status de um bug report.",
            "Only administrators can change a bug report status.",
        ),

        // --- 400 ---
        "invalid.corretor" => (
            "O usuário informado não é um corretor ativo.",
            "The given user is not an active broker.",
        ),
        "invalid.senha_atual" => ("A senha atual está incorreta.", "The current password is incorrect."),

        // --- 404 ---
        "not_found.usuario" => ("Usuário não encontrado.", "User not found."),
        "not_found.cliente" => ("Cliente não encontrado.", "Client not found."),
        "not_found.captacao" => ("Captação não encontrada.", "Lead not found."),
        "not_found.agendamento" => ("Agendamento não encontrado.", "Appointment not found."),
        "not_found.bug_report" => ("Bug report não encontrado.", "Bug report not found."),

        _ => ("Ocorreu um erro inesperado.", "An unexpected error occurred."),
    };

    if lang == "en" { en } else { pt }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usa_portugues_por_padrao() {
        assert_eq!(traduzir("fr", "not_found.cliente"), "Cliente não encontrado.");
        assert_eq!(traduzir("en", "not_found.cliente"), "Client not found.");
    }

    #[test]
    fn chave_desconhecida_vira_erro_generico() {
        assert_eq!(traduzir("pt", "???"), "Ocorreu um erro inesperado.");
    }
}
