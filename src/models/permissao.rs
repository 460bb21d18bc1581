// src/models/permissao.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

// --- PAPÉIS ---

// Os papéis conhecidos pelo sistema, na ordem de "poder"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Permissao {
    HeadAdmin,
    Admin,
    Corretor,
    Visualizar,
}

impl Permissao {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permissao::HeadAdmin => "head-admin",
            Permissao::Admin => "admin",
            Permissao::Corretor => "corretor",
            Permissao::Visualizar => "visualizar",
        }
    }

    /// Papéis administrativos (admin e head-admin).
    pub fn is_admin(&self) -> bool {
        matches!(self, Permissao::HeadAdmin | Permissao::Admin)
    }
}

impl fmt::Display for Permissao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissaoInvalida {
    #[error("O conjunto de permissões não pode ser vazio.")]
    Vazio,

    #[error("Permissão desconhecida: '{0}'.")]
    Desconhecida(String),
}

impl FromStr for Permissao {
    type Err = PermissaoInvalida;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "head-admin" => Ok(Permissao::HeadAdmin),
            "admin" => Ok(Permissao::Admin),
            "corretor" => Ok(Permissao::Corretor),
            "visualizar" => Ok(Permissao::Visualizar),
            outro => Err(PermissaoInvalida::Desconhecida(outro.to_string())),
        }
    }
}

// --- CONJUNTO DE PAPÉIS ---

/// Conjunto não vazio de papéis. No banco vive como texto separado por
/// vírgulas ("admin,corretor").
#[derive(Debug, Clone)]
pub struct RoleSet(Vec<Permissao>);

// A ordem da lista não importa: "admin,corretor" == "corretor,admin"
impl PartialEq for RoleSet {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|p| other.0.contains(p))
    }
}

impl Eq for RoleSet {}

impl RoleSet {
    pub fn parse(raw: &str) -> Result<Self, PermissaoInvalida> {
        Self::from_roles(
            raw.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(Permissao::from_str)
                .collect::<Result<Vec<_>, _>>()?,
        )
    }

    pub fn from_roles(roles: impl IntoIterator<Item = Permissao>) -> Result<Self, PermissaoInvalida> {
        let mut unicos: Vec<Permissao> = Vec::new();
        for role in roles {
            if !unicos.contains(&role) {
                unicos.push(role);
            }
        }

        if unicos.is_empty() {
            return Err(PermissaoInvalida::Vazio);
        }
        Ok(Self(unicos))
    }

    pub fn single(role: Permissao) -> Self {
        Self(vec![role])
    }

    pub fn contains(&self, role: Permissao) -> bool {
        self.0.contains(&role)
    }

    pub fn is_head_admin(&self) -> bool {
        self.contains(Permissao::HeadAdmin)
    }

    pub fn is_admin(&self) -> bool {
        self.0.iter().any(Permissao::is_admin)
    }

    pub fn is_corretor(&self) -> bool {
        self.contains(Permissao::Corretor)
    }

    /// Somente leitura: não tem nenhum papel que permita escrever.
    pub fn is_somente_visualizar(&self) -> bool {
        self.0.iter().all(|p| *p == Permissao::Visualizar)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permissao> {
        self.0.iter()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.0.iter().map(Permissao::as_str).collect::<Vec<_>>().join(",");
        f.write_str(&joined)
    }
}

impl FromStr for RoleSet {
    type Err = PermissaoInvalida;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Usado pelo `#[sqlx(try_from = "String")]` do model de usuário
impl TryFrom<String> for RoleSet {
    type Error = PermissaoInvalida;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl Serialize for RoleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RoleSet::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// --- ESCOPO DE LEITURA ---

/// Quais registros de um recurso o usuário enxerga.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escopo {
    Todos,
    // Só os registros ligados a este usuário
    Proprios(Uuid),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_aceita_lista_com_espacos_e_duplicatas() {
        let roles = RoleSet::parse(" admin , corretor,admin ").unwrap();
        assert_eq!(roles.to_string(), "admin,corretor");
        assert!(roles.is_admin());
        assert!(roles.is_corretor());
        assert!(!roles.is_head_admin());
    }

    #[test]
    fn parse_rejeita_vazio_e_desconhecido() {
        assert_eq!(RoleSet::parse(""), Err(PermissaoInvalida::Vazio));
        assert_eq!(RoleSet::parse(" , ,"), Err(PermissaoInvalida::Vazio));
        assert_eq!(
            RoleSet::parse("corretor,gerente"),
            Err(PermissaoInvalida::Desconhecida("gerente".into()))
        );
    }

    #[test]
    fn igualdade_ignora_a_ordem() {
        assert_eq!(RoleSet::parse("admin,corretor").unwrap(), RoleSet::parse("corretor,admin").unwrap());
        assert_ne!(RoleSet::parse("admin").unwrap(), RoleSet::parse("admin,corretor").unwrap());
    }

    #[test]
    fn somente_visualizar() {
        assert!(RoleSet::parse("visualizar").unwrap().is_somente_visualizar());
        assert!(!RoleSet::parse("visualizar,corretor").unwrap().is_somente_visualizar());
    }

    #[test]
    fn serde_usa_texto_separado_por_virgulas() {
        let roles: RoleSet = serde_json::from_str("\"HEAD-ADMIN,visualizar\"").unwrap();
        assert_eq!(serde_json::to_string(&roles).unwrap(), "\"head-admin,visualizar\"");
        assert!(serde_json::from_str::<RoleSet>("\"\"").is_err());
    }
}
