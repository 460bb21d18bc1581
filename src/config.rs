// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AgendamentoRepository, BugReportRepository, CaptacaoRepository, ClienteRepository, LogRepository,
        UsuarioRepository,
    },
    middleware::rate_limit::RateLimiter,
    services::{
        agendamento_service::AgendamentoService, auth::AuthService, bug_report_service::BugReportService,
        captacao_service::CaptacaoService, cliente_service::ClienteService, log_service::LogService,
        usuario_service::UsuarioService,
    },
};

/// Head-admin criado na primeira subida, com o banco vazio.
#[derive(Debug, Clone)]
pub struct AdminInicial {
    pub nome: String,
    pub email: String,
    pub username: String,
    pub senha: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub login_rate_limit: u32,
    pub login_rate_window: Duration,
    /// Só com um proxy confiável na frente o X-Forwarded-For identifica o cliente.
    pub trust_proxy: bool,
    pub admin_inicial: Option<AdminInicial>,
}

fn var_ou<T: std::str::FromStr>(nome: &str, padrao: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(nome) {
        Ok(valor) => valor
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{nome} inválida ('{valor}'): {e}")),
        Err(_) => Ok(padrao),
    }
}

/// Valida o limite de login: capacidade e janela precisam ser positivas.
fn limite_login(capacidade: u32, janela_secs: u64) -> anyhow::Result<(u32, Duration)> {
    anyhow::ensure!(capacidade > 0, "LOGIN_RATE_LIMIT deve ser maior que zero");
    anyhow::ensure!(janela_secs > 0, "LOGIN_RATE_WINDOW_SECS deve ser maior que zero");
    Ok((capacidade, Duration::from_secs(janela_secs)))
}

fn flag(nome: &str) -> bool {
    env::var(nome)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "sim" | "yes"))
        .unwrap_or(false)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        // Só cria o admin inicial com e-mail e senha definidos
        let admin_inicial = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(senha)) if !email.trim().is_empty() && !senha.is_empty() => {
                let email = email.trim().to_string();
                let username = email.split('@').next().unwrap_or("admin").to_string();
                Some(AdminInicial {
                    nome: env::var("ADMIN_NOME").unwrap_or_else(|_| "Administrador".into()),
                    email,
                    username,
                    senha,
                })
            }
            _ => None,
        };

        let (login_rate_limit, login_rate_window) =
            limite_login(var_ou("LOGIN_RATE_LIMIT", 10)?, var_ou("LOGIN_RATE_WINDOW_SECS", 900)?)?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration_hours: var_ou("JWT_EXPIRATION_HOURS", 24)?,
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            db_max_connections: var_ou("DB_MAX_CONNECTIONS", 5)?,
            login_rate_limit,
            login_rate_window,
            trust_proxy: flag("TRUST_PROXY"),
            admin_inicial,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub usuario_service: UsuarioService,
    pub cliente_service: ClienteService,
    pub captacao_service: CaptacaoService,
    pub agendamento_service: AgendamentoService,
    pub bug_report_service: BugReportService,
    pub log_service: LogService,
    pub login_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(config, db_pool))
    }

    /// Monta o gráfico de dependências sobre um pool já criado.
    pub fn from_pool(config: Config, db_pool: PgPool) -> Self {
        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let cliente_repo = ClienteRepository::new(db_pool.clone());
        let log_repo = LogRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            usuario_repo.clone(),
            log_repo.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
            db_pool.clone(),
        );
        let usuario_service = UsuarioService::new(usuario_repo.clone(), log_repo.clone(), db_pool.clone());
        let cliente_service = ClienteService::new(
            cliente_repo.clone(),
            usuario_repo.clone(),
            log_repo.clone(),
            db_pool.clone(),
        );
        let captacao_service =
            CaptacaoService::new(CaptacaoRepository::new(db_pool.clone()), log_repo.clone(), db_pool.clone());
        let agendamento_service = AgendamentoService::new(
            AgendamentoRepository::new(db_pool.clone()),
            cliente_repo,
            usuario_repo,
            log_repo.clone(),
            db_pool.clone(),
        );
        let bug_report_service =
            BugReportService::new(BugReportRepository::new(db_pool.clone()), log_repo.clone(), db_pool.clone());
        let log_service = LogService::new(log_repo);

        let login_limiter = Arc::new(RateLimiter::new(config.login_rate_limit, config.login_rate_window));

        Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            usuario_service,
            cliente_service,
            captacao_service,
            agendamento_service,
            bug_report_service,
            log_service,
            login_limiter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limite_de_login_rejeita_zero() {
        assert!(limite_login(0, 900).is_err());
        assert!(limite_login(10, 0).is_err());

        let (capacidade, janela) = limite_login(10, 900).unwrap();
        assert_eq!(capacidade, 10);
        assert_eq!(janela, Duration::from_secs(900));
    }
}
