//src/main.rs

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crm_imobiliario::config::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar
    let config = Config::from_env()?;
    let admin_inicial = config.admin_inicial.clone();
    let server_addr = config.server_addr.clone();

    let app_state = AppState::new(config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if let Some(admin) = admin_inicial {
        app_state
            .usuario_service
            .garantir_admin_inicial(&admin)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao criar o head-admin inicial: {e}"))?;
    }

    let app = crm_imobiliario::app(app_state);

    let listener = TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {server_addr}"))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    // ConnectInfo alimenta o limite de login por IP
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("Erro no servidor Axum")?;

    Ok(())
}
