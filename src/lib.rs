// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{
    config::AppState,
    docs::ApiDoc,
    middleware::{auth::auth_guard, rate_limit::login_rate_limit},
};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Monta o router completo da API.
pub fn app(app_state: AppState) -> Router {
    // Login é a única rota pública além do health, e tem limite por IP
    let login_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            login_rate_limit,
        ));

    let usuario_routes = Router::new()
        .route(
            "/",
            get(handlers::usuarios::listar_usuarios).post(handlers::usuarios::criar_usuario),
        )
        .route(
            "/{id}",
            get(handlers::usuarios::buscar_usuario)
                .put(handlers::usuarios::atualizar_usuario)
                .delete(handlers::usuarios::excluir_usuario),
        );

    let cliente_routes = Router::new()
        .route(
            "/",
            get(handlers::clientes::listar_clientes).post(handlers::clientes::criar_cliente),
        )
        .route(
            "/{id}",
            get(handlers::clientes::buscar_cliente)
                .put(handlers::clientes::atualizar_cliente)
                .delete(handlers::clientes::excluir_cliente),
        )
        .route("/{id}/atribuir", post(handlers::clientes::atribuir_cliente))
        .route("/{id}/historico", get(handlers::clientes::historico_cliente));

    let captacao_routes = Router::new()
        .route(
            "/",
            get(handlers::captacoes::listar_captacoes).post(handlers::captacoes::criar_captacao),
        )
        .route(
            "/{id}",
            get(handlers::captacoes::buscar_captacao)
                .put(handlers::captacoes::atualizar_captacao)
                .delete(handlers::captacoes::excluir_captacao),
        );

    let agendamento_routes = Router::new()
        .route(
            "/",
            get(handlers::agendamentos::listar_agendamentos).post(handlers::agendamentos::criar_agendamento),
        )
        .route(
            "/{id}",
            get(handlers::agendamentos::buscar_agendamento)
                .put(handlers::agendamentos::atualizar_agendamento)
                .delete(handlers::agendamentos::excluir_agendamento),
        );

    let bug_report_routes = Router::new()
        .route(
            "/",
            get(handlers::bug_reports::listar_bug_reports).post(handlers::bug_reports::criar_bug_report),
        )
        .route(
            "/{id}",
            get(handlers::bug_reports::buscar_bug_report).delete(handlers::bug_reports::excluir_bug_report),
        )
        .route("/{id}/status", patch(handlers::bug_reports::atualizar_status_bug_report))
        .route(
            "/{id}/mensagens",
            get(handlers::bug_reports::listar_mensagens).post(handlers::bug_reports::enviar_mensagem),
        );

    // Tudo daqui pra baixo exige JWT
    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/auth/alterar-senha", post(handlers::auth::alterar_senha))
        .nest("/api/usuarios", usuario_routes)
        .route("/api/corretores", get(handlers::usuarios::listar_corretores))
        .nest("/api/clientes", cliente_routes)
        .nest("/api/captacoes", captacao_routes)
        .nest("/api/agendamentos", agendamento_routes)
        .nest("/api/bug-reports", bug_report_routes)
        .route("/api/logs", get(handlers::logs::listar_logs))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(health))
        .merge(login_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
