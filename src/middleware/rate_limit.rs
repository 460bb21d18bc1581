// src/middleware/rate_limit.rs

//! Limite de tentativas de login por IP (token bucket em memória).

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Mutex,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

// Acima disso, baldes cheios (inativos) são descartados e, se ainda
// faltar espaço, o mais antigo sai
const MAX_CHAVES: usize = 10_000;

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
    capacity: u32,
    window: Duration,
    buckets: Mutex<HashMap<String, TokenBucket>>,
}

impl RateLimiter {
    /// `capacity` tentativas por `window`, reabastecidas de forma contínua.
    pub fn new(capacity: u32, window: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            window: window.max(Duration::from_millis(1)),
            buckets: Mutex::new(HashMap::new()),
        }
    }

    fn tokens_per_sec(&self) -> f64 {
        self.capacity as f64 / self.window.as_secs_f64().max(f64::EPSILON)
    }

    /// Consome uma tentativa para `key`. Em caso de estouro devolve quanto
    /// tempo falta para a próxima tentativa.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let rate = self.tokens_per_sec();
        let capacity = self.capacity as f64;

        let mut buckets = self.buckets.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if buckets.len() >= MAX_CHAVES && !buckets.contains_key(key) {
            buckets.retain(|_, b| {
                let refilled = b.tokens + now.duration_since(b.last_refill).as_secs_f64() * rate;
                refilled < capacity
            });

            if buckets.len() >= MAX_CHAVES {
                let mais_antigo = buckets
                    .iter()
                    .min_by_key(|(_, b)| b.last_refill)
                    .map(|(k, _)| k.clone());
                if let Some(k) = mais_antigo {
                    buckets.remove(&k);
                }
            }
        }

        let bucket = buckets.entry(key.to_string()).or_insert(TokenBucket {
            tokens: capacity,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * rate).min(capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - bucket.tokens;
            Err(Duration::from_secs_f64(missing / rate))
        }
    }
}

/// Identifica o cliente pelo endereço da conexão. O primeiro IP do
/// X-Forwarded-For só vale com `confiar_proxy`, senão qualquer um forja a chave.
fn client_key(request: &Request, confiar_proxy: bool) -> String {
    let forwarded = confiar_proxy
        .then(|| request.headers().get("x-forwarded-for"))
        .flatten()
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "desconhecido".to_string())
}

pub async fn login_rate_limit(
    State(app_state): State<AppState>,
    locale: Locale,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = client_key(&request, app_state.config.trust_proxy);

    if let Err(retry_after) = app_state.login_limiter.check(&key) {
        tracing::warn!("Limite de tentativas de login excedido para {}", key);
        let retry_after_secs = retry_after.as_secs().max(1);
        return Err(AppError::TooManyRequests { retry_after_secs }.to_api_error(&locale));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bloqueia_depois_da_capacidade() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();

        for _ in 0..3 {
            assert!(limiter.check_at("10.0.0.1", now).is_ok());
        }
        let retry = limiter.check_at("10.0.0.1", now).unwrap_err();
        assert!(retry > Duration::from_secs(19) && retry <= Duration::from_secs(20));

        // Outro IP tem o seu próprio balde
        assert!(limiter.check_at("10.0.0.2", now).is_ok());
    }

    #[test]
    fn reabastece_com_o_tempo() {
        let limiter = RateLimiter::new(2, Duration::from_secs(10));
        let now = Instant::now();

        assert!(limiter.check_at("ip", now).is_ok());
        assert!(limiter.check_at("ip", now).is_ok());
        assert!(limiter.check_at("ip", now).is_err());

        // 2 tokens a cada 10s => 1 token em 5s
        assert!(limiter.check_at("ip", now + Duration::from_secs(5)).is_ok());
        assert!(limiter.check_at("ip", now + Duration::from_secs(5)).is_err());
    }

    #[test]
    fn capacidade_ou_janela_zero_nao_derrubam() {
        let limiter = RateLimiter::new(0, Duration::ZERO);
        let now = Instant::now();

        assert!(limiter.check_at("ip", now).is_ok());
        assert!(limiter.check_at("ip", now).is_err());
    }

    #[test]
    fn mapa_nao_passa_do_teto() {
        let limiter = RateLimiter::new(1, Duration::from_secs(3600));
        let now = Instant::now();

        // Todos os baldes esvaziados: a poda por balde cheio não libera nada
        for i in 0..MAX_CHAVES + 50 {
            let _ = limiter.check_at(&format!("ip-{i}"), now + Duration::from_millis(i as u64));
        }

        let buckets = limiter.buckets.lock().unwrap();
        assert!(buckets.len() <= MAX_CHAVES);
        assert!(!buckets.contains_key("ip-0"));
        assert!(buckets.contains_key(&format!("ip-{}", MAX_CHAVES + 49)));
    }

    fn request_de(xff: &str, peer: &str) -> Request {
        let mut request = axum::http::Request::builder()
            .header("x-forwarded-for", xff)
            .body(axum::body::Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        request
    }

    #[test]
    fn x_forwarded_for_so_com_proxy_confiavel() {
        let request = request_de("203.0.113.9, 10.0.0.1", "192.168.0.7:51000");

        assert_eq!(client_key(&request, false), "192.168.0.7");
        assert_eq!(client_key(&request, true), "203.0.113.9");
    }
}
