#![forbid(unsafe_code)]

use funil_server::{
    build_router, validate_startup_config, ApiConfig, AppState, SqliteLeadStore, StoreConfig,
};
use std::env;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("FUNIL_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("FUNIL_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let api_cfg = ApiConfig {
        max_body_bytes: env_usize("FUNIL_MAX_BODY_BYTES", 16 * 1024),
        request_timeout: env_duration_ms("FUNIL_REQUEST_TIMEOUT_MS", 5000),
        slow_insert_threshold: env_duration_ms("FUNIL_SLOW_INSERT_THRESHOLD_MS", 200),
        readiness_requires_store: env_bool("FUNIL_READINESS_REQUIRES_STORE", true),
        shutdown_drain: env_duration_ms("FUNIL_SHUTDOWN_DRAIN_MS", 5000),
    };
    let store_cfg = StoreConfig {
        db_path: PathBuf::from(
            env::var("FUNIL_DB_PATH").unwrap_or_else(|_| "artifacts/funil.db".to_string()),
        ),
        busy_timeout: env_duration_ms("FUNIL_SQLITE_BUSY_TIMEOUT_MS", 2000),
    };
    validate_startup_config(&api_cfg, &store_cfg)?;

    let store = SqliteLeadStore::open(&store_cfg).map_err(|e| format!("open lead store: {e}"))?;
    let shutdown_drain = api_cfg.shutdown_drain;
    let state = AppState::with_config(Arc::new(store), api_cfg);
    let app = build_router(state.clone());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!("funil-server listening on {bind_addr}");

    let accepting = state.accepting_requests.clone();
    let ready = state.ready.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            // Flip readiness first so load balancers stop routing here,
            // then drain in-flight requests before the listener closes.
            ready.store(false, Ordering::Relaxed);
            accepting.store(false, Ordering::Relaxed);
            tokio::time::sleep(shutdown_drain).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
