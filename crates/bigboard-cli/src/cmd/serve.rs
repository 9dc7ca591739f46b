use super::{load_config, trello};
use bigboard_core::config::WarnLevel;
use bigboard_server::AppState;
use std::path::Path;
use std::sync::Arc;

pub fn run(config_path: Option<&Path>, port: Option<u16>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    for w in config.validate() {
        match w.level {
            WarnLevel::Error => tracing::error!("{}", w.message),
            WarnLevel::Warning => tracing::warn!("{}", w.message),
        }
    }

    let port = port.unwrap_or(config.server.port);
    // The blocking Trello client must be created and dropped outside the runtime.
    let service = trello(&config)?;
    let state = AppState::new(config, Arc::clone(&service));

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!("bigboard listening on port {actual_port}  (PID {})", std::process::id());

        tokio::select! {
            res = bigboard_server::serve_on(state, listener) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    });
    drop(rt);
    drop(service);
    result
}
