//! `uafcalc serve`: run the REST API in the foreground.

use super::output::{self, Styles};
use crate::config::{PortalConfig, ServerConfig};
use crate::rest::{self, AppState};
use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{info, warn};

/// Run the serve command until interrupted.
pub async fn run(host: IpAddr, port: u16, cfg: &PortalConfig) -> Result<()> {
    let server = ServerConfig::from_env();
    if server.secret_key.is_none() {
        warn!("UAFCALC_SECRET_KEY not set; request signatures are not checked");
    }

    let service = super::build_service(cfg).await?;
    info!(
        "starting uafcalc v{} (strategy {:?})",
        env!("CARGO_PKG_VERSION"),
        cfg.strategy
    );

    let state = Arc::new(AppState::new(service, &server));
    let addr = SocketAddr::new(host, port);

    if !output::is_quiet() && !output::is_json() {
        let s = Styles::detect();
        eprintln!("  {} Serving on http://{addr}", s.ok_sym());
    }

    tokio::select! {
        r = rest::start(addr, state) => r.context("REST server failed"),
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            Ok(())
        }
    }
}
