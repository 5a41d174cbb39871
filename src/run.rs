//! Application execution logic.
//!
//! This module wires the production components together: the reqwest
//! client, the HTTP resolver, the file state store, the SMTP mailer and the
//! monitor loop.

use tokio::signal;

use ipwatch::address::Address;
use ipwatch::config::MonitorConfig;
use ipwatch::dispatch::Dispatcher;
use ipwatch::http::ReqwestClient;
use ipwatch::monitor::{LoopStats, MonitorLoop};
use ipwatch::notify::SmtpMailer;
use ipwatch::resolver::{AddressSource, HttpResolver, ResolveError};
use ipwatch::state::FileStateStore;

/// Runs the monitor loop until Ctrl+C or SIGTERM.
///
/// Excluded from coverage - requires network access and signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: MonitorConfig) -> LoopStats {
    let client = ReqwestClient::new();
    let resolver = HttpResolver::with_services(client.clone(), config.resolver_services.clone());
    let store = FileStateStore::new(&config.state_file);
    let dispatcher = Dispatcher::from_config(&config, client, SmtpMailer::new());

    tracing::info!("State file: {}", store.path().display());
    if dispatcher.channels().is_empty() {
        tracing::warn!("No notification channels enabled, changes will only be logged");
    }

    let mut monitor = MonitorLoop::new(resolver, store, dispatcher, config.check_interval);
    monitor.run(shutdown_signal()).await
}

/// Resolves the external address once.
///
/// # Errors
///
/// Returns [`ResolveError`] if every lookup service failed.
#[cfg(not(tarpaulin_include))]
pub async fn check(config: &MonitorConfig) -> Result<Address, ResolveError> {
    let resolver =
        HttpResolver::with_services(ReqwestClient::new(), config.resolver_services.clone());
    resolver.resolve().await
}

/// Returns a future that completes when a shutdown signal is received.
///
/// If a signal handler cannot be installed, that signal is never observed
/// and the other one still stops the loop.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
