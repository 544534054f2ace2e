/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};

use cnc_config::backend::{BackendRegistry, NetconfBackend, ProtocolBackend};
use cnc_config::engine::{ConfigEngine, DEFAULT_MAX_IN_FLIGHT};
use cnc_config::grpc::{ConfigServiceImpl, ConfigServiceServer};
use cnc_config::plugin::netconf::{GateScheduleNetconf, GateScheduleNetconfLegacy};
use cnc_config::session::ssh::SshNetconfOpener;
use cnc_config::session::DEFAULT_RPC_TIMEOUT_SECS;
use cnc_config::store::memory::MemoryStore;
use cnc_config::topology::ManagementProtocol;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Centralized TSN configuration service.
///
/// Example:
///   cnc-config -s store.yaml -g 50061 --apply-last
#[derive(Debug, Parser)]
#[command(
    name = "cnc-config",
    about = "Centralized TSN configuration service – NETCONF southbound, gRPC northbound",
    long_about = None,
)]
struct Cli {
    /// Port for the northbound ConfigService gRPC server.
    #[arg(short = 'g', long = "grpcport", default_value_t = 50061)]
    grpc_port: u16,

    /// Path to the YAML store snapshot (topology, device models,
    /// configurations).
    #[arg(short = 's', long = "store")]
    store: PathBuf,

    /// Maximum number of concurrently open device sessions per fan-out.
    #[arg(long = "max-in-flight", default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    max_in_flight: usize,

    /// Per-RPC timeout towards the devices, in seconds.
    #[arg(long = "rpc-timeout", default_value_t = DEFAULT_RPC_TIMEOUT_SECS)]
    rpc_timeout_secs: u64,

    /// Re-apply the most recently stored configuration at start-up.
    #[arg(long = "apply-last", default_value_t = false)]
    apply_last: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialise structured logging.
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("cnc-config starting up...");

    let cli = Cli::parse();

    info!(
        grpc_port = cli.grpc_port,
        store = %cli.store.display(),
        max_in_flight = cli.max_in_flight,
        rpc_timeout_secs = cli.rpc_timeout_secs,
        apply_last = cli.apply_last,
        "Configuration"
    );

    // Device credential comes from the environment, never from the CLI.
    let secret = std::env::var("NETCONF_PASSWORD").unwrap_or_default();
    if secret.is_empty() {
        warn!("NETCONF_PASSWORD is not set; device authentication will fail");
    }

    // ── Store ─────────────────────────────────────────────────────────────────
    let store = match MemoryStore::from_yaml_file(&cli.store) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Failed to load store snapshot: {:#}", e);
            process::exit(1);
        }
    };

    // ── Backend wiring ────────────────────────────────────────────────────────
    let opener = Arc::new(SshNetconfOpener::new(Duration::from_secs(
        cli.rpc_timeout_secs,
    )));

    let mut netconf = NetconfBackend::new();
    netconf.add_plugin(Arc::new(GateScheduleNetconf::new(opener.clone())));
    netconf.add_plugin(Arc::new(GateScheduleNetconfLegacy::new(opener)));
    info!(features = ?netconf.supported_features(), "NETCONF backend assembled");

    let mut registry = BackendRegistry::new();
    if let Err(e) = registry.register(ManagementProtocol::Netconf, Arc::new(netconf)) {
        error!("Backend registration failed: {e}");
        process::exit(1);
    }

    let engine = Arc::new(
        ConfigEngine::new(Arc::new(registry), store).with_max_in_flight(cli.max_in_flight),
    );

    // ── Re-apply last configuration (optional) ────────────────────────────────
    if cli.apply_last {
        match engine.apply_last_configuration(&secret).await {
            Ok(Some(report)) => info!(outcome = %report.summary(), "last configuration re-applied"),
            Ok(None) => info!("no previous configuration found"),
            Err(e) => warn!(error = %e, "failed to re-apply last configuration"),
        }
    }

    // ── Serve gRPC ────────────────────────────────────────────────────────────
    let addr = match format!("0.0.0.0:{}", cli.grpc_port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid gRPC listen address: {e}");
            process::exit(1);
        }
    };

    info!(%addr, "ConfigService listening");
    let service = ConfigServiceImpl::new(engine, secret);

    if let Err(e) = tonic::transport::Server::builder()
        .add_service(ConfigServiceServer::new(service))
        .serve(addr)
        .await
    {
        error!("gRPC server terminated: {e}");
        process::exit(1);
    }
}
