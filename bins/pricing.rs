use std::process::ExitCode;

use common::utils::logging::{init_logging, LogFormat};
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

const SERVICE: &str = "pricing";

fn main() -> ExitCode {
    dotenv().ok();
    init_logging(LogFormat::from_env());

    let service_id = Uuid::new_v4();
    let pid = std::process::id();

    std::panic::set_hook(Box::new(move |info| {
        error!(service = SERVICE, event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let cfg = match configs::AppConfig::load_for_pricing() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = SERVICE, event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads { builder.worker_threads(w); }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = SERVICE, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(service = SERVICE, event = "start", %service_id, pid, port = cfg.pricing.port, "pricing service starting");

    rt.block_on(async move {
        match pricing::run(cfg).await {
            Ok(()) => {
                info!(service = SERVICE, event = "stop", %service_id, pid, "pricing service stopped normally");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = SERVICE, event = "run_failed", error = %e, "pricing::run returned error");
                ExitCode::FAILURE
            }
        }
    })
}
