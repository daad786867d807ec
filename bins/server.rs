use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

use common::utils::logging::{init_logging, init_logging_default};

fn load_config() -> anyhow::Result<AppConfig> {
    // .env first so CONFIG_PATH, LOG_LEVEL and friends are visible
    dotenv().ok();
    AppConfig::load()
}

fn main() -> ExitCode {
    let cfg = match load_config() {
        Ok(cfg) => {
            init_logging(&cfg.logging.level, cfg.logging.format);
            cfg
        }
        Err(e) => {
            init_logging_default();
            error!(service = "task-server", event = "config_invalid", error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "task-server",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "task-server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "task-server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        log_format = %cfg.logging.format,
        "task server starting"
    );

    match rt.block_on(server::run(cfg, server::startup::shutdown_signal())) {
        Ok(()) => {
            info!(service = "task-server", event = "stop", %service_id, pid, "server stopped normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "task-server", event = "run_failed", error = %e, "server exited with error");
            ExitCode::FAILURE
        }
    }
}
