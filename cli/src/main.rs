use catpoint_cli::app::App;
use catpoint_cli::commands::cli;
use catpoint_cli::listener::ConsoleListener;
use catpoint_core::api::{AppConfig, CliError, SecurityService};
use catpoint_plugins::factory;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let mut args = cli::Args::parse();
    let cfg = match &args.config {
        Some(path) => catpoint_core::config::load_from_path(path),
        None => catpoint_core::config::load_default(),
    }
    .map_err(|e| CliError::Config(format!("{e:#}")))?;
    init_tracing(&cfg.logging).map_err(CliError::Config)?;

    let service = build_service(&cfg, args.ephemeral)?;
    let app = App::new(service, &cfg);

    match args.command.take().unwrap_or(cli::Commands::Status) {
        cli::Commands::Shell => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            app.run_shell(stdin, &mut std::io::stdout()).await?;
        }
        cmd => app.execute(cmd, &mut std::io::stdout()).await?,
    }
    Ok(0)
}

fn build_service(cfg: &AppConfig, ephemeral: bool) -> Result<SecurityService, CliError> {
    let repository = factory::build_repository(cfg, ephemeral);
    let image_service =
        factory::build_image_service(cfg).map_err(|e| CliError::Config(format!("{e:#}")))?;
    tracing::debug!(
        image_service = image_service.name(),
        ephemeral,
        "engine collaborators ready"
    );
    let service = SecurityService::builder()
        .repository(repository)
        .image_service(image_service)
        .listener(Arc::new(ConsoleListener::stdout()))
        .build()?;
    Ok(service)
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 2: command/usage error
    // 11: config error
    // 20: IO error
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Command(_) => 2,
        CliError::Io(_) => 20,
        CliError::Service(_) => 50,
        CliError::Anyhow(_) => 50,
    }
}

fn init_tracing(logging: &catpoint_core::config::LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        // Config loading always fills the directory under the data dir.
        let dir = logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(std::path::PathBuf::from)
            .ok_or_else(|| "file logging enabled without a log directory".to_string())?;

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("catpoint.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
