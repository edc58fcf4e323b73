use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use vos_crypto::PrefixedKey;
use vos_server::{ServerConfig, VosServer};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args, cli.verbose),
        Command::KeyHash(args) => {
            init_tracing(cli.verbose, "warn");
            println!("{}", key_hash(&args.token)?);
            Ok(())
        }
        Command::CheckConfig(args) => {
            init_tracing(cli.verbose, "warn");
            cmd_check_config(&args.file)
        }
        Command::DefaultConfig => {
            print!("{}", ServerConfig::default().to_toml_string()?);
            Ok(())
        }
    }
}

/// Installs the fmt subscriber. `RUST_LOG` wins over both arguments.
fn init_tracing(verbose: bool, default_filter: &str) {
    let fallback = if verbose { "debug" } else { default_filter };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("invalid configuration in {}", path.display())),
        None => Ok(ServerConfig::default()),
    }
}

fn cmd_serve(args: ServeArgs, verbose: bool) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    init_tracing(verbose, &config.log_filter);

    println!(
        "{} vos server on {} (storage: {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        config.storage.name().cyan()
    );
    if config.auth.api_keys.is_empty() {
        println!("  {} no API keys configured; every object request will be rejected", "!".yellow());
    }

    let server = VosServer::new(config).context("failed to start server")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn key_hash(token: &str) -> anyhow::Result<String> {
    let key = PrefixedKey::decode(token.trim()).context("not a valid API key")?;
    tracing::debug!(service = key.service_id(), "decoded key");
    Ok(key.lookup_hash())
}

fn cmd_check_config(file: &Path) -> anyhow::Result<()> {
    match load_config(Some(file)) {
        Ok(config) => {
            println!("{} {} is valid", "✓".green().bold(), file.display());
            println!("  {}", describe(&config));
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗".red().bold(), file.display());
            Err(e)
        }
    }
}

fn describe(config: &ServerConfig) -> String {
    format!(
        "bind {}, storage {}, {} principal(s), {} API key(s), required role {}",
        config.bind_addr,
        config.storage.name(),
        config.auth.principals.len(),
        config.auth.api_keys.len(),
        config.auth.required_role
    )
}
