// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Config --> GitClient --> Command Dispatch
//!   Status | Log | Branches | Remotes | Sync | Checkout | Commit
//!   Push | Pull | Fetch | Merge | Stash
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use gitdeck::cli::global::GlobalOptions;
use gitdeck::cli::{self, Command};
use gitdeck::cmd::{
    run_branches_command, run_checkout_command, run_commit_command, run_fetch_command,
    run_log_command, run_merge_command, run_pull_command, run_push_command, run_remotes_command,
    run_stash_command, run_status_command, run_sync_command,
};
use gitdeck::config::Config;
use gitdeck::config::loader::ConfigLoader;
use gitdeck::git::client::GitClient;
use gitdeck::git::events::TracingSink;
use gitdeck::git::runner::SystemRunner;
use gitdeck::logging::{LogConfig, LogLevel, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = build_log_config(&cli.global, &config);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config).await
}

fn build_log_config(global: &GlobalOptions, config: &Config) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .or(config.global.log_level)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .or(config.global.file_log_level)
        .unwrap_or(console_level);

    let log_file = global
        .log_file
        .clone()
        .or_else(|| config.global.log_file.clone());

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(log_file.map(|p| p.display().to_string()))
        .build()
}

fn load_config(global: &GlobalOptions) -> gitdeck::error::Result<Config> {
    let mut loader = ConfigLoader::new().add_toml_file_optional("gitdeck.toml");
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix("GITDECK");
    for option in &global.options {
        let Some((key, value)) = option.split_once('=') else {
            anyhow::bail!("invalid --set option '{option}', expected KEY=VALUE");
        };
        loader = loader.set(key, value)?;
    }
    loader.build()
}

fn build_client(config: &Config) -> gitdeck::error::Result<GitClient<SystemRunner>> {
    let runner = config.runner()?;
    Ok(GitClient::new(runner).with_events(Arc::new(TracingSink)))
}

async fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let repo = cli.global.repo.clone();
    let json = cli.global.json;

    let result = match &cli.command {
        Some(Command::Version) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(command) => match build_client(config) {
            Ok(client) => match command {
                Command::Status => run_status_command(&client, &repo, json).await,
                Command::Log(args) => run_log_command(&client, &repo, args, json).await,
                Command::Branches => run_branches_command(&client, &repo, json).await,
                Command::Remotes => run_remotes_command(&client, &repo, json).await,
                Command::Sync => run_sync_command(&client, &repo, json).await,
                Command::Checkout(args) => run_checkout_command(&client, &repo, args).await,
                Command::Commit(args) => run_commit_command(&client, &repo, args).await,
                Command::Push => run_push_command(&client, &repo).await,
                Command::Pull => run_pull_command(&client, &repo).await,
                Command::Fetch => run_fetch_command(&client, &repo).await,
                Command::Merge(args) => run_merge_command(&client, &repo, args).await,
                Command::Stash(args) => {
                    run_stash_command(&client, &repo, &args.subcommand, json).await
                }
                Command::Version => unreachable!("handled above"),
            },
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
