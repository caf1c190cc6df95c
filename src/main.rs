// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use civic_dispatch::config::load_and_validate_config;
use civic_dispatch::dispatch::{Dispatcher, PollOptions};
use civic_dispatch::model::{Attachment, JobStatus, RequestBuilder};

/// A request file: the request itself plus paths of files to attach.
#[derive(Deserialize)]
struct RequestFile {
    #[serde(flatten)]
    request: RequestBuilder,
    #[serde(default)]
    attachments: Vec<PathBuf>,
}

enum Command {
    Dispatch {
        registry: PathBuf,
        request: PathBuf,
        max_attempts: Option<u32>,
        interval_ms: Option<u64>,
    },
    Health {
        registry: PathBuf,
    },
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {0} <registry.yaml|registry.toml> <request.json> [--max-attempts N] [--interval-ms N]\n\
         \x20      {0} <registry.yaml|registry.toml> --health\n\
         Example: {0} configs/local-only.yaml requests/allocation-local.json",
        program
    )
}

fn parse_args(args: &[String]) -> Result<Command> {
    let program = args.first().map(String::as_str).unwrap_or("civic-dispatch");
    if args.len() < 3 {
        bail!(usage(program));
    }

    let registry = PathBuf::from(&args[1]);
    if args[2] == "--health" {
        return Ok(Command::Health { registry });
    }

    let request = PathBuf::from(&args[2]);
    let mut max_attempts = None;
    let mut interval_ms = None;

    let mut rest = args[3..].iter();
    while let Some(flag) = rest.next() {
        let value = rest
            .next()
            .with_context(|| format!("{} needs a value\n{}", flag, usage(program)))?;
        match flag.as_str() {
            "--max-attempts" => {
                max_attempts = Some(value.parse().with_context(|| format!("invalid --max-attempts '{}'", value))?)
            }
            "--interval-ms" => {
                interval_ms = Some(value.parse().with_context(|| format!("invalid --interval-ms '{}'", value))?)
            }
            other => bail!("unknown option '{}'\n{}", other, usage(program)),
        }
    }

    Ok(Command::Dispatch {
        registry,
        request,
        max_attempts,
        interval_ms,
    })
}

fn read_request(path: &Path) -> Result<RequestBuilder> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request file '{}'", path.display()))?;
    let file: RequestFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse request file '{}'", path.display()))?;

    let mut request = file.request;
    for attachment in file.attachments {
        let bytes = std::fs::read(&attachment)
            .with_context(|| format!("failed to read attachment '{}'", attachment.display()))?;
        let filename = attachment
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| attachment.display().to_string());
        request = request.attachment(Attachment::new(filename, bytes));
    }
    Ok(request)
}

async fn run_health(dispatcher: &Dispatcher) -> Result<bool> {
    let table = dispatcher.refresh_health().await;
    for (backend, available) in &table {
        let state = if *available { "available" } else { "unavailable" };
        println!("{:<16} {}", backend, state);
    }
    Ok(table.iter().all(|(_, available)| *available))
}

async fn run_dispatch(
    dispatcher: &Dispatcher,
    request: &Path,
    max_attempts: Option<u32>,
    interval_ms: Option<u64>,
) -> Result<bool> {
    let request = read_request(request)?.build();

    let mut options: PollOptions = dispatcher.poll_options().with_observer(|status: &JobStatus| {
        eprintln!("  {} -> {}", status.request_id, status.state);
        Ok(())
    });
    if let Some(max_attempts) = max_attempts {
        options.max_attempts = max_attempts;
    }
    if let Some(interval_ms) = interval_ms {
        options.interval = Duration::from_millis(interval_ms);
    }

    eprintln!(
        "Dispatching '{}' ({}, compute preference {})",
        request.request_id(),
        request.kind().map(|k| k.as_str()).unwrap_or("no kind"),
        request.compute_preference()
    );

    let started = Instant::now();
    let outcomes = dispatcher.dispatch(&request, &options).await?;

    let mut all_ok = true;
    for outcome in outcomes {
        match outcome.result {
            Ok(result) => {
                eprintln!("[{}] ok", outcome.backend);
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Err(error) => {
                all_ok = false;
                eprintln!("[{}] {} error: {}", outcome.backend, error.kind(), error);
            }
        }
    }
    eprintln!("Finished in {:.2?}", started.elapsed());
    Ok(all_ok)
}

async fn run(command: Command) -> Result<bool> {
    match command {
        Command::Health { registry } => {
            let cfg = load_and_validate_config(&registry)?;
            let dispatcher = Dispatcher::from_config(&cfg)?;
            run_health(&dispatcher).await
        }
        Command::Dispatch {
            registry,
            request,
            max_attempts,
            interval_ms,
        } => {
            let cfg = load_and_validate_config(&registry)?;
            let dispatcher = Dispatcher::from_config(&cfg)?;
            run_dispatch(&dispatcher, &request, max_attempts, interval_ms).await
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let result = match parse_args(&args) {
        Ok(command) => run(command).await,
        Err(error) => Err(error),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            std::process::exit(1);
        }
    }
}
