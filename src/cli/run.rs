//! `run` and `validate` subcommands

use std::sync::Arc;

use anyhow::{Context, Result};
use ratebench_core::{OrchestratorBuilder, Target};
use ratebench_dataset::load_requests;
use ratebench_report::{render_overall, render_snapshot, to_json};
use ratebench_targets::SocketTarget;

use super::RunArgs;

pub async fn execute_run(args: RunArgs) -> Result<()> {
    let config = args.to_config()?;
    config.validate()?;

    let requests = load_requests(&args.input)
        .with_context(|| format!("Failed to load requests from {}", args.input.display()))?;

    let target = Arc::new(
        SocketTarget::resolve(&args.server, args.transport)
            .await
            .with_context(|| format!("Failed to resolve target address: {}", args.server))?,
    );

    let (orchestrator, mut snapshots) = OrchestratorBuilder::new()
        .config(config)
        .requests(requests)
        .target(target.clone())
        .build()?;

    let live_target = Arc::clone(&target);
    let printer = tokio::spawn(async move {
        while let Some(snapshot) = snapshots.recv().await {
            let line = render_snapshot(&snapshot, |code| live_target.code_label(code));
            tracing::info!("{line}");
        }
    });

    let run = orchestrator.run_with_signal_handling().await?;

    // closes the snapshot stream
    drop(orchestrator);
    printer.await.context("Snapshot printer failed")?;

    let labels = |code: u16| target.code_label(code);
    if args.json {
        println!("{}", to_json(&run, labels)?);
    } else {
        println!();
        print!("{}", render_overall(&run.report, labels));
    }

    Ok(())
}

pub fn execute_validate(args: RunArgs) -> Result<()> {
    let config = args.to_config()?;
    config.validate()?;

    let requests = load_requests(&args.input)
        .with_context(|| format!("Failed to load requests from {}", args.input.display()))?;

    println!("Configuration OK");
    println!("  Requests:   {}", requests.len());
    println!("  Target:     {}://{}", args.transport, args.server);
    println!("  Workers:    {}", config.workers);
    println!("  Rate limit: {} req/s", config.rate_limit);
    println!("  Duration:   {:?}", config.duration);
    if config.loops > 0 {
        println!(
            "  Loop cap:   {} passes ({} requests)",
            config.loops,
            config.dispatch_cap(requests.len()).unwrap_or_default()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn validate_args(path: &str, extra: &[&str]) -> RunArgs {
        let mut argv = vec!["ratebench", "validate", "-d", path];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Validate(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_validate_accepts_good_input() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "example.com A").unwrap();

        let args = validate_args(file.path().to_str().unwrap(), &["-n", "2"]);
        assert!(execute_validate(args).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_input() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# nothing here").unwrap();

        let args = validate_args(file.path().to_str().unwrap(), &[]);
        let err = execute_validate(args).unwrap_err();
        assert!(format!("{err:#}").contains("no requests"));
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "example.com A").unwrap();

        let args = validate_args(file.path().to_str().unwrap(), &["-c", "0"]);
        assert!(execute_validate(args).is_err());
    }

    #[tokio::test]
    async fn test_run_against_unreachable_target_reports_loss() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "example.com A").unwrap();

        // a bound socket that never answers
        let silent = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server = silent.local_addr().unwrap().to_string();

        let argv = [
            "ratebench", "run", "-d", file.path().to_str().unwrap(), "-s", server.as_str(),
            "-l", "300ms", "-t", "50ms", "-Q", "20", "-c", "2", "-p", "--json",
        ];
        let args = match Cli::try_parse_from(argv).unwrap().command {
            Commands::Run(args) => args,
            other => panic!("unexpected command: {other:?}"),
        };

        assert!(execute_run(args).await.is_ok());
    }
}
