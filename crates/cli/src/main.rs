//! Detach CLI - setup check and background task demo

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use detach_core::application::{SetupCheck, TaskRegistry, TaskRunner};
use detach_core::port::StderrSink;
use detach_core::{display_safe, with_failure_suppressed, RunnerConfig, VERSION};
use detach_infra_system::SystemProbeImpl;

#[derive(Parser)]
#[command(name = "detach")]
#[command(about = "Detached background tasks and startup checks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log output format (pretty | json)
    #[arg(long, env = "DETACH_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a one-line hardware summary
    Check {
        /// Skip hardware inspection
        #[arg(short, long)]
        quiet: bool,

        /// Print the report as JSON on stdout (progress lines move to stderr)
        #[arg(long)]
        json: bool,
    },

    /// Launch background tasks and drain them before exit
    Demo {
        /// Number of tasks to launch
        #[arg(short, long, default_value = "100")]
        tasks: usize,

        /// Upper bound for each task's random sleep
        #[arg(long, default_value = "50")]
        max_sleep_ms: u64,

        /// Make every Nth task fail inside a suppressed scope (0 = never)
        #[arg(long, default_value = "0")]
        fail_every: usize,

        /// Name each thread while draining (overrides DETACH_VERBOSE_JOIN)
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_format)?;

    info!("Detach v{} starting...", VERSION);

    match cli.command {
        Commands::Check { quiet, json } => {
            let mut check = SetupCheck::new(Arc::new(SystemProbeImpl::new()));
            if json {
                check = check.with_sink(Arc::new(StderrSink));
            }
            let report = check.run(!quiet).await;

            if json {
                let out = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize setup report")?;
                println!("{}", out);
            }
        }

        Commands::Demo {
            tasks,
            max_sleep_ms,
            fail_every,
            verbose,
        } => {
            let config = RunnerConfig::from_env().context("Invalid runner configuration")?;
            let verbose = verbose || config.verbose_join;
            let runner = TaskRunner::new(TaskRegistry::global(), config);
            let drain = runner.drain_on_exit(verbose);

            let completed = Arc::new(AtomicUsize::new(0));
            for i in 1..=tasks {
                let completed = Arc::clone(&completed);
                let fails = fail_every > 0 && i % fail_every == 0;
                runner.launch(
                    move || {
                        let sleep_ms = rand::thread_rng().gen_range(0..=max_sleep_ms);
                        std::thread::sleep(Duration::from_millis(sleep_ms));
                        if fails {
                            let _: Option<()> = with_failure_suppressed(format!("Task {}", i))
                                .run(|| Err(format!("simulated failure after {} ms", sleep_ms)));
                            return;
                        }
                        completed.fetch_add(1, Ordering::SeqCst);
                    },
                    None,
                )?;
            }
            info!(tasks, "All tasks launched");

            drop(drain);

            let done = completed.load(Ordering::SeqCst);
            let line = display_safe(&format!("✅ {}/{} tasks completed", done, tasks));
            println!("{}", line.green().bold());
        }
    }

    Ok(())
}
