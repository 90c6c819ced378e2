//! sd - diagnostic dump trigger
//!
//! CLI entry point. Assembles a small demo stack (two registered subsystem
//! emitters plus a sample long-lived module on its own task) and runs one
//! dump cycle against it, writing the dump text to stdout.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use stackdump::cli::{Cli, Command};
use stackdump::config::Config;
use stackdump::{Dispatcher, DumpRegistry, DumpSink, DumpToken, ModuleHost, StackModule};

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stackdump")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Setup tracing subscriber - write to log file so the dump text on
    // stdout stays clean
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("stackdump.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

/// Sample long-lived stack module for the demo stack.
#[derive(Default)]
struct DemoController {
    dumps_served: u64,
}

#[async_trait]
impl StackModule for DemoController {
    async fn dump(&mut self, sink: &DumpSink, args: &[String]) {
        self.dumps_served += 1;
        sink.line("controller: state=idle links=0");
        sink.line(format!("controller: dumps-served={}", self.dumps_served));
        if !args.is_empty() {
            sink.line(format!("controller: args={}", args.join(" ")));
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let args = match cli.command {
        Some(Command::Dump { args }) => args,
        None => Vec::new(),
    };

    // Demo stack: two registered subsystem emitters plus the controller
    // module on its own task.
    let registry = Arc::new(DumpRegistry::new());
    registry.register(
        DumpToken::from_raw(1),
        Box::new(|sink, _args| {
            sink.line("link-manager: links=0 rx=0 tx=0");
        }),
    );
    registry.register(
        DumpToken::from_raw(2),
        Box::new(|sink, _args| {
            sink.line("timer-wheel: armed=0 expired=0");
        }),
    );

    let host = ModuleHost::new(&config.dispatch);
    let module = host.handle();
    let module_task = tokio::spawn(host.run(DemoController::default()));

    let dispatcher = Dispatcher::new(registry, module.clone(), config.dispatch.clone());

    let sink = DumpSink::new(std::io::stdout());
    let outcome = dispatcher.dump(&sink, &args).await;
    info!(?outcome, "Dump cycle finished");

    let _ = module.shutdown().await;
    module_task.await.context("Module task failed")?;

    Ok(())
}
