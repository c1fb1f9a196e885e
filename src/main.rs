use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use shelfsync::api::HttpBackend;
use shelfsync::cli::{self, Cli, render};
use shelfsync::core::config::{self, ShelfConfig};
use shelfsync::core::store::{FileStore, KeyValueStore};
use shelfsync::member::Member;
use simplelog::{ConfigBuilder, WriteLogger};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    dotenv::dotenv().ok();

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: {e}, using defaults");
            ShelfConfig::default()
        }
    };
    let resolved = config::resolve(&file_config, args.base_url.as_deref());

    // File logger, so command output stays clean
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!("ShelfSync starting against {}", resolved.base_url);

    match run(args, resolved).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli, resolved: config::ResolvedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn KeyValueStore> = match resolved.storage_file {
        Some(path) => Arc::new(FileStore::new(path)),
        None => Arc::new(FileStore::default_location()?),
    };
    let backend = HttpBackend::new(resolved.base_url, resolved.request_timeout)?;

    let mut member = Member::new(Arc::new(backend), store, resolved.fine_policy);
    member.restore();

    match cli::run(&mut member, args.command).await {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(failure) => {
            log::error!("{:?} failed: {}", failure.action, failure.error);
            Err(render::alert(&failure.error.alert(failure.action)).into())
        }
    }
}
