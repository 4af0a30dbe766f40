use anyhow::{Context, Result};
use clap::Parser;
use std::process::exit;

use chroma_bench_lib::{
    cli::formatters::{print_error, print_notice, report, EXIT_FAILURE, EXIT_SUCCESS},
    cli::{handle_command, CliArgs},
    client::build_client,
    config::{self, ConnectionMode},
};

fn main() -> Result<()> {
    // --- Setup Logging ---
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // --- Parse Args ---
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Help and version requests are not failures.
            let code = if e.use_stderr() { EXIT_FAILURE } else { EXIT_SUCCESS };
            let _ = e.print();
            exit(code);
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let code = runtime.block_on(run(args));
    drop(runtime);
    exit(code);
}

async fn run(args: CliArgs) -> i32 {
    // --- Load Configuration ---
    let loaded = match config::load_config() {
        Ok(loaded) => loaded,
        Err(e) => {
            print_error(&e);
            return EXIT_FAILURE;
        }
    };
    let profile = loaded.profile;

    if args.verbose {
        match &loaded.env_file {
            Some(path) => eprintln!("Loaded settings from {}", path.display()),
            None => eprintln!("No env file found"),
        }
        for line in profile.summary_lines() {
            eprintln!("{}", line);
        }
    }

    if profile.mode == ConnectionMode::Local {
        print_notice("No CHROMA_HOST set, using local persistent storage");
    }

    // --- Initialize Client ---
    let client = match build_client(&profile) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to initialize Chroma client: {:?}", e);
            print_error(&e);
            return EXIT_FAILURE;
        }
    };

    // --- Execute Command ---
    let result = handle_command(&args.command, client.as_ref()).await;
    report(result, args.json)
}
