//! CLI entry point - the composition root.
//!
//! This is the only place where the resolver, engine, and terminal renderer
//! are wired together. Command dispatch routes to handlers.

use clap::Parser;

use workshopdl_cli::{Cli, CliError, Commands, handlers};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging on stderr: --verbose wins, then RUST_LOG, then warn
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("{} {err:#}", console::style("error:").red().bold());
        let code = err
            .downcast_ref::<CliError>()
            .map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Dispatch to the appropriate handler
    let Some(command) = cli.command else {
        // No command provided - show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Download {
            reference,
            batch_size,
            steamcmd,
            per_item,
            delete_failed,
        } => {
            let args = handlers::download::DownloadArgs {
                reference,
                batch_size,
                steamcmd,
                per_item,
                delete_failed,
            };
            handlers::download::execute(args).await?;
        }
        Commands::Path {
            app_id,
            item_id,
            steamcmd,
        } => {
            handlers::path::execute(&app_id, item_id.as_deref(), steamcmd.as_deref())?;
        }
        Commands::Locate => {
            handlers::locate::execute()?;
        }
    }

    Ok(())
}
