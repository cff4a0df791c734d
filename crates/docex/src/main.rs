mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // run entries are printed by the CLI itself; RUST_LOG can bring them back
    let default_filter = if cli.verbose {
        "debug,docex_lib::run::events=off"
    } else {
        "info,docex_lib::run::events=off"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = cli::load_config(cli.config)?;

    let ok = match cli.command {
        cli::Commands::Check { source } => cli::check::handle_check_command(&config, source)?,

        cli::Commands::Run {
            source,
            output,
            parallel,
            query_timeout,
            log_file,
        } => cli::run::handle_run_command(
            &config,
            cli::run::RunArgs {
                source,
                output,
                parallel,
                query_timeout,
                log_file,
            },
            cli.verbose,
        )?,

        cli::Commands::Categories { category } => {
            cli::categories::handle_categories_command(category.as_deref())?;
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
