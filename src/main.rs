use clap::Parser;
use testrun_report::cli::commands::{cmd_render, cmd_summary};
use testrun_report::cli::config::{Cli, Commands, apply_overrides};
use testrun_report::cli::logging::init_logging;
use testrun_report::config::load_config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Render {
            events,
            format,
            output_dir,
            output,
            title,
        } => {
            // Resolve settings: CLI > config file > defaults
            let config = apply_overrides(config, output_dir.as_deref(), title.as_deref());
            let all_passed = cmd_render(&events, &format, output.as_deref(), config)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Summary { events } => {
            let summary = cmd_summary(&events, config)?;
            if !summary.all_passed() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
