use clap::Parser;
use dayplan::cli::commands::Cli;
use dayplan::cli::handlers;
use dayplan::io::config_io;
use dayplan::io::logging::{self, LogTarget};

fn main() {
    let cli = Cli::parse();
    let data_dir = handlers::resolve_data_dir(cli.data_dir.as_deref());

    match cli.command {
        None => {
            // No subcommand → launch TUI
            let config = match config_io::read_config(&data_dir) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("error: {}", e);
                    std::process::exit(1);
                }
            };
            // The TUI owns the terminal, so logs go to a file
            logging::init(
                LogTarget::File(logging::log_file_path(&data_dir)),
                &config.log.level,
            );
            let date = match handlers::resolve_date(cli.date.as_deref()) {
                Ok(date) => date,
                Err(e) => {
                    eprintln!("error: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = dayplan::tui::run(&data_dir, config, date) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            logging::init(LogTarget::Stderr, "warn");
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
