pub mod commands;
pub mod logging;
pub mod types;

use clap::Parser;

/// Run the command-line interface
pub fn run() {
    let cli = types::Cli::parse();

    // Initialize logging system
    logging::init_logging(cli.debug);

    if let Err(e) = commands::process(&cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
