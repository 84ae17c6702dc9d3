use clap::Parser;
use workplan::cli::commands::Cli;
use workplan::cli::handlers;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
