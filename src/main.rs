use clap::Parser;
use std::process;

use autoupdate::update::{check_for_updates, UpdateOptions};

#[derive(Parser, Debug)]
#[command(name = "autoupdate")]
#[command(about = "Check for a published update and apply it in place", long_about = None)]
struct Cli {
    /// Re-download the archive even when already on the published version
    #[arg(short = 'f', long)]
    force: bool,
}

fn main() {
    let cli = Cli::parse();

    let opts = UpdateOptions {
        forced: cli.force,
        ..UpdateOptions::default()
    };

    let code = match check_for_updates(&opts) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            println!("{err}");
            err.exit_code()
        }
    };

    process::exit(code);
}
