use clap::Parser;
use ctxload::cli::Cli;
use ctxload::error::formatter::ErrorFormatter;
use ctxload::error::rich::RichError;
use ctxload::{commands, logging};

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    logging::init(verbose);

    if let Err(err) = commands::dispatch(cli) {
        let rich = RichError::from(err);
        eprintln!("{}", ErrorFormatter::new(verbose).format(&rich));
        std::process::exit(1);
    }
}
