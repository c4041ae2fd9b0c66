//! rcr binary entry point

use clap::Parser;
use rcr::cli::{self, Cli};
use rcr::config::FileSource;
use rcr::dispatcher::{self, exit};
use rcr::logging;
use rcr_exec::SshRunner;

#[tokio::main]
async fn main() {
    // Bare invocation gets the concise usage, like ssh itself
    if std::env::args().len() == 1 {
        cli::print_usage();
        std::process::exit(exit::USAGE);
    }

    let args = Cli::parse();
    logging::init(args.verbose);

    let profiles = FileSource::from_env();
    let runner = SshRunner::new();

    let code = dispatcher::run(&args.command, &profiles, &runner).await;
    std::process::exit(code);
}
