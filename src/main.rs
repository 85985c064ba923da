use clap::Parser;
use tiercast::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
