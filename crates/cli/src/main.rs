// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! respcap binary entry point.

use clap::Parser;

use respcap::cli::Cli;
use respcap::commands::run;
use respcap::logging;
use respcap::output::print_error;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let stdout = std::io::stdout();
    if let Err(e) = run(&cli, &mut stdout.lock()) {
        print_error(e);
        std::process::exit(1);
    }
}
