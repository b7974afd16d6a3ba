// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::io;

use pnlbook::{Config, Session, cli, commands, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let profile = matches.get_one::<String>("profile").map(|s| s.as_str());
    let config = Config::load(profile)?;
    let mut session = Session::open(config)?;

    match matches.subcommand() {
        Some(("shell", _)) => commands::shell::run(&mut session, io::stdin().lock(), io::stdout())?,
        Some(_) => commands::dispatch(&mut session, &matches)?,
        None => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    session.close()?;
    Ok(())
}
