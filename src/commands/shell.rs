// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Line-oriented loop over one long-lived session, so `undo`/`redo` act on
//! the changes made earlier in the same run.

use crate::cli;
use crate::commands;
use crate::session::Session;
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

const PROMPT: &str = "pnlbook> ";

pub fn run<R: BufRead, W: Write>(session: &mut Session, input: R, mut out: W) -> Result<()> {
    write!(out, "{}", PROMPT)?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        match line {
            "" | "#" => {}
            "exit" | "quit" => break,
            _ => {
                if let Err(e) = run_line(session, line, &mut out) {
                    writeln!(out, "error: {:#}", e)?;
                }
            }
        }
        write!(out, "{}", PROMPT)?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

fn run_line<W: Write>(session: &mut Session, line: &str, out: &mut W) -> Result<()> {
    let words = shell_words::split(line)?;
    debug!(?words, "shell command");
    let matches = cli::build_cli()
        .no_binary_name(true)
        .try_get_matches_from(words)?;
    match matches.subcommand_name() {
        Some("shell") => anyhow::bail!("already in a shell"),
        Some(_) => commands::dispatch(session, &matches),
        None => {
            cli::build_cli().write_help(out)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::io::Cursor;

    fn session() -> Session {
        Session::open_in_memory(Config::new("/unused").with_base_currency("USD")).unwrap()
    }

    #[test]
    fn undo_spans_lines() {
        let mut s = session();
        let script = "\
entry add --date 2024-01-01 --subject AAA --pnl 100
entry edit --id 1 --pnl 200
undo
quit
entry add --date 2024-01-02 --subject never
";
        let mut out = Vec::new();
        run(&mut s, Cursor::new(script), &mut out).unwrap();
        assert_eq!(s.get(1).unwrap().profit_loss.to_string(), "100");
        assert!(s.can_redo());
        assert_eq!(s.count(&[]).unwrap(), 1);
    }

    #[test]
    fn errors_do_not_end_the_loop() {
        let mut s = session();
        let script = "entry rm --id 9\nbogus\nredo\nentry add --date 2024-01-01 --subject ok\n";
        let mut out = Vec::new();
        run(&mut s, Cursor::new(script), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Entry #9 not found"));
        assert!(text.contains("Nothing to redo"));
        assert_eq!(s.count(&[]).unwrap(), 1);
    }

    #[test]
    fn quoted_arguments_survive_splitting() {
        let mut s = session();
        let mut out = Vec::new();
        run_line(
            &mut s,
            "entry add --date 2024-03-01 --subject 'Big Co' --note \"a b\"",
            &mut out,
        )
        .unwrap();
        let e = s.get(1).unwrap();
        assert_eq!(e.subject, "Big Co");
        assert_eq!(e.note.as_deref(), Some("a b"));
    }

    #[test]
    fn help_goes_to_the_shell_writer() {
        let mut s = session();
        let mut out = Vec::new();
        run(&mut s, Cursor::new("--profile x\n"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Usage:"));
        assert!(text.contains("entry"));
    }
}
