// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(true)
        .value_parser(value_parser!(i64))
        .help(help)
}

fn entry_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("date")
            .long("date")
            .required(required)
            .help("YYYY-MM-DD"),
    )
    .arg(
        Arg::new("subject")
            .long("subject")
            .required(required)
            .help("Project or instrument name"),
    )
    .arg(Arg::new("category").long("category").help("e.g. Stock, Fund"))
    .arg(Arg::new("qty").long("qty").allow_hyphen_values(true))
    .arg(Arg::new("price").long("price").allow_hyphen_values(true))
    .arg(
        Arg::new("currency")
            .long("currency")
            .help("3-letter code, defaults to the base currency"),
    )
    .arg(
        Arg::new("pnl")
            .long("pnl")
            .allow_hyphen_values(true)
            .help("Realized profit (negative for a loss)"),
    )
    .arg(Arg::new("note").long("note"))
}

fn entry_cmd() -> Command {
    Command::new("entry")
        .about("Record, edit and list ledger entries")
        .subcommand_required(true)
        .subcommand(entry_fields(Command::new("add").about("Record an entry"), true))
        .subcommand(entry_fields(
            Command::new("edit")
                .about("Change fields of an entry")
                .arg(id_arg("id", "Entry id")),
            false,
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete an entry")
                .arg(id_arg("id", "Entry id")),
        )
        .subcommand(json_flags(
            Command::new("show")
                .about("Show one entry and its tags")
                .arg(id_arg("id", "Entry id")),
        ))
        .subcommand(json_flags(
            Command::new("list")
                .about("List entries, newest first")
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .short('f')
                        .action(ArgAction::Append)
                        .allow_hyphen_values(true)
                        .help("FIELD<op>VALUE with op one of = >= <= ~ (repeatable)"),
                )
                .arg(Arg::new("sort").long("sort").help("Field to sort by"))
                .arg(
                    Arg::new("asc")
                        .long("asc")
                        .action(ArgAction::SetTrue)
                        .help("Ascending order"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("offset")
                        .long("offset")
                        .value_parser(value_parser!(u32)),
                ),
        ))
        .subcommand(json_flags(
            Command::new("total")
                .about("Sum of profit/loss")
                .arg(Arg::new("from").long("from").help("YYYY-MM-DD"))
                .arg(Arg::new("to").long("to").help("YYYY-MM-DD"))
                .arg(Arg::new("category").long("category")),
        ))
}

fn tag_cmd() -> Command {
    Command::new("tag")
        .about("Manage tags and entry links")
        .subcommand_required(true)
        .subcommand(
            Command::new("create")
                .about("Create a tag")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("color").long("color").help("e.g. #ff8800"))
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(
            Command::new("edit")
                .about("Rename or recolor a tag")
                .arg(id_arg("id", "Tag id"))
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("color").long("color"))
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a tag and its links")
                .arg(id_arg("id", "Tag id")),
        )
        .subcommand(json_flags(Command::new("list").about("List tags")))
        .subcommand(json_flags(
            Command::new("search")
                .about("Find tags by name or description")
                .arg(Arg::new("text").long("text").required(true)),
        ))
        .subcommand(
            Command::new("link")
                .about("Attach tags to an entry")
                .arg(id_arg("entry", "Entry id"))
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("unlink")
                .about("Detach tags from an entry")
                .arg(id_arg("entry", "Entry id"))
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(
            Command::new("set")
                .about("Replace the full tag set of an entry")
                .arg(id_arg("entry", "Entry id"))
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .num_args(0..)
                        .value_parser(value_parser!(i64))
                        .help("Tag ids; omit to clear"),
                ),
        )
        .subcommand(json_flags(
            Command::new("entries")
                .about("Entries carrying a tag")
                .arg(id_arg("tag", "Tag id")),
        ))
}

pub fn build_cli() -> Command {
    Command::new("pnlbook")
        .version(clap::crate_version!())
        .about("Profit/loss ledger with tags and undo/redo")
        .arg(
            Arg::new("profile")
                .long("profile")
                .global(true)
                .help("Profile to open (defaults to config or 'default')"),
        )
        .subcommand(entry_cmd())
        .subcommand(tag_cmd())
        .subcommand(
            Command::new("category")
                .about("Preset categories")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add").arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("rm").arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("goal")
                .about("Monthly and yearly profit goals")
                .subcommand_required(true)
                .subcommand(
                    Command::new("set")
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        )
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .required(true)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        ),
                )
                .subcommand(
                    Command::new("set-year")
                        .about("Spread a yearly goal over twelve months")
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        ),
                )
                .subcommand(
                    Command::new("show")
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        )
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .value_parser(value_parser!(u32)),
                        ),
                ),
        )
        .subcommand(Command::new("undo").about("Undo the last entry change"))
        .subcommand(Command::new("redo").about("Redo the last undone change"))
        .subcommand(Command::new("history").about("Show the undo stack"))
        .subcommand(Command::new("shell").about("Interactive session with undo/redo"))
}
