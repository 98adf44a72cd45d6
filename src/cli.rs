// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, ArgGroup, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("monthflow")
        .version(clap::crate_version!())
        .about("Monthly income and expense tracker with Sankey flow reports")
        .subcommand(Command::new("init").about("Create the database and print its location"))
        .subcommand(
            Command::new("period")
                .about("Record and inspect monthly periods")
                .subcommand(
                    Command::new("add")
                        .about("Save income and expenses for one month")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .required(true)
                                .help("Full month name, e.g. January"),
                        )
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .value_parser(value_parser!(i32).range(1000..=9999))
                                .help("Four-digit year, defaults to the current year"),
                        )
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .value_name("CATEGORY=AMOUNT")
                                .help("Repeat for each category; each at most once")
                                .action(ArgAction::Append),
                        )
                        .arg(
                            Arg::new("expense")
                                .long("expense")
                                .value_name("CATEGORY=AMOUNT")
                                .help("Repeat for each category; each at most once")
                                .action(ArgAction::Append),
                        )
                        .arg(Arg::new("comment").long("comment"))
                        .arg(
                            Arg::new("replace")
                                .long("replace")
                                .action(ArgAction::SetTrue)
                                .help("Overwrite an existing period with the same key"),
                        )
                        .arg(
                            Arg::new("allow-duplicate")
                                .long("allow-duplicate")
                                .action(ArgAction::SetTrue)
                                .help("Store another document even if the key exists"),
                        )
                        .group(
                            ArgGroup::new("mode")
                                .args(["replace", "allow-duplicate"])
                                .multiple(false),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List saved periods with totals"),
                ))
                .subcommand(
                    json_flags(
                        Command::new("show")
                            .about("Show metrics and the income/expense flow for a period")
                            .arg(Arg::new("key").required(true).help("e.g. 2024_January")),
                    )
                    .arg(
                        Arg::new("plotly")
                            .long("plotly")
                            .action(ArgAction::SetTrue)
                            .conflicts_with_all(["json", "jsonl"])
                            .help("Print a Plotly Sankey figure"),
                    ),
                )
                .subcommand(
                    Command::new("months")
                        .about("List selectable periods for a year and the next")
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .value_parser(value_parser!(i32).range(1000..=9998)),
                        ),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Configured categories")
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("export")
                .about("Export stored data")
                .subcommand(
                    Command::new("periods")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("flow")
                        .about("Write a period's Plotly Sankey figure as JSON")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored periods for problems"))
}
