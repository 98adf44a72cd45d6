// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use monthflow::config::Config;
use monthflow::{cli, commands, db};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("MONTHFLOW_LOG")
                .unwrap_or_else(|_| "monthflow=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::load()?;
    let conn = db::open_or_init(&config)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path(&config)?.display());
        }
        Some(("period", sub)) => commands::periods::handle(&conn, &config, sub)?,
        Some(("category", sub)) => commands::categories::handle(&config, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, &config, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn, &config)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
