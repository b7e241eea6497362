mod commands;
mod data;
mod glob;
mod image;
mod layout;
mod options;
mod sprite_name;

use std::process;

use env_logger::Env;
use structopt::StructOpt;

use crate::options::{Options, Subcommand};

fn run(options: Options) -> anyhow::Result<()> {
    match options.command {
        Subcommand::Pack(pack_options) => commands::pack(pack_options)?,
        Subcommand::Fit(fit_options) => commands::fit(fit_options)?,
    }

    Ok(())
}

fn main() {
    let options = Options::from_args();

    let log_filter = match options.global.verbosity {
        0 => "info",
        1 => "info,atlaser=debug,splitpack=debug",
        2 => "info,atlaser=trace,splitpack=trace",
        _ => "trace",
    };

    let log_env = Env::default().default_filter_or(log_filter);

    env_logger::Builder::from_env(log_env)
        .format_timestamp(None)
        .init();

    match run(options) {
        Ok(_) => {}
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    }
}
