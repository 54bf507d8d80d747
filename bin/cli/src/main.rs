use clap::Parser;
use permadeploy_cli::cmd::deploy;
use tracing::error;

use crate::cmds::{Command, Opt};

mod cmds;

const DEBUG_ENV: &str = "PERMADEPLOY_DEBUG";

fn main() {
    let opt = Opt::parse();

    let tracing_level = if opt.debug || permadeploy_std::env::as_boolean_truthy(DEBUG_ENV) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt::fmt()
        .with_max_level(tracing_level)
        .with_writer(std::io::stderr)
        .init();

    let result = match opt.cmd {
        Command::Deploy(cmd) => deploy::invoke(cmd.cwd),
    };

    match result {
        Ok(output) => {
            if let Some(output) = output {
                println!("{output}");
            }
        }
        Err(e) => {
            error!("Deployment failed: {e}");
            std::process::exit(1);
        }
    };
}
