use clap::{Parser, Subcommand};

use crate::cmds::deploy::DeployCommand;

pub mod deploy;

#[derive(Debug, Parser)]
#[command(name = "permadeploy", version)]
pub struct Opt {
    #[arg(
        long,
        help = "Prints a verbose output during the program execution",
        global = true
    )]
    pub debug: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Deploy(DeployCommand),
}
