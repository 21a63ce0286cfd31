mod cli;
mod config;
mod paths;
mod run;
mod session;
mod sim;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    let config = cli.config.as_deref();
    match cli.command {
        Some(Command::List) => run::list(config),
        Some(Command::Show { shader }) => run::show(config, &shader),
        Some(Command::Where) => run::where_(config),
        None => run::run(config, cli.run),
    }
}
