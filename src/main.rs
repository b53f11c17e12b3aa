use anyhow::Result;
use clap::{CommandFactory, Parser};
use selinux_audit_tools::cli::Cli;
use selinux_audit_tools::commands::show;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(shell) = cli.generate_completion {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "selinux-audit", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let options = cli.show_options(io::stdin().is_terminal(), io::stdout().is_terminal());
    let status = show::run(&options)?;
    Ok(ExitCode::from(u8::try_from(status).unwrap_or(1)))
}
