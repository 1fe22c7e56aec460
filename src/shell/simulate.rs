use std::time::Duration;

use tokio::time;

use crate::config::SimulationConfig;

use super::command::{GitCommand, NpmCommand};
use super::output::TerminalOutput;

const GIT_STATUS: &[&str] = &[
    "On branch main",
    "Your branch is up to date with 'origin/main'.",
    "",
    "nothing to commit, working tree clean",
];

pub(crate) async fn npm<O: TerminalOutput>(
    command: &NpmCommand,
    simulation: &SimulationConfig,
    out: &mut O,
) {
    match command {
        NpmCommand::Install => {
            run_step(
                out,
                "Installing dependencies...",
                simulation.install_delay,
                "Dependencies installed successfully.",
            )
            .await;
        }
        NpmCommand::Start => {
            run_step(
                out,
                "Starting application...",
                simulation.start_delay,
                "Application running at http://localhost:3000",
            )
            .await;
        }
        NpmCommand::RunDev => {
            run_step(
                out,
                "Starting development server...",
                simulation.start_delay,
                "Development server running at http://localhost:5173",
            )
            .await;
        }
        NpmCommand::Missing => out.write("Usage: npm <install|start|run dev>"),
        NpmCommand::Other(sub) => out.write(&format!("Unknown npm command: {sub}")),
    }
}

pub(crate) fn git<O: TerminalOutput>(command: &GitCommand, out: &mut O) {
    match command {
        GitCommand::Status => {
            for line in GIT_STATUS {
                out.write(line);
            }
        }
        GitCommand::Missing => out.write("Usage: git status"),
        GitCommand::Other(sub) => out.write(&format!("Unknown git command: {sub}")),
    }
}

async fn run_step<O: TerminalOutput>(out: &mut O, start: &str, delay: Duration, done: &str) {
    out.write(start);
    if !delay.is_zero() {
        time::sleep(delay).await;
    }
    out.write(done);
}
