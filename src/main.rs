use std::io::{IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use reposhell::cli::{Cli, Source};
use reposhell::core::BuildOptions;
use reposhell::repo::{GithubRepository, LocalRepository, Repository};
use reposhell::shell::WriterOutput;
use reposhell::{Control, Interpreter, Session, SessionConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = reposhell::logging::init_logging(&cli.log_level) {
        eprintln!("reposhell: {err:#}");
        return ExitCode::from(2);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("reposhell: {err:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let options = cli.build_options();
    let config = cli.session_config();

    match cli.source() {
        Source::Local(dir) => repl(Arc::new(LocalRepository), dir, &options, config).await,
        Source::Github(repo_id) => {
            let repo = GithubRepository::new(cli.github_token.clone())?;
            repl(Arc::new(repo), repo_id, &options, config).await
        }
    }
}

async fn repl<R: Repository>(
    repo: Arc<R>,
    repo_id: String,
    options: &BuildOptions,
    config: SessionConfig,
) -> Result<()> {
    let session = Session::open(repo, repo_id, options, config).await?;
    let interactive = std::io::stdin().is_terminal();
    let output = WriterOutput::new(std::io::stdout(), std::io::stdout().is_terminal());
    let mut interpreter = Interpreter::new(session, output);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if interactive {
            let mut stdout = std::io::stdout();
            write!(stdout, "{}", reposhell::prompt(interpreter.cwd()))?;
            stdout.flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if interpreter.execute(&line).await == Control::Exit {
            break;
        }
    }

    info!("session closed");
    Ok(())
}
