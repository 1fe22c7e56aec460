//! Line-oriented command interpreter over a repository session.

mod command;
mod output;
mod simulate;

pub use command::{Command, GitCommand, NpmCommand};
pub use output::{BufferedOutput, TerminalOutput, WriterOutput};

use tracing::debug;

use crate::core::{listing_order, parent_dir, render_lines};
use crate::error::FsError;
use crate::models::NodeRef;
use crate::repo::Repository;
use crate::session::Session;

const HELP: &[&str] = &[
    "Available commands:",
    "  help                  Show this help",
    "  cd [path]             Change directory",
    "  ls [path]             List directory contents",
    "  pwd                   Print working directory",
    "  cat <file>            Print file contents",
    "  touch <file>          Create an empty file",
    "  tree [path]           Show a directory tree",
    "  write <file> <text>   Save text to a file",
    "  status <file>         Show the last fetch/save status of a file",
    "  clear                 Clear the terminal",
    "  npm install           Install dependencies",
    "  npm start             Start the application",
    "  npm run dev           Start the development server",
    "  git status            Show working tree status",
];

/// Whether the host should keep reading lines.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Control {
    Continue,
    Exit,
}

/// Runs one command line at a time against a session, writing every result
/// to `O`. No command error escapes `execute`.
pub struct Interpreter<R, O> {
    session: Session<R>,
    output: O,
}

impl<R: Repository, O: TerminalOutput> Interpreter<R, O> {
    pub fn new(session: Session<R>, output: O) -> Self {
        Self { session, output }
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<R> {
        &mut self.session
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn cwd(&self) -> &str {
        self.session.cwd()
    }

    /// Execute one line. Completes only once any fetch, save or simulated
    /// delay it started has resolved.
    pub async fn execute(&mut self, line: &str) -> Control {
        let command = Command::parse(line);
        debug!(?command, cwd = %self.session.cwd(), "executing command");

        match command {
            Command::Empty => {}
            Command::Help => {
                for line in HELP {
                    self.output.write(line);
                }
            }
            Command::Cd(target) => self.cd(target),
            Command::Ls(target) => self.ls(target),
            Command::Pwd => self.output.write(self.session.cwd()),
            Command::Cat(target) => self.cat(target).await,
            Command::Clear => self.output.clear(),
            Command::Touch(target) => self.touch(target),
            Command::Tree(target) => self.tree(target),
            Command::Write { path, text } => self.write(path, text).await,
            Command::Status(target) => self.status(target),
            Command::Npm(npm) => {
                simulate::npm(&npm, &self.session.config().simulation, &mut self.output).await
            }
            Command::Git(git) => simulate::git(&git, &mut self.output),
            Command::Exit => return Control::Exit,
            Command::Unknown(name) => self.output.write(&format!("Command not found: {name}")),
        }
        Control::Continue
    }

    fn cd(&mut self, target: Option<&str>) {
        let result = match target {
            None | Some("/") => self.session.change_dir("/"),
            Some("..") => {
                let parent = parent_dir(self.session.cwd());
                self.session.change_dir(&parent)
            }
            Some(path) => self.session.change_dir(path),
        };

        match result {
            Ok(cwd) => self.output.write(&format!("Changed directory to: {cwd}")),
            Err(_) => self.output.write(&format!(
                "Directory not found: {}",
                target.unwrap_or_default()
            )),
        }
    }

    fn ls(&mut self, target: Option<&str>) {
        let expr = target.unwrap_or(".");
        match self.session.resolve(expr).and_then(|node| node.children()) {
            Some(children) => {
                for node in listing_order(children) {
                    let marker = if node.is_dir() { 'd' } else { '-' };
                    self.output.write(&format!("{marker} {}", node.name));
                }
            }
            None => {
                let label = target.unwrap_or(self.session.cwd());
                self.output
                    .write(&format!("Cannot access '{label}': No such directory"));
            }
        }
    }

    async fn cat(&mut self, target: Option<&str>) {
        let Some(expr) = target else {
            self.output.write("Usage: cat <file>");
            return;
        };

        let path = match self.session.resolve(expr) {
            Some(NodeRef::Node(node)) if !node.is_dir() => node.path.clone(),
            Some(_) => {
                self.output.write(&format!("Not a file: {expr}"));
                return;
            }
            None => {
                self.output.write(&format!("File not found: {expr}"));
                return;
            }
        };

        match self.session.fetch_file(&path).await {
            Ok(content) => {
                self.output.write(&format!("Content of {expr}:"));
                for line in content.lines() {
                    self.output.write(line);
                }
            }
            Err(err) => self.output.write(&format!("Error reading file: {err}")),
        }
    }

    fn touch(&mut self, target: Option<&str>) {
        let Some(expr) = target else {
            self.output.write("Usage: touch <file>");
            return;
        };

        match self.session.create_file(expr) {
            Ok(path) => self.output.write(&format!("Created file: {path}")),
            Err(FsError::DuplicateEntry(existing)) => {
                self.output.write(&format!("File already exists: /{existing}"))
            }
            Err(FsError::NotADirectory(_)) => self
                .output
                .write(&format!("Cannot create '{expr}': Not a directory")),
            Err(err) => self.output.write(&format!("Cannot create '{expr}': {err}")),
        }
    }

    fn tree(&mut self, target: Option<&str>) {
        let expr = target.unwrap_or(".");
        match self.session.resolve(expr) {
            Some(node) if node.is_dir() => {
                self.output.write(&node.display_path());
                for line in render_lines(node.children().unwrap_or_default()) {
                    self.output.write(&line);
                }
            }
            _ => {
                let label = target.unwrap_or(self.session.cwd());
                self.output
                    .write(&format!("Cannot access '{label}': No such directory"));
            }
        }
    }

    async fn write(&mut self, target: Option<&str>, text: String) {
        let Some(expr) = target else {
            self.output.write("Usage: write <file> <text>");
            return;
        };

        let path = match self.session.resolve(expr) {
            Some(NodeRef::Node(node)) if !node.is_dir() => node.path.clone(),
            Some(_) => {
                self.output.write(&format!("Not a file: {expr}"));
                return;
            }
            None => {
                self.output.write(&format!("File not found: {expr}"));
                return;
            }
        };

        match self.session.save_file(&path, text).await {
            Ok(()) => self.output.write(&format!("Saved {expr}")),
            Err(err) => self.output.write(&format!("Error saving file: {err}")),
        }
    }

    fn status(&mut self, target: Option<&str>) {
        let Some(expr) = target else {
            self.output.write("Usage: status <file>");
            return;
        };

        let line = match self.session.resolve(expr) {
            Some(node) => match self.session.tracker().get(node.path()) {
                Some(op) => format!("{expr}: {} ({}%)", op.status, op.progress),
                None => format!("{expr}: no recorded operation"),
            },
            None => format!("File not found: {expr}"),
        };
        self.output.write(&line);
    }
}
