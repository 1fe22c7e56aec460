/// One parsed command line. Tokens are split on whitespace only; there is
/// no quoting or escaping.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command<'a> {
    Empty,
    Help,
    Cd(Option<&'a str>),
    Ls(Option<&'a str>),
    Pwd,
    Cat(Option<&'a str>),
    Clear,
    Touch(Option<&'a str>),
    Tree(Option<&'a str>),
    Write { path: Option<&'a str>, text: String },
    Status(Option<&'a str>),
    Npm(NpmCommand),
    Git(GitCommand),
    Exit,
    Unknown(&'a str),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NpmCommand {
    Install,
    Start,
    RunDev,
    Missing,
    Other(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GitCommand {
    Status,
    Missing,
    Other(String),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Command::Empty;
        };
        let rest: Vec<&'a str> = tokens.collect();
        let first = rest.first().copied();

        match name {
            "help" => Command::Help,
            "cd" => Command::Cd(first),
            "ls" => Command::Ls(first),
            "pwd" => Command::Pwd,
            "cat" => Command::Cat(first),
            "clear" => Command::Clear,
            "touch" => Command::Touch(first),
            "tree" => Command::Tree(first),
            "write" => Command::Write {
                path: first,
                text: rest.get(1..).unwrap_or_default().join(" "),
            },
            "status" => Command::Status(first),
            "npm" => Command::Npm(NpmCommand::parse(&rest)),
            "git" => Command::Git(GitCommand::parse(&rest)),
            "exit" | "quit" => Command::Exit,
            other => Command::Unknown(other),
        }
    }
}

impl NpmCommand {
    fn parse(args: &[&str]) -> Self {
        match args {
            [] => NpmCommand::Missing,
            ["install", ..] | ["i", ..] => NpmCommand::Install,
            ["start", ..] => NpmCommand::Start,
            ["run", "dev", ..] => NpmCommand::RunDev,
            other => NpmCommand::Other(other.join(" ")),
        }
    }
}

impl GitCommand {
    fn parse(args: &[&str]) -> Self {
        match args {
            [] => GitCommand::Missing,
            ["status", ..] => GitCommand::Status,
            other => GitCommand::Other(other.join(" ")),
        }
    }
}
