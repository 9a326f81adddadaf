// ABOUTME: Prefix-based command parsing for chat messages
// ABOUTME: Turns ">name arg 'quoted arg'" into a Command, leaving plain chat as messages

pub const DEFAULT_PREFIX: &str = ">";

/// A command invocation pulled out of a chat line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Lowercased, prefix stripped
    pub name: String,
    /// Whitespace-split arguments; quotes group words and are removed
    pub args: Vec<String>,
    /// Everything after the name, untouched apart from trimming
    pub raw_args: String,
}

impl Command {
    pub fn new(name: impl Into<String>, args: Vec<String>, raw_args: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args,
            raw_args: raw_args.into(),
        }
    }

    pub fn first_arg(&self) -> Option<&str> {
        self.arg(0)
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// What a chat line turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult {
    Command(Command),
    /// Ordinary chat, with any escape prefix removed
    Message(String),
    /// Nothing worth delivering
    Ignore,
}

impl ParseResult {
    pub fn is_command(&self) -> bool {
        self.as_command().is_some()
    }

    pub fn as_command(&self) -> Option<&Command> {
        match self {
            ParseResult::Command(cmd) => Some(cmd),
            ParseResult::Message(_) | ParseResult::Ignore => None,
        }
    }
}

/// Classify a chat line.
///
/// `{prefix}name args...` is a command when `name` starts with a letter.
/// A doubled prefix escapes: `>>text` is delivered as the message `text`.
/// Blank lines and a bare escape are ignored.
pub fn parse_message(body: &str, prefix: &str) -> ParseResult {
    let line = body.trim();
    if line.is_empty() {
        return ParseResult::Ignore;
    }
    if prefix.is_empty() {
        return ParseResult::Message(line.to_string());
    }

    if let Some(rest) = line
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix(prefix))
    {
        let rest = rest.trim();
        return if rest.is_empty() {
            ParseResult::Ignore
        } else {
            ParseResult::Message(rest.to_string())
        };
    }

    match line.strip_prefix(prefix) {
        Some(rest) if rest.starts_with(char::is_alphabetic) => {
            ParseResult::Command(split_command(rest))
        }
        _ => ParseResult::Message(line.to_string()),
    }
}

fn split_command(text: &str) -> Command {
    let (name, raw_args) = match text.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (text, ""),
    };
    Command::new(name.to_lowercase(), tokenize(raw_args), raw_args)
}

/// Split on whitespace; single or double quotes group words into one argument
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut token = String::new();
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                if !token.is_empty() {
                    tokens.push(std::mem::take(&mut token));
                }
            }
            Some(_) => token.push(c),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c.is_whitespace() => {
                if !token.is_empty() {
                    tokens.push(std::mem::take(&mut token));
                }
            }
            None => token.push(c),
        }
    }
    if !token.is_empty() {
        tokens.push(token);
    }
    tokens
}
