// ABOUTME: Local console front-end - each input line is a chat message from the operator
// ABOUTME: Prefixed lines dispatch to cog commands; cogs/load/unload/reload manage cogs live

use anyhow::Result;
use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tux_core::{parse_message, Command, DispatchResult, Event, ParseResult, Runtime};
use tux_loader::reporter::format_entry;
use tux_loader::CogLoader;

/// Author name attached to console messages
pub const CONSOLE_AUTHOR: &str = "console";

/// Commands handled by the console itself rather than a cog
const ADMIN_COMMANDS: &[&str] = &["cogs", "load", "unload", "reload"];

pub struct Console {
    runtime: Runtime,
    loader: CogLoader,
}

impl Console {
    pub fn new(runtime: Runtime, loader: CogLoader) -> Self {
        Self { runtime, loader }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn loader(&self) -> &CogLoader {
        &self.loader
    }

    /// Handle one line of input, returning the reply to print, if any
    pub async fn handle_line(&mut self, line: &str, author: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        self.runtime
            .emit(&Event::Message {
                author: author.to_string(),
                body: line.to_string(),
            })
            .await;

        let prefix = self.runtime.settings().prefix.clone();
        match parse_message(line, &prefix) {
            ParseResult::Command(command) if ADMIN_COMMANDS.contains(&command.name.as_str()) => {
                Some(self.handle_admin(&command).await)
            }
            ParseResult::Command(command) => {
                match self.runtime.dispatch(&command, author, Utc::now()).await {
                    DispatchResult::Handled(reply) => reply,
                    DispatchResult::Unknown(name) => {
                        Some(format!("Unknown command: {}{}", prefix, name))
                    }
                    DispatchResult::Failed(e) => Some(format!("Command failed: {:#}", e)),
                }
            }
            ParseResult::Message(_) | ParseResult::Ignore => None,
        }
    }

    async fn handle_admin(&mut self, command: &Command) -> String {
        let prefix = &self.runtime.settings().prefix;
        if command.name == "cogs" {
            return self.cog_listing();
        }

        let Some(name) = command.first_arg().map(str::to_string) else {
            return format!("Usage: {}{} <cog>", prefix, command.name);
        };

        tracing::info!(command = %command.name, cog = %name, "Admin command");
        let result = match command.name.as_str() {
            "load" => self.loader.load(&name, &mut self.runtime).await,
            "reload" => self.loader.reload(&name, &mut self.runtime).await,
            _ => {
                return match self.loader.unload(&name, &mut self.runtime).await {
                    Ok(()) => format!("Unloaded {}", name),
                    Err(e) => e.to_string(),
                }
            }
        };

        match result {
            Ok(outcome) => format_entry(&outcome).trim_start().to_string(),
            Err(e) => e.to_string(),
        }
    }

    fn cog_listing(&self) -> String {
        let mut lines = Vec::new();
        for (name, state) in self.loader.states() {
            let commands = self.runtime.commands_owned_by(name).len();
            lines.push(format!("{:<24} {:<9} {} commands", name, state.as_str(), commands));
        }
        if lines.is_empty() {
            return "No cogs known".to_string();
        }
        lines.join("\n")
    }

    /// Serve lines from `input` until it closes, writing replies to `output`
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if let Some(reply) = self.handle_line(&line, CONSOLE_AUTHOR).await {
                output.write_all(reply.as_bytes()).await?;
                output.write_all(b"\n").await?;
                output.flush().await?;
            }
        }
        tracing::info!("Console input closed");
        Ok(())
    }
}
