// ABOUTME: Tests for the local console front-end
// ABOUTME: Covers command dispatch, plain messages and live cog load/unload/reload

use std::sync::Arc;
use tempfile::TempDir;
use tux::cogs::builtin_catalog;
use tux::console::{Console, CONSOLE_AUTHOR};
use tux_core::Runtime;
use tux_loader::testing::write_manifest;
use tux_loader::{CogLoader, LoadState, TracingReporter};

async fn console(dir: &TempDir) -> Console {
    let mut runtime = Runtime::default();
    let mut loader = CogLoader::new(dir.path(), Arc::new(builtin_catalog()));
    loader
        .initialize(&mut runtime, &TracingReporter)
        .await
        .unwrap();
    Console::new(runtime, loader)
}

fn cog_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_manifest(dir.path(), "utility.ping", "cog = \"ping\"\n").unwrap();
    write_manifest(dir.path(), "utility.help", "cog = \"help\"\n").unwrap();
    dir
}

#[tokio::test]
async fn test_commands_dispatch_and_messages_are_silent() {
    let dir = cog_tree();
    let mut console = console(&dir).await;

    let reply = console.handle_line(">ping", CONSOLE_AUTHOR).await.unwrap();
    assert!(reply.starts_with("Pong!"));

    assert!(console.handle_line("hello there", CONSOLE_AUTHOR).await.is_none());
    assert!(console.handle_line("   ", CONSOLE_AUTHOR).await.is_none());
    assert!(console.handle_line(">>escaped", CONSOLE_AUTHOR).await.is_none());
}

#[tokio::test]
async fn test_unknown_command_reply() {
    let dir = cog_tree();
    let mut console = console(&dir).await;

    let reply = console.handle_line(">dance", CONSOLE_AUTHOR).await.unwrap();
    assert_eq!(reply, "Unknown command: >dance");
}

#[tokio::test]
async fn test_cogs_lists_states() {
    let dir = cog_tree();
    let mut console = console(&dir).await;

    let reply = console.handle_line(">cogs", CONSOLE_AUTHOR).await.unwrap();
    let lines: Vec<_> = reply.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("utility.help"));
    assert!(lines[0].contains("loaded"));
    assert!(lines[1].contains("1 commands"));
}

#[tokio::test]
async fn test_unload_then_load() {
    let dir = cog_tree();
    let mut console = console(&dir).await;

    let reply = console
        .handle_line(">unload utility.ping", CONSOLE_AUTHOR)
        .await
        .unwrap();
    assert_eq!(reply, "Unloaded utility.ping");
    assert_eq!(
        console.loader().state("utility.ping"),
        Some(LoadState::Unloaded)
    );
    assert_eq!(
        console.handle_line(">ping", CONSOLE_AUTHOR).await.unwrap(),
        "Unknown command: >ping"
    );

    let reply = console
        .handle_line(">load utility.ping", CONSOLE_AUTHOR)
        .await
        .unwrap();
    assert!(reply.starts_with("loaded  utility.ping"), "{}", reply);
    assert!(console.runtime().commands().get("ping").is_some());
}

#[tokio::test]
async fn test_admin_errors_are_replies() {
    let dir = cog_tree();
    let mut console = console(&dir).await;

    let reply = console
        .handle_line(">load utility.ping", CONSOLE_AUTHOR)
        .await
        .unwrap();
    assert_eq!(reply, "cog 'utility.ping' is already loaded");

    let reply = console
        .handle_line(">unload nothing.here", CONSOLE_AUTHOR)
        .await
        .unwrap();
    assert_eq!(reply, "cog 'nothing.here' is not loaded");

    let reply = console.handle_line(">reload", CONSOLE_AUTHOR).await.unwrap();
    assert_eq!(reply, "Usage: >reload <cog>");
}

#[tokio::test]
async fn test_reload_applies_manifest_changes() {
    let dir = cog_tree();
    let mut console = console(&dir).await;

    write_manifest(
        dir.path(),
        "utility.ping",
        "cog = \"ping\"\n[config]\nreply = \"Still here.\"\n",
    )
    .unwrap();
    console
        .handle_line(">reload utility.ping", CONSOLE_AUTHOR)
        .await
        .unwrap();

    let reply = console.handle_line(">ping", CONSOLE_AUTHOR).await.unwrap();
    assert!(reply.starts_with("Still here."), "{}", reply);
}

#[tokio::test]
async fn test_failed_reload_reports_failure() {
    let dir = cog_tree();
    let mut console = console(&dir).await;

    write_manifest(dir.path(), "utility.ping", "cog = \"pong\"\n").unwrap();
    let reply = console
        .handle_line(">reload utility.ping", CONSOLE_AUTHOR)
        .await
        .unwrap();

    assert!(reply.starts_with("failed  utility.ping [ImportError]"), "{}", reply);
    assert_eq!(console.loader().state("utility.ping"), Some(LoadState::Failed));
}

#[tokio::test]
async fn test_run_serves_lines_until_eof() {
    let dir = cog_tree();
    let mut console = console(&dir).await;

    let input: &[u8] = b">ping\njust chatting\n>dance\n";
    let mut output = Vec::new();
    console.run(input, &mut output).await.unwrap();

    let text = String::from_utf8(output).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Pong!"));
    assert_eq!(lines[1], "Unknown command: >dance");
}
