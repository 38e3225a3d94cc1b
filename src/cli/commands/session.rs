//! `catprompt session`: line-oriented interactive session
//!
//! Triggers are spawned so several refinements can be pending at once. A
//! renderer task subscribed to the orchestrator prints each state change as
//! it lands.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use super::common::build_orchestrator;
use crate::{
    ArtifactKind, ArtifactSlot, ArtifactValue, ClipboardSink, Config, Orchestrator, Session,
    TerminalClipboard, UserFriendlyError,
};

const HELP: &str = "\
Commands:
  generate             new base prompt (clears every artifact)
  variations           alternative prompts
  story                short story about the cat
  expand               richer description of the scene
  hashtags             social media hashtags
  translate            translation of the prompt
  copy <prompt|KIND>   copy the prompt or a ready artifact
  show                 print the whole session
  help                 this text
  quit                 leave the session";

/// What to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyTarget {
    Prompt,
    Artifact(ArtifactKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionCommand {
    Generate,
    Refine(ArtifactKind),
    Copy(CopyTarget),
    Show,
    Help,
    Quit,
}

/// Run the session until `quit` or end of input.
pub async fn execute_session_command(config: &Config, terminal_clipboard: bool) -> Result<()> {
    let clipboard =
        terminal_clipboard.then(|| Arc::new(TerminalClipboard) as Arc<dyn ClipboardSink>);
    let orchestrator = build_orchestrator(config, clipboard)?;

    let renderer = tokio::spawn(render_changes(orchestrator.subscribe()));
    println!("catprompt session. Type 'generate' to start, 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(SessionCommand::Quit)) => break,
            Ok(Some(command)) => dispatch(&orchestrator, command),
            Err(message) => println!("✗ {message}"),
        }
    }

    renderer.abort();
    Ok(())
}

fn dispatch(orchestrator: &Orchestrator, command: SessionCommand) {
    match command {
        SessionCommand::Generate => {
            orchestrator.spawn_generate_prompt();
        }
        SessionCommand::Refine(kind) => {
            if let Err(err) = orchestrator.spawn_refine(kind) {
                println!("✗ {}", err.user_message());
            }
        }
        SessionCommand::Copy(target) => {
            let copied = match target {
                CopyTarget::Prompt => orchestrator.copy_prompt(),
                CopyTarget::Artifact(kind) => orchestrator.copy_artifact(kind),
            };
            if let Err(err) = copied {
                println!("✗ {err}");
            }
        }
        SessionCommand::Show => println!("{}", render_session(&orchestrator.snapshot())),
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => {}
    }
}

/// Parse one input line. Blank lines parse to `None`.
fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "generate" | "gen" => SessionCommand::Generate,
        "show" => SessionCommand::Show,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        "copy" => {
            let target = words
                .next()
                .ok_or_else(|| "usage: copy <prompt|KIND>".to_string())?;
            if target.eq_ignore_ascii_case("prompt") {
                SessionCommand::Copy(CopyTarget::Prompt)
            } else {
                let kind = target
                    .parse::<ArtifactKind>()
                    .map_err(|_| format!("nothing called '{target}' to copy"))?;
                SessionCommand::Copy(CopyTarget::Artifact(kind))
            }
        }
        other => match other.parse::<ArtifactKind>() {
            Ok(kind) => SessionCommand::Refine(kind),
            Err(_) => return Err(format!("unknown command '{word}', type 'help'")),
        },
    };
    Ok(Some(command))
}

async fn render_changes(mut changes: watch::Receiver<Session>) {
    let mut previous = changes.borrow_and_update().clone();
    while changes.changed().await.is_ok() {
        let current = changes.borrow_and_update().clone();
        for line in describe_changes(&previous, &current) {
            println!("{line}");
        }
        previous = current;
    }
}

/// Lines describing what changed between two snapshots.
fn describe_changes(previous: &Session, current: &Session) -> Vec<String> {
    let mut lines = Vec::new();

    if current.generation() != previous.generation() || current.prompt() != previous.prompt() {
        lines.extend(describe_prompt(current.prompt()));
    }
    for (kind, slot) in current.artifacts().iter() {
        if slot != previous.artifact(kind) {
            lines.extend(describe_artifact(kind, slot));
        }
    }
    if current.copy_ack() != previous.copy_ack() {
        if let Some(ack) = current.copy_ack() {
            lines.push(format!("✓ Copied {} to clipboard", ack.label));
        }
    }

    lines
}

fn describe_prompt(slot: &ArtifactSlot<String>) -> Option<String> {
    match slot {
        ArtifactSlot::Idle => None,
        ArtifactSlot::Pending { .. } => Some("… prompt: generating".to_string()),
        ArtifactSlot::Ready { value, .. } => Some(format!("✓ prompt: {value}")),
        ArtifactSlot::Failed { error, .. } => Some(format!("✗ prompt: {error}")),
    }
}

fn describe_artifact(kind: ArtifactKind, slot: &ArtifactSlot<ArtifactValue>) -> Option<String> {
    match slot {
        ArtifactSlot::Idle => None,
        ArtifactSlot::Pending { .. } => Some(format!("… {kind}: working")),
        ArtifactSlot::Ready { value, .. } => {
            Some(format!("✓ {kind}:\n{}", format_value(kind, value)))
        }
        ArtifactSlot::Failed { error, .. } => Some(format!("✗ {kind}: {error}")),
    }
}

fn format_value(kind: ArtifactKind, value: &ArtifactValue) -> String {
    match value {
        ArtifactValue::Text(text) => indent(text),
        ArtifactValue::List(items) if items.is_empty() => "  (none)".to_string(),
        ArtifactValue::List(items) if kind == ArtifactKind::Hashtags => {
            format!("  {}", items.join(kind.list_separator()))
        }
        ArtifactValue::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("  {}. {item}", i + 1))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full view of a session for `show`.
fn render_session(session: &Session) -> String {
    let mut out = format!("Generation {}", session.generation());
    match session.prompt() {
        ArtifactSlot::Ready { value, .. } => out.push_str(&format!("\nPrompt:\n{}", indent(value))),
        slot => out.push_str(&format!("\nPrompt: {}", slot.state_name())),
    }
    for (kind, slot) in session.artifacts().iter() {
        match slot {
            ArtifactSlot::Ready { value, .. } => {
                out.push_str(&format!("\n{kind}:\n{}", format_value(kind, value)));
            }
            ArtifactSlot::Failed { error, .. } => {
                out.push_str(&format!("\n{kind}: failed ({error})"));
            }
            _ => out.push_str(&format!("\n{kind}: {}", slot.state_name())),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RefineError;

    #[test]
    fn test_parse_command_words() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("generate"), Ok(Some(SessionCommand::Generate)));
        assert_eq!(
            parse_command("expand"),
            Ok(Some(SessionCommand::Refine(ArtifactKind::Expansion)))
        );
        assert_eq!(
            parse_command("Translate"),
            Ok(Some(SessionCommand::Refine(ArtifactKind::Translation)))
        );
        assert_eq!(
            parse_command("copy prompt"),
            Ok(Some(SessionCommand::Copy(CopyTarget::Prompt)))
        );
        assert_eq!(
            parse_command("copy tags"),
            Ok(Some(SessionCommand::Copy(CopyTarget::Artifact(
                ArtifactKind::Hashtags
            ))))
        );
        assert_eq!(parse_command("quit"), Ok(Some(SessionCommand::Quit)));
    }

    #[test]
    fn test_parse_command_errors() {
        assert!(parse_command("copy").unwrap_err().contains("usage"));
        assert!(parse_command("copy haiku").unwrap_err().contains("haiku"));
        assert!(parse_command("dance").unwrap_err().contains("unknown command"));
    }

    #[test]
    fn test_new_generation_reports_only_the_prompt() {
        let mut previous = Session::new();
        previous.begin_generate();
        previous.commit_prompt(1, Ok("A cat".to_string()));
        previous.begin_refine(ArtifactKind::Story).unwrap();
        previous.commit_artifact(
            ArtifactKind::Story,
            1,
            Ok(ArtifactValue::Text("Once".to_string())),
        );

        let mut current = previous.clone();
        current.begin_generate();

        // Artifacts returning to idle are not worth a line
        assert_eq!(describe_changes(&previous, &current), vec!["… prompt: generating"]);
    }

    #[test]
    fn test_ready_and_failed_artifacts_are_described() {
        let mut previous = Session::new();
        previous.begin_generate();
        previous.commit_prompt(1, Ok("A cat".to_string()));
        previous.begin_refine(ArtifactKind::Hashtags).unwrap();
        previous.begin_refine(ArtifactKind::Variations).unwrap();

        let mut current = previous.clone();
        current.commit_artifact(
            ArtifactKind::Hashtags,
            1,
            Ok(ArtifactValue::List(vec!["#cat".into(), "#art".into()])),
        );
        current.commit_artifact(
            ArtifactKind::Variations,
            1,
            Err(RefineError::MalformedResponse {
                reason: "Invalid response format".to_string(),
            }),
        );

        assert_eq!(
            describe_changes(&previous, &current),
            vec![
                "✗ variations: Invalid response format".to_string(),
                "✓ hashtags:\n  #cat #art".to_string(),
            ]
        );
    }

    #[test]
    fn test_render_session_lists_every_slot() {
        let mut session = Session::new();
        session.begin_generate();
        session.commit_prompt(1, Ok("A cat\non a roof".to_string()));
        session.begin_refine(ArtifactKind::Variations).unwrap();
        session.commit_artifact(
            ArtifactKind::Variations,
            1,
            Ok(ArtifactValue::List(vec!["one".into(), "two".into()])),
        );

        let rendered = render_session(&session);
        assert!(rendered.starts_with("Generation 1\nPrompt:\n  A cat\n  on a roof"));
        assert!(rendered.contains("variations:\n  1. one\n  2. two"));
        assert!(rendered.contains("story: idle"));
    }
}
