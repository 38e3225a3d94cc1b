//! End-to-end orchestrator behaviour against relay test doubles.

use std::sync::Arc;
use std::time::Duration;

use catprompt_engine::error::{INVALID_FORMAT_MESSAGE, PROMPT_FAILED_MESSAGE};
use catprompt_engine::prompts::InstructionSettings;
use catprompt_engine::{
    ArtifactKind, ArtifactValue, ClipboardError, CommitOutcome, MemoryClipboard, Orchestrator,
    RefineError, RefineSettings,
};
use catprompt_relay::RelayError;
use catprompt_relay::test_support::{ScriptedRelay, StaticRelay, candidate_response};

fn orchestrator(relay: Arc<StaticRelay>) -> Orchestrator {
    Orchestrator::new(relay, RefineSettings::default())
}

fn request_text(relay: &StaticRelay, index: usize) -> String {
    let requests = relay.requests();
    requests[index].payload.as_ref().unwrap()["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_generate_then_story_scenario() {
    let relay = Arc::new(
        StaticRelay::default()
            .with_text("A cat in space")
            .with_text("Once upon a time..."),
    );
    let orch = orchestrator(Arc::clone(&relay));

    assert_eq!(orch.generate_prompt().await, CommitOutcome::Applied);
    assert_eq!(orch.active_prompt().as_deref(), Some("A cat in space"));
    assert_eq!(orch.prompt_slot().state_name(), "ready");

    assert_eq!(orch.generate_story().await.unwrap(), CommitOutcome::Applied);
    assert_eq!(
        orch.artifact(ArtifactKind::Story).value(),
        Some(&ArtifactValue::Text("Once upon a time...".to_string()))
    );
    for kind in [
        ArtifactKind::Variations,
        ArtifactKind::Expansion,
        ArtifactKind::Hashtags,
        ArtifactKind::Translation,
    ] {
        assert!(orch.artifact(kind).is_idle(), "{kind} should be idle");
    }

    assert!(request_text(&relay, 1).contains("\"A cat in space\""));
}

#[tokio::test]
async fn test_refine_without_prompt_issues_no_request() {
    let relay = Arc::new(StaticRelay::default());
    let orch = orchestrator(Arc::clone(&relay));

    for kind in ArtifactKind::ALL {
        let err = orch.refine(kind).await.unwrap_err();
        assert_eq!(err, RefineError::Precondition { operation: kind });
        assert!(orch.spawn_refine(kind).is_err());
        assert!(orch.artifact(kind).is_idle());
    }
    assert_eq!(relay.call_count(), 0);
}

#[tokio::test]
async fn test_stale_hashtags_are_discarded_after_regenerate() {
    let (relay, mut calls) = ScriptedRelay::new();
    let orch = Orchestrator::new(Arc::new(relay), RefineSettings::default());

    let first = orch.spawn_generate_prompt();
    calls.next_call().await.unwrap().respond_text("A cat");
    assert_eq!(first.await.unwrap(), CommitOutcome::Applied);

    let hashtags = orch.spawn_refine(ArtifactKind::Hashtags).unwrap();
    let hashtags_call = calls.next_call().await.unwrap();
    assert!(orch.artifact(ArtifactKind::Hashtags).is_pending());

    let second = orch.spawn_generate_prompt();
    let second_call = calls.next_call().await.unwrap();
    assert!(orch.artifact(ArtifactKind::Hashtags).is_idle());
    assert_eq!(orch.active_prompt(), None);

    hashtags_call.respond_text(r#"["catlover"]"#);
    assert_eq!(hashtags.await.unwrap(), CommitOutcome::Discarded);
    assert!(orch.artifact(ArtifactKind::Hashtags).is_idle());

    second_call.respond_text("A tabby in a teacup");
    assert_eq!(second.await.unwrap(), CommitOutcome::Applied);
    assert_eq!(orch.active_prompt().as_deref(), Some("A tabby in a teacup"));
    assert_eq!(orch.generation(), 2);
}

#[tokio::test]
async fn test_stale_base_prompt_is_discarded() {
    let (relay, mut calls) = ScriptedRelay::new();
    let orch = Orchestrator::new(Arc::new(relay), RefineSettings::default());

    let first = orch.spawn_generate_prompt();
    let first_call = calls.next_call().await.unwrap();
    let second = orch.spawn_generate_prompt();
    let second_call = calls.next_call().await.unwrap();

    second_call.respond_text("newer");
    assert_eq!(second.await.unwrap(), CommitOutcome::Applied);
    first_call.respond_text("older");
    assert_eq!(first.await.unwrap(), CommitOutcome::Discarded);

    assert_eq!(orch.active_prompt().as_deref(), Some("newer"));
}

#[tokio::test]
async fn test_hashtags_are_normalized() {
    let relay = Arc::new(
        StaticRelay::default()
            .with_text("A cat")
            .with_text(r#"["catlover", "Cute Cat!", "123"]"#),
    );
    let orch = orchestrator(Arc::clone(&relay));
    orch.generate_prompt().await;
    orch.generate_hashtags().await.unwrap();

    assert_eq!(
        orch.artifact(ArtifactKind::Hashtags).value(),
        Some(&ArtifactValue::List(vec![
            "#catlover".to_string(),
            "#CuteCat".to_string(),
            "#123".to_string()
        ]))
    );
    let payload = relay.requests()[1].payload.clone().unwrap();
    assert_eq!(payload["generationConfig"]["responseMimeType"], "application/json");
}

#[tokio::test]
async fn test_hashtags_keep_position_of_every_entry() {
    let relay = Arc::new(
        StaticRelay::default()
            .with_text("A cat")
            .with_text(r#"["cat", "!!!", "🐱", "meow"]"#),
    );
    let orch = orchestrator(relay);
    orch.generate_prompt().await;
    orch.generate_hashtags().await.unwrap();

    assert_eq!(
        orch.artifact(ArtifactKind::Hashtags).value(),
        Some(&ArtifactValue::List(vec![
            "#cat".to_string(),
            "#".to_string(),
            "#".to_string(),
            "#meow".to_string()
        ]))
    );
}

#[tokio::test]
async fn test_non_json_variations_fail_as_malformed() {
    let relay = Arc::new(
        StaticRelay::default()
            .with_text("A cat")
            .with_text("Here are three variations: ..."),
    );
    let orch = orchestrator(relay);
    orch.generate_prompt().await;

    assert_eq!(orch.generate_variations().await.unwrap(), CommitOutcome::Applied);
    let slot = orch.artifact(ArtifactKind::Variations);
    assert_eq!(
        slot.error(),
        Some(&RefineError::MalformedResponse {
            reason: INVALID_FORMAT_MESSAGE.to_string()
        })
    );
}

#[tokio::test]
async fn test_empty_array_is_ready() {
    let relay = Arc::new(StaticRelay::default().with_text("A cat").with_text("[]"));
    let orch = orchestrator(relay);
    orch.generate_prompt().await;
    orch.generate_variations().await.unwrap();

    assert_eq!(
        orch.artifact(ArtifactKind::Variations).value(),
        Some(&ArtifactValue::List(Vec::new()))
    );
}

#[tokio::test]
async fn test_malformed_base_prompt_uses_fixed_message() {
    let relay = Arc::new(StaticRelay::new([Ok(serde_json::json!({"candidates": []}))]));
    let orch = orchestrator(relay);

    orch.generate_prompt().await;
    let slot = orch.prompt_slot();
    assert_eq!(
        slot.error().map(ToString::to_string).as_deref(),
        Some(PROMPT_FAILED_MESSAGE)
    );
    assert_eq!(orch.active_prompt(), None);
}

#[tokio::test]
async fn test_relay_errors_land_in_their_slot() {
    let relay = Arc::new(StaticRelay::new([
        Ok(candidate_response("A cat")),
        Err(RelayError::Upstream {
            status: 429,
            detail: "quota exceeded".to_string(),
        }),
        Err(RelayError::missing_credential()),
    ]));
    let orch = orchestrator(relay);
    orch.generate_prompt().await;

    orch.expand_prompt().await.unwrap();
    assert_eq!(
        orch.artifact(ArtifactKind::Expansion).error(),
        Some(&RefineError::Upstream {
            status: 429,
            message: "Generative API error: quota exceeded".to_string()
        })
    );

    orch.translate_prompt().await.unwrap();
    assert_eq!(
        orch.artifact(ArtifactKind::Translation)
            .error()
            .map(ToString::to_string)
            .as_deref(),
        Some("API key not configured on server")
    );
    // Errors elsewhere never disturb the prompt itself.
    assert_eq!(orch.active_prompt().as_deref(), Some("A cat"));
}

#[tokio::test]
async fn test_base_prompt_relay_failure_surfaces_relay_message() {
    let relay = Arc::new(StaticRelay::new([Err(RelayError::Internal(
        "connection reset".to_string(),
    ))]));
    let orch = orchestrator(relay);

    orch.generate_prompt().await;
    assert_eq!(
        orch.prompt_slot().error().map(ToString::to_string).as_deref(),
        Some("An internal server error occurred.")
    );
}

#[tokio::test]
async fn test_refinements_run_independently() {
    let (relay, mut calls) = ScriptedRelay::new();
    let orch = Orchestrator::new(Arc::new(relay), RefineSettings::default());
    orch.spawn_generate_prompt();
    calls.next_call().await.unwrap().respond_text("A cat");
    while orch.active_prompt().is_none() {
        tokio::task::yield_now().await;
    }

    let story = orch.spawn_refine(ArtifactKind::Story).unwrap();
    let story_call = calls.next_call().await.unwrap();
    let variations = orch.spawn_refine(ArtifactKind::Variations).unwrap();
    let variations_call = calls.next_call().await.unwrap();

    variations_call.respond_text(r#"["a", "b", "c"]"#);
    variations.await.unwrap();
    assert!(orch.artifact(ArtifactKind::Story).is_pending());
    assert_eq!(orch.artifact(ArtifactKind::Variations).state_name(), "ready");

    story_call.respond(Err(RelayError::Internal("boom".to_string())));
    story.await.unwrap();
    assert_eq!(orch.artifact(ArtifactKind::Story).state_name(), "failed");
    assert_eq!(orch.artifact(ArtifactKind::Variations).state_name(), "ready");
}

#[tokio::test]
async fn test_same_kind_last_resolution_wins() {
    let (relay, mut calls) = ScriptedRelay::new();
    let orch = Orchestrator::new(Arc::new(relay), RefineSettings::default());
    let base = orch.spawn_generate_prompt();
    calls.next_call().await.unwrap().respond_text("A cat");
    base.await.unwrap();

    let first = orch.spawn_refine(ArtifactKind::Story).unwrap();
    let first_call = calls.next_call().await.unwrap();
    let second = orch.spawn_refine(ArtifactKind::Story).unwrap();
    let second_call = calls.next_call().await.unwrap();

    second_call.respond_text("second story");
    assert_eq!(second.await.unwrap(), CommitOutcome::Applied);
    first_call.respond_text("first story");
    assert_eq!(first.await.unwrap(), CommitOutcome::Applied);

    assert_eq!(
        orch.artifact(ArtifactKind::Story).value(),
        Some(&ArtifactValue::Text("first story".to_string()))
    );
}

#[tokio::test]
async fn test_translation_uses_configured_language() {
    let relay = Arc::new(StaticRelay::default().with_text("A cat").with_text("Un gato"));
    let settings = RefineSettings {
        instructions: InstructionSettings {
            variation_count: 3,
            translation_language: "Japanese".to_string(),
        },
        ..RefineSettings::default()
    };
    let orch = Orchestrator::new(Arc::clone(&relay) as Arc<dyn catprompt_relay::Relay>, settings);
    orch.generate_prompt().await;
    orch.translate_prompt().await.unwrap();

    let text = request_text(&relay, 1);
    assert!(text.contains("into Japanese"));
    assert!(text.contains("\"A cat\""));
}

#[tokio::test]
async fn test_subscribers_see_changes() {
    let relay = Arc::new(StaticRelay::default().with_text("A cat"));
    let orch = orchestrator(relay);
    let mut updates = orch.subscribe();

    orch.generate_prompt().await;
    assert!(updates.has_changed().unwrap());
    let latest = updates.borrow_and_update().clone();
    assert_eq!(latest.active_prompt(), Some("A cat"));
    assert_eq!(latest, orch.snapshot());
}

#[tokio::test]
async fn test_copy_requires_ready_value() {
    let orch = orchestrator(Arc::new(StaticRelay::default()));
    assert_eq!(
        orch.copy_prompt().unwrap_err(),
        ClipboardError::NothingToCopy {
            what: "prompt".to_string()
        }
    );
    assert!(orch.copy_artifact(ArtifactKind::Story).is_err());
    assert!(orch.copy_ack().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_copy_ack_clears_after_timeout() {
    let relay = Arc::new(
        StaticRelay::default()
            .with_text("A cat")
            .with_text(r#"["cat", "meow"]"#),
    );
    let clipboard = Arc::new(MemoryClipboard::new());
    let orch = orchestrator(relay).with_clipboard(clipboard.clone());
    orch.generate_prompt().await;
    orch.generate_hashtags().await.unwrap();

    let ack = orch.copy_artifact(ArtifactKind::Hashtags).unwrap();
    assert_eq!(clipboard.contents().as_deref(), Some("#cat #meow"));
    assert_eq!(orch.copy_ack(), Some(ack));

    tokio::time::sleep(Duration::from_millis(1999)).await;
    assert!(orch.copy_ack().is_some());

    tokio::time::sleep(Duration::from_millis(2)).await;
    tokio::task::yield_now().await;
    assert!(orch.copy_ack().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_newer_copy_outlives_older_timer() {
    let relay = Arc::new(StaticRelay::default().with_text("A cat"));
    let orch = orchestrator(relay);
    orch.generate_prompt().await;

    orch.copy_prompt().unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let newer = orch.copy_text("note", "hello").unwrap();

    tokio::time::sleep(Duration::from_millis(600)).await;
    tokio::task::yield_now().await;
    assert_eq!(orch.copy_ack(), Some(newer));

    tokio::time::sleep(Duration::from_millis(1500)).await;
    tokio::task::yield_now().await;
    assert!(orch.copy_ack().is_none());
}
