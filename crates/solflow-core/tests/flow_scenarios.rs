//! End-to-end scenarios over the canvas and chat state machines.
//!
//! Run with: `cargo test --package solflow-core --test flow_scenarios`

use std::sync::Arc;

use solflow_core::{
    ChatMessage, ChatState, CompletionOutcome, Diagram, EdgeChange, FlowCanvas, MemoryRepository,
    NodeCategory, NodeChange, NodeId, Position, Role, GREETING,
};

// ============================================================================
// Chat
// ============================================================================

#[test]
fn answered_question_extends_transcript_in_order() {
    let mut chat = ChatState::new();
    chat.input = "What does entry do?".to_string();

    let pending = chat.submit().expect("non-blank input submits");
    assert!(chat.is_loading());

    let outcome = chat.complete(pending.token, Ok::<_, anyhow::Error>("It initializes state.".into()));

    assert_eq!(outcome, CompletionOutcome::Answered);
    assert!(!chat.is_loading());
    assert_eq!(
        chat.transcript(),
        &[
            ChatMessage::assistant(GREETING),
            ChatMessage::user("What does entry do?"),
            ChatMessage::assistant("It initializes state."),
        ]
    );
}

#[test]
fn loading_tracks_request_lifetime_across_turns() {
    let mut chat = ChatState::new();
    let mut observed = vec![chat.is_loading()];

    for (i, question) in ["one", "two", "three"].iter().enumerate() {
        let pending = chat.submit_text(question).unwrap();
        observed.push(chat.is_loading());
        let result = if i % 2 == 0 {
            Ok("ok".to_string())
        } else {
            Err(anyhow::anyhow!("provider rejected request"))
        };
        chat.complete(pending.token, result);
        observed.push(chat.is_loading());
    }

    assert_eq!(observed, vec![false, true, false, true, false, true, false]);

    let roles: Vec<Role> = chat.transcript().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
        ]
    );
}

// ============================================================================
// Canvas
// ============================================================================

#[test]
fn edit_session_then_save_round_trips_through_repository() {
    let repo = MemoryRepository::new();
    let mut canvas = FlowCanvas::default().with_repository(Arc::new(repo.clone()));

    let added = canvas.add_node();
    canvas.apply_node_changes([NodeChange::Position {
        id: added.clone(),
        position: Position::new(600.0, 320.0),
        dragging: false,
    }]);
    canvas.connect(NodeId::from("3"), added.clone());
    canvas.apply_edge_changes([EdgeChange::Remove {
        id: "e2-4".into(),
    }]);

    canvas.save().expect("save succeeds");

    let saved: Diagram = serde_json::from_str(&repo.last().unwrap()).unwrap();
    assert_eq!(saved.node_count(), 5);
    assert_eq!(saved.edge_count(), 4);
    let node = saved.node(&added).unwrap();
    assert_eq!(node.position, Position::new(600.0, 320.0));
    assert_eq!(node.data.category, NodeCategory::Process);
    assert!(saved
        .edges
        .iter()
        .any(|e| e.source.as_str() == "3" && e.target == added && e.animated));
}

#[test]
fn connect_always_adds_exactly_one_animated_edge() {
    let mut canvas = FlowCanvas::default();
    let pairs = [("1", "2"), ("2", "1"), ("9", "10"), ("4", "4")];

    for (source, target) in pairs {
        let before = canvas.edge_count();
        let id = canvas.connect(NodeId::from(source), NodeId::from(target));
        assert_eq!(canvas.edge_count(), before + 1);
        assert!(canvas.edge(&id).unwrap().animated);
    }
}
