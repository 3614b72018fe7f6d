mod common;

use serde_json::json;

use oscmix_core::audio::{AudioContext, NodeOp};
use oscmix_types::{ContextState, Message, NodeLifecycle, WaveKind};

use common::{bare_dispatcher, key, Rig};

#[test]
fn add_node_four_times_then_init_starts_everything() {
    let (mut dispatcher, log, context) = bare_dispatcher();
    for k in ["sine", "triangle", "square", "sawtooth"] {
        dispatcher.dispatch_message(&Message::with_payload("ADD_NODE", json!({ "channel": k })));
    }
    assert_eq!(log.nodes_created(), 4);
    for node in 0..4 {
        assert_eq!(log.frequency(node), Some(440.0));
    }
    assert!(dispatcher
        .registry()
        .channels()
        .all(|c| c.lifecycle() == NodeLifecycle::Ready));

    dispatcher.dispatch_message(&Message::new("INIT"));
    assert_eq!(context.state(), ContextState::Running);
    for channel in dispatcher.registry().channels() {
        assert_eq!(channel.lifecycle(), NodeLifecycle::Started);
    }
    // Every channel starts muted, so every node ends muted
    for node in 0..4 {
        assert!(log.is_muted(node));
        assert_eq!(log.start_count(node), 1);
    }
}

#[test]
fn mount_then_init_over_the_bus() {
    let rig = Rig::new();
    assert_eq!(rig.mixer.context_state(), ContextState::Suspended);
    rig.send(Message::new("INIT"));
    assert_eq!(rig.mixer.context_state(), ContextState::Running);
    assert!(rig
        .mixer
        .snapshots()
        .iter()
        .all(|s| s.lifecycle == NodeLifecycle::Started && s.muted));
}

#[test]
fn second_init_does_not_restart_nodes() {
    let rig = Rig::new();
    rig.send(Message::new("INIT"));
    rig.log.clear();
    rig.send(Message::new("INIT"));
    assert_eq!(rig.log.count(|op| matches!(op, NodeOp::Start { .. })), 0);
    assert!(rig.log.operations().is_empty());
}

#[test]
fn unmuted_channel_stays_audible_after_start() {
    let rig = Rig::new();
    rig.mixer.unmute(&key("square"));
    rig.send(Message::new("INIT"));
    let square = rig.node(WaveKind::Square);
    let sine = rig.node(WaveKind::Sine);
    assert!(!rig.log.is_muted(square));
    assert!(rig.log.is_muted(sine));
}

#[test]
fn partial_frequency_batch_only_touches_valid_entries() {
    let rig = Rig::new();
    let sine = rig.node(WaveKind::Sine);
    rig.log.clear();
    rig.send(Message::with_payload(
        "UPDATE_FREQUENCIES",
        json!({ "sine": 440, "bogus_channel": 300, "triangle": "x" }),
    ));
    let updates: Vec<NodeOp> = rig
        .log
        .operations()
        .into_iter()
        .filter(|op| matches!(op, NodeOp::UpdateFreq { .. }))
        .collect();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].node(), sine);
    assert_eq!(rig.log.frequency(sine), Some(440.0));
}

#[test]
fn frequency_updates_carry_context_time() {
    let rig = Rig::new();
    rig.context.advance(3.25);
    rig.send(Message::with_payload("UPDATE_OSCFRQ", json!({ "square": 660.0 })));
    let square = rig.node(WaveKind::Square);
    assert!(rig.log.operations().contains(&NodeOp::UpdateFreq {
        node: square,
        frequency: 660.0,
        at_time: 3.25,
    }));
}

#[test]
fn unknown_action_changes_nothing_and_later_actions_work() {
    let rig = Rig::new();
    let before = rig.mixer.snapshots();
    rig.log.clear();

    rig.send(Message::with_payload("NOT_A_REAL_ACTION", json!({ "sine": 1 })));
    assert_eq!(rig.mixer.snapshots(), before);
    assert!(rig.log.operations().is_empty());

    rig.send(Message::new("INIT"));
    assert_eq!(rig.log.count(|op| matches!(op, NodeOp::Start { .. })), 4);
}

#[test]
fn suspend_context_message() {
    let rig = Rig::new();
    rig.send(Message::new("INIT"));
    rig.send(Message::new("SUSPEND_CONTEXT"));
    assert_eq!(rig.mixer.context_state(), ContextState::Suspended);
    // Nodes stay started; the context alone is suspended
    assert!(rig
        .mixer
        .snapshots()
        .iter()
        .all(|s| s.lifecycle == NodeLifecycle::Started));
}

#[test]
fn repeated_add_node_keeps_first_node() {
    let rig = Rig::new();
    rig.send(Message::with_payload("ADD_NODE", json!({ "channel": "sine", "initFreq": 880 })));
    assert_eq!(rig.log.nodes_created(), 4);
    assert_eq!(rig.log.frequency(rig.node(WaveKind::Sine)), Some(200.0));
}

#[test]
fn channel_strip_controls() {
    let rig = Rig::new();
    rig.send(Message::new("INIT"));
    assert!(rig.mixer.set_volume(&key("triangle"), 0.75));
    assert!(rig.mixer.unmute(&key("triangle")));
    let tri = rig.mixer.channel(&key("triangle")).unwrap();
    assert!(!tri.muted);
    assert!((tri.volume - 0.75).abs() < f32::EPSILON);
    assert!(!rig.mixer.mute(&key("no-such-channel")));
}
