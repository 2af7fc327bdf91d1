//! End-to-end tests for the Rollcall bot pipeline.
//!
//! These exercise the full path from an inbound channel message through the
//! dispatcher to the reply delivered back over the channel registry, on both
//! store backends.

use std::sync::Arc;

use rollcall_bot::Dispatcher;
use rollcall_channels::{ChannelRegistry, TelegramChannel, TelegramConfig};
use rollcall_core::channel::{ChannelId, ChannelMessage};
use rollcall_core::{RecordStore, UserId};
use rollcall_engine::HealthPolicy;
use rollcall_store::{InMemoryStore, SqliteStore};

fn message(sender: &str, text: &str) -> ChannelMessage {
    ChannelMessage {
        channel_id: ChannelId("telegram".into()),
        sender_id: sender.into(),
        sender_name: Some("Alice".into()),
        content: text.into(),
        chat_id: format!("chat_{sender}"),
    }
}

/// Feed a scripted conversation through the dispatcher, collecting replies.
async fn converse(dispatcher: &Dispatcher, sender: &str, lines: &[&str]) -> Vec<String> {
    let mut replies = Vec::new();
    for line in lines {
        if let Some(reply) = dispatcher.handle(&message(sender, line)).await {
            replies.push(reply.text);
        }
    }
    replies
}

async fn sqlite_dispatcher() -> Dispatcher {
    let store = SqliteStore::new("sqlite::memory:").await.unwrap();
    Dispatcher::new(Arc::new(store), HealthPolicy::default())
}

// ── Full conversation against the SQLite backend ────────────────────────

#[tokio::test]
async fn e2e_onboard_add_mark_and_report() {
    let d = sqlite_dispatcher().await;

    let replies = converse(
        &d,
        "42",
        &[
            "/start",
            "/addsubject",
            "Algorithms",
            "Theory",
            "3",
            "15",
            "/mark",
            "Algorithms",
            "Present",
            "/status",
            "/canimiss",
        ],
    )
    .await;

    assert!(replies[0].contains("Welcome to Rollcall"));
    assert!(replies[5].contains("Algorithms added! 45 classes planned"));
    assert!(replies[8].contains("Marked present for Algorithms (1/1 → 100.0%)"));
    assert!(replies[9].contains("🟢 Algorithms: 1/1 → 100.0%"));
    assert!(replies[10].contains("Algorithms: 9 bunks left"));
}

#[tokio::test]
async fn e2e_mark_undo_round_trip() {
    let d = sqlite_dispatcher().await;

    converse(&d, "42", &["/addsubject", "Networks", "Theory", "3", "15"]).await;
    converse(&d, "42", &["/mark", "Networks", "Absent"]).await;

    let replies = converse(&d, "42", &["/status"]).await;
    assert!(replies[0].contains("🔴 Networks: 0/1 → 0.0%"));

    let replies = converse(&d, "42", &["/undo", "/status"]).await;
    assert!(replies[0].contains("Undid absent for Networks"));
    assert!(replies[1].contains("Networks: 0/0 → 100.0%"));
}

#[tokio::test]
async fn e2e_preset_then_leave_planner() {
    let d = sqlite_dispatcher().await;

    let replies = converse(&d, "42", &["/preset_cyber", "Cybersecurity Sem 3"]).await;
    assert!(replies[1].contains("8 subjects added, 0 already there"));

    let replies = converse(&d, "42", &["/leaveplanner", "5"]).await;
    assert!(replies[1].contains("5 days off"));
    assert!(replies[1].contains("Data Structures: misses 3 classes — fits your budget"));
    // One class/week components lose one class for a full week away.
    assert!(replies[1].contains("Data Structures Lab: misses 1 class — fits your budget"));
}

#[tokio::test]
async fn e2e_correction_via_set_attendance() {
    let d = sqlite_dispatcher().await;

    converse(&d, "42", &["/addsubject", "Networks", "Theory", "3", "15"]).await;
    let replies = converse(&d, "42", &["/setattendance", "Networks", "40", "30"]).await;
    assert!(replies[3].contains("Networks set to 30/40 → 75.0%"));

    // 10 absences against a budget of 9.
    let replies = converse(&d, "42", &["/canimiss"]).await;
    assert!(replies[0].contains("Networks: no bunks left"));
}

#[tokio::test]
async fn e2e_two_users_are_isolated() {
    let d = sqlite_dispatcher().await;

    converse(&d, "1", &["/addsubject", "Algorithms", "Theory", "3", "15"]).await;
    converse(&d, "2", &["/addsubject", "Networks", "Theory", "4", "15"]).await;

    let replies = converse(&d, "1", &["/status"]).await;
    assert!(replies[0].contains("Algorithms"));
    assert!(!replies[0].contains("Networks"));

    let replies = converse(&d, "2", &["/status"]).await;
    assert!(replies[0].contains("Networks"));
    assert!(!replies[0].contains("Algorithms"));
}

// ── Channel registry wiring ──────────────────────────────────────────────

#[tokio::test]
async fn e2e_reply_flows_back_through_the_registry() {
    let store = Arc::new(InMemoryStore::new());
    let dispatcher = Dispatcher::new(store.clone(), HealthPolicy::default());

    let telegram = Arc::new(TelegramChannel::new(TelegramConfig {
        bot_token: "token".into(),
        allowed_users: vec!["*".into()],
    }));
    let mut registry = ChannelRegistry::new();
    registry.register(telegram.clone());

    let mut rx = registry.start_all().await.unwrap();

    telegram.inject_message(message("42", "/start")).await.unwrap();

    let (channel_name, incoming) = rx.recv().await.unwrap();
    assert_eq!(channel_name, "telegram");
    let incoming = incoming.unwrap();

    let allowed = registry
        .get(&channel_name)
        .is_some_and(|c| c.is_allowed(&incoming.sender_id));
    assert!(allowed);

    let reply = dispatcher.handle(&incoming).await.unwrap();
    assert!(reply.text.contains("Welcome to Rollcall"));
    registry
        .send_to(&channel_name, &incoming.chat_id, &reply)
        .await
        .unwrap();

    assert_eq!(store.count_users().await.unwrap(), 1);
    registry.stop_all().await;
}

#[tokio::test]
async fn e2e_allowlist_blocks_unknown_senders() {
    let telegram = TelegramChannel::new(TelegramConfig {
        bot_token: "token".into(),
        allowed_users: vec!["42".into()],
    });
    let mut registry = ChannelRegistry::new();
    registry.register(Arc::new(telegram));

    let channel = registry.get("telegram").unwrap();
    assert!(channel.is_allowed("42"));
    assert!(!channel.is_allowed("1337"));
}

// ── Dialog keyboards survive the pipeline ────────────────────────────────

#[tokio::test]
async fn e2e_prompts_carry_suggested_replies() {
    let d = sqlite_dispatcher().await;
    converse(&d, "42", &["/addsubject", "Algorithms"]).await;

    // The class-type step offers the three choices as a keyboard.
    let reply = d.handle(&message("42", "not a class type")).await.unwrap();
    let keyboard = reply.keyboard.expect("retry keeps the keyboard");
    let labels: Vec<&str> = keyboard.labels().collect();
    assert_eq!(labels, ["Theory", "Tutorial", "Lab"]);
}

#[tokio::test]
async fn e2e_store_survives_dispatcher_recreation() {
    // Same pool, new dispatcher: sessions are ephemeral, records are not.
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryStore::new());

    {
        let d = Dispatcher::new(store.clone(), HealthPolicy::default());
        converse(&d, "42", &["/addsubject", "Algorithms", "Theory", "3", "15"]).await;
    }

    let d = Dispatcher::new(store.clone(), HealthPolicy::default());
    let replies = converse(&d, "42", &["/status"]).await;
    assert!(replies[0].contains("Algorithms: 0/0 → 100.0%"));
    assert_eq!(store.count_subjects(&UserId::new("42")).await.unwrap(), 1);
}
