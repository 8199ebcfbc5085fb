//! Integration tests for the `rpgmaster-db` data layer.
//!
//! Every test opens its own in-memory `SQLite` database and its own
//! temporary directory for record files, so they run in parallel without
//! any external services.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::indexing_slicing
)]

use std::time::Duration;

use chrono::Utc;
use rpgmaster_db::{CommandRelay, Database, SqliteConfig, WhiteboardStore};
use rpgmaster_types::{Category, Combatant, CombatantId, CommandKind, RelayRetention, TurnCursor};
use serde_json::json;

// =============================================================================
// Helpers
// =============================================================================

async fn setup_db() -> Database {
    Database::in_memory()
        .await
        .expect("Failed to open in-memory database")
}

fn combatant(name: &str, initiative: i64) -> Combatant {
    Combatant {
        id: CombatantId::new(),
        name: name.to_owned(),
        initiative,
        hp: 10,
        max_hp: 10,
        category: Category::Player,
        content_ref: None,
        active: true,
        created_at: Utc::now(),
    }
}

// =============================================================================
// Roster
// =============================================================================

#[tokio::test]
async fn roster_insert_and_get() {
    let db = setup_db().await;
    let mut goblin = combatant("Goblin", 12);
    goblin.category = Category::Monster;
    goblin.content_ref = Some("goblin".to_owned());

    db.roster().insert(&goblin).await.expect("insert");

    let fetched = db.roster().get(goblin.id).await.expect("get");
    let fetched = fetched.expect("combatant should exist");
    assert_eq!(fetched.id, goblin.id);
    assert_eq!(fetched.name, "Goblin");
    assert_eq!(fetched.initiative, 12);
    assert_eq!(fetched.category, Category::Monster);
    assert_eq!(fetched.content_ref.as_deref(), Some("goblin"));
    assert!(fetched.active);

    let missing = db.roster().get(CombatantId::new()).await.expect("get");
    assert!(missing.is_none());
}

#[tokio::test]
async fn custom_category_round_trips_through_storage() {
    let db = setup_db().await;
    let mut npc = combatant("Innkeeper", 3);
    npc.category = Category::from("npc");
    db.roster().insert(&npc).await.expect("insert");

    let fetched = db.roster().get(npc.id).await.expect("get").expect("exists");
    assert_eq!(fetched.category, Category::Other("npc".to_owned()));
}

#[tokio::test]
async fn deactivate_is_soft_and_only_once() {
    let db = setup_db().await;
    let aragorn = combatant("Aragorn", 15);
    let legolas = combatant("Legolas", 18);
    db.roster().insert(&aragorn).await.expect("insert");
    db.roster().insert(&legolas).await.expect("insert");
    assert_eq!(db.roster().count_active().await.expect("count"), 2);

    assert!(db.roster().deactivate(aragorn.id).await.expect("deactivate"));
    assert!(!db.roster().deactivate(aragorn.id).await.expect("deactivate again"));
    assert!(!db.roster().deactivate(CombatantId::new()).await.expect("unknown"));

    let active = db.roster().list_active().await.expect("list active");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Legolas");

    let all = db.roster().list_all().await.expect("list all");
    assert_eq!(all.len(), 2);
    let kept = all.iter().find(|c| c.id == aragorn.id).expect("row kept");
    assert!(!kept.active);
}

#[tokio::test]
async fn set_hp_applies_to_inactive_rows_and_is_unclamped() {
    let db = setup_db().await;
    let goblin = combatant("Goblin", 12);
    db.roster().insert(&goblin).await.expect("insert");
    db.roster().deactivate(goblin.id).await.expect("deactivate");

    assert!(db.roster().set_hp(goblin.id, -3).await.expect("set hp"));
    let fetched = db.roster().get(goblin.id).await.expect("get").expect("exists");
    assert_eq!(fetched.hp, -3);
    assert_eq!(fetched.max_hp, 10);

    assert!(!db.roster().set_hp(CombatantId::new(), 5).await.expect("unknown"));
}

#[tokio::test]
async fn deactivate_all_is_idempotent() {
    let db = setup_db().await;
    db.roster().insert(&combatant("A", 1)).await.expect("insert");
    db.roster().insert(&combatant("B", 2)).await.expect("insert");

    db.roster().deactivate_all().await.expect("first");
    db.roster().deactivate_all().await.expect("second");

    assert_eq!(db.roster().count_active().await.expect("count"), 0);
    assert_eq!(db.roster().list_all().await.expect("all").len(), 2);
}

// =============================================================================
// Cursor
// =============================================================================

#[tokio::test]
async fn cursor_starts_at_round_one() {
    let db = setup_db().await;
    let cursor = db.cursor().get().await.expect("get cursor");
    assert_eq!(cursor, TurnCursor::START);
}

#[tokio::test]
async fn cursor_set_and_reset() {
    let db = setup_db().await;
    let moved = TurnCursor {
        current_turn: 2,
        round_number: 4,
    };
    db.cursor().set(moved).await.expect("set");
    assert_eq!(db.cursor().get().await.expect("get"), moved);

    db.cursor().reset().await.expect("reset");
    assert_eq!(db.cursor().get().await.expect("get"), TurnCursor::START);
}

#[tokio::test]
async fn missing_cursor_row_is_recreated() {
    let db = setup_db().await;
    sqlx::query("DELETE FROM turn_cursor")
        .execute(db.pool())
        .await
        .expect("delete");

    assert_eq!(db.cursor().get().await.expect("get"), TurnCursor::START);
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM turn_cursor")
        .fetch_one(db.pool())
        .await
        .expect("count");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn file_database_is_created_with_its_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("instance").join("app.db");
    let url = format!("sqlite://{}", path.display());

    let db = Database::connect_url(&url).await.expect("connect");
    db.run_migrations().await.expect("migrate");
    db.roster().insert(&combatant("Frodo", 9)).await.expect("insert");
    db.close().await;

    assert!(path.is_file());
}

#[tokio::test]
async fn configured_pool_uses_its_timeout() {
    let config = SqliteConfig::in_memory().with_connect_timeout(Duration::from_secs(1));
    assert_eq!(config.connect_timeout, Duration::from_secs(1));

    let db = Database::connect(&config).await.expect("connect");
    db.run_migrations().await.expect("migrate");
    db.roster().insert(&combatant("Merry", 4)).await.expect("insert");
    assert_eq!(db.roster().count_active().await.expect("count"), 1);
}

// =============================================================================
// Relay
// =============================================================================

#[tokio::test]
async fn relay_without_record_returns_placeholder() {
    let dir = tempfile::tempdir().expect("tempdir");
    let relay = CommandRelay::new(
        dir.path().join("screen.json"),
        RelayRetention::KeepLast,
        CommandKind::Initiative,
    );

    let current = relay.current().await;
    assert_eq!(current.kind, CommandKind::Initiative);
    assert!(current.data.is_none());
    assert!(current.timestamp.is_none());

    let clear = relay.current_or(CommandKind::Clear).await;
    assert_eq!(clear.kind, CommandKind::Clear);
    assert!(relay.history().await.is_empty());
}

#[tokio::test]
async fn keep_last_relay_coalesces_publishes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let relay = CommandRelay::new(
        dir.path().join("nested").join("screen.json"),
        RelayRetention::KeepLast,
        CommandKind::Initiative,
    );

    relay
        .publish(CommandKind::Image, Some(json!({"url": "map.png"})))
        .await
        .expect("publish image");
    let published = relay
        .publish(CommandKind::Blackout, None)
        .await
        .expect("publish blackout");

    let current = relay.current().await;
    assert_eq!(current, published);
    assert!(current.timestamp.is_some());

    let history = relay.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, CommandKind::Blackout);
}

#[tokio::test]
async fn append_all_relay_keeps_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let relay = CommandRelay::new(
        dir.path().join("screen.jsonl"),
        RelayRetention::AppendAll,
        CommandKind::Initiative,
    );

    relay
        .publish(CommandKind::Image, Some(json!({"url": "a.png"})))
        .await
        .expect("publish");
    relay
        .publish(CommandKind::Video, Some(json!({"url": "b.mp4", "autoplay": true})))
        .await
        .expect("publish");
    relay.publish(CommandKind::Clear, None).await.expect("publish");

    assert_eq!(relay.current().await.kind, CommandKind::Clear);

    let kinds: Vec<CommandKind> = relay.history().await.into_iter().map(|c| c.kind).collect();
    assert_eq!(kinds, [CommandKind::Image, CommandKind::Video, CommandKind::Clear]);
}

#[tokio::test]
async fn corrupt_relay_record_falls_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("screen.json");
    tokio::fs::write(&path, "{not json").await.expect("write");

    let relay = CommandRelay::new(&path, RelayRetention::KeepLast, CommandKind::Initiative);
    let current = relay.current().await;
    assert_eq!(current.kind, CommandKind::Initiative);
    assert!(current.data.is_none());
}

#[tokio::test]
async fn legacy_record_with_unknown_kind_is_passed_through() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("screen.json");
    tokio::fs::write(&path, r#"{"type": "dice_roll", "data": {"result": 17}}"#)
        .await
        .expect("write");

    let relay = CommandRelay::new(&path, RelayRetention::KeepLast, CommandKind::Initiative);
    let current = relay.current().await;
    assert_eq!(current.kind, CommandKind::Other("dice_roll".to_owned()));
    assert_eq!(current.data, Some(json!({"result": 17})));
}

#[tokio::test]
async fn concurrent_publishes_leave_a_whole_record() {
    let dir = tempfile::tempdir().expect("tempdir");
    let relay = std::sync::Arc::new(CommandRelay::new(
        dir.path().join("screen.json"),
        RelayRetention::KeepLast,
        CommandKind::Initiative,
    ));

    let mut handles = Vec::new();
    for i in 0..16 {
        let relay = std::sync::Arc::clone(&relay);
        handles.push(tokio::spawn(async move {
            relay
                .publish(CommandKind::Image, Some(json!({"url": format!("{i}.png")})))
                .await
        }));
    }
    for handle in handles {
        handle.await.expect("join").expect("publish");
    }

    let current = relay.current().await;
    assert_eq!(current.kind, CommandKind::Image);
    assert!(current.timestamp.is_some());
}

// =============================================================================
// Whiteboard
// =============================================================================

#[tokio::test]
async fn whiteboard_save_then_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = WhiteboardStore::new(dir.path().join("whiteboard.json"));

    assert_eq!(store.load().await.state, None);

    let state = json!({"strokes": [[0, 0], [10, 10]], "color": "#ff0000"});
    let saved = store.save(state.clone()).await.expect("save");
    assert!(saved.timestamp.is_some());

    let loaded = store.load().await;
    assert_eq!(loaded.state, Some(state));
    assert_eq!(loaded.timestamp, saved.timestamp);

    store.save(json!("second")).await.expect("save again");
    assert_eq!(store.load().await.state, Some(json!("second")));
}

#[tokio::test]
async fn corrupt_whiteboard_loads_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("whiteboard.json");
    tokio::fs::write(&path, "\u{0}garbage").await.expect("write");

    let loaded = WhiteboardStore::new(&path).load().await;
    assert_eq!(loaded.state, None);
    assert_eq!(loaded.timestamp, None);
}
