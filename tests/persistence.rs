//! Stores survive a restart and writes are whole-file replacements.
mod common;

use common::{fresh_ledger, reopen, say};
use tinkertales::ledger::{LedgerError, DEFAULT_ITEM_DESCRIPTION};
use tinkertales::storage::{Storage, ITEMS_FILE, PLAYERS_FILE};

#[test]
fn ledger_round_trips_through_restart() {
    let (tmp, mut ctx) = fresh_ledger();
    say(&mut ctx, "/set_balance 45").unwrap();
    say(&mut ctx, "/add_currency 2g 5c").unwrap();
    say(&mut ctx, "/set_item_qty 2 Rope").unwrap();
    drop(ctx);

    let mut ctx = reopen(tmp.path());
    let player = ctx.players().get(42).unwrap();
    assert_eq!(player.account_balance, 45);
    assert_eq!(player.copper_pieces, 205);
    assert_eq!(player.item_qty("Rope"), 2);
    assert_eq!(
        ctx.catalog().get("Rope").unwrap().description,
        DEFAULT_ITEM_DESCRIPTION
    );
    assert_eq!(say(&mut ctx, "/get_item_qty rope").unwrap(), "2x Rope");
}

#[test]
fn first_contact_read_is_persisted() {
    let (tmp, mut ctx) = fresh_ledger();
    say(&mut ctx, "/get_balance").unwrap();
    assert!(tmp.path().join(PLAYERS_FILE).exists());
    assert!(!tmp.path().join(ITEMS_FILE).exists());

    let ctx = reopen(tmp.path());
    assert!(ctx.players().contains(42));
}

#[test]
fn players_file_is_keyed_by_user_id() {
    let (tmp, mut ctx) = fresh_ledger();
    say(&mut ctx, "/set_item_qty 1 Torch").unwrap();

    let raw = std::fs::read_to_string(tmp.path().join(PLAYERS_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["42"]["first_name"], "Ada");
    assert_eq!(json["42"]["username"], "ada_l");
    assert_eq!(json["42"]["inventory"]["Torch"], 1);

    let raw = std::fs::read_to_string(tmp.path().join(ITEMS_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["Torch"]["name"], "Torch");
}

#[test]
fn older_records_without_purse_still_load() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join(PLAYERS_FILE),
        r#"{"7": {"id": 7, "first_name": "Bo", "username": "bo", "account_balance": 30}}"#,
    )
    .unwrap();
    let ctx = reopen(tmp.path());
    let player = ctx.players().get(7).unwrap();
    assert_eq!(player.copper_pieces, 0);
    assert!(player.inventory.is_empty());
}

#[test]
fn corrupt_store_refuses_to_load() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(ITEMS_FILE), "{not json").unwrap();
    let storage = Storage::open(tmp.path()).unwrap();
    assert!(matches!(
        storage.load_catalog(),
        Err(LedgerError::Decode { .. })
    ));
}
