//! End-to-end command handling against a temp data directory.
mod common;

use common::{fresh_ledger, say};
use tinkertales::bot::HELP_TEXT;

#[test]
fn balance_commands() {
    let (_tmp, mut ctx) = fresh_ledger();

    assert_eq!(
        say(&mut ctx, "/get_balance").unwrap(),
        "Ada: Your Tinkertales balance is $0"
    );
    assert_eq!(
        say(&mut ctx, "/set_balance 95").unwrap(),
        "Ada: Your Tinkertales balance has been set to $95"
    );
    assert_eq!(
        say(&mut ctx, "/remaining_sessions").unwrap(),
        "Ada: You have sufficient account balance for 3 D&D sessions"
    );
}

#[test]
fn non_numeric_balance_is_rejected_without_change() {
    let (_tmp, mut ctx) = fresh_ledger();
    say(&mut ctx, "/set_balance 60").unwrap();

    for bad in ["/set_balance sixty", "/set_balance 6.5", "/set_balance"] {
        assert_eq!(
            say(&mut ctx, bad).unwrap(),
            "You may only set your Tinkertales balance to a numerical value"
        );
    }
    assert_eq!(ctx.players().get(42).unwrap().account_balance, 60);
}

#[test]
fn negative_balance_floors_sessions() {
    let (_tmp, mut ctx) = fresh_ledger();
    say(&mut ctx, "/set_balance -1").unwrap();
    assert_eq!(
        say(&mut ctx, "/remaining_sessions").unwrap(),
        "Ada: You have sufficient account balance for -1 D&D sessions"
    );
}

#[test]
fn currency_commands() {
    let (_tmp, mut ctx) = fresh_ledger();

    assert_eq!(
        say(&mut ctx, "/get_currency").unwrap(),
        "Ada: You own platinum: 0"
    );
    assert_eq!(
        say(&mut ctx, "/add_currency 1p 2g").unwrap(),
        "Ada: Added 1p 2g. You own platinum: 1, gold: 2"
    );
    assert_eq!(
        say(&mut ctx, "/add_currency 3 silver, 4 copper").unwrap(),
        "Ada: Added 3s 4c. You own platinum: 1, gold: 2, silver: 3, copper: 4"
    );
    assert_eq!(
        say(&mut ctx, "/get_currency gold").unwrap(),
        "Ada: You own 12 gold in total"
    );
    assert_eq!(ctx.players().get(42).unwrap().copper_pieces, 1234);
}

#[test]
fn malformed_amount_leaves_purse_alone() {
    let (_tmp, mut ctx) = fresh_ledger();
    say(&mut ctx, "/add_currency 5g").unwrap();
    let reply = say(&mut ctx, "/add_currency 5 doubloons").unwrap();
    assert!(reply.starts_with("Amounts look like"));
    assert_eq!(ctx.players().get(42).unwrap().copper_pieces, 500);
}

#[test]
fn item_commands_resolve_typos() {
    let (_tmp, mut ctx) = fresh_ledger();

    assert_eq!(
        say(&mut ctx, "/set_item_qty 3 Healing Potion").unwrap(),
        "The qty of Healing Potion has been set to 3 for ada_l"
    );
    assert_eq!(
        say(&mut ctx, "/get_item_qty healng potion").unwrap(),
        "3x Healing Potion"
    );
    assert_eq!(ctx.catalog().len(), 1);

    assert_eq!(say(&mut ctx, "/get_item_qty Lantern").unwrap(), "0x Lantern");
    assert!(ctx.catalog().contains("Lantern"));
}

#[test]
fn non_integer_qty_is_rejected() {
    let (_tmp, mut ctx) = fresh_ledger();
    assert_eq!(
        say(&mut ctx, "/set_item_qty two Rope").unwrap(),
        "The qty of Rope must be an integer"
    );
    assert_eq!(
        say(&mut ctx, "/set_item_qty -1 Rope").unwrap(),
        "The qty of Rope must be an integer"
    );
    assert!(ctx.catalog().is_empty());
    assert!(ctx.players().is_empty());
}

#[test]
fn help_unknown_and_foreign_commands() {
    let (_tmp, mut ctx) = fresh_ledger();
    assert_eq!(say(&mut ctx, "/help").unwrap(), HELP_TEXT);
    assert!(say(&mut ctx, "/roll 1d20").unwrap().contains("/help"));
    assert_eq!(say(&mut ctx, "/get_balance@SomeOtherBot"), None);
    assert_eq!(say(&mut ctx, "just chatting"), None);
    assert!(ctx.players().is_empty());
}

#[test]
fn storage_failure_gets_generic_reply() {
    let (tmp, mut ctx) = fresh_ledger();
    // A directory where the players file should be makes every write fail
    std::fs::create_dir(tmp.path().join(tinkertales::storage::PLAYERS_FILE)).unwrap();
    assert_eq!(
        say(&mut ctx, "/set_balance 10").unwrap(),
        tinkertales::bot::STORAGE_FAILURE_REPLY
    );
}

#[test]
fn failed_save_leaves_balance_unchanged() {
    let (tmp, mut ctx) = fresh_ledger();
    say(&mut ctx, "/set_balance 25").unwrap();

    let players_path = tmp.path().join(tinkertales::storage::PLAYERS_FILE);
    std::fs::remove_file(&players_path).unwrap();
    std::fs::create_dir(&players_path).unwrap();
    assert_eq!(
        say(&mut ctx, "/set_balance 10").unwrap(),
        tinkertales::bot::STORAGE_FAILURE_REPLY
    );

    std::fs::remove_dir(&players_path).unwrap();
    assert_eq!(
        say(&mut ctx, "/get_balance").unwrap(),
        "Ada: Your Tinkertales balance is $25"
    );
}

#[test]
fn overlong_item_names_are_rejected() {
    let (_tmp, mut ctx) = fresh_ledger();
    let long = "Sword of ".repeat(40);

    let reply = say(&mut ctx, &format!("/get_item_qty {}", long)).unwrap();
    assert_eq!(reply, "Item names are limited to 100 characters");
    let reply = say(&mut ctx, &format!("/set_item_qty 2 {}", long)).unwrap();
    assert_eq!(reply, "Item names are limited to 100 characters");

    assert!(ctx.catalog().is_empty());
    assert!(ctx.players().is_empty());

    let exact = "a".repeat(tinkertales::ledger::MAX_ITEM_NAME_CHARS);
    assert_eq!(
        say(&mut ctx, &format!("/get_item_qty {}", exact)).unwrap(),
        format!("0x {}", exact)
    );
}
