//! Coin purse behavior through the public ledger API.
use tinkertales::ledger::{
    add_currency, balance_breakdown, balance_in, format_breakdown, parse_currency, Denomination,
    Player,
};

#[test]
fn breakdown_stops_once_remainder_is_zero() {
    assert_eq!(
        format_breakdown(&balance_breakdown(1200)),
        "platinum: 1, gold: 2"
    );
    assert_eq!(
        format_breakdown(&balance_breakdown(1005)),
        "platinum: 1, gold: 0, silver: 0, copper: 5"
    );
    assert_eq!(format_breakdown(&balance_breakdown(0)), "platinum: 0");
    assert_eq!(
        format_breakdown(&balance_breakdown(37)),
        "platinum: 0, gold: 0, silver: 3, copper: 7"
    );
}

#[test]
fn balance_in_floors_and_ignores_unknown() {
    assert_eq!(balance_in(1234, "gold"), 12);
    assert_eq!(balance_in(1234, "Platinum"), 1);
    assert_eq!(balance_in(1234, "copper"), 1234);
    assert_eq!(balance_in(1234, "electrum"), 0);
}

#[test]
fn add_currency_skips_unknown_entries() {
    let total = add_currency(10, &[("gold", 2), ("electrum", 9), ("copper", 3)]);
    assert_eq!(total, 213);
}

#[test]
fn player_purse_accumulates() {
    let mut player = Player::new(1, "Ada", "ada");
    player.add_currency(&[("platinum", 1)]);
    player.add_currency(&[("silver", 15)]);
    assert_eq!(player.copper_pieces, 1150);
    assert_eq!(player.currency_in("gold"), 11);
}

#[test]
fn parsed_amounts_feed_the_purse() {
    let coins = parse_currency("2p 3g, 4 silver").unwrap();
    assert_eq!(
        coins,
        vec![
            (Denomination::Platinum, 2),
            (Denomination::Gold, 3),
            (Denomination::Silver, 4)
        ]
    );
    let named: Vec<(&str, u64)> = coins.iter().map(|(d, n)| (d.name(), *n)).collect();
    assert_eq!(add_currency(0, &named), 2340);
    assert!(parse_currency("gold").is_err());
    assert!(parse_currency("").is_err());
}
