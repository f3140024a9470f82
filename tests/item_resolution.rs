//! Fuzzy catalog resolution through the public API.
use tinkertales::ledger::{resolve_item, Catalog, Resolution, DEFAULT_LV_THRESHOLD};

fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.seed(["Healing Potion", "Hempen Rope", "Longsword", "Torch"]);
    catalog
}

#[test]
fn typo_lands_on_existing_item() {
    let mut catalog = catalog();
    let resolved = resolve_item(&mut catalog, "healng potion", DEFAULT_LV_THRESHOLD);
    assert_eq!(resolved.item.name, "Healing Potion");
    assert!(matches!(resolved.resolution, Resolution::Alias { .. }));
    assert_eq!(catalog.len(), 4);
}

#[test]
fn word_order_does_not_matter() {
    let mut catalog = catalog();
    let resolved = resolve_item(&mut catalog, "rope hempen", DEFAULT_LV_THRESHOLD);
    assert_eq!(resolved.item.name, "Hempen Rope");
}

#[test]
fn unrelated_name_is_added_verbatim() {
    let mut catalog = catalog();
    let resolved = resolve_item(&mut catalog, "Bag of Holding", DEFAULT_LV_THRESHOLD);
    assert_eq!(resolved.resolution, Resolution::Created);
    assert_eq!(resolved.item.name, "Bag of Holding");
    assert!(catalog.contains("Bag of Holding"));

    let again = resolve_item(&mut catalog, "Bag of Holding", DEFAULT_LV_THRESHOLD);
    assert_eq!(again.resolution, Resolution::Exact);
    assert_eq!(catalog.len(), 5);
}

#[test]
fn threshold_of_100_only_accepts_exact_or_perfect_scores() {
    let mut catalog = catalog();
    let resolved = resolve_item(&mut catalog, "Torches", 100);
    assert!(resolved.created());
    assert!(catalog.contains("Torches"));
}
