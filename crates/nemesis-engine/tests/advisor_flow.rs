//! End-to-end flows over the built-in Archnemesis catalog.

use std::fs;
use std::path::{Path, PathBuf};

use nemesis_advisor::prelude::*;
use nemesis_engine::{
    builtin_catalog, load_catalog, open_session, AdvisorConfig, CatalogLoader, Command,
    InventoryStore, OutputFormat, Session,
};
use tempfile::TempDir;

fn config(data_dir: &Path) -> AdvisorConfig {
    AdvisorConfig {
        catalog_path: None,
        data_dir: data_dir.to_path_buf(),
        auto_save: true,
        show_counts: false,
    }
}

fn execute(session: &mut Session, command: Command) -> String {
    let mut out = Vec::new();
    session.execute(&command, &mut out).expect("command runs");
    String::from_utf8(out).expect("utf8")
}

#[test]
fn builtin_catalog_matches_asset_directory() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/catalogs");
    let from_dir = CatalogLoader::new(dir).load().expect("asset directory loads");
    let builtin = builtin_catalog().expect("built-in catalog loads");

    assert_eq!(from_dir.len(), builtin.len());
    let names: Vec<_> = from_dir.iter().map(|(_, item)| item.name.as_str()).collect();
    let builtin_names: Vec<_> = builtin.iter().map(|(_, item)| item.name.as_str()).collect();
    assert_eq!(names, builtin_names);
}

#[test]
fn empty_inventory_advice() {
    let catalog = builtin_catalog().expect("catalog");
    let rec = recommend(&catalog, &Inventory::new());

    assert_eq!(rec.kind, RecommendationKind::EmptyInventory);
    assert_eq!(rec.guidance, "You have no items in your inventory.");
    assert!(rec.items.is_empty());
}

#[test]
fn goal_path_recipe_is_built_first() {
    let catalog = builtin_catalog().expect("catalog");
    let (inventory, rejected) = Inventory::from_named(
        &catalog,
        [("Frostweaver", 1), ("Hasted", 1), ("Toxic", 2), ("Chaosweaver", 1)],
    );
    assert!(rejected.is_empty());
    let mut advisor = Advisor::new(catalog, inventory);

    let rec = advisor.recommendation().clone();
    assert_eq!(rec.kind, RecommendationKind::Build);
    assert_eq!(rec.guidance, "Build Recipe: Frost Strider (!) + Extra Items");
    assert_eq!(rec.items, vec!["Frostweaver", "Hasted", "Toxic", "Chaosweaver"]);
    assert_eq!(rec.results, vec!["Frost Strider"]);

    let rec = advisor.consume_recipe().clone();
    assert_eq!(advisor.count("Frost Strider"), Ok(1));
    assert_eq!(advisor.count("Toxic"), Ok(1));
    assert_eq!(rec, Recommendation::waiting());
}

#[test]
fn currency_cannot_be_held() {
    let catalog = builtin_catalog().expect("catalog");
    let mut advisor = Advisor::new(catalog, Inventory::new());

    assert_eq!(
        advisor.increment("Currency").err(),
        Some(AdvisorError::VirtualItem("Currency".to_string()))
    );
    assert_eq!(advisor.count("Currency"), Ok(0));
}

#[test]
fn session_persists_between_runs() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = config(temp_dir.path());

    let mut session = open_session(&config, OutputFormat::Text).expect("open");
    execute(
        &mut session,
        Command::Drop(vec![
            "Frostweaver".to_string(),
            "Hasted".to_string(),
            "Toxic".to_string(),
        ]),
    );
    execute(&mut session, Command::Set { item: "Toxic".to_string(), count: 1 });
    execute(&mut session, Command::Inc("Chaosweaver".to_string()));

    let saved = fs::read_to_string(temp_dir.path().join("queue.json")).expect("queue saved");
    let queue: Vec<String> = serde_json::from_str(&saved).expect("queue json");
    assert_eq!(queue, vec!["Frostweaver", "Hasted", "Toxic"]);

    let mut session = open_session(&config, OutputFormat::Text).expect("reopen");
    let out = execute(&mut session, Command::Flush);
    assert!(out.starts_with("Build Recipe: Frost Strider (!) + Extra Items\n"));
    assert!(out.contains("Produces: Frost Strider\n"));

    let store = InventoryStore::new(temp_dir.path());
    let catalog = load_catalog(&config).expect("catalog");
    let inventory = store.load_inventory(&catalog).expect("inventory");
    assert_eq!(
        inventory.named(&catalog),
        vec![("Chaosweaver", 1), ("Frostweaver", 1), ("Hasted", 1), ("Toxic", 2)]
    );
    assert!(store.load_queue().expect("queue").is_empty());
}

#[test]
fn custom_catalog_from_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let catalog_path = temp_dir.path().join("catalog.toml");
    fs::write(
        &catalog_path,
        r#"
version = "1.0"

[[items]]
name = "ash"

[[items]]
name = "bone"

[[items]]
name = "coal"

[[items]]
name = "dust"

[[items]]
name = "Alpha"
recipe = ["ash", "bone"]

[[items]]
name = "Beta"
recipe = ["coal", "dust"]

[[items]]
name = "Goal"
recipe = ["Alpha", "Beta"]
virtual = true
"#,
    )
    .expect("write catalog");

    let mut config = config(&temp_dir.path().join("data"));
    config.apply_overrides(Some(catalog_path), None);

    let mut session = open_session(&config, OutputFormat::Json).expect("open");
    for item in ["ash", "bone", "coal", "dust"] {
        execute(&mut session, Command::Inc(item.to_string()));
    }
    let out = execute(&mut session, Command::Show);

    let value: serde_json::Value = serde_json::from_str(&out).expect("json output");
    assert_eq!(value["kind"], "build");
    assert_eq!(value["guidance"], "Build Recipes: Alpha (!) + Beta (!)");
    assert_eq!(value["results"], serde_json::json!(["Alpha", "Beta"]));
}
