mod helpers;

use std::sync::Arc;
use tempfile::TempDir;

use quire::assistant::ModelCatalog;
use quire::db::{KeyValueStore, SqliteStore};
use quire::journal::{EntryBook, ExportData, ENTRIES_KEY};

fn sqlite_store(tmp: &TempDir) -> Arc<dyn KeyValueStore> {
    Arc::new(SqliteStore::open(tmp.path().join("journal.db")).unwrap())
}

#[test]
fn entries_survive_reopen() {
    let tmp = TempDir::new().unwrap();

    {
        let mut book = EntryBook::load(sqlite_store(&tmp));
        book.save_entry_at(None, "First day with the new notebook", helpers::day(2024, 1, 1));
        let id = book
            .save_entry_at(None, "Second day", helpers::day(2024, 1, 2))
            .unwrap()
            .id
            .clone();
        assert!(book.set_title(&id, "Day two"));
    }

    let book = EntryBook::load(sqlite_store(&tmp));
    assert_eq!(book.len(), 2);
    assert_eq!(book.entries()[0].content, "Second day");
    assert_eq!(book.entries()[0].title.as_deref(), Some("Day two"));
    assert_eq!(book.entries()[1].word_count, 6);
}

#[test]
fn edit_and_delete_persist() {
    let tmp = TempDir::new().unwrap();

    let id = {
        let mut book = EntryBook::load(sqlite_store(&tmp));
        let id = book
            .save_entry_at(None, "draft", helpers::day(2024, 5, 1))
            .unwrap()
            .id
            .clone();
        book.save_entry_at(None, "keep me", helpers::day(2024, 5, 2));
        book.save_entry(Some(&id), "final version of the draft");
        id
    };

    let mut book = EntryBook::load(sqlite_store(&tmp));
    let edited = book.get(&id).unwrap();
    assert_eq!(edited.content, "final version of the draft");
    assert_eq!(edited.date, helpers::day(2024, 5, 1));

    assert!(book.delete(&id));
    drop(book);

    let book = EntryBook::load(sqlite_store(&tmp));
    assert_eq!(book.len(), 1);
    assert_eq!(book.entries()[0].content, "keep me");
}

#[test]
fn unreadable_journal_loads_empty() {
    let tmp = TempDir::new().unwrap();
    let store = sqlite_store(&tmp);
    store.set(ENTRIES_KEY, "{not json").unwrap();

    let mut book = EntryBook::load(store.clone());
    assert!(book.is_empty());

    // Saving replaces the broken value with a valid collection.
    book.save_entry(None, "fresh start");
    let reloaded = EntryBook::load(store);
    assert_eq!(reloaded.len(), 1);
}

#[test]
fn export_file_imports_into_another_journal() {
    let tmp = TempDir::new().unwrap();
    let export_path = tmp.path().join("export.json");

    let mut source = EntryBook::load(helpers::memory_store());
    source.save_entry_at(None, "older", helpers::day(2023, 12, 30));
    source.save_entry_at(None, "newer", helpers::day(2024, 1, 3));
    let json = serde_json::to_string_pretty(&source.export()).unwrap();
    std::fs::write(&export_path, json).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(raw["version"], "1.0");
    assert!(raw["exportDate"].is_string());
    assert_eq!(raw["entries"][0]["wordCount"], 1);

    let mut target = EntryBook::load(sqlite_store(&tmp));
    target.save_entry_at(None, "middle", helpers::day(2024, 1, 1));

    let data: ExportData =
        serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
    let report = target.import(data.clone());
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 0);

    let order: Vec<&str> = target.entries().iter().map(|e| e.content.as_str()).collect();
    assert_eq!(order, vec!["newer", "middle", "older"]);

    // Importing the same file again adds nothing.
    let again = target.import(data);
    assert_eq!(again.imported, 0);
    assert_eq!(again.skipped, 2);
    assert_eq!(EntryBook::load(sqlite_store(&tmp)).len(), 3);
}

#[test]
fn browser_export_without_word_counts_imports() {
    let json = r#"{
        "version": "1.0",
        "exportDate": "2024-02-01T08:00:00.000Z",
        "entries": [
            { "id": "lqz3k1abc", "content": "Snow day", "date": "2024-01-31T09:15:00.000Z" }
        ]
    }"#;
    let data: ExportData = serde_json::from_str(json).unwrap();

    let mut book = EntryBook::load(helpers::memory_store());
    let report = book.import(data);
    assert_eq!(report.imported, 1);
    assert_eq!(book.get("lqz3k1abc").unwrap().content, "Snow day");
}

#[test]
fn model_selection_survives_reopen() {
    let tmp = TempDir::new().unwrap();

    let catalog = ModelCatalog::load(sqlite_store(&tmp));
    assert_eq!(catalog.current_model().id, "llama3.2:1b");
    catalog.select_model("gemma3:4b").unwrap();
    drop(catalog);

    let catalog = ModelCatalog::load(sqlite_store(&tmp));
    assert_eq!(catalog.current_model().id, "gemma3:4b");
}

#[test]
fn journal_and_selection_share_one_database() {
    let tmp = TempDir::new().unwrap();
    let store = sqlite_store(&tmp);

    let mut book = EntryBook::load(store.clone());
    book.save_entry(None, "hello");
    let catalog = ModelCatalog::load(store);
    catalog.select_model("qwen3:0.6b").unwrap();

    let conn = quire::db::open_database(tmp.path().join("journal.db")).unwrap();
    let report = quire::db::check_database_health(&conn).unwrap();
    let keys: Vec<&str> = report.keys.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["journal_entries", "selected_model"]);
}
