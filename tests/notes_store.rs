use opposition_planner::notes::{
    FileNotes, MemoryNotes, NotesStore, SqliteNotes, comment_key, notes_for,
};
use opposition_planner::state::{Slide, SlideKind};
use tempfile::tempdir;

fn exercise(store: &dyn NotesStore) {
    let slide = Slide::new(SlideKind::Venue, "Wankhede Stadium", 5);
    let key = comment_key(&slide);
    assert_eq!(key, "analyst_comments_venue_Wankhede Stadium");
    assert_eq!(store.get(&key).expect("get"), None);

    store.set(&key, "Short boundaries square").expect("set");
    assert_eq!(notes_for(store, &slide).as_deref(), Some("Short boundaries square"));

    store.set(&key, "Two spinners here").expect("overwrite");
    assert_eq!(store.get(&key).expect("get").as_deref(), Some("Two spinners here"));

    store.set(&key, "   ").expect("blank clears");
    assert_eq!(store.get(&key).expect("get"), None);
    assert_eq!(notes_for(store, &slide), None);
}

#[test]
fn memory_round_trip() {
    exercise(&MemoryNotes::default());
}

#[test]
fn sqlite_round_trip() {
    exercise(&SqliteNotes::in_memory().expect("sqlite"));
}

#[test]
fn file_round_trip() {
    let dir = tempdir().expect("tempdir");
    exercise(&FileNotes::open(dir.path().join("notes.json")));
}

#[test]
fn file_notes_survive_reopen() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("notes.json");
    let slide = Slide::new(SlideKind::Player, "MS Dhoni", 1);
    let key = comment_key(&slide);

    FileNotes::open(path.clone())
        .set(&key, "Targets the short ball")
        .expect("save");
    let reopened = FileNotes::open(path);
    assert_eq!(
        reopened.get(&key).expect("get").as_deref(),
        Some("Targets the short ball")
    );
}

#[test]
fn sqlite_notes_survive_reopen() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("notes.sqlite");
    let slide = Slide::new(SlideKind::OverByOver, "Team A", 2);
    let key = comment_key(&slide);

    SqliteNotes::open(&path)
        .expect("open")
        .set(&key, "Death overs: pace only")
        .expect("save");
    let reopened = SqliteNotes::open(&path).expect("reopen");
    assert_eq!(
        reopened.get(&key).expect("get").as_deref(),
        Some("Death overs: pace only")
    );
}

#[test]
fn corrupt_notes_file_starts_empty() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("notes.json");
    std::fs::write(&path, "{ not json").expect("write");
    let store = FileNotes::open(path);
    assert_eq!(store.get("analyst_comments_team_X").expect("get"), None);
}
