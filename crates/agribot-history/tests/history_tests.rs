use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use agribot_core::traits::ConversationSink;
use agribot_core::types::{CategoryFilter, ChatMessage, ConversationRecord, Role};
use agribot_history::ConversationLog;

fn record(n: usize) -> ConversationRecord {
    ConversationRecord::now(
        "fr",
        CategoryFilter::Named("Irrigation".into()),
        vec![ChatMessage::user(format!("question {n}")), ChatMessage::assistant(format!("réponse {n}"))],
    )
}

#[test]
fn missing_log_reads_empty() {
    let tmp = TempDir::new().unwrap();
    let log = ConversationLog::open(tmp.path().join("nested/dir/historiques.jsonl")).expect("open");
    assert!(tmp.path().join("nested/dir").is_dir(), "parent directories are created");
    assert!(log.read_all().expect("read").is_empty());
}

#[test]
fn appends_keep_order() {
    let tmp = TempDir::new().unwrap();
    let log = ConversationLog::open(tmp.path().join("historiques.jsonl")).expect("open");
    for n in 0..3 { log.append(&record(n)).expect("append"); }

    let records = log.read_all().expect("read");
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].messages[0].content, "question 2");
    assert_eq!(records[0].messages[1].role, Role::Assistant);
    assert_eq!(records[0].language, "fr");
    assert_eq!(records[0].category, CategoryFilter::Named("Irrigation".into()));
}

#[test]
fn category_names_read_back_verbatim() {
    let tmp = TempDir::new().unwrap();
    let log = ConversationLog::open(tmp.path().join("historiques.jsonl")).expect("open");
    let categories = [CategoryFilter::Named("Tous".into()), CategoryFilter::Named("All".into()), CategoryFilter::All];
    for category in &categories {
        log.append(&ConversationRecord::now("fr", category.clone(), Vec::new())).expect("append");
    }
    let read: Vec<CategoryFilter> = log.read_all().expect("read").into_iter().map(|r| r.category).collect();
    assert_eq!(read, categories);
}

#[test]
fn works_through_the_sink_trait() {
    let tmp = TempDir::new().unwrap();
    let log = ConversationLog::open(tmp.path().join("h.jsonl")).expect("open");
    let sink: &dyn ConversationSink = &log;
    sink.append(&record(7)).expect("append");
    assert_eq!(log.read_all().expect("read").len(), 1);
}

#[test]
fn malformed_line_is_reported() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("h.jsonl");
    let log = ConversationLog::open(&path).expect("open");
    log.append(&record(0)).expect("append");
    let mut text = fs::read_to_string(&path).unwrap();
    text.push_str("{not json}\n");
    fs::write(&path, text).unwrap();

    let err = log.read_all().unwrap_err();
    assert!(format!("{err:#}").contains("line 2"), "{err:#}");
}

#[test]
fn concurrent_appends_do_not_interleave() {
    let tmp = TempDir::new().unwrap();
    let log = Arc::new(ConversationLog::open(tmp.path().join("h.jsonl")).expect("open"));
    std::thread::scope(|s| {
        for t in 0..4 {
            let log = Arc::clone(&log);
            s.spawn(move || { for n in 0..25 { log.append(&record(t * 100 + n)).expect("append"); } });
        }
    });
    let records = log.read_all().expect("read");
    assert_eq!(records.len(), 100);
    assert!(records.iter().all(|r| r.messages.len() == 2));
}
