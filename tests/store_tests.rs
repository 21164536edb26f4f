use chrono::NaiveDate;
use homework_tracker::{Assignment, AssignmentStore, FlatFileStore, RepeatType, codec};
use std::fs;
use tempfile::TempDir;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn load_missing_file_returns_empty() {
    let dir = TempDir::new().unwrap();
    let store = FlatFileStore::new(dir.path().join("assignments.txt"));
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn load_skips_malformed_and_blank_lines_in_file_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("assignments.txt");
    fs::write(
        &path,
        "Essay|History|2024-05-01|none\n\
         broken line\n\
         \n\
         Quiz|Math|not-a-date|weekly\n\
         Quiz|Math|2024-04-20|weekly\n\
         Reading|English|2024-04-22\n",
    )
    .unwrap();

    let records = FlatFileStore::new(&path).load().unwrap();
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Essay", "Quiz", "Reading"]);
    assert_eq!(records[1].repeat_type, RepeatType::Weekly);
    assert_eq!(records[2].repeat_type, RepeatType::None);
}

#[test]
fn load_skips_lines_that_are_not_utf8() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("assignments.txt");
    let mut bytes = b"Essay|History|2024-05-01|none\n".to_vec();
    bytes.extend_from_slice(b"Bad\xff|X|2024-01-01|none\r\n");
    bytes.extend_from_slice(b"Quiz|Math|2024-04-20|weekly\r\n");
    fs::write(&path, bytes).unwrap();

    let records = FlatFileStore::new(&path).load().unwrap();
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Essay", "Quiz"]);
    assert_eq!(records[1].repeat_type, RepeatType::Weekly);
}

#[test]
fn save_overwrites_with_one_line_per_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("assignments.txt");
    fs::write(&path, "Old|Stale|2020-01-01|none\n").unwrap();

    let store = FlatFileStore::new(&path);
    let records = vec![
        Assignment::new("Essay", "History", d(2024, 5, 1), RepeatType::None),
        Assignment::new("Quiz", "Math", d(2024, 4, 20), RepeatType::Weekly),
    ];
    store.save(&records).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents,
        "Essay|History|2024-05-01|none\nQuiz|Math|2024-04-20|weekly\n"
    );
    assert_eq!(store.load().unwrap(), records);
}

#[test]
fn save_leaves_no_temp_files_behind() {
    let dir = TempDir::new().unwrap();
    let store = FlatFileStore::new(dir.path().join("assignments.txt"));
    store
        .save(&[Assignment::new("Essay", "History", d(2024, 5, 1), RepeatType::None)])
        .unwrap();
    let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[test]
fn append_adds_to_end_of_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("assignments.txt");
    fs::write(&path, "Essay|History|2024-05-01|none\n").unwrap();

    let store = FlatFileStore::new(&path);
    store
        .append(Assignment::new("Early", "Art", d(2024, 1, 1), RepeatType::Monthly))
        .unwrap();

    let records = store.load().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].name, "Early");
}

#[test]
fn decode_of_encode_is_identity_for_plain_fields() {
    let samples = [
        Assignment::new("Essay", "History", d(2024, 5, 1), RepeatType::None),
        Assignment::new("Problem set 3", "Linear Algebra", d(2025, 12, 31), RepeatType::Weekly),
        Assignment::new("Évaluation", "Français", d(2024, 2, 29), RepeatType::Monthly),
    ];
    for record in samples {
        assert_eq!(codec::decode(&codec::encode(&record)), Some(record));
    }
}
