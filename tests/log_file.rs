// tests/log_file.rs
// Own test binary: the global subscriber can only be installed once per process.
use std::fs;

use che_scrape::{logd, logf, log};

#[test]
fn log_file_receives_debug_lines() {
    let dir = std::env::temp_dir().join("che_log_file");
    let _ = fs::remove_dir_all(&dir);
    let path = dir.join("nested").join("debug.log");

    log::init(Some(&path)).unwrap();
    logf!("info line for the file");
    logd!("debug line for the file");

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("info line for the file"), "{text}");
    assert!(text.contains("debug line for the file"), "{text}");
    // file output carries no terminal colour codes
    assert!(!text.contains('\u{1b}'));
    let _ = fs::remove_dir_all(&dir);
}
