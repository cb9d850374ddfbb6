//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code in `bugai-core` and the `bugai` CLI MUST NOT
//! call sleep. Waiting happens on I/O or on speech events, never on a timer.
//! **Exceptions**: test code

use bugai_architectural_enforcement::{production_lines, read_source, rust_files, violation};

const PRODUCTION_DIRS: &[&str] = &["client/core/src", "client/cli/src"];

#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = Vec::new();

    for dir in PRODUCTION_DIRS {
        for path in rust_files(dir) {
            for line in production_lines(&read_source(&path)) {
                if line.code.contains("thread::sleep") || line.code.contains("time::sleep") {
                    violations.push(violation(&path, &line, "Sleep call"));
                }
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n❌ Sleep calls found in production code:\n");
        for v in &violations {
            eprintln!("  ❌ {v}");
        }
        eprintln!("\n✅ Wait on the service future or on SpeechEvent instead.");
        panic!("Found {} sleep violation(s)", violations.len());
    }
}

#[test]
fn test_production_dirs_are_scanned() {
    for dir in PRODUCTION_DIRS {
        assert!(!rust_files(dir).is_empty(), "no sources under {dir}");
    }
}
