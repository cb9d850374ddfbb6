//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: async functions in `bugai-core` and the `bugai` CLI MUST NOT
//! use blocking I/O.
//! **Required**: `tokio::fs`, `tokio::io`, `reqwest::Client`
//!
//! Synchronous functions may block: config loading runs before any request
//! is in flight.

use bugai_architectural_enforcement::{
    is_in_async_function, production_lines, read_source, rust_files, violation,
};

const FORBIDDEN_IN_ASYNC: &[(&str, &str)] = &[
    ("std::fs::", "Blocking file I/O"),
    ("std::net::", "Blocking network I/O"),
    ("std::process::Command", "Blocking process I/O"),
    ("std::io::stdin()", "Blocking stdin"),
    ("std::io::stdout()", "Blocking stdout"),
];

#[test]
fn test_no_blocking_io_in_async_code() {
    let mut violations = Vec::new();

    for dir in ["client/core/src", "client/cli/src"] {
        for path in rust_files(dir) {
            let content = read_source(&path);
            let all_lines: Vec<&str> = content.lines().collect();

            for line in production_lines(&content) {
                if !is_in_async_function(&all_lines, line.index) {
                    continue;
                }
                for (pattern, kind) in FORBIDDEN_IN_ASYNC {
                    if line.code.contains(pattern) {
                        violations.push(violation(&path, &line, kind));
                    }
                }
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n❌ Blocking I/O found in async code:\n");
        for v in &violations {
            eprintln!("  ❌ {v}");
        }
        panic!("Found {} blocking I/O violation(s)", violations.len());
    }
}

#[test]
fn test_no_blocking_http_client_anywhere() {
    let mut violations = Vec::new();

    for dir in ["client/core/src", "client/cli/src"] {
        for path in rust_files(dir) {
            for line in production_lines(&read_source(&path)) {
                if line.code.contains("reqwest::blocking") {
                    violations.push(violation(&path, &line, "Blocking HTTP client"));
                }
            }
        }
    }

    assert!(violations.is_empty(), "{violations:#?}");
}
