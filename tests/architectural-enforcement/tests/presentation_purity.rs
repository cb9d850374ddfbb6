//! Integration Test: Presentation Purity
//!
//! **Policy**: the session, rendering, narration, history, export and dialog
//! modules of `bugai-core` talk to the outside world only through
//! `AnalysisService` and the capability traits. They never open files,
//! sockets or HTTP clients themselves.

use bugai_architectural_enforcement::{production_lines, read_source, workspace_root, violation};

const PURE_MODULES: &[&str] = &[
    "controller.rs",
    "error.rs",
    "export.rs",
    "history.rs",
    "modal.rs",
    "model.rs",
    "narration.rs",
    "render.rs",
    "source.rs",
    "workbench.rs",
];

const FORBIDDEN: &[&str] = &[
    "std::fs",
    "tokio::fs",
    "std::net",
    "tokio::net",
    "reqwest",
    "std::thread",
    "std::process",
];

#[test]
fn test_presentation_modules_do_no_io() {
    let src = workspace_root().join("client/core/src");
    let mut violations = Vec::new();

    for module in PURE_MODULES {
        let path = src.join(module);
        assert!(path.exists(), "missing module {}", path.display());

        for line in production_lines(&read_source(&path)) {
            for pattern in FORBIDDEN {
                if line.code.contains(pattern) {
                    violations.push(violation(&path, &line, "Direct I/O"));
                }
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n❌ Presentation modules must go through capabilities:\n");
        for v in &violations {
            eprintln!("  ❌ {v}");
        }
        panic!("Found {} I/O violation(s)", violations.len());
    }
}
