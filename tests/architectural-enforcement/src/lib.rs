//! Architectural Enforcement for the BugAI Workspace
//!
//! Source scanners shared by the integration tests in `tests/`. The tests
//! enforce three rules:
//! - No sleep calls in production code
//! - No blocking I/O inside async functions
//! - Presentation modules of `bugai-core` never touch files, sockets or HTTP
//!
//! Scanning is line based. Everything from the first `#[cfg(test)]` onward is
//! treated as test code, and `//` comments are stripped before matching.

use std::fs;
use std::path::{Path, PathBuf};

/// A production source line with comments removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number
    pub number: usize,
    /// Code before any `//`
    pub code: String,
    /// Index into the original file's lines
    pub index: usize,
}

/// Root of the workspace this crate lives in
pub fn workspace_root() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .ancestors()
        .nth(2)
        .map_or_else(|| manifest.to_path_buf(), Path::to_path_buf)
}

/// All `.rs` files under a workspace-relative directory
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    if !path.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Production lines of a file: stops at `#[cfg(test)]`, strips comments
pub fn production_lines(content: &str) -> Vec<SourceLine> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .map(|(index, line)| SourceLine {
            number: index + 1,
            code: line.split("//").next().unwrap_or(line).to_string(),
            index,
        })
        .filter(|line| !line.code.trim().is_empty())
        .collect()
}

/// Read a file, returning an empty string when unreadable
pub fn read_source(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

fn fn_header(line: &str) -> Option<bool> {
    let mut rest = line.trim();
    for prefix in ["pub(crate) ", "pub(super) ", "pub "] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
            break;
        }
    }

    if rest.starts_with("async fn ") {
        Some(true)
    } else if rest.starts_with("fn ") {
        Some(false)
    } else {
        None
    }
}

/// Whether the line at `current` sits in an `async fn` body
pub fn is_in_async_function(lines: &[&str], current: usize) -> bool {
    for line in lines[..=current.min(lines.len().saturating_sub(1))].iter().rev() {
        if let Some(is_async) = fn_header(line) {
            return is_async;
        }

        let trimmed = line.trim();
        if trimmed.starts_with("mod ") || (trimmed.starts_with("impl") && trimmed.contains('{')) {
            return false;
        }
    }
    false
}

/// Format a violation for the failure report
pub fn violation(path: &Path, line: &SourceLine, kind: &str) -> String {
    let shown = path
        .strip_prefix(workspace_root())
        .unwrap_or(path)
        .display()
        .to_string();
    format!("{shown}:{} - {kind}: {}", line.number, line.code.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_async_function_detection() {
        let code = [
            "    pub async fn persist(&self) -> Result<()> {",
            "        std::fs::write(\"report.txt\", \"\")?;",
            "    }",
        ];
        assert!(is_in_async_function(&code, 1));
    }

    #[test]
    fn test_sync_function_detection() {
        let code = [
            "pub fn load_config_from_path(path: &Path) -> Result<ClientConfig, ConfigError> {",
            "    let content = std::fs::read_to_string(path)?;",
            "}",
        ];
        assert!(!is_in_async_function(&code, 1));
    }

    #[test]
    fn test_production_lines_stop_at_tests() {
        let content = "use tokio::fs; // async only\n\nfn a() {}\n#[cfg(test)]\nmod tests {\n    use std::fs;\n}\n";
        let lines = production_lines(content);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].code, "use tokio::fs; ");
        assert_eq!(lines[1].number, 3);
    }

    #[test]
    fn test_workspace_root_holds_client() {
        assert!(workspace_root().join("client").join("core").exists());
    }
}
