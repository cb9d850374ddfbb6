//! Source Input
//!
//! The editable code editor plus the language selector that sits next to it.
//! The selector offers a fixed table of syntax modes and an `"other"` slot
//! with a free-text language name.

use crate::capabilities::Editor;
use crate::model::AnalysisSession;

/// Sentinel syntax-mode key for a free-text language
pub const OTHER_MIME: &str = "other";

/// A recognized syntax mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LanguageMode {
    /// Syntax-mode key sent as `languageMime`
    pub mime: &'static str,
    /// Display name sent as `language`
    pub name: &'static str,
}

/// Recognized syntax modes, in selector order
pub const LANGUAGES: &[LanguageMode] = &[
    LanguageMode { mime: "python", name: "Python" },
    LanguageMode { mime: "javascript", name: "JavaScript" },
    LanguageMode { mime: "text/typescript", name: "TypeScript" },
    LanguageMode { mime: "text/x-java", name: "Java" },
    LanguageMode { mime: "text/x-csrc", name: "C" },
    LanguageMode { mime: "text/x-c++src", name: "C++" },
    LanguageMode { mime: "text/x-csharp", name: "C#" },
    LanguageMode { mime: "go", name: "Go" },
    LanguageMode { mime: "rust", name: "Rust" },
    LanguageMode { mime: "ruby", name: "Ruby" },
    LanguageMode { mime: "php", name: "PHP" },
    LanguageMode { mime: "swift", name: "Swift" },
    LanguageMode { mime: "text/x-kotlin", name: "Kotlin" },
    LanguageMode { mime: "sql", name: "SQL" },
    LanguageMode { mime: "shell", name: "Shell" },
];

/// Find a recognized mode by key
#[must_use]
pub fn lookup_language(mime: &str) -> Option<&'static LanguageMode> {
    LANGUAGES.iter().find(|mode| mode.mime == mime)
}

/// Selector position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LanguageChoice {
    /// Nothing picked yet
    #[default]
    Unselected,
    /// A recognized mode
    Known(&'static LanguageMode),
    /// The free-text slot
    Other,
}

/// Code editor plus language selector
pub struct SourceForm {
    editor: Box<dyn Editor>,
    choice: LanguageChoice,
    other_name: String,
}

impl SourceForm {
    /// Form over `editor`, with no language selected
    pub fn new(mut editor: Box<dyn Editor>) -> Self {
        editor.set_mode(None);
        Self {
            editor,
            choice: LanguageChoice::Unselected,
            other_name: String::new(),
        }
    }

    /// Replace the editor text
    pub fn set_code(&mut self, code: &str) {
        self.editor.set_value(code);
    }

    /// Editor text
    #[must_use]
    pub fn code(&self) -> String {
        self.editor.value()
    }

    /// Current selector position
    #[must_use]
    pub fn choice(&self) -> LanguageChoice {
        self.choice
    }

    /// Free-text language name
    #[must_use]
    pub fn other_name(&self) -> &str {
        &self.other_name
    }

    /// Whether the free-text input is shown
    #[must_use]
    pub fn other_visible(&self) -> bool {
        self.choice == LanguageChoice::Other
    }

    /// Pick a mode by key
    ///
    /// Unrecognized keys select the free-text slot.
    pub fn select_language(&mut self, mime: &str) -> LanguageChoice {
        self.choice = match lookup_language(mime) {
            Some(mode) => LanguageChoice::Known(mode),
            None => {
                if mime != OTHER_MIME {
                    tracing::debug!(mime, "Unrecognized syntax mode, using free-text slot");
                }
                LanguageChoice::Other
            }
        };
        self.sync_editor_mode();
        self.choice
    }

    /// Set the free-text language name
    pub fn set_other_name(&mut self, name: &str) {
        self.other_name = name.to_string();
    }

    /// Language name to submit
    #[must_use]
    pub fn language_name(&self) -> String {
        match self.choice {
            LanguageChoice::Unselected => String::new(),
            LanguageChoice::Known(mode) => mode.name.to_string(),
            LanguageChoice::Other => self.other_name.trim().to_string(),
        }
    }

    /// Syntax-mode key to submit
    #[must_use]
    pub fn language_mime(&self) -> &'static str {
        match self.choice {
            LanguageChoice::Unselected => "",
            LanguageChoice::Known(mode) => mode.mime,
            LanguageChoice::Other => OTHER_MIME,
        }
    }

    /// Put a past session's code and language back into the form
    pub fn restore(&mut self, session: &AnalysisSession) {
        self.editor.set_value(&session.code);
        match lookup_language(&session.language_mime) {
            Some(mode) => {
                self.choice = LanguageChoice::Known(mode);
            }
            None => {
                self.choice = LanguageChoice::Other;
                self.other_name.clone_from(&session.language);
            }
        }
        self.sync_editor_mode();
    }

    fn sync_editor_mode(&mut self) {
        match self.choice {
            LanguageChoice::Known(mode) => {
                self.other_name.clear();
                self.editor.set_mode(Some(mode.mime));
            }
            LanguageChoice::Other | LanguageChoice::Unselected => self.editor.set_mode(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::MemoryEditor;

    fn session(language: &str, mime: &str) -> AnalysisSession {
        AnalysisSession {
            code: "main = putStrLn \"hi\"".to_string(),
            language: language.to_string(),
            language_mime: mime.to_string(),
            explanation: None,
            corrected_code: None,
            bugs: vec![],
            suggestions: vec![],
            timestamp: String::new(),
        }
    }

    #[test]
    fn test_known_language() {
        let editor = MemoryEditor::new();
        let mut form = SourceForm::new(Box::new(editor.clone()));

        form.select_language("python");

        assert_eq!(form.language_name(), "Python");
        assert_eq!(form.language_mime(), "python");
        assert_eq!(editor.mode().as_deref(), Some("python"));
        assert!(!form.other_visible());
    }

    #[test]
    fn test_other_language_trims_name() {
        let editor = MemoryEditor::new();
        let mut form = SourceForm::new(Box::new(editor.clone()));

        form.select_language(OTHER_MIME);
        form.set_other_name("  Haskell ");

        assert_eq!(form.language_name(), "Haskell");
        assert_eq!(form.language_mime(), "other");
        assert_eq!(editor.mode(), None);
    }

    #[test]
    fn test_unselected_submits_empty_language() {
        let form = SourceForm::new(Box::new(MemoryEditor::new()));
        assert_eq!(form.language_name(), "");
    }

    #[test]
    fn test_switching_to_known_clears_free_text() {
        let mut form = SourceForm::new(Box::new(MemoryEditor::new()));
        form.select_language(OTHER_MIME);
        form.set_other_name("Haskell");
        form.select_language("rust");

        assert_eq!(form.other_name(), "");
        assert_eq!(form.language_name(), "Rust");
    }

    #[test]
    fn test_restore_known_and_unknown() {
        let editor = MemoryEditor::new();
        let mut form = SourceForm::new(Box::new(editor.clone()));

        form.restore(&session("Go", "go"));
        assert_eq!(form.choice(), LanguageChoice::Known(&LANGUAGES[7]));
        assert_eq!(editor.mode().as_deref(), Some("go"));

        form.restore(&session("Haskell", "text/x-haskell"));
        assert_eq!(form.choice(), LanguageChoice::Other);
        assert_eq!(form.other_name(), "Haskell");
        assert_eq!(form.code(), "main = putStrLn \"hi\"");
        assert_eq!(editor.mode(), None);
    }
}
