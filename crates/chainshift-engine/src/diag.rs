use serde::Serialize;

/// A translation gap: something the converter recognized but could not
/// lower. Gaps never abort a run; they are rendered as inline comments in
/// the generated code and reported to the caller as values so it can log
/// or fail the build as it sees fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// The verb (or matcher) that could not be translated.
    pub verb: String,
    /// Best-effort reconstruction of the original call.
    pub call_text: String,
    pub reason: String,
    /// Closest known verb, when the gap looks like a misspelling.
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(
        verb: impl Into<String>,
        call_text: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            verb: verb.into(),
            call_text: call_text.into(),
            reason: reason.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }

    /// The inline comment spliced into generated output.
    pub fn render_comment(&self) -> String {
        let mut comment = format!("// UNSUPPORTED: {} in `{}`", self.reason, self.call_text);
        if let Some(hint) = &self.suggestion {
            comment.push_str(&format!(" (did you mean '{}'?)", hint));
        }
        comment
    }
}

/// A translated block of statements plus the gaps hit while producing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Translation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    pub fn push_line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    pub fn absorb(&mut self, other: Translation) {
        self.text.push_str(&other.text);
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
