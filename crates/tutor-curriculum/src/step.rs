//! A single curriculum step.

use serde::{Deserialize, Serialize};

/// Smallest curriculum unit. Immutable once loaded.
///
/// Wire format (curriculum JSON):
///
/// ```json
/// { "doc": "docs/intro.md", "code": "sections/intro/intro.py", "html": "media/intro.html" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    doc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(
        default,
        rename = "html",
        alias = "supplement",
        skip_serializing_if = "Option::is_none"
    )]
    supplement: Option<String>,
}

impl Step {
    /// A text-only step.
    pub fn new(doc: impl Into<String>) -> Self {
        Self {
            doc: doc.into(),
            code: None,
            supplement: None,
        }
    }

    /// Attach an editable code file.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach supplementary static content.
    #[must_use]
    pub fn with_supplement(mut self, supplement: impl Into<String>) -> Self {
        self.supplement = Some(supplement.into());
        self
    }

    /// Reference to the reading content.
    pub fn doc_ref(&self) -> &str {
        &self.doc
    }

    /// Reference to the editable source file, if any.
    pub fn code_ref(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Reference to supplementary static content, if any.
    pub fn supplement_ref(&self) -> Option<&str> {
        self.supplement.as_deref()
    }

    /// Whether the step has no code file.
    pub fn is_text_only(&self) -> bool {
        self.code.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_step() {
        let step: Step = serde_json::from_str(
            r#"{"doc": "d.md", "code": "sections/a/a.py", "html": "media/a.html"}"#,
        )
        .unwrap();
        assert_eq!(step.doc_ref(), "d.md");
        assert_eq!(step.code_ref(), Some("sections/a/a.py"));
        assert_eq!(step.supplement_ref(), Some("media/a.html"));
        assert!(!step.is_text_only());
    }

    #[test]
    fn deserialize_text_only_step() {
        let step: Step = serde_json::from_str(r#"{"doc": "d.md"}"#).unwrap();
        assert!(step.is_text_only());
        assert!(step.supplement_ref().is_none());
    }

    #[test]
    fn supplement_alias_accepted() {
        let step: Step =
            serde_json::from_str(r#"{"doc": "d.md", "supplement": "extra.html"}"#).unwrap();
        assert_eq!(step.supplement_ref(), Some("extra.html"));
    }

    #[test]
    fn missing_doc_is_rejected() {
        assert!(serde_json::from_str::<Step>(r#"{"code": "a.py"}"#).is_err());
    }

    #[test]
    fn builder_matches_wire_format() {
        let step = Step::new("d.md").with_code("a.py");
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json, serde_json::json!({"doc": "d.md", "code": "a.py"}));
    }
}
