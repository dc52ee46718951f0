//! Indentation inferred from the whitespace around an element.

use super::document::{NodePath, XmlDocument};
use crate::constants::DEFAULT_INDENT_UNIT;

/// Line break plus indentation of an element, and one nesting unit.
///
/// `element` starts with the line break found before the element (`\n` or
/// `\r\n`), so `level(n)` can be used directly as the whitespace node that
/// starts a new line `n` units deeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentProfile {
    /// Line break and indentation preceding the element
    pub element: String,
    /// One level of nesting
    pub unit: String,
}

impl IndentProfile {
    /// Infer the profile of the element at `path` from the whitespace before
    /// it and before its parent. The unit is the extra indentation of the
    /// element over its parent, or two spaces when that cannot be told.
    #[must_use]
    pub fn infer(doc: &XmlDocument, path: &[usize]) -> Self {
        let element = last_line(doc.whitespace_before(path));
        let parent: NodePath = path[..path.len().saturating_sub(1)].to_vec();
        let parent_indent = if parent.is_empty() {
            "\n".to_string()
        } else {
            last_line(doc.whitespace_before(&parent))
        };

        let extra = element
            .strip_prefix(parent_indent.as_str())
            // Parent used a different line break or mixed indentation
            .or_else(|| element.get(parent_indent.len()..))
            .filter(|extra| !extra.is_empty());
        let unit = extra.unwrap_or(DEFAULT_INDENT_UNIT).to_string();

        Self {
            element,
            unit,
        }
    }

    /// Line break plus indentation `depth` units below the element.
    #[must_use]
    pub fn level(&self, depth: usize) -> String {
        format!("{}{}", self.element, self.unit.repeat(depth))
    }
}

/// The tail of a whitespace run starting at its last line break.
///
/// A `\r` right before that break is kept so CRLF files stay CRLF.
fn last_line(whitespace: Option<&str>) -> String {
    let Some(text) = whitespace else {
        return "\n".to_string();
    };
    match text.rfind('\n') {
        Some(i) if i > 0 && text.as_bytes()[i - 1] == b'\r' => text[i - 1..].to_string(),
        Some(i) => text[i..].to_string(),
        None => text.to_string(),
    }
}
