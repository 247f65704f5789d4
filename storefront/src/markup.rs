//! HTML-escaped text.
//!
//! Every field sourced from user-controlled data (product names, shipping
//! address fields, order numbers, status strings) must pass through the
//! escaping transform before interpolation into a document. [`Escaped`] makes
//! that invariant structural: the invoice renderer only accepts `Escaped`
//! values in dynamic positions, and the only ways to obtain one are the
//! escaping constructors or an explicit [`Escaped::trusted`] for static
//! vendor boilerplate.

use serde::Serialize;

/// Text that has passed through the HTML-escaping transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Escaped(String);

impl Escaped {
    /// Escape untrusted text for interpolation into markup.
    ///
    /// Replaces `&` → `&amp;`, `<` → `&lt;`, `>` → `&gt;`, `"` → `&quot;`,
    /// `'` → `&#039;`. Already-escaped input is escaped again; this transform
    /// never trusts its argument.
    pub fn from_raw(raw: &str) -> Self {
        let mut out = String::with_capacity(raw.len());
        for ch in raw.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#039;"),
                other => out.push(other),
            }
        }
        Self(out)
    }

    /// Escape an optional untrusted value; absence yields empty text.
    pub fn from_opt(raw: Option<&str>) -> Self {
        raw.map(Self::from_raw).unwrap_or_default()
    }

    /// Wrap static, author-controlled text without escaping.
    ///
    /// Only for compile-time vendor boilerplate; never pass data read from
    /// storage or a request through this.
    pub fn trusted(text: &'static str) -> Self {
        Self(text.to_owned())
    }

    /// Fall back to static text when the escaped value is empty.
    pub fn non_empty_or(self, fallback: &'static str) -> Self {
        if self.0.is_empty() {
            Self::trusted(fallback)
        } else {
            self
        }
    }

    /// Whether the escaped text is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The escaped text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Escaped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
