//! Message body variants

/// The textual content of a message
///
/// A body always carries at least one of the two representations. When both
/// are present the compiler emits a `multipart/alternative` pair, plaintext
/// first, as recommended by RFC 2046 (least faithful variant first).
#[derive(Debug, Clone)]
pub struct Body {
    pub(crate) html: Option<String>,
    pub(crate) plain: Option<String>,
}

impl Body {
    /// Creates an HTML-only body
    pub fn html<S: Into<String>>(html: S) -> Body {
        Body {
            html: Some(html.into()),
            plain: None,
        }
    }

    /// Creates a plaintext-only body
    pub fn plain<S: Into<String>>(plain: S) -> Body {
        Body {
            html: None,
            plain: Some(plain.into()),
        }
    }

    /// Creates a body with both an HTML and a plaintext alternative
    pub fn alternative<H: Into<String>, P: Into<String>>(html: H, plain: P) -> Body {
        Body {
            html: Some(html.into()),
            plain: Some(plain.into()),
        }
    }

    /// HTML variant, if any
    pub fn html_part(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// Plaintext variant, if any
    pub fn plain_part(&self) -> Option<&str> {
        self.plain.as_deref()
    }
}
