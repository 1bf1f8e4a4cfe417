use autumnus::{HtmlLinkedBuilder, formatter::Formatter, languages::Language, themes};

use crate::util::html_escape;

/// Code block highlighter backed by autumnus (tree-sitter based).
///
/// Output uses CSS classes; the matching stylesheet comes from
/// [`SyntaxHighlighter::theme_css`].
pub struct SyntaxHighlighter {
    theme_name: String,
}

impl SyntaxHighlighter {
    pub fn new(theme_name: &str) -> Self {
        Self {
            theme_name: theme_name.to_string(),
        }
    }

    /// Highlight a code block.
    ///
    /// Unknown languages fall back to an escaped `<pre><code>` block.
    pub fn highlight(&self, code: &str, language: &str) -> String {
        let lang = Language::guess(language, code);
        if is_unrecognized(&lang, language) {
            return plain_block(code, language);
        }

        let Ok(formatter) = HtmlLinkedBuilder::new().source(code).lang(lang).build() else {
            return plain_block(code, language);
        };

        let mut output: Vec<u8> = Vec::new();
        if formatter.format(&mut output).is_err() {
            return plain_block(code, language);
        }
        String::from_utf8(output).unwrap_or_else(|_| plain_block(code, language))
    }

    /// CSS for the configured theme, or `None` if the theme is unknown.
    pub fn theme_css(&self) -> Option<String> {
        let theme = themes::get(&self.theme_name).ok()?;
        Some(theme.css(false))
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new("github-dark")
    }
}

/// A language name was given but autumnus fell back to plain text.
fn is_unrecognized(lang: &Language, requested: &str) -> bool {
    matches!(lang, Language::PlainText)
        && !matches!(requested, "" | "plaintext" | "text")
}

fn plain_block(code: &str, language: &str) -> String {
    let escaped = html_escape(code);
    if language.is_empty() {
        format!("<pre><code>{escaped}</code></pre>")
    } else {
        format!("<pre><code class=\"language-{language}\">{escaped}</code></pre>")
    }
}
