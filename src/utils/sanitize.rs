/// Escapes HTML metacharacters in user-supplied text before it is
/// stored. The stored value is rendered verbatim by the frontends, so
/// escaping happens at write time. `&` goes first.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Maps every non-alphanumeric character to `_`, for tokens that end up
/// inside generated filenames (document types and the like).
pub fn sanitize_token(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_five_metacharacters() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn ampersand_is_escaped_before_other_entities() {
        // A pre-escaped entity must double-escape, not pass through.
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(escape_html("Threat report 2026"), "Threat report 2026");
    }

    #[test]
    fn token_replaces_punctuation_and_spaces() {
        assert_eq!(sanitize_token("Tax Docs (2024)!"), "Tax_Docs__2024__");
        assert_eq!(sanitize_token("passport"), "passport");
    }
}
