/// Decodes HTML entities, collapses every whitespace run into one space and trims.
///
/// `&nbsp;` decodes to U+00A0, which counts as whitespace here. Only entities
/// closed by `;` are decoded: a legacy form such as `&nbsp` without the
/// semicolon stays as written, and decoding runs once (`&amp;lt;` gives `&lt;`).
pub fn normalize(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_decodes_and_collapses() {
        assert_eq!(normalize("Hello&nbsp;&nbsp;World\n\n"), "Hello World");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n "), "");
    }

    #[test]
    fn test_normalize_named_and_numeric_entities() {
        assert_eq!(
            normalize("  R&amp;D&#44; &lt;2025&gt;\t\t지원사업 &quot;공고&quot; "),
            "R&D, <2025> 지원사업 \"공고\""
        );
    }

    #[test]
    fn test_normalize_requires_terminated_entities() {
        assert_eq!(normalize("a&nbsp;b &#44; &amp;lt; &nbspc"), "a b , &lt; &nbspc");
    }

    #[test]
    fn test_normalize_keeps_inner_text_untouched() {
        assert_eq!(normalize("no-change"), "no-change");
        assert_eq!(normalize("a\r\n\r\nb   c"), "a b c");
    }
}
