//! Plain-text rendering of task labels.
//!
//! Labels are authored with Pango-style markup (`&amp;`, occasionally `<b>`),
//! but status lines and the terminal need plain text.

/// Decode character entities and drop tags.
///
/// Unknown entities are kept literally so a stray `&` never eats text.
pub fn plain_text(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut rest = label;

    while let Some(pos) = rest.find(['&', '<']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if rest.starts_with('<') {
            match rest.find('>') {
                Some(end) => rest = &rest[end + 1..],
                None => {
                    out.push_str(rest);
                    rest = "";
                }
            }
            continue;
        }

        match rest.find(';').and_then(|end| decode_entity(&rest[1..end]).map(|c| (c, end))) {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ampersand_entity() {
        assert_eq!(
            plain_text("Use RAM for Temp &amp; Log Files"),
            "Use RAM for Temp & Log Files"
        );
    }

    #[test]
    fn test_plain_label_unchanged() {
        assert_eq!(plain_text("Reduce SSD Writes"), "Reduce SSD Writes");
        assert_eq!(plain_text(""), "");
    }

    #[test]
    fn test_tags_are_stripped() {
        assert_eq!(plain_text("<b>Bold</b> move"), "Bold move");
    }

    #[test]
    fn test_numeric_and_named_entities() {
        assert_eq!(plain_text("&lt;gpu:0&gt; &quot;x&quot; &#39;y&#x27;"), "<gpu:0> \"x\" 'y'");
    }

    #[test]
    fn test_bare_ampersand_is_kept() {
        assert_eq!(plain_text("TCP & UDP"), "TCP & UDP");
        assert_eq!(plain_text("R&D;"), "R&D;");
        assert_eq!(plain_text("trailing &"), "trailing &");
    }

    #[test]
    fn test_unclosed_tag_is_kept() {
        assert_eq!(plain_text("a < b"), "a < b");
    }
}
