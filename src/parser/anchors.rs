use std::sync::LazyLock;

use regex::Regex;

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>(.*?)</a\s*>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Inner text of every `<a ...>...</a>` element, in document order.
///
/// Nested tags are removed in one pass; anything left empty or blank is
/// skipped. Duplicates are kept. Unterminated links never match.
pub fn extract_anchor_texts(doc: &str) -> Vec<String> {
    ANCHOR_RE
        .captures_iter(doc)
        .filter_map(|caps| {
            let text = strip_tags(&caps[1]);
            if text.trim().is_empty() {
                None
            } else {
                Some(text)
            }
        })
        .collect()
}

/// Remove every `<...>` run. Not recursive: `<<b>b>` leaves `b>`.
pub fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_links_in_order() {
        let doc = r#"<a href="x">Mueller, Anna</a><a>News</a><a>Huber, Tom</a>"#;
        assert_eq!(
            extract_anchor_texts(doc),
            vec!["Mueller, Anna", "News", "Huber, Tom"]
        );
    }

    #[test]
    fn nested_markup_is_stripped() {
        let doc = r#"<a href="/p/1"><span class="n"><b>Huber</b>, Tom</span></a>"#;
        assert_eq!(extract_anchor_texts(doc), vec!["Huber, Tom"]);
    }

    #[test]
    fn multiline_and_uppercase() {
        let doc = "<A HREF='/x'>\n  Weber,\n  Jana\n</A>";
        assert_eq!(extract_anchor_texts(doc), vec!["\n  Weber,\n  Jana\n"]);
    }

    #[test]
    fn empty_links_skipped() {
        let doc = r#"<a href="/"></a><a><img src="logo.png"></a><a> &nbsp; </a><a>  </a>"#;
        // entities are decoded later, so "&nbsp;" still counts as text here
        assert_eq!(extract_anchor_texts(doc), vec![" &nbsp; "]);
    }

    #[test]
    fn duplicates_kept() {
        let doc = "<a>Roth, Eva</a><p>x</p><a>Roth, Eva</a>";
        assert_eq!(extract_anchor_texts(doc).len(), 2);
    }

    #[test]
    fn unterminated_link_ignored() {
        let doc = r#"<a href="x">Mueller, Anna"#;
        assert!(extract_anchor_texts(doc).is_empty());
    }

    #[test]
    fn abbr_and_article_are_not_links() {
        let doc = "<abbr>Prof.</abbr><article>Text</article>";
        assert!(extract_anchor_texts(doc).is_empty());
    }

    #[test]
    fn no_anchors() {
        assert!(extract_anchor_texts("<html><body><p>Hallo</p></body></html>").is_empty());
        assert!(extract_anchor_texts("").is_empty());
    }

    #[test]
    fn strip_tags_single_pass() {
        assert_eq!(strip_tags("<<b>b>"), "b>");
        assert_eq!(strip_tags("a <> b"), "a  b");
        assert_eq!(strip_tags("x < y"), "x < y");
    }

    proptest! {
        #[test]
        fn no_tags_survive(inner in "[a-z<>/ ,]{0,40}") {
            let doc = format!("<a href=\"#\">{}</a>", inner);
            for text in extract_anchor_texts(&doc) {
                prop_assert!(!TAG_RE.is_match(&text), "tag left in {:?}", text);
            }
        }

        #[test]
        fn total_over_arbitrary_input(doc in ".{0,200}") {
            let _ = extract_anchor_texts(&doc);
        }
    }
}
