pub const DEFAULT_NAV_KEYWORDS: &[&str] = &[
    "contact",
    "kontakt",
    "news",
    "login",
    "services",
    "enrollment",
    "reset",
    "impressum",
    "datenschutz",
    "sitemap",
];

/// Site-wide labels that mark a link as navigation rather than data.
/// Stored lowercased; matching is a plain substring test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavKeywords {
    keywords: Vec<String>,
}

impl NavKeywords {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for kw in keywords {
            let kw = kw.as_ref().trim().to_lowercase();
            if !kw.is_empty() && !out.contains(&kw) {
                out.push(kw);
            }
        }
        NavKeywords { keywords: out }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for NavKeywords {
    fn default() -> Self {
        NavKeywords::new(DEFAULT_NAV_KEYWORDS)
    }
}

/// True when any keyword occurs anywhere in `s`, ignoring case.
/// No word boundaries: "Newsletter" hits "news".
pub fn is_likely_navigation_text(s: &str, keywords: &NavKeywords) -> bool {
    let lower = s.to_lowercase();
    keywords.iter().any(|kw| lower.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_labels() {
        let kw = NavKeywords::default();
        assert!(is_likely_navigation_text("Contact us", &kw));
        assert!(is_likely_navigation_text("Latest NEWS", &kw));
        assert!(is_likely_navigation_text("Password reset", &kw));
        assert!(!is_likely_navigation_text("Mueller, Anna", &kw));
    }

    #[test]
    fn substring_inside_word() {
        let kw = NavKeywords::default();
        assert!(is_likely_navigation_text("Newsletter, Archiv", &kw));
    }

    #[test]
    fn keywords_are_normalized() {
        let kw = NavKeywords::new(["  Mensa ", "MENSA", ""]);
        assert_eq!(kw.len(), 1);
        assert!(is_likely_navigation_text("zur mensa", &kw));
    }

    #[test]
    fn empty_set_rejects_nothing() {
        let kw = NavKeywords::new(Vec::<String>::new());
        assert!(kw.is_empty());
        assert!(!is_likely_navigation_text("contact", &kw));
    }

    proptest! {
        #[test]
        fn case_insensitive(s in "[a-zA-Z ,]{0,30}") {
            let kw = NavKeywords::default();
            prop_assert_eq!(
                is_likely_navigation_text(&s.to_uppercase(), &kw),
                is_likely_navigation_text(&s.to_lowercase(), &kw)
            );
        }
    }
}
