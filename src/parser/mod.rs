pub mod anchors;
pub mod candidates;
pub mod entities;
pub mod fields;
pub mod navigation;

use tracing::debug;

pub use anchors::{extract_anchor_texts, strip_tags};
pub use candidates::{filter_candidates, CandidateFilter, EntryList};
pub use entities::{decode_entities, EntityTable};
pub use fields::{clean_fields, extract_fields, FieldResult, FieldSpec};
pub use navigation::{is_likely_navigation_text, NavKeywords};

/// A pure transform from one HTML document to a result.
pub trait Extract {
    type Output;

    fn extract(&self, doc: &str) -> Self::Output;
}

/// Two-pass list pipeline: link texts → cleaned entries.
#[derive(Debug, Clone, Default)]
pub struct EntryExtractor {
    pub filter: CandidateFilter,
}

impl EntryExtractor {
    pub fn new(filter: CandidateFilter) -> Self {
        EntryExtractor { filter }
    }
}

impl Extract for EntryExtractor {
    type Output = EntryList;

    fn extract(&self, doc: &str) -> EntryList {
        let raw = extract_anchor_texts(doc);
        debug!("Found {} link texts in {} bytes", raw.len(), doc.len());
        self.filter.apply(&raw)
    }
}

/// Detail pipeline: one value per field spec, optionally trimmed and decoded.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    pub specs: Vec<FieldSpec>,
    pub clean: bool,
    pub entities: EntityTable,
}

impl FieldExtractor {
    pub fn new(specs: Vec<FieldSpec>) -> Self {
        FieldExtractor {
            specs,
            clean: false,
            entities: EntityTable::default(),
        }
    }

    pub fn cleaned(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }
}

impl Extract for FieldExtractor {
    type Output = FieldResult;

    fn extract(&self, doc: &str) -> FieldResult {
        let result = extract_fields(doc, &self.specs);
        if self.clean {
            clean_fields(result, &self.entities)
        } else {
            result
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    fn detail_specs() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", r#"class="field Name""#).unwrap(),
            FieldSpec::new("room", r#"class="field Raum""#).unwrap(),
            FieldSpec::new("officeHours", r#"class="field Sprechzeiten""#).unwrap(),
        ]
    }

    #[test]
    fn staff_list_page() {
        let doc = fixture("staff_list");
        let entries = EntryExtractor::default().extract(&doc);
        assert_eq!(
            entries.as_slice(),
            [
                "Bäcker, Prof. Dr. Martina",
                "Huber, Tom",
                "Mueller, Anna",
                "Özdemir, Dr. Selin",
                "Schäfer, Jonas",
            ]
        );
    }

    #[test]
    fn staff_list_no_navigation() {
        let doc = fixture("staff_list");
        let extractor = EntryExtractor::new(CandidateFilter::default().with_required_char(None));
        let entries = extractor.extract(&doc);
        assert!(entries.iter().all(|e| !e.to_lowercase().contains("kontakt")));
        assert!(entries.iter().all(|e| !e.contains("News")));
    }

    #[test]
    fn staff_detail_page_raw() {
        let doc = fixture("staff_detail");
        let result = FieldExtractor::new(detail_specs()).extract(&doc);
        assert_eq!(result.get("name"), Some("Prof. Dr. Martina B&auml;cker"));
        assert_eq!(result.get("room"), Some("G-204"));
        assert_eq!(result.get("officeHours"), Some("Mi 14:00&nbsp;&ndash; 15:30 Uhr"));
    }

    #[test]
    fn staff_detail_page_cleaned() {
        let doc = fixture("staff_detail");
        let result = FieldExtractor::new(detail_specs()).cleaned(true).extract(&doc);
        assert_eq!(result.get("name"), Some("Prof. Dr. Martina Bäcker"));
        assert_eq!(result.get("officeHours"), Some("Mi 14:00 &ndash; 15:30 Uhr"));
    }

    #[test]
    fn list_page_has_no_detail_fields() {
        let doc = fixture("staff_list");
        let result = FieldExtractor::new(detail_specs()).extract(&doc);
        assert_eq!(result.len(), 3);
        assert!(result.all_empty());
    }
}
