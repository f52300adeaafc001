use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use super::entities::{decode_entities, EntityTable};

pub const DEFAULT_SPAN_LABEL: &str = r#"class="text""#;

/// A named value located by a marker and the first labeled span after it.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    marker: String,
    span: String,
    re: Regex,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, marker: impl Into<String>) -> Result<Self, regex::Error> {
        Self::with_span(name, marker, DEFAULT_SPAN_LABEL)
    }

    pub fn with_span(
        name: impl Into<String>,
        marker: impl Into<String>,
        span: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        let marker = marker.into();
        let span = span.into();
        let pattern = format!(
            r"(?s){}.*?<span\b[^>]*{}[^>]*>(.*?)</span\s*>",
            regex::escape(&marker),
            regex::escape(&span)
        );
        Ok(FieldSpec {
            name: name.into(),
            marker,
            span,
            re: Regex::new(&pattern)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn span(&self) -> &str {
        &self.span
    }

    /// Raw inner text of the span, or "" when the pattern does not match.
    pub fn capture<'d>(&self, doc: &'d str) -> &'d str {
        self.re
            .captures(doc)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or("")
    }
}

/// Field name → value, in the order the specs were given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldResult {
    values: Vec<(String, String)>,
}

impl FieldResult {
    /// A repeated name keeps its first non-empty value.
    fn insert(&mut self, name: &str, value: String) {
        match self.values.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => {
                if existing.is_empty() {
                    *existing = value;
                }
            }
            None => self.values.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when no field matched.
    pub fn all_empty(&self) -> bool {
        self.values.iter().all(|(_, v)| v.is_empty())
    }
}

impl Serialize for FieldResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in &self.values {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Run every spec against `doc`. Values are raw: no trimming, no decoding.
pub fn extract_fields(doc: &str, specs: &[FieldSpec]) -> FieldResult {
    let mut result = FieldResult::default();
    for spec in specs {
        let value = spec.capture(doc);
        if value.is_empty() {
            debug!("Field {} not found (marker {})", spec.name, spec.marker);
        }
        result.insert(&spec.name, value.to_string());
    }
    result
}

/// Trim and decode every value of an already extracted result.
pub fn clean_fields(result: FieldResult, entities: &EntityTable) -> FieldResult {
    FieldResult {
        values: result
            .values
            .into_iter()
            .map(|(k, v)| (k, decode_entities(v.trim(), entities).trim().to_string()))
            .collect(),
    }
}
