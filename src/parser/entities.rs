/// Ordered entity → literal table. Earlier entries win when two entities
/// share a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTable {
    entries: Vec<(String, String)>,
}

const DEFAULT_ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&nbsp;", " "),
    ("&auml;", "ä"),
    ("&ouml;", "ö"),
    ("&uuml;", "ü"),
    ("&Auml;", "Ä"),
    ("&Ouml;", "Ö"),
    ("&Uuml;", "Ü"),
    ("&szlig;", "ß"),
    ("&quot;", "\""),
    ("&#34;", "\""),
    ("&apos;", "'"),
    ("&#39;", "'"),
    ("&#039;", "'"),
];

impl EntityTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with('&'))
            .collect();
        EntityTable { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, rest: &str) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .find(|(entity, _)| rest.starts_with(entity.as_str()))
            .map(|(entity, literal)| (entity.as_str(), literal.as_str()))
    }
}

impl Default for EntityTable {
    fn default() -> Self {
        EntityTable::new(DEFAULT_ENTITIES.iter().copied())
    }
}

/// Replace every listed entity with its literal in one left-to-right pass.
///
/// Output is never re-scanned: `&amp;uuml;` becomes `&uuml;`, not `ü`.
/// Unlisted entities are copied through untouched.
pub fn decode_entities(s: &str, table: &EntityTable) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match table.lookup(rest) {
            Some((entity, literal)) => {
                out.push_str(literal);
                rest = &rest[entity.len()..];
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
