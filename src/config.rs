use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::parser::candidates::{DEFAULT_MAX_CANDIDATES, DEFAULT_MIN_LEN};
use crate::parser::fields::DEFAULT_SPAN_LABEL;
use crate::parser::navigation::DEFAULT_NAV_KEYWORDS;
use crate::parser::{CandidateFilter, EntryExtractor, FieldExtractor, FieldSpec, NavKeywords};

pub const DEFAULT_CONFIG_FILE: &str = "staff_scraper";
pub const ENV_PREFIX: &str = "STAFF";
const DEFAULT_USER_AGENT: &str = concat!("staff_scraper/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    List,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub url: String,
    pub kind: TargetKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSetting {
    pub name: String,
    pub marker: String,
    #[serde(default = "default_span")]
    pub span: String,
}

fn default_span() -> String {
    DEFAULT_SPAN_LABEL.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_candidates: usize,
    pub min_candidate_len: usize,
    /// Single character every entry must contain; empty disables the check.
    pub required_char: String,
    pub nav_keywords: Vec<String>,
    pub fields: Vec<FieldSetting>,
    pub clean_fields: bool,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub targets: Vec<Target>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            min_candidate_len: DEFAULT_MIN_LEN,
            required_char: ",".to_string(),
            nav_keywords: DEFAULT_NAV_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            fields: vec![
                field("name", r#"class="field Name""#),
                field("room", r#"class="field Raum""#),
                field("officeHours", r#"class="field Sprechzeiten""#),
            ],
            clean_fields: false,
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            targets: Vec::new(),
        }
    }
}

fn field(name: &str, marker: &str) -> FieldSetting {
    FieldSetting {
        name: name.to_string(),
        marker: marker.to_string(),
        span: default_span(),
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("nav_keywords")
}

impl Settings {
    /// Defaults, then the TOML file (`path`, or `staff_scraper.toml` if present),
    /// then `STAFF_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Self::build(Config::builder().add_source(file).add_source(env_source()))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_candidates == 0 {
            return Err(invalid("max_candidates", "must be at least 1"));
        }
        if self.required_char.chars().count() > 1 {
            return Err(invalid("required_char", "must be a single character or empty"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be at least 1"));
        }
        for (i, f) in self.fields.iter().enumerate() {
            if f.name.trim().is_empty() {
                return Err(invalid(&format!("fields[{}].name", i), "must not be empty"));
            }
            if f.marker.is_empty() {
                return Err(invalid(&format!("fields[{}].marker", i), "must not be empty"));
            }
        }
        for (i, t) in self.targets.iter().enumerate() {
            if !(t.url.starts_with("http://") || t.url.starts_with("https://")) {
                return Err(invalid(&format!("targets[{}].url", i), "must be an http(s) URL"));
            }
        }
        Ok(())
    }

    pub fn candidate_filter(&self) -> CandidateFilter {
        CandidateFilter::new(self.max_candidates, NavKeywords::new(&self.nav_keywords))
            .with_min_len(self.min_candidate_len)
            .with_required_char(self.required_char.chars().next())
    }

    pub fn field_specs(&self) -> Result<Vec<FieldSpec>, ConfigError> {
        self.fields
            .iter()
            .map(|f| {
                FieldSpec::with_span(&f.name, &f.marker, &f.span).map_err(|source| {
                    ConfigError::Pattern {
                        name: f.name.clone(),
                        source,
                    }
                })
            })
            .collect()
    }

    pub fn entry_extractor(&self) -> EntryExtractor {
        EntryExtractor::new(self.candidate_filter())
    }

    pub fn field_extractor(&self) -> Result<FieldExtractor, ConfigError> {
        Ok(FieldExtractor::new(self.field_specs()?).cleaned(self.clean_fields))
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use std::collections::HashMap;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        Settings::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.max_candidates, 5);
        assert_eq!(s.min_candidate_len, 6);
        assert_eq!(s.fields.len(), 3);
        assert!(s.nav_keywords.iter().any(|k| k == "contact"));
        assert!(s.validate().is_ok());
        let filter = s.candidate_filter();
        assert_eq!(filter.required_char, Some(','));
    }

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn toml_overrides() {
        let s = from_toml(
            r#"
max_candidates = 3
required_char = ""
nav_keywords = ["Mensa"]
clean_fields = true

[[fields]]
name = "room"
marker = "field Raum"

[[fields]]
name = "mail"
marker = "field Mail"
span = 'class="value"'

[[targets]]
url = "https://example.org/personen"
kind = "list"

[[targets]]
url = "https://example.org/personen/roth"
kind = "detail"
"#,
        )
        .unwrap();
        assert_eq!(s.max_candidates, 3);
        assert_eq!(s.candidate_filter().required_char, None);
        assert_eq!(s.fields[0].span, DEFAULT_SPAN_LABEL);
        assert_eq!(s.fields[1].span, r#"class="value""#);
        assert_eq!(s.targets[1].kind, TargetKind::Detail);
        assert_eq!(s.min_candidate_len, 6);
        let fx = s.field_extractor().unwrap();
        assert!(fx.clean);
        assert_eq!(fx.specs.len(), 2);
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<String, String> = [
            ("STAFF_MAX_CANDIDATES".to_string(), "2".to_string()),
            ("STAFF_NAV_KEYWORDS".to_string(), "mensa,bibliothek".to_string()),
        ]
        .into_iter()
        .collect();
        let s = Settings::build(
            Config::builder()
                .add_source(File::from_str("max_candidates = 4", FileFormat::Toml))
                .add_source(env_source().source(Some(env))),
        )
        .unwrap();
        assert_eq!(s.max_candidates, 2);
        assert_eq!(s.nav_keywords, vec!["mensa", "bibliothek"]);
    }

    #[test]
    fn rejects_invalid() {
        assert!(matches!(
            from_toml("max_candidates = 0"),
            Err(ConfigError::Invalid { key, .. }) if key == "max_candidates"
        ));
        assert!(matches!(
            from_toml(r#"required_char = ",;""#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            from_toml("[[fields]]\nname = \"room\"\nmarker = \"\""),
            Err(ConfigError::Invalid { key, .. }) if key == "fields[0].marker"
        ));
        assert!(matches!(
            from_toml("[[targets]]\nurl = \"ftp://x\"\nkind = \"list\""),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            from_toml("[[targets]]\nurl = \"https://x\"\nkind = \"table\""),
            Err(ConfigError::Load(_))
        ));
    }
}
