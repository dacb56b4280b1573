//! # Chart Metadata
//!
//! The in-memory form of a `Chart.yaml` descriptor. Every field is optional
//! on the wire and omitted on encode when empty, so a zero-valued
//! [`Metadata`] encodes to an empty mapping.
//!
//! ## Validation
//!
//! [`Metadata::validate`] applies the semantic rules a chart must satisfy
//! before it can be packaged: required `apiVersion`/`name`/`version`, a
//! well-formed version, a known chart type, and well-formed maintainer and
//! dependency entries. Free-text fields are sanitized in place first.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::validation_errorf;

/// Contents of a `Chart.yaml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Name of the chart. The only field the chart-file I/O layer inspects.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// URL of the project home page.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub home: String,
    /// Source code URLs.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    /// SemVer 2 version of the chart.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// One-sentence description.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Search keywords.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Maintainer entries. `null` nodes are kept so validation can reject them.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub maintainers: Vec<Option<Maintainer>>,
    /// URL to an SVG or PNG icon.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub icon: String,
    /// Chart API version.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    /// YAML path to a boolean that enables or disables the chart.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub condition: String,
    /// Comma-separated tags used to group charts for enabling or disabling.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub tags: String,
    /// Version of the packaged application. Need not be SemVer.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub app_version: String,
    /// Whether the chart is deprecated.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub deprecated: bool,
    /// Arbitrary string annotations.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// SemVer range of compatible cluster versions.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub kube_version: String,
    /// Charts this chart depends on. `null` nodes are kept for validation.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Option<Dependency>>,
    /// Chart type as written: `application`, `library`, or empty.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty")]
    pub chart_type: String,
}

/// A chart maintainer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintainer {
    /// Maintainer's name.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Contact email.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub email: String,
    /// Contact URL.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub url: String,
}

/// A dependency on another chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    /// Name of the dependency chart.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Version or version range.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Repository URL or alias.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub repository: String,
    /// YAML path to a boolean that enables or disables the dependency.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub condition: String,
    /// Tags used to group dependencies.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Whether the dependency is enabled.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub enabled: bool,
    /// Values imported from the child chart into the parent.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub import_values: Vec<ImportValue>,
    /// Name the dependency is referenced by in the parent chart.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub alias: String,
}

/// One `importValues` entry: a bare path, a child/parent mapping, or any
/// other YAML node, kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportValue {
    /// Shorthand form, e.g. `data`.
    Path(String),
    /// Explicit form mapping a child values path to a parent values path.
    Mapping {
        /// Path in the child chart's values.
        child: String,
        /// Path in the parent chart's values.
        parent: String,
    },
    /// Anything else. Interpreting it is left to the consumer.
    Other(serde_yaml::Value),
}

/// The two kinds of chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// An installable chart. Assumed when `type` is empty.
    #[default]
    Application,
    /// A chart that only provides templates to other charts.
    Library,
}

impl ChartType {
    /// The value as written in `Chart.yaml`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Library => "library",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "application" => Ok(Self::Application),
            "library" => Ok(Self::Library),
            _ => Err(ValidationError::new(
                "chart.metadata.type must be application or library",
            )),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// An explicit YAML `null` (`~`, `null`, or no value) reads as the zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Metadata {
    /// The parsed chart type.
    pub fn chart_type(&self) -> Result<ChartType, ValidationError> {
        self.chart_type.parse()
    }

    /// Check the descriptor against the chart rules, sanitizing
    /// free-text fields in place. Stops at the first violation.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.name = sanitize(&self.name);
        self.description = sanitize(&self.description);
        self.home = sanitize(&self.home);
        self.icon = sanitize(&self.icon);
        self.condition = sanitize(&self.condition);
        self.tags = sanitize(&self.tags);
        self.app_version = sanitize(&self.app_version);
        self.kube_version = sanitize(&self.kube_version);
        self.api_version = sanitize(&self.api_version);
        self.version = sanitize(&self.version);
        sanitize_all(&mut self.sources);
        sanitize_all(&mut self.keywords);

        if self.api_version.is_empty() {
            return Err(ValidationError::new("chart.metadata.apiVersion is required"));
        }
        if self.name.is_empty() {
            return Err(ValidationError::new("chart.metadata.name is required"));
        }
        if self.name.contains(['/', '\\']) {
            return Err(validation_errorf!(
                "chart.metadata.name {:?} is invalid",
                self.name
            ));
        }
        if self.version.is_empty() {
            return Err(ValidationError::new("chart.metadata.version is required"));
        }
        if !is_valid_semver(&self.version) {
            return Err(validation_errorf!(
                "chart.metadata.version {:?} is invalid",
                self.version
            ));
        }
        self.chart_type()?;

        for maintainer in &mut self.maintainers {
            match maintainer {
                Some(m) => m.validate()?,
                None => {
                    return Err(ValidationError::new(
                        "chart.metadata.maintainers must not contain empty or null nodes",
                    ))
                }
            }
        }

        let mut seen = HashSet::new();
        for dependency in &mut self.dependencies {
            let dep = match dependency {
                Some(d) => d,
                None => {
                    return Err(ValidationError::new(
                        "chart.metadata.dependencies must not contain empty or null nodes",
                    ))
                }
            };
            dep.validate()?;
            let key = dep.effective_name();
            if !seen.insert(key.to_string()) {
                return Err(validation_errorf!(
                    "more than one dependency with name or alias {:?}",
                    key
                ));
            }
        }

        Ok(())
    }
}

impl Maintainer {
    /// Sanitize the entry and require a name.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.name = sanitize(&self.name);
        self.email = sanitize(&self.email);
        self.url = sanitize(&self.url);
        if self.name.is_empty() {
            return Err(ValidationError::new("each maintainer requires a name"));
        }
        Ok(())
    }
}

impl Dependency {
    /// The name the parent chart refers to this dependency by.
    pub fn effective_name(&self) -> &str {
        if self.alias.is_empty() {
            &self.name
        } else {
            &self.alias
        }
    }

    /// Sanitize the entry and check the alias charset.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.name = sanitize(&self.name);
        self.version = sanitize(&self.version);
        self.repository = sanitize(&self.repository);
        self.condition = sanitize(&self.condition);
        sanitize_all(&mut self.tags);

        let alias_ok = self
            .alias
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !alias_ok {
            return Err(validation_errorf!(
                "dependency {:?} has disallowed characters in the alias",
                self.name
            ));
        }
        Ok(())
    }
}

/// Whitespace becomes a plain space; other non-printable characters are
/// dropped.
fn sanitize(s: &str) -> String {
    s.chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some(' ')
            } else if is_printable(c) {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// False for control, format (Cf), surrogate, and private-use code points.
fn is_printable(c: char) -> bool {
    if c.is_control() {
        return false;
    }
    !matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{0890}'..='\u{0891}'
            | '\u{08E2}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{110BD}'
            | '\u{110CD}'
            | '\u{13430}'..='\u{1343F}'
            | '\u{1BCA0}'..='\u{1BCA3}'
            | '\u{1D173}'..='\u{1D17A}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
            | '\u{E000}'..='\u{F8FF}'
            | '\u{F0000}'..='\u{FFFFD}'
            | '\u{100000}'..='\u{10FFFD}'
    )
}

fn sanitize_all(values: &mut [String]) {
    for v in values.iter_mut() {
        *v = sanitize(v);
    }
}

/// Lenient SemVer check: optional `v`, one to three numeric components,
/// optional `-prerelease` and `+build` dot-separated identifiers.
fn is_valid_semver(version: &str) -> bool {
    let version = version.strip_prefix('v').unwrap_or(version);
    let (rest, build) = match version.split_once('+') {
        Some((rest, build)) => (rest, Some(build)),
        None => (version, None),
    };
    let (core, pre) = match rest.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (rest, None),
    };

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3 {
        return false;
    }
    if !parts
        .iter()
        .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
    {
        return false;
    }

    let idents_ok = |s: &str| {
        s.split('.').all(|ident| {
            !ident.is_empty() && ident.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
    };
    pre.map_or(true, idents_ok) && build.map_or(true, idents_ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Metadata {
        Metadata {
            api_version: "v3".to_string(),
            name: "mychart".to_string(),
            version: "1.0.0".to_string(),
            ..Default::default()
        }
    }

    fn message(md: &mut Metadata) -> String {
        md.validate().unwrap_err().to_string()
    }

    #[test]
    fn minimal_chart_validates() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn api_version_required() {
        let mut md = Metadata {
            api_version: String::new(),
            ..valid()
        };
        assert_eq!(
            message(&mut md),
            "validation: chart.metadata.apiVersion is required"
        );
    }

    #[test]
    fn name_required() {
        let mut md = Metadata {
            name: String::new(),
            ..valid()
        };
        assert_eq!(message(&mut md), "validation: chart.metadata.name is required");
    }

    #[test]
    fn name_must_be_base_name() {
        let mut md = Metadata {
            name: "../evil".to_string(),
            ..valid()
        };
        assert_eq!(
            message(&mut md),
            "validation: chart.metadata.name \"../evil\" is invalid"
        );
    }

    #[test]
    fn version_required_and_well_formed() {
        let mut md = Metadata {
            version: String::new(),
            ..valid()
        };
        assert_eq!(
            message(&mut md),
            "validation: chart.metadata.version is required"
        );

        let mut md = Metadata {
            version: "1.0.0.0".to_string(),
            ..valid()
        };
        assert_eq!(
            message(&mut md),
            "validation: chart.metadata.version \"1.0.0.0\" is invalid"
        );
    }

    #[test]
    fn semver_forms() {
        for ok in ["1", "1.2", "1.2.3", "v1.2.3", "1.2.3-rc.1", "1.2.3+build.7", "0.1.0-alpha-1+x"] {
            assert!(is_valid_semver(ok), "{ok} should be accepted");
        }
        for bad in ["", "x", "1..2", "1.2.3.4", "1.2.3-", "1.2.3+", "1.2.3-a..b", "1.a.3"] {
            assert!(!is_valid_semver(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn chart_type_rules() {
        assert_eq!(valid().chart_type().unwrap(), ChartType::Application);

        let md = Metadata {
            chart_type: "library".to_string(),
            ..valid()
        };
        assert_eq!(md.chart_type().unwrap(), ChartType::Library);

        let mut md = Metadata {
            chart_type: "plugin".to_string(),
            ..valid()
        };
        assert_eq!(
            message(&mut md),
            "validation: chart.metadata.type must be application or library"
        );
    }

    #[test]
    fn chart_type_display_round_trips() {
        for t in [ChartType::Application, ChartType::Library] {
            assert_eq!(t.to_string().parse::<ChartType>().unwrap(), t);
        }
    }

    #[test]
    fn null_maintainer_rejected() {
        let mut md = Metadata {
            maintainers: vec![None],
            ..valid()
        };
        assert_eq!(
            message(&mut md),
            "validation: chart.metadata.maintainers must not contain empty or null nodes"
        );
    }

    #[test]
    fn maintainer_needs_name() {
        let mut md = Metadata {
            maintainers: vec![Some(Maintainer {
                email: "ops@example.com".to_string(),
                ..Default::default()
            })],
            ..valid()
        };
        assert_eq!(message(&mut md), "validation: each maintainer requires a name");
    }

    #[test]
    fn null_dependency_rejected() {
        let mut md = Metadata {
            dependencies: vec![None],
            ..valid()
        };
        assert_eq!(
            message(&mut md),
            "validation: chart.metadata.dependencies must not contain empty or null nodes"
        );
    }

    #[test]
    fn alias_charset() {
        let mut md = Metadata {
            dependencies: vec![Some(Dependency {
                name: "redis".to_string(),
                alias: "cache store".to_string(),
                ..Default::default()
            })],
            ..valid()
        };
        assert_eq!(
            message(&mut md),
            "validation: dependency \"redis\" has disallowed characters in the alias"
        );
    }

    #[test]
    fn duplicate_dependency_by_alias() {
        let dep = |name: &str, alias: &str| {
            Some(Dependency {
                name: name.to_string(),
                alias: alias.to_string(),
                ..Default::default()
            })
        };
        let mut md = Metadata {
            dependencies: vec![dep("redis", ""), dep("memcached", "redis")],
            ..valid()
        };
        assert_eq!(
            message(&mut md),
            "validation: more than one dependency with name or alias \"redis\""
        );

        let mut md = Metadata {
            dependencies: vec![dep("redis", "cache-a"), dep("redis", "cache-b")],
            ..valid()
        };
        assert!(md.validate().is_ok());
    }

    #[test]
    fn sanitize_strips_control_characters() {
        let mut md = Metadata {
            description: "line one\nline\u{7}two".to_string(),
            keywords: vec!["a\tb".to_string()],
            ..valid()
        };
        md.validate().unwrap();
        assert_eq!(md.description, "line one linetwo");
        assert_eq!(md.keywords, vec!["a b".to_string()]);
    }

    #[test]
    fn zero_value_encodes_to_empty_mapping() {
        let yaml = serde_yaml::to_string(&Metadata::default()).unwrap();
        assert_eq!(yaml.trim(), "{}");
    }

    #[test]
    fn wire_names_are_camel_case() {
        let md = Metadata {
            api_version: "v3".to_string(),
            app_version: "2.1".to_string(),
            kube_version: ">=1.25".to_string(),
            chart_type: "library".to_string(),
            deprecated: true,
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&md).unwrap();
        assert!(yaml.contains("apiVersion: v3"));
        assert!(yaml.contains("appVersion:"));
        assert!(yaml.contains("kubeVersion:"));
        assert!(!yaml.contains("app_version"));
        assert!(yaml.contains("type: library"));
        assert!(yaml.contains("deprecated: true"));
    }

    #[test]
    fn import_values_both_forms() {
        let dep: Dependency = serde_yaml::from_str(
            "name: sub\nimportValues:\n  - data\n  - child: a.b\n    parent: c\n",
        )
        .unwrap();
        assert_eq!(
            dep.import_values,
            vec![
                ImportValue::Path("data".to_string()),
                ImportValue::Mapping {
                    child: "a.b".to_string(),
                    parent: "c".to_string(),
                },
            ]
        );
    }

    #[test]
    fn sanitize_strips_format_characters() {
        let mut md = Metadata {
            name: "my\u{200B}chart".to_string(),
            home: "https://example.com/\u{FEFF}x\u{E000}".to_string(),
            ..valid()
        };
        md.validate().unwrap();
        assert_eq!(md.name, "mychart");
        assert_eq!(md.home, "https://example.com/x");
        assert_eq!(sanitize("caf\u{E9} \u{1F600}"), "caf\u{E9} \u{1F600}");
    }

    #[test]
    fn yaml_null_fields_read_as_zero_values() {
        let md: Metadata = serde_yaml::from_str(
            "name: ~\nversion: null\nhome:\nkeywords: ~\ndeprecated: null\ntype: Null\n",
        )
        .unwrap();
        assert_eq!(md, Metadata::default());
    }

    #[test]
    fn yaml_null_in_nested_records() {
        let md: Metadata = serde_yaml::from_str(
            "maintainers:\n  - name: ops\n    email: ~\ndependencies:\n  - name: sub\n    enabled: null\n    alias: ~\n",
        )
        .unwrap();
        let maintainer = md.maintainers[0].as_ref().unwrap();
        assert_eq!(maintainer.email, "");
        let dep = md.dependencies[0].as_ref().unwrap();
        assert!(!dep.enabled);
        assert_eq!(dep.alias, "");
    }

    #[test]
    fn import_values_accept_any_node() {
        let dep: Dependency =
            serde_yaml::from_str("name: sub\nimportValues:\n  - child: data\n  - 42\n").unwrap();
        assert_eq!(dep.import_values.len(), 2);
        assert!(matches!(dep.import_values[0], ImportValue::Other(_)));
        assert_eq!(
            dep.import_values[1],
            ImportValue::Other(serde_yaml::Value::Number(42u64.into()))
        );
    }
}
