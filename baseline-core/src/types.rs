//! Domain types for baseline regeneration.
//!
//! Every configuration field is a closed enum; the only way to get one from
//! operator input is [`FromStr`], which reports the field name on failure.
//! All types are serializable via serde + serde_json.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Enumerated domains
// ---------------------------------------------------------------------------

macro_rules! domain_enum {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every member of the domain, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Configuration field name used in validation errors.
            pub const FIELD: &'static str = $field;

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| ValidationError::UnknownValue {
                        field: $field,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

domain_enum! {
    /// Academic degree the document is written for.
    Degree, field = "degree" {
        Undergraduate => "undergraduate",
        Graduate => "graduate",
    }
}

domain_enum! {
    /// Subject area template variant.
    SubjectArea, field = "subject_area" {
        General => "general",
        Cs => "cs",
        Isee => "isee",
        Math => "math",
        Physics => "physics",
        Se => "se",
    }
}

domain_enum! {
    /// Thesis, or the undergraduate design-track report.
    DocumentKind, field = "document_kind" {
        Thesis => "thesis",
        Design => "design",
    }
}

domain_enum! {
    /// Review period the document is submitted for.
    Period, field = "period" {
        Proposal => "proposal",
        Final => "final",
    }
}

domain_enum! {
    /// Graduate level. Only meaningful when the degree is graduate.
    #[derive(Default)]
    GradLevel, field = "grad_level" {
        #[default]
        Master => "master",
        Doctor => "doctor",
    }
}

domain_enum! {
    /// Document language.
    #[derive(Default)]
    Language, field = "language" {
        #[default]
        Chinese => "chinese",
        English => "english",
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// A fully typed document configuration.
///
/// Values produced by [`crate::identity::resolve`] or
/// [`Configuration::validated`] are normalized: an undergraduate
/// configuration always carries the default grad level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Configuration {
    pub degree: Degree,
    pub subject_area: SubjectArea,
    pub document_kind: DocumentKind,
    pub period: Period,
    pub blind: bool,
    pub grad_level: GradLevel,
    pub language: Language,
}

impl Configuration {
    /// Check combination rules and normalize fields that carry no meaning.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        if self.document_kind == DocumentKind::Design && self.degree != Degree::Undergraduate {
            return Err(ValidationError::Combination {
                field: DocumentKind::FIELD,
                reason: format!(
                    "'{}' is only offered for {} degrees",
                    DocumentKind::Design,
                    Degree::Undergraduate
                ),
            });
        }
        if self.degree == Degree::Undergraduate {
            self.grad_level = GradLevel::default();
        }
        Ok(self)
    }

    /// Positional parameters for the compilation toolchain, in the order
    /// `degree, subject_area, document_kind, period, blind, grad_level, language`.
    pub fn build_parameters(&self) -> Vec<String> {
        vec![
            self.degree.to_string(),
            self.subject_area.to_string(),
            self.document_kind.to_string(),
            self.period.to_string(),
            self.blind.to_string(),
            self.grad_level.to_string(),
            self.language.to_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Artifact identity
// ---------------------------------------------------------------------------

/// Leading token of every artifact identity.
pub const IDENTITY_PREFIX: &str = "zjuthesis";

/// Canonical name of one baseline artifact: output filename stem and state key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactIdentity(pub String);

impl ArtifactIdentity {
    /// Derive the identity of a validated configuration.
    ///
    /// `chinese` is the implicit language and is never spelled out, which
    /// keeps keys recorded before the language field existed valid.
    pub fn of(config: &Configuration) -> Self {
        let mut name = format!("{IDENTITY_PREFIX}-{}", config.degree);
        if config.degree == Degree::Graduate {
            name.push_str(&format!("-{}", config.grad_level));
        }
        name.push_str(&format!(
            "-{}-{}-{}",
            config.subject_area, config.document_kind, config.period
        ));
        if config.blind {
            name.push_str("-blind");
        }
        if config.language != Language::Chinese {
            name.push_str(&format!("-{}", config.language));
        }
        Self(name)
    }

    /// Output file name, `<identity>.pdf`.
    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.0)
    }
}

impl fmt::Display for ArtifactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ArtifactIdentity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ArtifactIdentity {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Build records
// ---------------------------------------------------------------------------

/// Identity of the external compiler environment, informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainDescriptor {
    /// Type tag, e.g. `docker`.
    pub kind: String,
    /// Container image reference the toolchain ran from.
    pub image: String,
    /// Sub-tool name → version line, captured verbatim.
    #[serde(default)]
    pub versions: BTreeMap<String, String>,
}

/// Metadata of the last successful build of one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub toolchain: ToolchainDescriptor,
    /// Build start time.
    pub timestamp: DateTime<Utc>,
    /// Short revision id of the upstream template the artifact was built from.
    pub template_revision: String,
    pub config: Configuration,
}

/// Full state store contents. Ordered so equal state serializes identically.
pub type BuildState = BTreeMap<ArtifactIdentity, BuildRecord>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn undergrad_cs_final() -> Configuration {
        Configuration {
            degree: Degree::Undergraduate,
            subject_area: SubjectArea::Cs,
            document_kind: DocumentKind::Thesis,
            period: Period::Final,
            blind: false,
            grad_level: GradLevel::Master,
            language: Language::Chinese,
        }
    }

    #[test]
    fn enum_display_matches_serde_name() {
        for area in SubjectArea::ALL {
            let json = serde_json::to_string(area).expect("serialize");
            assert_eq!(json, format!("\"{area}\""));
        }
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("Graduate".parse::<Degree>().unwrap(), Degree::Graduate);
        assert_eq!(" ISEE ".parse::<SubjectArea>().unwrap(), SubjectArea::Isee);
    }

    #[test]
    fn from_str_reports_field_and_accepted_values() {
        let err = "phd".parse::<Degree>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("degree"), "got: {msg}");
        assert!(msg.contains("'phd'"), "got: {msg}");
        assert!(msg.contains("undergraduate, graduate"), "got: {msg}");
    }

    #[test]
    fn defaults_are_master_and_chinese() {
        assert_eq!(GradLevel::default(), GradLevel::Master);
        assert_eq!(Language::default(), Language::Chinese);
    }

    #[test]
    fn build_parameters_are_positional() {
        assert_eq!(
            undergrad_cs_final().build_parameters(),
            ["undergraduate", "cs", "thesis", "final", "false", "master", "chinese"]
        );
    }

    #[test]
    fn validated_rejects_graduate_design() {
        let config = Configuration {
            degree: Degree::Graduate,
            document_kind: DocumentKind::Design,
            ..undergrad_cs_final()
        };
        let err = config.validated().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Combination {
                field: "document_kind",
                ..
            }
        ));
    }

    #[test]
    fn validated_normalizes_undergraduate_grad_level() {
        let config = Configuration {
            grad_level: GradLevel::Doctor,
            ..undergrad_cs_final()
        };
        assert_eq!(config.validated().unwrap().grad_level, GradLevel::Master);
    }

    #[test]
    fn identity_file_name() {
        let id = ArtifactIdentity::of(&undergrad_cs_final());
        assert_eq!(id.file_name(), "zjuthesis-undergraduate-cs-thesis-final.pdf");
    }
}
