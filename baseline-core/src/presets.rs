//! The preset matrix: the curated set of configurations that make up the
//! full baseline.
//!
//! Order is build order. Every entry is a distinct identity.

use crate::types::{
    Configuration, Degree, DocumentKind, GradLevel, Language, Period, SubjectArea,
};

/// Subject areas whose thesis is built for both review periods.
pub const MAIN_SUBJECT_AREAS: &[SubjectArea] =
    &[SubjectArea::General, SubjectArea::Cs, SubjectArea::Isee];

/// Subject areas kept as samples: final-period thesis only.
pub const SAMPLE_SUBJECT_AREAS: &[SubjectArea] =
    &[SubjectArea::Math, SubjectArea::Physics, SubjectArea::Se];

/// Subject areas that offer the design track.
pub const DESIGN_SUBJECT_AREAS: &[SubjectArea] = &[SubjectArea::Cs];

const PERIODS: &[Period] = &[Period::Proposal, Period::Final];

/// `(grad_level, language)` pairs of the graduate general thesis.
const GRADUATE_VARIANTS: &[(GradLevel, Language)] = &[
    (GradLevel::Master, Language::Chinese),
    (GradLevel::Doctor, Language::Chinese),
    (GradLevel::Doctor, Language::English),
];

fn undergraduate(subject_area: SubjectArea, document_kind: DocumentKind, period: Period) -> Configuration {
    Configuration {
        degree: Degree::Undergraduate,
        subject_area,
        document_kind,
        period,
        blind: false,
        grad_level: GradLevel::Master,
        language: Language::Chinese,
    }
}

/// Expand the preset matrix into an ordered list of configurations.
pub fn expand_presets() -> Vec<Configuration> {
    let mut configs = Vec::new();

    // Blind-review variant of the default undergraduate thesis.
    configs.push(Configuration {
        blind: true,
        ..undergraduate(SubjectArea::General, DocumentKind::Thesis, Period::Final)
    });

    for &area in MAIN_SUBJECT_AREAS {
        for &period in PERIODS {
            configs.push(undergraduate(area, DocumentKind::Thesis, period));
        }
    }

    for &area in DESIGN_SUBJECT_AREAS {
        for &period in PERIODS {
            configs.push(undergraduate(area, DocumentKind::Design, period));
        }
    }

    for &area in SAMPLE_SUBJECT_AREAS {
        configs.push(undergraduate(area, DocumentKind::Thesis, Period::Final));
    }

    for &(grad_level, language) in GRADUATE_VARIANTS {
        configs.push(Configuration {
            degree: Degree::Graduate,
            subject_area: SubjectArea::General,
            document_kind: DocumentKind::Thesis,
            period: Period::Final,
            blind: false,
            grad_level,
            language,
        });
    }

    configs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArtifactIdentity;

    #[test]
    fn matrix_has_fifteen_entries() {
        assert_eq!(expand_presets().len(), 15);
    }

    #[test]
    fn first_entry_is_blind_general_thesis() {
        let first = ArtifactIdentity::of(&expand_presets()[0]);
        assert_eq!(first.0, "zjuthesis-undergraduate-general-thesis-final-blind");
    }

    #[test]
    fn last_entries_are_graduate() {
        let ids: Vec<String> = expand_presets()
            .iter()
            .rev()
            .take(3)
            .map(|c| ArtifactIdentity::of(c).0)
            .collect();
        assert_eq!(
            ids,
            [
                "zjuthesis-graduate-doctor-general-thesis-final-english",
                "zjuthesis-graduate-doctor-general-thesis-final",
                "zjuthesis-graduate-master-general-thesis-final",
            ]
        );
    }

    #[test]
    fn every_preset_is_already_valid() {
        for config in expand_presets() {
            assert_eq!(config.validated().expect("preset must validate"), config);
        }
    }
}
