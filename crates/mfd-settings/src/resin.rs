//! Resin formulation and its print-program naming convention.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing a [`ResinType`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResinError {
    /// A percentage fell outside `0..=100`, components didn't sum as the
    /// naming convention requires, or trace components summed over 100%.
    #[error("{0}")]
    Invalid(String),
}

/// A resin formulation: percentages of monomer, UV absorber, photoinitiator,
/// and optional additive components.
///
/// `Display` renders the naming convention
/// `Mo-XX_Mo-XX__Ab-XX__PI-XX[__Ad-XX_…]`: three-letter abbreviations,
/// `-` before the percentage, `_` between entries of one category, `__`
/// between categories, additives omitted entirely when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResinType {
    /// Monomer/oligomer components, percentages of total monomer mass.
    pub monomer: Vec<(String, f64)>,
    /// UV absorber components, w/w fraction of total resin mass.
    pub uv_absorbers: Vec<(String, f64)>,
    /// Photoinitiator components, w/w fraction of total resin mass.
    pub initiators: Vec<(String, f64)>,
    /// Additive components, w/w fraction of total resin mass.
    pub additives: Vec<(String, f64)>,
}

impl Default for ResinType {
    fn default() -> Self {
        Self {
            monomer: vec![("PEG".to_string(), 100.0)],
            uv_absorbers: vec![("NPS".to_string(), 2.0)],
            initiators: vec![("IRG".to_string(), 1.0)],
            additives: Vec::new(),
        }
    }
}

impl ResinType {
    /// Construct a resin formulation, validating percentage bounds and the
    /// monomer/oligomer closure requirement.
    pub fn new(
        monomer: Vec<(String, f64)>,
        uv_absorbers: Vec<(String, f64)>,
        initiators: Vec<(String, f64)>,
        additives: Vec<(String, f64)>,
    ) -> Result<Self, ResinError> {
        let all = monomer.iter().chain(&uv_absorbers).chain(&initiators).chain(&additives);
        if all.clone().any(|(_, pct)| !(0.0..=100.0).contains(pct)) {
            return Err(ResinError::Invalid("all percentages must be between 0 and 100".into()));
        }
        let monomer_total: f64 = monomer.iter().map(|(_, pct)| pct).sum();
        if (monomer_total - 100.0).abs() > 1e-9 {
            return Err(ResinError::Invalid("monomer percentages must add up to 100%".into()));
        }
        let trace_total: f64 = uv_absorbers.iter().chain(&initiators).chain(&additives).map(|(_, pct)| pct).sum();
        if trace_total > 100.0 {
            return Err(ResinError::Invalid(
                "UV absorber, initiator, and additive percentages must not exceed 100%".into(),
            ));
        }
        Ok(Self { monomer, uv_absorbers, initiators, additives })
    }
}

fn category_str(entries: &[(String, f64)]) -> String {
    entries.iter().map(|(name, pct)| format!("{name}-{pct:.2}")).collect::<Vec<_>>().join("_")
}

impl std::fmt::Display for ResinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}__{}__{}", category_str(&self.monomer), category_str(&self.uv_absorbers), category_str(&self.initiators))?;
        if !self.additives.is_empty() {
            write!(f, "__{}", category_str(&self.additives))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_resin_renders_the_documented_schema() {
        assert_eq!(ResinType::default().to_string(), "PEG-100.00__NPS-2.00__IRG-1.00");
    }

    #[test]
    fn additives_are_appended_as_a_fourth_category() {
        let resin = ResinType::new(
            vec![("PEG".to_string(), 100.0)],
            vec![("NPS".to_string(), 2.0)],
            vec![("IRG".to_string(), 1.0)],
            vec![("TIN".to_string(), 0.5)],
        )
        .unwrap();
        assert_eq!(resin.to_string(), "PEG-100.00__NPS-2.00__IRG-1.00__TIN-0.50");
    }

    #[test]
    fn monomer_percentages_must_sum_to_one_hundred() {
        let err = ResinType::new(vec![("PEG".to_string(), 90.0)], vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, ResinError::Invalid(_)));
    }
}
