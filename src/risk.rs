//! Completeness verdict over extracted facts.
//!
//! The color is driven by the three core fields only: a deed without both
//! parties, a date, or a consideration amount is materially incomplete.
//! Missing land identifiers (survey/patta) are reported for display but do
//! not raise the color on their own.

use crate::models::{Facts, Risk, RiskColor};

/// Core fields that drive the color.
const CORE_FIELDS: &[&str] = &["parties", "dates", "amounts"];

/// Pure, total mapping from facts to a risk verdict.
///
/// `Green` iff no core field is missing, `Orange` iff exactly one,
/// `Red` otherwise. Parties count as missing when fewer than two names
/// survived extraction.
pub fn compute_risk(facts: &Facts) -> Risk {
    let mut missing = Vec::new();

    if facts.parties.len() < 2 {
        missing.push("parties".to_string());
    }
    if facts.dates.is_empty() {
        missing.push("dates".to_string());
    }
    if facts.amounts.is_empty() {
        missing.push("amounts".to_string());
    }

    // Informative only; never raises the color.
    if facts.property.survey_no.is_none() {
        missing.push("survey_no".to_string());
    }
    if facts.property.patta_no.is_none() {
        missing.push("patta_no".to_string());
    }

    let core_missing = missing
        .iter()
        .filter(|m| CORE_FIELDS.contains(&m.as_str()))
        .count();

    let color = match core_missing {
        0 => RiskColor::Green,
        1 => RiskColor::Orange,
        _ => RiskColor::Red,
    };

    Risk {
        color,
        missing_fields: missing,
    }
}

/// Restrict a missing-field list to the core fields, preserving order.
pub fn core_missing(missing_fields: &[String]) -> Vec<String> {
    missing_fields
        .iter()
        .filter(|m| CORE_FIELDS.contains(&m.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyDetails;

    fn complete_facts() -> Facts {
        Facts {
            parties: vec!["Kumar Raj".to_string(), "Anita Devi".to_string()],
            dates: vec!["15-03-2024".to_string()],
            amounts: vec!["Rs. 25,00,000/-".to_string()],
            property: PropertyDetails {
                survey_no: Some("142/3B".to_string()),
                patta_no: Some("8871".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_green_when_all_core_present() {
        let risk = compute_risk(&complete_facts());
        assert_eq!(risk.color, RiskColor::Green);
        assert!(risk.missing_fields.is_empty());
    }

    #[test]
    fn test_orange_when_one_core_missing() {
        let mut facts = complete_facts();
        facts.amounts.clear();
        let risk = compute_risk(&facts);
        assert_eq!(risk.color, RiskColor::Orange);
        assert_eq!(risk.missing_fields, vec!["amounts"]);
    }

    #[test]
    fn test_red_when_two_core_missing() {
        let mut facts = complete_facts();
        facts.dates.clear();
        facts.amounts.clear();
        assert_eq!(compute_risk(&facts).color, RiskColor::Red);
    }

    #[test]
    fn test_red_when_all_core_missing() {
        let risk = compute_risk(&Facts::default());
        assert_eq!(risk.color, RiskColor::Red);
        assert!(risk.missing_fields.contains(&"parties".to_string()));
        assert!(risk.missing_fields.contains(&"survey_no".to_string()));
        assert!(risk.missing_fields.contains(&"patta_no".to_string()));
    }

    #[test]
    fn test_single_party_counts_as_missing() {
        let mut facts = complete_facts();
        facts.parties.truncate(1);
        let risk = compute_risk(&facts);
        assert_eq!(risk.color, RiskColor::Orange);
        assert!(risk.missing_fields.contains(&"parties".to_string()));
    }

    #[test]
    fn test_survey_patta_reported_but_never_raise_color() {
        let mut facts = complete_facts();
        facts.property.survey_no = None;
        facts.property.patta_no = None;
        let risk = compute_risk(&facts);
        assert_eq!(risk.color, RiskColor::Green);
        assert_eq!(risk.missing_fields, vec!["survey_no", "patta_no"]);
    }

    #[test]
    fn test_core_missing_filters_display_fields() {
        let missing = vec![
            "dates".to_string(),
            "survey_no".to_string(),
            "patta_no".to_string(),
        ];
        assert_eq!(core_missing(&missing), vec!["dates"]);
    }
}
