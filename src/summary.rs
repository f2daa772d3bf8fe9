//! Deterministic English and Tamil narrative summaries.
//!
//! Both renderers are pure template fills over `(text, facts, risk)`.
//! Missing fields substitute a neutral placeholder phrase rather than leaving
//! a blank, and the closing risk sentence is keyed on the verdict color. The
//! Tamil variant lists only core missing fields.

use crate::models::{Facts, Risk, RiskColor};
use crate::risk::core_missing;

/// Decide the document-type label from the raw text.
fn is_sale_deed(text: &str) -> bool {
    text.to_uppercase().contains("SALE DEED")
}

/// One-paragraph English summary.
pub fn english_summary(text: &str, facts: &Facts, risk: &Risk) -> String {
    let doc_type = if is_sale_deed(text) {
        "Sale Deed"
    } else {
        "Legal Document"
    };

    let who_line = match (&facts.role_parties.vendor, &facts.role_parties.purchaser) {
        (Some(v), Some(p)) => format!("{} (seller) → {} (buyer)", v, p),
        _ if facts.parties.len() >= 2 => facts.parties[..2].join(", "),
        _ => "the parties involved".to_string(),
    };

    let date = facts
        .dates
        .first()
        .map(String::as_str)
        .unwrap_or("the specified date");
    let amount = facts
        .amounts
        .first()
        .map(String::as_str)
        .unwrap_or("the agreed consideration");

    let mut prop_parts = Vec::new();
    if let Some(ref s) = facts.property.survey_no {
        prop_parts.push(format!("Survey No: {}", s));
    }
    if let Some(ref p) = facts.property.patta_no {
        prop_parts.push(format!("Patta No: {}", p));
    }
    let prop_text = if prop_parts.is_empty() {
        "Property identifiers not clearly detected.".to_string()
    } else {
        prop_parts.join(" | ")
    };

    let risk_text = match risk.color {
        RiskColor::Green => {
            "No major missing fields detected. Proceed only after a standard legal review."
                .to_string()
        }
        RiskColor::Orange => format!(
            "Some key fields may be missing ({}). Review before proceeding.",
            risk.missing_fields.join(", ")
        ),
        RiskColor::Red => format!(
            "Important fields missing ({}). Not safe to proceed without verification.",
            risk.missing_fields.join(", ")
        ),
    };

    format!(
        "{}: {}. Date reference: {}. Consideration/amount: {}. {}. Risk check: {}",
        doc_type, who_line, date, amount, prop_text, risk_text
    )
}

/// One-paragraph Tamil summary.
pub fn tamil_summary(text: &str, facts: &Facts, risk: &Risk) -> String {
    let doc_type = if is_sale_deed(text) || text.contains("விற்பனை") {
        "விற்பனை ஒப்பந்தம்"
    } else {
        "சட்ட ஆவணம்"
    };

    let who_line = match (&facts.role_parties.vendor, &facts.role_parties.purchaser) {
        (Some(v), Some(p)) => format!(
            "இந்த ஆவணத்தில் {} அவர்கள் விற்பனையாளராகவும், {} அவர்கள் வாங்குபவராகவும் உள்ளனர்.",
            v, p
        ),
        _ if facts.parties.len() >= 2 => format!(
            "இந்த ஆவணம் {} மற்றும் {} ஆகியோருக்கிடையிலான ஒப்பந்தம் போல தெரிகிறது.",
            facts.parties[0], facts.parties[1]
        ),
        _ => "இந்த ஆவணத்தில் உள்ள தரப்பினர்கள் தெளிவாக கண்டறியப்படவில்லை.".to_string(),
    };

    let date = facts
        .dates
        .first()
        .map(String::as_str)
        .unwrap_or("குறிப்பிட்ட தேதி");
    let amount = facts
        .amounts
        .first()
        .map(String::as_str)
        .unwrap_or("ஒப்பந்தத் தொகை");

    let mut prop_parts = Vec::new();
    if let Some(ref s) = facts.property.survey_no {
        prop_parts.push(format!("சர்வே எண்: {}", s));
    }
    if let Some(ref p) = facts.property.patta_no {
        prop_parts.push(format!("பட்டா எண்: {}", p));
    }
    if let Some(ref v) = facts.property.village {
        prop_parts.push(format!("கிராமம்: {}", v));
    }
    if let Some(ref t) = facts.property.taluk {
        prop_parts.push(format!("தாலூக்கம்: {}", t));
    }
    if let Some(ref d) = facts.property.district {
        prop_parts.push(format!("மாவட்டம்: {}", d));
    }
    let prop_text = if prop_parts.is_empty() {
        "சொத்து அடையாள விவரங்கள் (சர்வே/பட்டா) தெளிவாக கிடைக்கவில்லை.".to_string()
    } else {
        prop_parts.join(" | ")
    };

    // Only core fields in the Tamil missing-field listing.
    let core = core_missing(&risk.missing_fields);
    let risk_msg = match risk.color {
        RiskColor::Green => {
            "முக்கிய தகவல்கள் கிடைத்துள்ளன. வழக்கமான சட்ட சரிபார்ப்பிற்குப் பிறகு மட்டுமே செயல்படவும்."
                .to_string()
        }
        RiskColor::Orange => format!(
            "சில முக்கிய தகவல்கள் குறைவாக இருக்கலாம் ({}). செயல்படுவதற்கு முன் சரிபார்க்கவும்.",
            core.join(", ")
        ),
        RiskColor::Red => format!(
            "முக்கிய தகவல்கள் குறைவாக உள்ளன ({}). முழுமையாக சரிபார்க்காமல் தொடர வேண்டாம்.",
            core.join(", ")
        ),
    };

    format!(
        "{}. {} தேதி: {}. முக்கிய தொகை: {}. {}. அபாய மதிப்பீடு: {}",
        doc_type, who_line, date, amount, prop_text, risk_msg
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PropertyDetails, RoleParties};
    use crate::risk::compute_risk;

    fn facts_with_roles() -> Facts {
        Facts {
            parties: vec!["Kumar Raj".to_string(), "Anita Devi".to_string()],
            role_parties: RoleParties {
                vendor: Some("Kumar Raj".to_string()),
                purchaser: Some("Anita Devi".to_string()),
            },
            dates: vec!["15-03-2024".to_string()],
            amounts: vec!["Rs. 25,00,000/-".to_string()],
            property: PropertyDetails {
                survey_no: Some("142/3B".to_string()),
                patta_no: Some("8871".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_english_summary_complete_document() {
        let facts = facts_with_roles();
        let risk = compute_risk(&facts);
        let summary = english_summary("REGISTERED SALE DEED", &facts, &risk);
        assert!(summary.starts_with("Sale Deed:"));
        assert!(summary.contains("Kumar Raj (seller) → Anita Devi (buyer)"));
        assert!(summary.contains("15-03-2024"));
        assert!(summary.contains("Rs. 25,00,000/-"));
        assert!(summary.contains("Survey No: 142/3B"));
        assert!(summary.contains("No major missing fields"));
    }

    #[test]
    fn test_english_summary_placeholders() {
        let risk = compute_risk(&Facts::default());
        let summary = english_summary("some letter", &Facts::default(), &risk);
        assert!(summary.starts_with("Legal Document:"));
        assert!(summary.contains("the parties involved"));
        assert!(summary.contains("the specified date"));
        assert!(summary.contains("the agreed consideration"));
        assert!(summary.contains("Property identifiers not clearly detected."));
        assert!(summary.contains("Not safe to proceed"));
    }

    #[test]
    fn test_english_summary_orange_lists_missing() {
        let mut facts = facts_with_roles();
        facts.dates.clear();
        let risk = compute_risk(&facts);
        let summary = english_summary("SALE DEED", &facts, &risk);
        assert!(summary.contains("Some key fields may be missing (dates)"));
    }

    #[test]
    fn test_tamil_summary_uses_core_fields_only() {
        let mut facts = facts_with_roles();
        facts.dates.clear();
        facts.property.survey_no = None;
        let risk = compute_risk(&facts);
        let summary = tamil_summary("SALE DEED", &facts, &risk);
        // Orange message names the missing core field only, not survey_no.
        assert!(summary.contains("(dates)"));
        assert!(!summary.contains("survey_no"));
    }

    #[test]
    fn test_tamil_doc_type_detection() {
        let facts = Facts::default();
        let risk = compute_risk(&facts);
        assert!(tamil_summary("SALE DEED", &facts, &risk).starts_with("விற்பனை ஒப்பந்தம்"));
        assert!(tamil_summary("விற்பனை ஆவணம்", &facts, &risk).starts_with("விற்பனை ஒப்பந்தம்"));
        assert!(tamil_summary("rental agreement", &facts, &risk).starts_with("சட்ட ஆவணம்"));
    }

    #[test]
    fn test_summaries_deterministic() {
        let facts = facts_with_roles();
        let risk = compute_risk(&facts);
        assert_eq!(
            english_summary("SALE DEED", &facts, &risk),
            english_summary("SALE DEED", &facts, &risk)
        );
        assert_eq!(
            tamil_summary("SALE DEED", &facts, &risk),
            tamil_summary("SALE DEED", &facts, &risk)
        );
    }

    #[test]
    fn test_fallback_to_generic_parties() {
        let mut facts = facts_with_roles();
        facts.role_parties = RoleParties::default();
        let risk = compute_risk(&facts);
        let summary = english_summary("SALE DEED", &facts, &risk);
        assert!(summary.contains("Kumar Raj, Anita Devi"));
    }
}
