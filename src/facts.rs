//! Entity extraction over sale deed text.
//!
//! Deed boilerplate is template-driven but inconsistently formatted, so each
//! field is resolved by an ordered chain of strategies: structural heading
//! patterns first, then looser recital patterns, then tagger output as a
//! supplement, with a denylist discarding place names and document-structure
//! words that masquerade as party names. Whatever survives is deduplicated in
//! insertion order and capped.
//!
//! [`extract_facts`] is total: a pattern that fails to match leaves its field
//! empty, never errors.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Facts, PropertyDetails, RoleParties};
use crate::ner::{EntityLabel, TaggedEntity};

/// Maximum entries kept per fact list.
const MAX_ENTRIES: usize = 4;

/// Amounts below this (after stripping non-digits) are incidental numbers,
/// not consideration money.
const MIN_AMOUNT: u128 = 1000;

/// Substrings (case-insensitive) that disqualify a candidate party name.
const PARTY_NOISE: &[&str] = &[
    "Tamil Nadu",
    "Anna Nagar",
    "Gandhi Street",
    "Coimbatore",
    "Challan",
    "Peelamedu",
    "Perur",
    "District",
    "Taluk",
    "Village",
];

static VENDOR_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(VENDOR|SELLER)[^\n]*\n\s*(Mr\.|Ms\.|Mrs\.)?\s*([A-Za-z .]+)").unwrap()
});
static PURCHASER_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(PURCHASER|BUYER)[^\n]*\n\s*(Mr\.|Ms\.|Mrs\.)?\s*([A-Za-z .]+)").unwrap()
});
static BETWEEN_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)BETWEEN\s+.*?\n\s*(Mr\.|Ms\.|Mrs\.)?\s*([A-Za-z .]+),").unwrap()
});
static AND_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\bAND\b\s+.*?\n\s*(Mr\.|Ms\.|Mrs\.)?\s*([A-Za-z .]+),").unwrap()
});

static NAME_JUNK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z.\s]").unwrap());

static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\b").unwrap());
static REGISTER_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\s*/\s*\d+$").unwrap());
static PURE_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4,}$").unwrap());

static AMOUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)Rs\.?\s*[\d,]+(?:\.\d+)?\s*/?-?", // Rs. 25,00,000/-
        r"(?i)₹\s*[\d,]+(?:\.\d+)?",            // ₹25,00,000
        r"(?i)Rupees\s+[A-Za-z\s]+Only",        // Rupees Twenty Five Lakhs Only
        r"(?i)[\d,]+\s*Lakhs",                  // 25 Lakhs
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static PROPERTY_VALUE_TRAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(Taluk|District|BOUNDARIES)\b.*$").unwrap());
static DISTRICT_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([A-Za-z\s]+)\s+District,\s*Tamil Nadu").unwrap());

/// Extract structured facts from deed text, fusing regex rules with
/// tagger-detected entity spans.
pub fn extract_facts(text: &str, tagged: &[TaggedEntity]) -> Facts {
    let role_parties = extract_role_parties(text);
    let parties = collect_parties(&role_parties, tagged);
    let dates = collect_dates(text, tagged);
    let amounts = collect_amounts(text, tagged);
    let property = extract_property(text);

    Facts {
        parties,
        role_parties,
        dates,
        amounts,
        property,
    }
}

// ============ Role parties ============

type NameStrategy = fn(&str) -> Option<String>;

/// Strategies tried in order; the first non-empty result wins.
const VENDOR_STRATEGIES: &[NameStrategy] = &[vendor_from_heading, vendor_from_between];
const PURCHASER_STRATEGIES: &[NameStrategy] = &[purchaser_from_heading, purchaser_from_and];

fn vendor_from_heading(text: &str) -> Option<String> {
    VENDOR_HEADING
        .captures(text)
        .and_then(|c| c.get(3))
        .and_then(|m| non_empty(clean_name(m.as_str())))
}

fn purchaser_from_heading(text: &str) -> Option<String> {
    PURCHASER_HEADING
        .captures(text)
        .and_then(|c| c.get(3))
        .and_then(|m| non_empty(clean_name(m.as_str())))
}

fn vendor_from_between(text: &str) -> Option<String> {
    BETWEEN_BLOCK
        .captures(text)
        .and_then(|c| c.get(2))
        .and_then(|m| non_empty(clean_name(m.as_str())))
}

fn purchaser_from_and(text: &str) -> Option<String> {
    AND_BLOCK
        .captures(text)
        .and_then(|c| c.get(2))
        .and_then(|m| non_empty(clean_name(m.as_str())))
}

fn first_match(strategies: &[NameStrategy], text: &str) -> Option<String> {
    strategies.iter().find_map(|s| s(text))
}

/// Resolve vendor and purchaser via the ordered strategy chains.
pub fn extract_role_parties(text: &str) -> RoleParties {
    RoleParties {
        vendor: first_match(VENDOR_STRATEGIES, text),
        purchaser: first_match(PURCHASER_STRATEGIES, text),
    }
}

/// Strip anything outside letters/periods/whitespace and collapse runs.
fn clean_name(name: &str) -> String {
    let stripped = NAME_JUNK.replace_all(name, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

// ============ Generic parties ============

fn collect_parties(role_parties: &RoleParties, tagged: &[TaggedEntity]) -> Vec<String> {
    let mut parties: Vec<String> = Vec::new();
    if let Some(ref v) = role_parties.vendor {
        parties.push(v.clone());
    }
    if let Some(ref p) = role_parties.purchaser {
        parties.push(p.clone());
    }
    for entity in tagged {
        if entity.label == EntityLabel::Person {
            parties.push(entity.text.clone());
        }
    }

    let parties = parties
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty() && !is_party_noise(p));

    dedup_capped(parties, MAX_ENTRIES)
}

fn is_party_noise(name: &str) -> bool {
    let lower = name.to_lowercase();
    PARTY_NOISE.iter().any(|w| lower.contains(&w.to_lowercase()))
}

// ============ Dates ============

fn collect_dates(text: &str, tagged: &[TaggedEntity]) -> Vec<String> {
    // Numeric dd-mm-yyyy / dd/mm/yyyy shapes first, tagger spans as supplement.
    let mut dates: Vec<String> = NUMERIC_DATE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    for entity in tagged {
        if entity.label == EntityLabel::Date {
            dates.push(entity.text.clone());
        }
    }

    let deduped = dedup_capped(dates.into_iter(), usize::MAX);
    deduped
        .into_iter()
        .filter(|d| is_plausible_date(d))
        .take(MAX_ENTRIES)
        .collect()
}

/// Reject age expressions, recital boilerplate, register numbers, and postal
/// codes that leak through the date patterns.
fn is_plausible_date(date: &str) -> bool {
    let trimmed = date.trim();
    let lower = trimmed.to_lowercase();
    if lower.contains("years") {
        return false;
    }
    if lower.contains("the day, month") {
        return false;
    }
    if REGISTER_NUMBER.is_match(trimmed) {
        return false;
    }
    if lower.starts_with("this 15th day") {
        return false;
    }
    if PURE_DIGITS.is_match(trimmed) {
        return false;
    }
    true
}

// ============ Amounts ============

fn collect_amounts(text: &str, tagged: &[TaggedEntity]) -> Vec<String> {
    let mut amounts: Vec<String> = Vec::new();
    for pattern in AMOUNT_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            let candidate = m.as_str().trim().to_string();
            if is_plausible_amount(&candidate) {
                amounts.push(candidate);
            }
        }
    }
    for entity in tagged {
        if entity.label == EntityLabel::Money {
            amounts.push(entity.text.clone());
        }
    }

    dedup_capped(amounts.into_iter(), MAX_ENTRIES)
}

/// Keep only candidates whose digit content reads as at least `MIN_AMOUNT`,
/// filtering out pin codes, serial numbers, and similar small figures.
fn is_plausible_amount(candidate: &str) -> bool {
    let digits: String = candidate.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return false;
    }
    // Overflowing u128 means the figure is enormous; keep it.
    digits.parse::<u128>().map_or(true, |n| n >= MIN_AMOUNT)
}

// ============ Property schedule ============

static PROPERTY_LABELS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    ["Survey No", "Patta No", "Village", "Taluk", "District"]
        .iter()
        .map(|label| {
            let pattern = format!(r"(?i){}\s*[:\-]?\s*([^\n\r]+)", label);
            (*label, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Capture the five schedule fields, each restricted to the remainder of its
/// own line so a value never spills into the next label.
pub fn extract_property(text: &str) -> PropertyDetails {
    let mut values: Vec<Option<String>> = PROPERTY_LABELS
        .iter()
        .map(|(_, re)| {
            re.captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .collect();

    // The District: label often matches the ", Tamil Nadu" tail of the header
    // line; recover the real name from "<name> District, Tamil Nadu".
    let district_placeholder = values[4]
        .as_deref()
        .map(|d| {
            let t = d.trim();
            t.is_empty() || t == "," || t == ", Tamil Nadu"
        })
        .unwrap_or(true);
    if district_placeholder {
        if let Some(m) = DISTRICT_HEADER.captures(text).and_then(|c| c.get(1)) {
            values[4] = Some(m.as_str().trim().to_string());
        }
    }

    let mut cleaned = values
        .into_iter()
        .map(|v| v.and_then(|s| clean_property_value(&s)));

    PropertyDetails {
        survey_no: cleaned.next().unwrap(),
        patta_no: cleaned.next().unwrap(),
        village: cleaned.next().unwrap(),
        taluk: cleaned.next().unwrap(),
        district: cleaned.next().unwrap(),
    }
}

/// Truncate a captured value at trailing label words that got attached.
fn clean_property_value(value: &str) -> Option<String> {
    let cleaned = PROPERTY_VALUE_TRAIL.replace(value, "").trim().to_string();
    non_empty(cleaned)
}

// ============ Shared helpers ============

/// Deduplicate by exact string, keeping first occurrence and insertion order,
/// truncated to `cap` entries.
fn dedup_capped<I: Iterator<Item = String>>(items: I, cap: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
            if out.len() >= cap {
                break;
            }
        }
    }
    out
}
