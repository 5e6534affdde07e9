// Appends user-chosen phrase rules to a voice profile.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

use crate::errors::{VoiceError, VoiceResult};
use crate::models::RuleType;

lazy_static! {
    static ref AVOIDANCE_HEADING: Regex =
        Regex::new(r"(?i)### B\.[^\n]*\(Avoidance Patterns\)").unwrap();
    static ref SIGNATURE_HEADING: Regex =
        Regex::new(r"(?i)### A\.[^\n]*\(Signature Patterns\)").unwrap();
    static ref LANGUAGE_SECTION: Regex =
        Regex::new(r"(?i)## 3\. LANGUAGE PATTERN ANALYSIS").unwrap();
    static ref SUBSECTION_END: Regex = Regex::new(r"###|## \d").unwrap();
    static ref SECTION_4: Regex = Regex::new(r"## 4").unwrap();
    static ref AVOIDANCE_LABEL: Regex = Regex::new(r"(?i)Avoidance Patterns").unwrap();
    static ref ANY_HEADING: Regex = Regex::new(r"##").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The phrase was inserted; the profile text is a new string.
    Added { prompt_text: String, message: String },
    /// The phrase already sits inside the avoidance patterns.
    AlreadyPresent { message: String },
}

impl RuleOutcome {
    pub fn message(&self) -> &str {
        match self {
            RuleOutcome::Added { message, .. } | RuleOutcome::AlreadyPresent { message } => message,
        }
    }
}

/// Add an avoid/prefer rule to a profile. The input text is never modified.
pub fn add_rule(profile_text: &str, phrase: &str, rule_type: RuleType) -> VoiceResult<RuleOutcome> {
    let phrase = phrase.trim();
    if phrase.is_empty() {
        return Err(VoiceError::InvalidRule("phrase must not be empty".to_string()));
    }

    if rule_type == RuleType::Avoid && already_avoided(profile_text, phrase) {
        debug!("Phrase '{}' already listed under avoidance patterns", phrase);
        return Ok(RuleOutcome::AlreadyPresent {
            message: "This phrase is already in your avoidance patterns".to_string(),
        });
    }

    let (prompt_text, message) = match rule_type {
        RuleType::Avoid => {
            let rule = format!("\n- \"{}\" — User-added avoidance (do not use this phrase)", phrase);
            let text = if let Some(point) = section_end(profile_text, &AVOIDANCE_HEADING, &SUBSECTION_END) {
                insert_at(profile_text, point, &rule)
            } else if let Some(point) = section_end(profile_text, &LANGUAGE_SECTION, &SECTION_4) {
                let block = format!("\n\n### User-Added Avoidance Patterns{}", rule);
                insert_at(profile_text, point, &block)
            } else {
                format!("{}\n\n## USER-ADDED RULES\n\n### Avoidance Patterns{}", profile_text, rule)
            };
            (text, format!("\"{}\" added to avoidance patterns", phrase))
        }
        RuleType::Prefer => {
            let rule = format!(
                "\n- \"{}\" — User-added preference (use naturally when appropriate)",
                phrase
            );
            let text = match section_end(profile_text, &SIGNATURE_HEADING, &SUBSECTION_END) {
                Some(point) => insert_at(profile_text, point, &rule),
                None => format!("{}\n\n## USER-ADDED RULES\n\n### Preferred Phrases{}", profile_text, rule),
            };
            (text, format!("\"{}\" added to preferred phrases", phrase))
        }
    };

    info!("{}", message);
    Ok(RuleOutcome::Added { prompt_text, message })
}

fn already_avoided(profile_text: &str, phrase: &str) -> bool {
    let wanted = phrase.to_lowercase();
    if !profile_text.to_lowercase().contains(&wanted) {
        return false;
    }
    match AVOIDANCE_LABEL.find(profile_text) {
        Some(label) => {
            let end = section_end_from(profile_text, label.end(), &ANY_HEADING);
            profile_text[label.start()..end].to_lowercase().contains(&wanted)
        }
        None => false,
    }
}

// Byte offset where the section opened by `heading` stops
fn section_end(text: &str, heading: &Regex, stop: &Regex) -> Option<usize> {
    heading
        .find(text)
        .map(|m| section_end_from(text, m.end(), stop))
}

fn section_end_from(text: &str, body_start: usize, stop: &Regex) -> usize {
    stop.find_at(text, body_start).map_or(text.len(), |m| m.start())
}

fn insert_at(text: &str, point: usize, addition: &str) -> String {
    format!("{}{}\n{}", text[..point].trim_end(), addition, &text[point..])
}
