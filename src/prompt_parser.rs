//! Section extraction for voice profile texts.
//!
//! Profiles come from an LLM and have gone through several heading schemes:
//! numbered markdown (`## 2. CORE VOICE FOUNDATION`), banner blocks framed by
//! `=====` rules (`MODE A: CASUAL/INTERNAL`), and bracket labels
//! (`[TONE ANALYSIS]`). Each field carries an ordered list of strategies and
//! the first one that finds a span wins. Nothing here fails: a field that no
//! strategy matches is left at its fallback.

use lazy_static::lazy_static;
use parking_lot::Mutex;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::models::{DEFAULT_USER_NAME, ExtractedSections, ModeSection};

pub const SIGNATURE_LIMIT: usize = 10;
pub const AVOIDANCE_LIMIT: usize = 10;
pub const DEFAULT_PREVIEW_LENGTH: usize = 200;
pub const DEFAULT_SUMMARY: &str = "Your personalized voice profile captures your unique writing style, tone, and communication patterns.";

// Labels that open a field inside a section; a field body runs until the next one
const KNOWN_FIELD_LABELS: &[&str] = &[
    "structure rules",
    "structure",
    "opening patterns",
    "openings",
    "closing patterns",
    "closings",
    "example paragraph",
    "example",
    "tone adjustments",
    "tone analysis",
    "overall tone",
    "tone",
    "punctuation rules",
    "punctuation",
    "vocabulary signatures",
    "signature phrases",
    "never use",
    "anti-patterns",
];

lazy_static! {
    static ref RULE_LINE: Regex = Regex::new(r"(?m)^[ \t]*[=\-]{3,}[ \t]*$").unwrap();
    static ref RULE_RUN: Regex = Regex::new(r"[=\-]{3,}").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref BRACKET_LABEL: Regex = Regex::new(r"\[[A-Z][A-Z \-&/]*\]").unwrap();
    static ref BRACKET_STOP: Regex =
        Regex::new(r"(?im)^[ \t]*(?:NEVER USE|VOCABULARY|MODE [A-C]\b)").unwrap();
    static ref UPPERCASE_LABEL_LINE: Regex = Regex::new(r"(?m)^[A-Z][A-Z \t/&\-]*:").unwrap();
    static ref FIELD_LABEL_LINE: Regex = {
        let alternatives = KNOWN_FIELD_LABELS
            .iter()
            .map(|label| regex::escape(label))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(
            r"(?im)^[ \t]*(?:[-•*][ \t]+)?(?:\*\*)?\[?(?:{alternatives})\]?(?:\*\*)?(?:[ \t]*\([^)\n]*\))?[ \t]*(?::|$)"
        ))
        .unwrap()
    };
    static ref HEADING_STOP_LEVEL_2: Regex = Regex::new(r"(?m)^#{1,2}[ \t]").unwrap();
    static ref HEADING_STOP_LEVEL_3: Regex = Regex::new(r"(?m)^#{1,3}[ \t]").unwrap();
    static ref PROFILE_NAME: Regex =
        Regex::new(r"(?i)IMV STYLE PROFILE[ \t]*[-–—:][ \t]*([^\n]+)").unwrap();
    static ref SENTENCE_SPLIT: Regex = Regex::new(r"[.!?]+").unwrap();
    static ref PATTERN_CACHE: Mutex<HashMap<String, Regex>> = Mutex::new(HashMap::new());
}

// Strategy patterns depend on their label, so they are compiled on first use
// and reused afterwards.
fn cached_regex(pattern: String) -> Option<Regex> {
    let mut cache = PATTERN_CACHE.lock();
    if let Some(re) = cache.get(&pattern) {
        return Some(re.clone());
    }
    match Regex::new(&pattern) {
        Ok(re) => {
            cache.insert(pattern, re.clone());
            Some(re)
        }
        Err(e) => {
            warn!("Could not build pattern {}: {}", pattern, e);
            None
        }
    }
}

/// One way of locating a span of profile text.
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    /// `##`/`###` heading whose line contains the title; runs to the next
    /// heading of equal or higher level.
    Heading(&'static str),
    /// Banner label; runs until an end label or a `=====`/`-----` rule line.
    Banner {
        marker: &'static str,
        ends: &'static [&'static str],
    },
    /// `[LABEL]`; runs until the next bracket label or a stop keyword line.
    Bracket(&'static str),
    /// `LABEL:` (or `[LABEL]`, or `- Label:`) line; runs until the next known field label.
    Field(&'static str),
}

impl Strategy {
    pub fn apply(&self, text: &str) -> Option<String> {
        match *self {
            Strategy::Heading(title) => heading_span(text, title),
            Strategy::Banner { marker, ends } => banner_span(text, marker, ends),
            Strategy::Bracket(label) => bracket_span(text, label),
            Strategy::Field(label) => field_span(text, label),
        }
    }
}

const VOICE_IDENTITY: &[Strategy] = &[
    Strategy::Heading("VOICE IDENTITY"),
    Strategy::Bracket("VOICE IDENTITY"),
];

const CORE_VOICE: &[Strategy] = &[
    Strategy::Heading("CORE VOICE FOUNDATION"),
    Strategy::Banner {
        marker: "CORE VOICE FOUNDATION",
        ends: &["MODE A"],
    },
    Strategy::Bracket("TONE ANALYSIS"),
];

const TONE_IN_CORE: &[Strategy] = &[Strategy::Field("TONE ANALYSIS")];

const TONE_ANYWHERE: &[Strategy] = &[
    Strategy::Bracket("TONE ANALYSIS"),
    Strategy::Field("Overall tone"),
];

const VOCABULARY_SIGNATURES: &[Strategy] = &[
    Strategy::Field("VOCABULARY SIGNATURES"),
    Strategy::Bracket("SIGNATURE PHRASES"),
];

const ANTI_PATTERNS: &[Strategy] = &[
    Strategy::Field("NEVER USE"),
    Strategy::Bracket("ANTI-PATTERNS"),
    Strategy::Bracket("NEVER USE"),
];

const SIGNATURE_PATTERNS: &[Strategy] = &[
    Strategy::Heading("Signature Patterns"),
    Strategy::Heading("Preferred Phrases"),
    Strategy::Field("VOCABULARY SIGNATURES"),
    Strategy::Bracket("SIGNATURE PHRASES"),
];

const AVOIDANCE_PATTERNS: &[Strategy] = &[
    Strategy::Heading("Avoidance Patterns"),
    Strategy::Heading("User-Added Avoidance Patterns"),
    Strategy::Field("NEVER USE"),
    Strategy::Bracket("NEVER USE"),
    Strategy::Bracket("ANTI-PATTERNS"),
];

const SENTENCE_MECHANICS: &[Strategy] = &[Strategy::Heading("SENTENCE & PARAGRAPH MECHANICS")];

const MODE_ENDS: &[&str] = &["MODE A:", "MODE B:", "MODE C:", "REMEMBER:"];

const CASUAL_MODE: &[Strategy] = &[
    Strategy::Heading("CASUAL"),
    Strategy::Banner {
        marker: "MODE A:",
        ends: MODE_ENDS,
    },
];

const PROFESSIONAL_MODE: &[Strategy] = &[
    Strategy::Heading("PROFESSIONAL"),
    Strategy::Banner {
        marker: "MODE B:",
        ends: MODE_ENDS,
    },
];

const FORMAL_MODE: &[Strategy] = &[
    Strategy::Heading("FORMAL"),
    Strategy::Banner {
        marker: "MODE C:",
        ends: MODE_ENDS,
    },
];

const MODE_STRUCTURE: &[Strategy] = &[
    Strategy::Field("STRUCTURE"),
    Strategy::Field("Structure rules"),
];
const MODE_OPENINGS: &[Strategy] = &[
    Strategy::Field("OPENINGS"),
    Strategy::Field("Opening patterns"),
];
const MODE_CLOSINGS: &[Strategy] = &[
    Strategy::Field("CLOSINGS"),
    Strategy::Field("Closing patterns"),
];
const MODE_EXAMPLE: &[Strategy] = &[
    Strategy::Field("EXAMPLE"),
    Strategy::Field("Example paragraph"),
];

/// Run strategies in order and return the first span found.
pub fn first_match(text: &str, strategies: &[Strategy], field: &str) -> Option<String> {
    for strategy in strategies {
        if let Some(span) = strategy.apply(text) {
            debug!("Field {} matched by {:?}", field, strategy);
            return Some(span);
        }
    }
    debug!("Field {} not found, using fallback", field);
    None
}

/// Extract every known section from a voice profile.
pub fn extract_sections(profile_text: &str) -> ExtractedSections {
    let user_name = PROFILE_NAME
        .captures(profile_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());

    let voice_identity = first_match(profile_text, VOICE_IDENTITY, "voice_identity");
    let core_voice = first_match(profile_text, CORE_VOICE, "core_voice");

    let tone_analysis = core_voice
        .as_deref()
        .and_then(|core| first_match(core, TONE_IN_CORE, "tone_analysis"))
        .or_else(|| first_match(profile_text, TONE_ANYWHERE, "tone_analysis"));

    let signature_patterns = first_match(profile_text, SIGNATURE_PATTERNS, "signature_patterns")
        .map(|span| extract_list(&span, SIGNATURE_LIMIT))
        .unwrap_or_default();
    let avoidance_patterns = first_match(profile_text, AVOIDANCE_PATTERNS, "avoidance_patterns")
        .map(|span| extract_list(&span, AVOIDANCE_LIMIT))
        .unwrap_or_default();

    let sections = ExtractedSections {
        user_name,
        voice_identity,
        core_voice,
        tone_analysis,
        vocabulary_signatures: first_match(profile_text, VOCABULARY_SIGNATURES, "vocabulary_signatures"),
        anti_patterns: first_match(profile_text, ANTI_PATTERNS, "anti_patterns"),
        signature_patterns,
        avoidance_patterns,
        sentence_mechanics: first_match(profile_text, SENTENCE_MECHANICS, "sentence_mechanics"),
        casual_mode: extract_mode(profile_text, CASUAL_MODE, "casual_mode"),
        professional_mode: extract_mode(profile_text, PROFESSIONAL_MODE, "professional_mode"),
        formal_mode: extract_mode(profile_text, FORMAL_MODE, "formal_mode"),
    };

    if !sections.has_core_content() {
        warn!(
            "No core voice or voice identity found in profile ({} chars); exports will wrap the raw text",
            profile_text.len()
        );
    }

    sections
}

fn extract_mode(text: &str, strategies: &[Strategy], field: &str) -> ModeSection {
    let Some(body) = first_match(text, strategies, field) else {
        return ModeSection::default();
    };

    ModeSection {
        structure: first_match(&body, MODE_STRUCTURE, "structure"),
        openings: first_match(&body, MODE_OPENINGS, "openings"),
        closings: first_match(&body, MODE_CLOSINGS, "closings"),
        example: first_match(&body, MODE_EXAMPLE, "example"),
        body: Some(body),
    }
}

/// Turn a span into its bullet or quoted items, in document order, capped at `limit`.
pub fn extract_list(span: &str, limit: usize) -> Vec<String> {
    span.lines()
        .filter_map(list_item)
        .filter(|item| !item.is_empty())
        .take(limit)
        .collect()
}

fn list_item(line: &str) -> Option<String> {
    let line = line.trim();

    let item = if line.starts_with('"') || line.starts_with('“') {
        line
    } else {
        let mut chars = line.chars();
        let marker = chars.next()?;
        if !matches!(marker, '-' | '•' | '*') {
            return None;
        }
        let rest = chars.as_str();
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        rest.trim()
    };

    Some(strip_quotes(item))
}

fn strip_quotes(item: &str) -> String {
    let Some(opening) = item.chars().next().filter(|c| *c == '"' || *c == '“') else {
        return item.trim().to_string();
    };

    let inner = &item[opening.len_utf8()..];
    match inner.find(['"', '”']) {
        Some(close) => inner[..close].trim().to_string(),
        None => inner.trim().to_string(),
    }
}

// The title leads the heading (after optional `2.`/`B.` numbering or a
// `MODE A:` prefix) or is the heading's parenthesised tag.
fn heading_pattern(title: &str) -> String {
    let title = regex::escape(title);
    format!(
        r"(?im)^(#{{2,3}})[ \t]*(?:(?:[0-9]+|[A-Z])\.[ \t]*)?(?:MODE[ \t]+[A-C][ \t]*[:.\-–—][ \t]*)?(?:{title}\b|[^\n]*\({title}\))[^\n]*$"
    )
}

fn heading_span(text: &str, title: &str) -> Option<String> {
    let heading = cached_regex(heading_pattern(title))?;

    let caps = heading.captures(text)?;
    let level = caps.get(1)?.as_str().len();
    let start = caps.get(0)?.end();

    let stop = if level <= 2 {
        &*HEADING_STOP_LEVEL_2
    } else {
        &*HEADING_STOP_LEVEL_3
    };
    let end = stop.find_at(text, start).map(|m| m.start()).unwrap_or(text.len());

    clean_span(&text[start..end])
}

fn banner_span(text: &str, marker: &str, ends: &[&str]) -> Option<String> {
    let label = cached_regex(format!(r"(?i){}", regex::escape(marker)))?;
    let found = label.find(text)?;

    // The rest of the label line is a title, not content
    let body_start = text[found.end()..]
        .find('\n')
        .map(|i| found.end() + i + 1)
        .unwrap_or(text.len());

    let mut collected = Vec::new();
    let mut started = false;
    for line in text[body_start..].lines() {
        let trimmed = line.trim();
        if is_rule_line(trimmed) {
            if started {
                break;
            }
            continue;
        }
        let upper = trimmed.to_ascii_uppercase();
        if ends.iter().any(|end| upper.starts_with(&end.to_ascii_uppercase())) {
            break;
        }
        if !trimmed.is_empty() {
            started = true;
        }
        collected.push(line);
    }

    clean_span(&collected.join("\n"))
}

fn bracket_span(text: &str, label: &str) -> Option<String> {
    let opening = cached_regex(format!(r"(?i)\[{}\]", regex::escape(label)))?;
    let start = opening.find(text)?.end();

    let end = [
        BRACKET_LABEL.find_at(text, start).map(|m| m.start()),
        BRACKET_STOP.find_at(text, start).map(|m| m.start()),
    ]
    .into_iter()
    .flatten()
    .min()
    .unwrap_or(text.len());

    clean_span(&text[start..end])
}

fn field_span(text: &str, label: &str) -> Option<String> {
    let pattern = format!(
        r"(?im)^[ \t]*([-•*][ \t]+)?(?:\*\*)?\[?{}\]?(?:\*\*)?(?:[ \t]*\([^)\n]*\))?[ \t]*(?::|$)",
        regex::escape(label)
    );
    let opening = cached_regex(pattern)?;
    let caps = opening.captures(text)?;
    let start = caps.get(0)?.end();

    // `- Label: value` bullets hold their value on the same line
    if caps.get(1).is_some() {
        let line_end = text[start..].find('\n').map(|i| start + i).unwrap_or(text.len());
        let inline = text[start..line_end].trim();
        if !inline.is_empty() {
            return Some(inline.to_string());
        }
    }

    let end = [
        FIELD_LABEL_LINE.find_at(text, start).map(|m| m.start()),
        UPPERCASE_LABEL_LINE.find_at(text, start).map(|m| m.start()),
        BRACKET_LABEL.find_at(text, start).map(|m| m.start()),
        RULE_LINE.find_at(text, start).map(|m| m.start()),
    ]
    .into_iter()
    .flatten()
    .min()
    .unwrap_or(text.len());

    clean_span(&text[start..end])
}

fn is_rule_line(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '=' || c == '-')
}

// Trim and drop blank or rule lines at either end
fn clean_span(span: &str) -> Option<String> {
    let lines: Vec<&str> = span.lines().collect();
    let keep = |line: &&str| {
        let trimmed = line.trim();
        !trimmed.is_empty() && !is_rule_line(trimmed)
    };

    let first = lines.iter().position(|l| keep(l))?;
    let last = lines.iter().rposition(|l| keep(l))?;
    let cleaned = lines[first..=last].join("\n").trim().to_string();

    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Cut `text` to `max_chars` characters, appending `...` when shortened.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// Single-line preview with rule lines stripped and whitespace collapsed.
pub fn prompt_preview(profile_text: &str, max_len: usize) -> String {
    let without_rules = RULE_RUN.replace_all(profile_text, "");
    let collapsed = WHITESPACE.replace_all(&without_rules, " ");
    truncate_chars(collapsed.trim(), max_len)
}

/// First `count` non-blank lines.
pub fn first_lines(profile_text: &str, count: usize) -> String {
    profile_text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(count)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A short human-readable summary of the voice, for dashboards.
pub fn voice_summary(profile_text: &str) -> String {
    if let Some(identity) = heading_span(profile_text, "VOICE IDENTITY") {
        let sentences: Vec<&str> = SENTENCE_SPLIT
            .split(&identity)
            .map(str::trim)
            .filter(|s| s.chars().count() > 20 && !s.starts_with('-') && !s.starts_with('•'))
            .take(3)
            .collect();
        if !sentences.is_empty() {
            return format!("{}.", sentences.join(". "));
        }
    }

    if let Some(core) = heading_span(profile_text, "CORE VOICE FOUNDATION") {
        let lines: Vec<&str> = core
            .lines()
            .map(str::trim)
            .filter(|l| l.chars().count() > 10 && !l.starts_with('#'))
            .take(3)
            .collect();
        if !lines.is_empty() {
            let joined = lines.join(" ");
            let clipped: String = joined.chars().take(300).collect();
            return format!("{}...", clipped);
        }
    }

    DEFAULT_SUMMARY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRACKET_PROFILE: &str = "[TONE ANALYSIS]\nDirect and warm.\n[SIGNATURE PHRASES]\n- quick question\n- thanks!\n[NEVER USE]\n- per my last email\nMODE A: casual stuff";

    const NUMBERED_PROFILE: &str = r#"## 1. VOICE IDENTITY & ROLE DEFINITION

You are a writing assistant that mimics the user's personal writing voice. This voice overrides generic AI writing style.
Write in the user's voice, not your own.

---

## 2. CORE VOICE FOUNDATION (Derived from samples)

- Overall tone: direct, warm, and concise
- Sentence style: short sentences, fragments allowed

---

## 3. LANGUAGE PATTERN ANALYSIS (User-Derived)

### A. Commonly Used Language (Signature Patterns)

- "Quick question" when opening a request
- "Thanks!"
- One more thing

### B. Rarely or Never Used Language (Avoidance Patterns)

- "Per my last email"
- Heavy corporate jargon

### C. Neutral Language

- "Regards" is fine in formal mail

## 4. SENTENCE & PARAGRAPH MECHANICS

Average sentence length: 9 words.

## 5. AUDIENCE & WRITING MODES

### CASUAL / INTERNAL
- Structure rules: fragments and contractions welcome
- Opening patterns: "Hey team,"
- Closing patterns: "Thanks!"

### PROFESSIONAL / EXTERNAL
- Structure rules: full sentences
- Opening patterns: "Hi Dana,"

### FORMAL / EXECUTIVE
- Structure rules: no contractions
"#;

    const BANNER_PROFILE: &str = "IMV STYLE PROFILE - Jordan Lee
===========================================
CORE VOICE FOUNDATION
===========================================
[TONE ANALYSIS]
Plainspoken and upbeat.

VOCABULARY SIGNATURES:
- \"sounds good\"
- \"let's do it\"

NEVER USE:
- synergy
- circle back

===========================================
MODE A: CASUAL/INTERNAL
===========================================
STRUCTURE: Short bursts, one idea per line.
OPENINGS:
Hey all,
CLOSINGS: Cheers
EXAMPLE:
Hey all, quick one. Let's ship it today.

===========================================
MODE B: PROFESSIONAL/EXTERNAL
===========================================
STRUCTURE: Two short paragraphs.

===========================================
MODE C: FORMAL/EXECUTIVE
===========================================
STRUCTURE: Lead with the ask.
REMEMBER: stay in voice
";

    #[test]
    fn test_bracket_labels() {
        let sections = extract_sections(BRACKET_PROFILE);

        assert_eq!(sections.core_voice.as_deref(), Some("Direct and warm."));
        assert_eq!(sections.tone_analysis.as_deref(), Some("Direct and warm."));
        assert_eq!(sections.signature_patterns, vec!["quick question", "thanks!"]);
        assert_eq!(sections.avoidance_patterns, vec!["per my last email"]);
        assert_eq!(sections.anti_patterns.as_deref(), Some("- per my last email"));
    }

    #[test]
    fn test_empty_input_resolves_to_fallbacks() {
        let sections = extract_sections("");

        assert_eq!(sections, ExtractedSections::default());
        assert_eq!(sections.casual_mode.structure_or_default(), "Structure not specified");
        assert_eq!(sections.formal_mode.example_or_default(), "No example available");
        assert_eq!(sections.anti_patterns_or_default(), "Anti-patterns not available");
    }

    #[test]
    fn test_numbered_headings() {
        let sections = extract_sections(NUMBERED_PROFILE);

        let identity = sections.voice_identity.as_deref().unwrap();
        assert!(identity.starts_with("You are a writing assistant"));
        assert!(!identity.contains("---"));

        let core = sections.core_voice.as_deref().unwrap();
        assert!(core.contains("Overall tone: direct, warm, and concise"));
        assert!(!core.contains("LANGUAGE PATTERN"));
        assert_eq!(sections.tone_analysis.as_deref(), Some("direct, warm, and concise"));

        assert_eq!(
            sections.signature_patterns,
            vec!["Quick question", "Thanks!", "One more thing"]
        );
        assert_eq!(
            sections.avoidance_patterns,
            vec!["Per my last email", "Heavy corporate jargon"]
        );
        assert_eq!(
            sections.sentence_mechanics.as_deref(),
            Some("Average sentence length: 9 words.")
        );
    }

    #[test]
    fn test_numbered_modes_stop_at_sibling_heading() {
        let sections = extract_sections(NUMBERED_PROFILE);

        let casual = &sections.casual_mode;
        assert!(!casual.body.as_deref().unwrap().contains("PROFESSIONAL"));
        assert_eq!(casual.structure.as_deref(), Some("fragments and contractions welcome"));
        assert_eq!(casual.openings.as_deref(), Some("\"Hey team,\""));
        assert_eq!(casual.closings.as_deref(), Some("\"Thanks!\""));
        assert_eq!(casual.example, None);

        assert_eq!(sections.professional_mode.openings.as_deref(), Some("\"Hi Dana,\""));
        assert_eq!(sections.formal_mode.structure.as_deref(), Some("no contractions"));
    }

    #[test]
    fn test_level_two_heading_keeps_subsections() {
        let span = heading_span(NUMBERED_PROFILE, "LANGUAGE PATTERN ANALYSIS").unwrap();
        assert!(span.contains("### A. Commonly Used Language"));
        assert!(span.contains("### C. Neutral Language"));
        assert!(!span.contains("MECHANICS"));
    }

    #[test]
    fn test_banner_profile() {
        let sections = extract_sections(BANNER_PROFILE);

        assert_eq!(sections.user_name, "Jordan Lee");
        let core = sections.core_voice.as_deref().unwrap();
        assert!(core.starts_with("[TONE ANALYSIS]"));
        assert!(!core.contains("MODE A"));
        assert_eq!(sections.tone_analysis.as_deref(), Some("Plainspoken and upbeat."));
        assert_eq!(sections.signature_patterns, vec!["sounds good", "let's do it"]);
        assert_eq!(sections.avoidance_patterns, vec!["synergy", "circle back"]);
    }

    #[test]
    fn test_banner_modes() {
        let sections = extract_sections(BANNER_PROFILE);

        let casual = &sections.casual_mode;
        assert_eq!(casual.structure.as_deref(), Some("Short bursts, one idea per line."));
        assert_eq!(casual.openings.as_deref(), Some("Hey all,"));
        assert_eq!(casual.closings.as_deref(), Some("Cheers"));
        assert_eq!(
            casual.example.as_deref(),
            Some("Hey all, quick one. Let's ship it today.")
        );

        assert_eq!(
            sections.professional_mode.structure.as_deref(),
            Some("Two short paragraphs.")
        );
        assert_eq!(sections.professional_mode.openings_or_default(), "Openings not specified");

        let formal = &sections.formal_mode;
        assert_eq!(formal.structure.as_deref(), Some("Lead with the ask."));
        assert!(!formal.body.as_deref().unwrap().contains("stay in voice"));
    }

    #[test]
    fn test_first_strategy_wins_without_merging() {
        let text = "### Signature Patterns\n- from heading\n\n### Other\n\n[SIGNATURE PHRASES]\n- from bracket\n";
        let sections = extract_sections(text);
        assert_eq!(sections.signature_patterns, vec!["from heading"]);
    }

    #[test]
    fn test_mode_headings_with_unlisted_audience() {
        let text = "## 5. AUDIENCE & WRITING MODES

### CASUAL / INFORMAL
- Structure rules: fragments ok

### PROFESSIONAL / EXTERNAL
- Structure rules: full sentences

### FORMAL / EXECUTIVE
- Structure rules: no contractions
";
        let sections = extract_sections(text);
        assert_eq!(sections.casual_mode.structure.as_deref(), Some("fragments ok"));
        assert_eq!(sections.professional_mode.structure.as_deref(), Some("full sentences"));
        assert_eq!(sections.formal_mode.structure.as_deref(), Some("no contractions"));
    }

    #[test]
    fn test_parent_heading_naming_modes_is_skipped() {
        let text = "## 5. AUDIENCE & WRITING MODES (casual, professional, formal)

### CASUAL / INTERNAL
- Structure rules: fragments ok

### PROFESSIONAL / EXTERNAL
- Structure rules: full sentences

### FORMAL / EXECUTIVE
- Structure rules: no contractions
";
        let sections = extract_sections(text);
        let casual = sections.casual_mode.body.as_deref().unwrap();
        assert!(!casual.contains("PROFESSIONAL"));
        assert_eq!(sections.casual_mode.structure.as_deref(), Some("fragments ok"));
        assert_eq!(sections.professional_mode.structure.as_deref(), Some("full sentences"));
        assert_eq!(sections.formal_mode.structure.as_deref(), Some("no contractions"));
    }

    #[test]
    fn test_heading_title_must_lead() {
        let text = "### MODE B: PROFESSIONAL / EXTERNAL\nbody\n";
        assert_eq!(heading_span(text, "PROFESSIONAL").as_deref(), Some("body"));

        assert_eq!(heading_span("### Not CASUAL at all\nbody\n", "CASUAL"), None);
        assert_eq!(heading_span("### CASUALLY\nbody\n", "CASUAL"), None);
    }

    #[test]
    fn test_user_added_avoidance_heading() {
        let text = "I write plainly.\n\n### User-Added Avoidance Patterns\n- synergy\n## 4. SENTENCE MECHANICS\nShort.";
        let sections = extract_sections(text);
        assert_eq!(sections.avoidance_patterns, vec!["synergy"]);
    }

    #[test]
    fn test_strategy_patterns_are_cached() {
        let pattern = heading_pattern("FORMAL");
        extract_sections(NUMBERED_PROFILE);
        assert!(PATTERN_CACHE.lock().contains_key(&pattern));

        let first = cached_regex(pattern.clone()).unwrap();
        let second = cached_regex(pattern).unwrap();
        assert_eq!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_list_truncation_preserves_order() {
        let span: String = (1..=15).map(|i| format!("- phrase {}\n", i)).collect();
        let items = extract_list(&span, SIGNATURE_LIMIT);
        assert_eq!(items.len(), SIGNATURE_LIMIT);
        assert_eq!(items[0], "phrase 1");
        assert_eq!(items[9], "phrase 10");
    }

    #[test]
    fn test_list_skips_non_items() {
        let span = "Intro line\n---\n**Bold heading**\n-\n• \"quoted\" — with commentary\n“curly”\n-tight";
        assert_eq!(extract_list(span, 10), vec!["quoted", "curly"]);
    }

    #[test]
    fn test_extraction_is_total_and_idempotent() {
        let inputs = [
            "",
            "   \n\t",
            "[",
            "[TONE ANALYSIS]",
            "##",
            "### ",
            "## 2. CORE VOICE FOUNDATION",
            "MODE A:",
            "MODE A:\n=====\n=====",
            "NEVER USE:",
            "é[TONE ANALYSIS]ü\n- ☃",
            BRACKET_PROFILE,
            NUMBERED_PROFILE,
            BANNER_PROFILE,
        ];
        for input in inputs {
            let first = extract_sections(input);
            let second = extract_sections(input);
            assert_eq!(first, second);
            assert!(first.signature_patterns.len() <= SIGNATURE_LIMIT);
            assert!(first.avoidance_patterns.len() <= AVOIDANCE_LIMIT);
            assert!(!first.user_name.is_empty());
        }
    }

    #[test]
    fn test_prompt_preview() {
        let text = "=====\nIMV STYLE PROFILE - Sam\n=====\n\nHello   world";
        assert_eq!(prompt_preview(text, 200), "IMV STYLE PROFILE - Sam Hello world");
        assert_eq!(prompt_preview("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("héllo", 2), "hé...");
    }

    #[test]
    fn test_first_lines() {
        assert_eq!(first_lines("a\n\n b\nc\nd\ne", 3), "a\n b\nc");
    }

    #[test]
    fn test_voice_summary() {
        let summary = voice_summary(NUMBERED_PROFILE);
        assert!(summary.starts_with("You are a writing assistant that mimics"));
        assert!(summary.ends_with('.'));

        let core_only = "## 2. CORE VOICE FOUNDATION\n- Overall tone: direct and warm\n";
        assert_eq!(voice_summary(core_only), "- Overall tone: direct and warm...");

        assert_eq!(voice_summary("nothing here"), DEFAULT_SUMMARY);
    }
}
