// Platform-specific exports of a voice profile.
// Each renderer frames the extracted sections the way its target assistant
// reads best. When the profile has neither a core voice nor a voice identity
// the renderer wraps the raw profile text verbatim instead.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ExtractedSections, ModeSection, PlatformExportSet, PlatformId, VoiceMode};
use crate::prompt_parser::{extract_sections, truncate_chars};

pub const COPILOT_TONE_CLAUSES: usize = 3;
pub const COPILOT_LIST_LIMIT: usize = 5;
pub const COPILOT_MODE_CHARS: usize = 120;
pub const GEMINI_LIST_LIMIT: usize = 8;
pub const GEMINI_MODE_CHARS: usize = 300;
pub const DEFAULT_LIST_LIMIT: usize = 10;

const RULE: &str = "===========================================";
const ELLIPSIS: &str = "...";

/// Appended to every export regardless of platform.
pub const WORKFLOW_INSTRUCTIONS: &str = r#"===========================================
INSTRUCTIONS FOR AI ASSISTANT:
===========================================

When the user includes "IMV" in their request, follow this workflow:

STEP 1: DETECT IMV TRIGGER
- Look for "IMV" anywhere in the user's message
- Examples: "write me an email IMV", "draft this IMV", "respond to this IMV"

STEP 2: ASK FOR MODE SELECTION
Respond with:
"I'll write that in your voice. What's the context?
A) Casual/Internal - Team messages, quick updates, Slack
B) Professional/External - Clients, vendors, business partners
C) Formal/Executive - Board, legal, official correspondence
Just reply with A, B, or C."
Then wait for the answer. The user may reply with A, B, or C, with "casual", "professional", or "formal", or by describing the context ("this is for my team" → use A).

STEP 3: GENERATE CONTENT IN SELECTED MODE
Use the voice profile section that matches the selected mode.

STEP 4: OFFER MODIFICATION OPTIONS
After delivering the generated content, ALWAYS show these options:

"Want me to adjust this? Pick a number:
1. 📉 Shorter
2. 📈 Longer
3. 😊 More Casual
4. 👔 More Professional
5. 🎯 More like me
6. 💡 Clearer
7. 👥 Different Audience
8. 🔄 Complete Rewrite"

If the user selects an option, regenerate the content with that modification applied while maintaining the voice profile.
"#;

/// How much of the profile goes into an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStyle {
    /// Structured templates built from extracted sections
    #[default]
    Sections,
    /// Always wrap the complete raw profile
    FullProfile,
}

/// Render the export for one platform.
pub fn render_for_platform(sections: &ExtractedSections, raw_text: &str, platform: PlatformId) -> String {
    render_with_style(sections, raw_text, platform, ExportStyle::Sections)
}

pub fn render_with_style(
    sections: &ExtractedSections,
    raw_text: &str,
    platform: PlatformId,
    style: ExportStyle,
) -> String {
    let body = if style == ExportStyle::FullProfile || !sections.has_core_content() {
        debug!("Rendering {} export from the full profile text", platform);
        wrap_full_profile(platform, raw_text)
    } else {
        match platform {
            PlatformId::ChatGpt => render_chatgpt(sections),
            PlatformId::Claude => render_claude(sections),
            PlatformId::Copilot => render_copilot(sections),
            PlatformId::Gemini => render_gemini(sections),
            PlatformId::Generic => render_generic(sections),
        }
    };

    format!("{}\n\n{}", body, WORKFLOW_INSTRUCTIONS)
}

/// Render all five exports.
pub fn render_all(sections: &ExtractedSections, raw_text: &str) -> PlatformExportSet {
    render_all_with_style(sections, raw_text, ExportStyle::Sections)
}

pub fn render_all_with_style(
    sections: &ExtractedSections,
    raw_text: &str,
    style: ExportStyle,
) -> PlatformExportSet {
    let render = |platform| render_with_style(sections, raw_text, platform, style);
    PlatformExportSet {
        chatgpt: render(PlatformId::ChatGpt),
        claude: render(PlatformId::Claude),
        copilot: render(PlatformId::Copilot),
        gemini: render(PlatformId::Gemini),
        generic: render(PlatformId::Generic),
    }
}

/// Extract and render in one go.
pub fn export_profile(profile_text: &str, style: ExportStyle) -> PlatformExportSet {
    let sections = extract_sections(profile_text);
    render_all_with_style(&sections, profile_text, style)
}

fn wrap_full_profile(platform: PlatformId, raw_text: &str) -> String {
    match platform {
        PlatformId::ChatGpt => format!(
            "You are a writing assistant that mimics my personal writing voice.\n\n{RULE}\nMY COMPLETE VOICE PROFILE:\n{RULE}\n\n{raw_text}"
        ),
        PlatformId::Claude => format!(
            "<voice_profile>\n<complete_profile>\n{raw_text}\n</complete_profile>\n</voice_profile>"
        ),
        PlatformId::Copilot => format!(
            "# My Writing Voice Profile\n\nYou are a writing assistant that mimics my personal writing voice. Follow this complete profile:\n\n---\n\n{raw_text}\n\n---"
        ),
        PlatformId::Gemini => format!(
            "I want you to write in my personal voice. Here's my complete voice profile:\n\n{RULE}\nMY VOICE PROFILE\n{RULE}\n\n{raw_text}"
        ),
        PlatformId::Generic => format!(
            "VOICE PROFILE INSTRUCTIONS\n\nYou are helping me write content in my personal voice. Follow this complete voice profile:\n\n{RULE}\nMY COMPLETE VOICE PROFILE\n{RULE}\n\n{raw_text}"
        ),
    }
}

// Core voice first, identity as the stand-in
fn description(sections: &ExtractedSections) -> &str {
    sections
        .core_voice
        .as_deref()
        .or(sections.voice_identity.as_deref())
        .unwrap_or_default()
}

fn mode_text(mode: &ModeSection, voice_mode: VoiceMode) -> String {
    match &mode.body {
        Some(body) => body.clone(),
        None => format!("No specific rules captured. Aim for: {}.", voice_mode.description()),
    }
}

fn mode_heading(voice_mode: VoiceMode) -> &'static str {
    match voice_mode {
        VoiceMode::Casual => "Casual / Internal",
        VoiceMode::Professional => "Professional / External",
        VoiceMode::Formal => "Formal / Executive",
    }
}

fn bullet_list(items: &[String], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

// Leading clauses of a description, for condensed formats
fn first_clauses(text: &str, count: usize) -> String {
    text.split(['.', ';', '!', '?', '\n'])
        .map(|clause| clause.trim().trim_start_matches(['-', '•', '*']).trim())
        .filter(|clause| !clause.is_empty())
        .take(count)
        .collect::<Vec<_>>()
        .join("; ")
}

fn render_chatgpt(sections: &ExtractedSections) -> String {
    let mut out = String::from("You are a writing assistant that mimics my personal writing voice. Write in my voice, not your own.\n");

    if let Some(identity) = &sections.voice_identity {
        out.push_str(&format!("\n## Who I Am\n{}\n", identity));
    }
    if let Some(core) = &sections.core_voice {
        out.push_str(&format!("\n## My Core Voice\n{}\n", core));
    }
    if let Some(mechanics) = &sections.sentence_mechanics {
        out.push_str(&format!("\n## Sentence & Paragraph Mechanics\n{}\n", mechanics));
    }
    if !sections.signature_patterns.is_empty() {
        out.push_str(&format!(
            "\n## Phrases I Use Naturally\n{}\n",
            bullet_list(&sections.signature_patterns, DEFAULT_LIST_LIMIT)
        ));
    }
    if !sections.avoidance_patterns.is_empty() {
        out.push_str(&format!(
            "\n## Phrases I Avoid\nAvoid these unless I explicitly ask for a different tone:\n{}\n",
            bullet_list(&sections.avoidance_patterns, DEFAULT_LIST_LIMIT)
        ));
    }

    out.push_str("\n## Writing Modes\n");
    for voice_mode in VoiceMode::ALL {
        out.push_str(&format!(
            "\n### {}) {}\n{}\n",
            voice_mode.letter(),
            mode_heading(voice_mode),
            mode_text(sections.mode(voice_mode), voice_mode)
        ));
    }

    out.trim_end().to_string()
}

fn render_claude(sections: &ExtractedSections) -> String {
    let mut out = String::from("<voice_profile>\n");

    out.push_str(&format!("<description>\n{}\n</description>\n", description(sections)));
    if let (Some(identity), Some(_)) = (&sections.voice_identity, &sections.core_voice) {
        out.push_str(&format!("<identity>\n{}\n</identity>\n", identity));
    }

    out.push_str("<vocabulary>\n");
    for phrase in sections.signature_patterns.iter().take(DEFAULT_LIST_LIMIT) {
        out.push_str(&format!("<phrase>{}</phrase>\n", phrase));
    }
    out.push_str("</vocabulary>\n");

    out.push_str("<avoid>\n");
    for phrase in sections.avoidance_patterns.iter().take(DEFAULT_LIST_LIMIT) {
        out.push_str(&format!("<phrase>{}</phrase>\n", phrase));
    }
    out.push_str("</avoid>\n");

    out.push_str("<modes>\n");
    for voice_mode in VoiceMode::ALL {
        out.push_str(&format!(
            "<mode id=\"{}\" name=\"{}\">\n{}\n</mode>\n",
            voice_mode.letter(),
            mode_heading(voice_mode),
            mode_text(sections.mode(voice_mode), voice_mode)
        ));
    }
    out.push_str("</modes>\n</voice_profile>");

    out
}

fn render_copilot(sections: &ExtractedSections) -> String {
    let tone_source = sections.tone_analysis.as_deref().unwrap_or(description(sections));
    let mut lines = vec![
        "# My Writing Voice".to_string(),
        String::new(),
        "Write as me. Keep my voice, not a generic assistant voice.".to_string(),
        String::new(),
        format!("- Tone: {}", first_clauses(tone_source, COPILOT_TONE_CLAUSES)),
    ];

    if !sections.signature_patterns.is_empty() {
        let used: Vec<&str> = sections
            .signature_patterns
            .iter()
            .take(COPILOT_LIST_LIMIT)
            .map(String::as_str)
            .collect();
        lines.push(format!("- Use: {}", used.join(", ")));
    }
    if !sections.avoidance_patterns.is_empty() {
        let avoided: Vec<&str> = sections
            .avoidance_patterns
            .iter()
            .take(COPILOT_LIST_LIMIT)
            .map(String::as_str)
            .collect();
        lines.push(format!("- Avoid: {}", avoided.join(", ")));
    }
    for voice_mode in VoiceMode::ALL {
        let condensed = mode_text(sections.mode(voice_mode), voice_mode).replace('\n', " ");
        lines.push(format!(
            "- {}) {}: {}",
            voice_mode.letter(),
            mode_heading(voice_mode),
            clip_mode(&condensed, COPILOT_MODE_CHARS)
        ));
    }

    lines.join("\n")
}

// Mode limits count the ellipsis
fn clip_mode(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    truncate_chars(text, limit.saturating_sub(ELLIPSIS.len()))
}

fn render_gemini(sections: &ExtractedSections) -> String {
    let title = if sections.user_name == crate::models::DEFAULT_USER_NAME {
        "MY VOICE PROFILE".to_string()
    } else {
        format!("MY VOICE PROFILE - {}", sections.user_name)
    };
    let mut out = format!(
        "I want you to write in my personal voice. Here is my voice profile in detail. Follow every section.\n\n{RULE}\n{title}\n{RULE}\n"
    );

    if let Some(identity) = &sections.voice_identity {
        out.push_str(&format!("\nVOICE IDENTITY:\n{}\n", identity));
    }
    if let Some(core) = &sections.core_voice {
        out.push_str(&format!("\nCORE VOICE:\n{}\n", core));
    }
    if let Some(mechanics) = &sections.sentence_mechanics {
        out.push_str(&format!("\nSENTENCE MECHANICS:\n{}\n", mechanics));
    }

    let numbered = |items: &[String]| {
        items
            .iter()
            .take(GEMINI_LIST_LIMIT)
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, item))
            .collect::<Vec<_>>()
            .join("\n")
    };
    if !sections.signature_patterns.is_empty() {
        out.push_str(&format!(
            "\nSIGNATURE PATTERNS (use naturally, not forced):\n{}\n",
            numbered(&sections.signature_patterns)
        ));
    }
    if !sections.avoidance_patterns.is_empty() {
        out.push_str(&format!(
            "\nAVOIDANCE PATTERNS (avoid unless explicitly requested):\n{}\n",
            numbered(&sections.avoidance_patterns)
        ));
    }

    out.push_str("\nWRITING MODES:\n");
    for (index, voice_mode) in VoiceMode::ALL.into_iter().enumerate() {
        out.push_str(&format!(
            "\n{}. Mode {} - {}\n{}\n",
            index + 1,
            voice_mode.letter(),
            mode_heading(voice_mode),
            clip_mode(&mode_text(sections.mode(voice_mode), voice_mode), GEMINI_MODE_CHARS)
        ));
    }

    out.trim_end().to_string()
}

fn render_generic(sections: &ExtractedSections) -> String {
    let mut out = format!(
        "VOICE PROFILE INSTRUCTIONS\n\nYou are helping me write content in my personal voice. Follow these notes.\n\nAbout my voice:\n{}\n",
        description(sections)
    );

    if !sections.signature_patterns.is_empty() {
        let used: Vec<&str> = sections
            .signature_patterns
            .iter()
            .take(DEFAULT_LIST_LIMIT)
            .map(String::as_str)
            .collect();
        out.push_str(&format!("\nPhrases I use: {}\n", used.join("; ")));
    }
    if !sections.avoidance_patterns.is_empty() {
        let avoided: Vec<&str> = sections
            .avoidance_patterns
            .iter()
            .take(DEFAULT_LIST_LIMIT)
            .map(String::as_str)
            .collect();
        out.push_str(&format!("Phrases I avoid: {}\n", avoided.join("; ")));
    }

    for voice_mode in VoiceMode::ALL {
        out.push_str(&format!(
            "\n{} writing:\n{}\n",
            mode_heading(voice_mode),
            mode_text(sections.mode(voice_mode), voice_mode)
        ));
    }

    out.trim_end().to_string()
}
