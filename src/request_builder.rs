// Assembly of the instructions sent to the completion model.
// Nothing here performs the HTTP call; callers hand a CompletionRequest to
// whatever client they use.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::errors::{VoiceError, VoiceResult};
use crate::modification_prompts::ModificationType;
use crate::models::VoiceMode;
use crate::prompt_parser::extract_sections;

pub const GENERATION_TEMPERATURE: f32 = 0.5;
pub const GENERATION_MAX_TOKENS: u32 = 4500;
pub const CHAT_MAX_TOKENS: u32 = 2000;
pub const VOICE_TEST_TEMPERATURE: f32 = 0.7;
pub const VOICE_TEST_MAX_TOKENS: u32 = 1000;
pub const REFINE_TEMPERATURE: f32 = 0.7;
pub const REFINE_MAX_TOKENS: u32 = 2500;
pub const MIN_TEMPERATURE: f32 = 0.1;
pub const MAX_TEMPERATURE: f32 = 1.0;
pub const MODIFICATION_TEMPERATURE_BUMP: f32 = 0.1;
pub const SAMPLE_SEPARATOR: &str = "\n\n---SAMPLE BREAK---\n\n";

const GENERIC_ASSISTANT_PROMPT: &str = "You are a helpful writing assistant.";

lazy_static! {
    static ref FENCE_OPEN: Regex = Regex::new(r"(?m)^```\w*\n?").unwrap();
    static ref FENCE_CLOSE: Regex = Regex::new(r"(?m)\n?```$").unwrap();
}

/// Instructions given to the model that turns writing samples into a profile.
pub const PROFILE_BUILDER_PROMPT: &str = r###"You are a Prompt Architect. Analyze the user's writing samples and produce a complete, structured and enforceable Personal Writing Voice Prompt (IMV) that lets any AI assistant write consistently in the user's own voice.

Derive every rule from the samples themselves, never from generic writing advice. Never forbid a phrase that appears naturally in the samples.

===========================================
REQUIRED SECTIONS
===========================================

Output one IMV prompt with these sections, in this order, with no section omitted:

## 1. VOICE IDENTITY & ROLE DEFINITION
The AI is a writing assistant that mimics the user's voice. "Write in the user's voice, not your own."

## 2. CORE VOICE FOUNDATION
Overall tone, emotional texture, sentence style, paragraph structure, vocabulary level and pacing, each as concrete behaviour.

## 3. LANGUAGE PATTERN ANALYSIS
### A. Commonly Used Language (Signature Patterns)
Quote frequent phrases, closings and transitions exactly as written.
### B. Rarely or Never Used Language (Avoidance Patterns)
Inferred from absence. Frame as "Avoid unless the user explicitly requests a different tone."
### C. Neutral Language

## 4. SENTENCE & PARAGRAPH MECHANICS
Sentence length, fragments, punctuation habits, paragraph density and rhythm.

## 5. AUDIENCE & WRITING MODES
### CASUAL / INTERNAL
### PROFESSIONAL / EXTERNAL
### FORMAL / EXECUTIVE
For each mode: tone adjustments, structure rules, opening patterns, closing patterns, punctuation rules and one realistic example paragraph.

## 6. WORKFLOW LOGIC
## 7. REFINEMENT & ADJUSTMENT RULES
## 8. LENGTH & CLARITY CONTROLS
## 9. FEW-SHOT EXAMPLES
One example of 3-5 sentences per mode.
## 10. DRIFT PREVENTION & RE-ANCHORING
Support the command: "Reapply my IMV voice profile and rewrite the last response."
## 11. OUTPUT GUARDRAILS
## 12. ENDING REFINEMENT MENU
## 13. QUALITY ASSURANCE

===========================================
FINAL OUTPUT RULE
===========================================

Output only the finished IMV prompt with clear section headers. Do not output analysis or explain these instructions.
Start directly with "## 1. VOICE IDENTITY & ROLE DEFINITION""###;

const REFINE_SYSTEM_PROMPT: &str = r#"You are an expert at refining IMV (In My Voice) prompts that help AI assistants write in someone's authentic voice.

TASK: Refine the given IMV prompt based on user feedback while preserving its structure and format.

CRITICAL RULES:
1. Keep the same template structure and section headers
2. Keep all content unrelated to the feedback
3. Make targeted changes for the specific feedback only
4. Keep all modes (A, B, C) intact
5. The refined prompt must be usable immediately, with no placeholders
6. Use directive language ("Use..." not "tends to use...")

OUTPUT RULES:
- Return ONLY the refined prompt text
- No explanations, notes or commentary
- Do NOT wrap the output in markdown code blocks"#;

/// Everything a chat-completion call needs, minus the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Kind of content the user is drafting in chat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritingMode {
    #[default]
    General,
    Email,
    Linkedin,
    Twitter,
    Slack,
    FormalLetter,
}

impl WritingMode {
    pub const ALL: [WritingMode; 6] = [
        WritingMode::General,
        WritingMode::Email,
        WritingMode::Linkedin,
        WritingMode::Twitter,
        WritingMode::Slack,
        WritingMode::FormalLetter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WritingMode::General => "general",
            WritingMode::Email => "email",
            WritingMode::Linkedin => "linkedin",
            WritingMode::Twitter => "twitter",
            WritingMode::Slack => "slack",
            WritingMode::FormalLetter => "formal_letter",
        }
    }

    /// Extra format guidance appended to the chat system prompt
    pub fn context(&self) -> &'static str {
        match self {
            WritingMode::General => "",
            WritingMode::Email => {
                "The user is writing an email. Structure your response as a complete email with:
- Appropriate greeting
- Clear body paragraphs
- Professional sign-off
Match the formality to the context (internal vs external, peer vs executive)."
            }
            WritingMode::Linkedin => {
                "The user is writing a LinkedIn post. Make it:
- Engaging hook in the first line
- Easy to scan (short paragraphs, line breaks)
- Professional but personable
- Include a call-to-action or question at the end
- Appropriate length (150-300 words for posts)"
            }
            WritingMode::Twitter => {
                "The user is writing for Twitter/X. Make it:
- Punchy and concise (under 280 characters for single tweets)
- If it's a thread, number each tweet and keep them standalone but connected
- Conversational and engaging
- Use line breaks for readability"
            }
            WritingMode::Slack => {
                "The user is writing a Slack message. Make it:
- Concise and scannable
- Friendly but professional
- Use bullet points if listing multiple items
- Direct and action-oriented"
            }
            WritingMode::FormalLetter => {
                "The user is writing a formal letter. Structure it with:
- Proper letter formatting (date, addresses if needed)
- Formal salutation
- Clear, well-organized paragraphs
- Professional closing
- Formal tone throughout"
            }
        }
    }
}

impl fmt::Display for WritingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WritingMode {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WritingMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| VoiceError::UnknownWritingMode(s.to_string()))
    }
}

/// Clamp a caller-supplied temperature into the accepted range.
pub fn clamp_temperature(temperature: f32) -> f32 {
    if temperature.is_nan() {
        return MIN_TEMPERATURE;
    }
    temperature.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
}

/// Request that turns writing samples into a new voice profile.
pub fn generation_request(samples: &[String], total_words: usize) -> VoiceResult<CompletionRequest> {
    if samples.is_empty() {
        return Err(VoiceError::NoSamples);
    }

    let combined = samples.join(SAMPLE_SEPARATOR);
    let user_prompt = format!(
        "Analyze these {} writing samples ({} words total) and generate a complete IMV voice profile.

CRITICAL REMINDERS:
- Extract patterns FROM these samples, not generic writing advice
- Quote exact phrases the user actually wrote
- Identify avoidance patterns by what's ABSENT, not from a generic list
- Make examples sound like THIS person
- Every rule must be traceable to evidence in the samples

WRITING SAMPLES:

{}

Generate the complete IMV prompt now. Start with \"## 1. VOICE IDENTITY & ROLE DEFINITION\"",
        samples.len(),
        total_words,
        combined
    );

    Ok(CompletionRequest {
        system_prompt: PROFILE_BUILDER_PROMPT.to_string(),
        user_prompt,
        temperature: GENERATION_TEMPERATURE,
        max_tokens: GENERATION_MAX_TOKENS,
    })
}

/// System prompt for drafting in the user's voice.
pub fn chat_system_prompt(profile_text: &str, writing_mode: WritingMode) -> String {
    format!(
        "{}

---

You are helping the user write content in their personal voice as defined above.
{}

Important:
- Always match the user's voice profile
- Use their signature phrases and vocabulary naturally
- Never use words/phrases from their \"avoid\" list
- Match the appropriate formality level for the task",
        profile_text,
        writing_mode.context()
    )
}

pub fn chat_request(
    profile_text: &str,
    writing_mode: WritingMode,
    message: &str,
    temperature: f32,
) -> VoiceResult<CompletionRequest> {
    if message.trim().is_empty() {
        return Err(VoiceError::EmptyMessage);
    }

    Ok(CompletionRequest {
        system_prompt: chat_system_prompt(profile_text, writing_mode),
        user_prompt: message.to_string(),
        temperature: clamp_temperature(temperature),
        max_tokens: CHAT_MAX_TOKENS,
    })
}

/// Request that applies a one-click modification to generated content.
pub fn modification_request(
    profile_text: Option<&str>,
    original_content: &str,
    modification: ModificationType,
    temperature: f32,
) -> CompletionRequest {
    let system_prompt = match profile_text {
        Some(profile) if !profile.trim().is_empty() => format!(
            "{}\n\n---\n\nYou are helping modify content while maintaining the user's voice profile above.",
            profile
        ),
        _ => GENERIC_ASSISTANT_PROMPT.to_string(),
    };

    let user_prompt = format!(
        "Here is the content to modify:\n\n---\n{}\n---\n\nModification requested: {}\n\nPlease provide the modified version only, without any explanation or preamble.",
        original_content,
        modification.instruction()
    );

    // Slightly warmer than the original draft so variations differ
    let temperature = clamp_temperature(temperature + MODIFICATION_TEMPERATURE_BUMP);
    debug!("Building {} modification at temperature {:.2}", modification, temperature);

    CompletionRequest {
        system_prompt,
        user_prompt,
        temperature,
        max_tokens: CHAT_MAX_TOKENS,
    }
}

/// Request that drafts sample content in one mode, for previewing a profile.
pub fn voice_test_request(profile_text: &str, mode: VoiceMode, test_request: &str) -> CompletionRequest {
    let sections = extract_sections(profile_text);

    let core_block = sections
        .core_voice
        .as_deref()
        .map(|core| format!("CORE VOICE RULES:\n{}\n", core))
        .unwrap_or_default();
    let mode_block = sections
        .mode(mode)
        .body
        .as_deref()
        .map(|body| format!("CURRENT MODE - {}:\n{}\n", mode.display_name(), body))
        .unwrap_or_default();

    let system_prompt = format!(
        "You are an AI assistant that writes in a specific person's voice and style.

{core_block}
{mode_block}
WRITING INSTRUCTIONS:
- Write in {} tone
- Follow all voice patterns, vocabulary signatures, and style rules above
- Avoid any anti-patterns or phrases marked as \"NEVER USE\"
- Match the sentence structure and length patterns specified
- Use the openings and closings appropriate for this mode
- Write naturally as if you ARE this person, not imitating them

OUTPUT RULES:
- Write ONLY the requested content
- Do NOT include explanations, meta-commentary, or notes
- Do NOT use phrases like \"Here's...\" or \"Sure, here you go...\"
- Start directly with the content",
        mode.description()
    );

    CompletionRequest {
        system_prompt,
        user_prompt: test_request.to_string(),
        temperature: VOICE_TEST_TEMPERATURE,
        max_tokens: VOICE_TEST_MAX_TOKENS,
    }
}

/// Request that revises a profile from free-form feedback.
pub fn refine_request(current_profile: &str, feedback: &str) -> CompletionRequest {
    let user_prompt = format!(
        "Here is the current IMV prompt:\n\n---\n{}\n---\n\nUser feedback for refinement:\n\"{}\"\n\nPlease refine the prompt to incorporate this feedback while keeping the overall structure intact. Return only the refined prompt.",
        current_profile, feedback
    );

    CompletionRequest {
        system_prompt: REFINE_SYSTEM_PROMPT.to_string(),
        user_prompt,
        temperature: REFINE_TEMPERATURE,
        max_tokens: REFINE_MAX_TOKENS,
    }
}

/// Strip markdown code fences the model may wrap a refined profile in.
pub fn clean_refined_output(text: &str) -> String {
    let without_open = FENCE_OPEN.replace_all(text, "");
    FENCE_CLOSE.replace_all(&without_open, "").trim().to_string()
}
