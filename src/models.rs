use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::VoiceError;

pub const DEFAULT_USER_NAME: &str = "User";
pub const TONE_FALLBACK: &str = "Analysis not available";
pub const SIGNATURES_FALLBACK: &str = "Signatures not available";
pub const ANTI_PATTERNS_FALLBACK: &str = "Anti-patterns not available";
pub const STRUCTURE_FALLBACK: &str = "Structure not specified";
pub const OPENINGS_FALLBACK: &str = "Openings not specified";
pub const CLOSINGS_FALLBACK: &str = "Closings not specified";
pub const EXAMPLE_FALLBACK: &str = "No example available";

// One writing mode section (casual, professional or formal)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSection {
    pub body: Option<String>,
    pub structure: Option<String>,
    pub openings: Option<String>,
    pub closings: Option<String>,
    pub example: Option<String>,
}

impl ModeSection {
    pub fn is_empty(&self) -> bool {
        self.body.is_none()
    }

    pub fn structure_or_default(&self) -> &str {
        self.structure.as_deref().unwrap_or(STRUCTURE_FALLBACK)
    }

    pub fn openings_or_default(&self) -> &str {
        self.openings.as_deref().unwrap_or(OPENINGS_FALLBACK)
    }

    pub fn closings_or_default(&self) -> &str {
        self.closings.as_deref().unwrap_or(CLOSINGS_FALLBACK)
    }

    pub fn example_or_default(&self) -> &str {
        self.example.as_deref().unwrap_or(EXAMPLE_FALLBACK)
    }
}

/// Sections pulled out of a voice profile. Every text field is optional
/// because older profiles use different heading schemes; list fields are
/// empty when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedSections {
    pub user_name: String,
    pub voice_identity: Option<String>,
    pub core_voice: Option<String>,
    pub tone_analysis: Option<String>,
    pub vocabulary_signatures: Option<String>,
    pub anti_patterns: Option<String>,
    pub signature_patterns: Vec<String>,
    pub avoidance_patterns: Vec<String>,
    pub sentence_mechanics: Option<String>,
    pub casual_mode: ModeSection,
    pub professional_mode: ModeSection,
    pub formal_mode: ModeSection,
}

impl Default for ExtractedSections {
    fn default() -> Self {
        Self {
            user_name: DEFAULT_USER_NAME.to_string(),
            voice_identity: None,
            core_voice: None,
            tone_analysis: None,
            vocabulary_signatures: None,
            anti_patterns: None,
            signature_patterns: Vec::new(),
            avoidance_patterns: Vec::new(),
            sentence_mechanics: None,
            casual_mode: ModeSection::default(),
            professional_mode: ModeSection::default(),
            formal_mode: ModeSection::default(),
        }
    }
}

impl ExtractedSections {
    /// Whether the two essential fields carry anything a renderer can use.
    pub fn has_core_content(&self) -> bool {
        let usable = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.trim().is_empty());
        usable(&self.core_voice) || usable(&self.voice_identity)
    }

    pub fn tone_or_default(&self) -> &str {
        self.tone_analysis.as_deref().unwrap_or(TONE_FALLBACK)
    }

    pub fn vocabulary_or_default(&self) -> &str {
        self.vocabulary_signatures.as_deref().unwrap_or(SIGNATURES_FALLBACK)
    }

    pub fn anti_patterns_or_default(&self) -> &str {
        self.anti_patterns.as_deref().unwrap_or(ANTI_PATTERNS_FALLBACK)
    }

    pub fn mode(&self, mode: VoiceMode) -> &ModeSection {
        match mode {
            VoiceMode::Casual => &self.casual_mode,
            VoiceMode::Professional => &self.professional_mode,
            VoiceMode::Formal => &self.formal_mode,
        }
    }
}

// Target AI platforms for exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    ChatGpt,
    Claude,
    Copilot,
    Gemini,
    Generic,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformInfo {
    pub id: PlatformId,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

impl PlatformId {
    pub const ALL: [PlatformId; 5] = [
        PlatformId::ChatGpt,
        PlatformId::Claude,
        PlatformId::Copilot,
        PlatformId::Gemini,
        PlatformId::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformId::ChatGpt => "chatgpt",
            PlatformId::Claude => "claude",
            PlatformId::Copilot => "copilot",
            PlatformId::Gemini => "gemini",
            PlatformId::Generic => "generic",
        }
    }

    pub fn info(&self) -> PlatformInfo {
        let (name, icon, description) = match self {
            PlatformId::ChatGpt => ("ChatGPT", "🤖", "Optimized for OpenAI ChatGPT"),
            PlatformId::Claude => ("Claude", "🧠", "XML-structured for Anthropic Claude"),
            PlatformId::Copilot => ("Copilot", "✈️", "Concise format for Microsoft Copilot"),
            PlatformId::Gemini => ("Gemini", "✨", "Detailed format for Google Gemini"),
            PlatformId::Generic => ("Universal", "📋", "Works with any AI assistant"),
        };
        PlatformInfo {
            id: *self,
            name,
            icon,
            description,
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformId {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PlatformId::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| VoiceError::UnknownPlatform(s.to_string()))
    }
}

/// One rendered export per platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformExportSet {
    pub chatgpt: String,
    pub claude: String,
    pub copilot: String,
    pub gemini: String,
    pub generic: String,
}

impl PlatformExportSet {
    pub fn get(&self, platform: PlatformId) -> &str {
        match platform {
            PlatformId::ChatGpt => &self.chatgpt,
            PlatformId::Claude => &self.claude,
            PlatformId::Copilot => &self.copilot,
            PlatformId::Gemini => &self.gemini,
            PlatformId::Generic => &self.generic,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlatformId, &str)> {
        PlatformId::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

// Formality modes offered by the A/B/C workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoiceMode {
    #[serde(rename = "A")]
    Casual,
    #[serde(rename = "B")]
    Professional,
    #[serde(rename = "C")]
    Formal,
}

impl VoiceMode {
    pub const ALL: [VoiceMode; 3] = [VoiceMode::Casual, VoiceMode::Professional, VoiceMode::Formal];

    pub fn letter(&self) -> char {
        match self {
            VoiceMode::Casual => 'A',
            VoiceMode::Professional => 'B',
            VoiceMode::Formal => 'C',
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            VoiceMode::Casual => "CASUAL/INTERNAL",
            VoiceMode::Professional => "PROFESSIONAL/EXTERNAL",
            VoiceMode::Formal => "FORMAL/EXECUTIVE",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            VoiceMode::Casual => "casual, friendly, for team members and internal communication",
            VoiceMode::Professional => "professional, balanced, for clients and business partners",
            VoiceMode::Formal => {
                "formal, polished, for board members, legal, and official correspondence"
            }
        }
    }
}

impl FromStr for VoiceMode {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "casual" => Ok(VoiceMode::Casual),
            "b" | "professional" => Ok(VoiceMode::Professional),
            "c" | "formal" => Ok(VoiceMode::Formal),
            _ => Err(VoiceError::UnknownVoiceMode(s.to_string())),
        }
    }
}

// Kind of phrase rule a user can append to their profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Avoid,
    Prefer,
}

impl FromStr for RuleType {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avoid" => Ok(RuleType::Avoid),
            "prefer" => Ok(RuleType::Prefer),
            _ => Err(VoiceError::UnknownRuleType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parsing_is_case_insensitive() {
        assert_eq!("ChatGPT".parse::<PlatformId>().unwrap(), PlatformId::ChatGpt);
        assert_eq!(" generic ".parse::<PlatformId>().unwrap(), PlatformId::Generic);
        assert!(matches!(
            "bard".parse::<PlatformId>(),
            Err(VoiceError::UnknownPlatform(_))
        ));
    }

    #[test]
    fn test_platform_serializes_lowercase() {
        let json = serde_json::to_string(&PlatformId::ChatGpt).unwrap();
        assert_eq!(json, "\"chatgpt\"");
    }

    #[test]
    fn test_default_sections_have_no_core_content() {
        let sections = ExtractedSections::default();
        assert!(!sections.has_core_content());
        assert_eq!(sections.user_name, "User");
        assert_eq!(sections.casual_mode.structure_or_default(), "Structure not specified");
        assert_eq!(sections.tone_or_default(), "Analysis not available");
    }

    #[test]
    fn test_blank_core_voice_is_not_core_content() {
        let sections = ExtractedSections {
            core_voice: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!sections.has_core_content());
    }

    #[test]
    fn test_voice_mode_accepts_letters_and_names() {
        assert_eq!("a".parse::<VoiceMode>().unwrap(), VoiceMode::Casual);
        assert_eq!("Formal".parse::<VoiceMode>().unwrap(), VoiceMode::Formal);
        assert!("D".parse::<VoiceMode>().is_err());
        assert_eq!(VoiceMode::Professional.letter(), 'B');
    }
}
