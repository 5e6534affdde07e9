use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{VoiceError, VoiceResult};

/// Closed set of one-click adjustments offered after generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationType {
    Shorter,
    Longer,
    MoreCasual,
    MoreProfessional,
    MoreLikeMe,
    Clearer,
    AudienceTeam,
    AudienceClient,
    AudienceExecutive,
    Rewrite,
}

impl ModificationType {
    pub const ALL: [ModificationType; 10] = [
        ModificationType::Shorter,
        ModificationType::Longer,
        ModificationType::MoreCasual,
        ModificationType::MoreProfessional,
        ModificationType::MoreLikeMe,
        ModificationType::Clearer,
        ModificationType::AudienceTeam,
        ModificationType::AudienceClient,
        ModificationType::AudienceExecutive,
        ModificationType::Rewrite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModificationType::Shorter => "shorter",
            ModificationType::Longer => "longer",
            ModificationType::MoreCasual => "more_casual",
            ModificationType::MoreProfessional => "more_professional",
            ModificationType::MoreLikeMe => "more_like_me",
            ModificationType::Clearer => "clearer",
            ModificationType::AudienceTeam => "audience_team",
            ModificationType::AudienceClient => "audience_client",
            ModificationType::AudienceExecutive => "audience_executive",
            ModificationType::Rewrite => "rewrite",
        }
    }

    /// Short menu label
    pub fn label(&self) -> &'static str {
        match self {
            ModificationType::Shorter => "📉 Shorter",
            ModificationType::Longer => "📈 Longer",
            ModificationType::MoreCasual => "😊 More Casual",
            ModificationType::MoreProfessional => "👔 More Professional",
            ModificationType::MoreLikeMe => "🎯 More like me",
            ModificationType::Clearer => "💡 Clearer",
            ModificationType::AudienceTeam => "👥 For my team",
            ModificationType::AudienceClient => "🤝 For a client",
            ModificationType::AudienceExecutive => "🏛️ For executives",
            ModificationType::Rewrite => "🔄 Complete Rewrite",
        }
    }

    /// Instruction text sent to the model alongside the content.
    pub fn instruction(&self) -> &'static str {
        match self {
            ModificationType::Shorter => {
                "CRITICAL INSTRUCTION: Make this SIGNIFICANTLY shorter.
- Cut the length by AT LEAST 40-50%
- Remove all filler words, redundant phrases, and unnecessary details
- Keep only the essential message
- Combine sentences where possible
- This MUST be noticeably shorter than the original"
            }
            ModificationType::Longer => {
                "CRITICAL INSTRUCTION: Make this SIGNIFICANTLY longer.
- Expand by AT LEAST 40-50% more content
- Add more context, details, and examples
- Elaborate on key points
- Add supporting information
- This MUST be noticeably longer than the original"
            }
            ModificationType::MoreCasual => {
                "CRITICAL INSTRUCTION: Make this MUCH more casual and relaxed.
- Use contractions (I'm, you're, we'll, etc.)
- Use informal language and shorter sentences
- Add friendly touches (hey, thanks, cheers, etc.)
- Remove formal business language completely
- Make it sound like talking to a friend
- This MUST feel significantly more casual than the original"
            }
            ModificationType::MoreProfessional => {
                "CRITICAL INSTRUCTION: Make this MUCH more professional and polished.
- Remove all contractions
- Use formal business language
- Remove casual expressions and slang
- Use complete, well-structured sentences
- Add professional courtesies
- This MUST feel significantly more formal than the original"
            }
            ModificationType::MoreLikeMe => {
                "CRITICAL INSTRUCTION: Intensify the personal voice characteristics.
- Use MORE of the signature phrases from the voice profile
- Emphasize the unique vocabulary patterns
- Make sentence structure match the profile more closely
- This should sound UNMISTAKABLY like the user's voice"
            }
            ModificationType::Clearer => {
                "CRITICAL INSTRUCTION: Make this MUCH clearer and easier to understand.
- Break complex sentences into simpler ones
- Use plain language instead of jargon
- Organize information logically
- Add transition words for flow
- Remove ambiguity
- A 10-year-old should be able to understand the main point"
            }
            ModificationType::AudienceTeam => {
                "CRITICAL INSTRUCTION: Rewrite for an internal team audience.
- Use casual, friendly language
- Assume shared context and knowledge
- Be direct and skip formalities
- Use \"we\" and \"us\" language
- Keep it brief and action-oriented"
            }
            ModificationType::AudienceClient => {
                "CRITICAL INSTRUCTION: Rewrite for a client/external audience.
- Be professional but warm
- Explain context that might not be obvious
- Focus on value and benefits to them
- Be respectful of their time
- Use \"you\" focused language"
            }
            ModificationType::AudienceExecutive => {
                "CRITICAL INSTRUCTION: Rewrite for an executive audience.
- Lead with the key point/ask upfront
- Be extremely concise
- Focus on business impact and decisions needed
- Remove all unnecessary detail
- Use bullet points if listing multiple items
- Maximum 3-4 sentences unless absolutely necessary"
            }
            ModificationType::Rewrite => {
                "CRITICAL INSTRUCTION: Generate a COMPLETELY DIFFERENT version.
- Same core message but entirely new wording
- Different sentence structures
- Different opening and closing
- This should NOT look like a minor edit, it must be a fresh version
- Keep the same intent but express it in a new way"
            }
        }
    }
}

impl fmt::Display for ModificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModificationType {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModificationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| VoiceError::UnknownModificationType(s.to_string()))
    }
}

/// Look up the instruction for a raw tag.
pub fn instruction_for(tag: &str) -> VoiceResult<&'static str> {
    tag.parse::<ModificationType>().map(|t| t.instruction())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_asks_for_fresh_version() {
        let instruction = instruction_for("rewrite").unwrap();
        assert!(instruction.contains("fresh version"));
        assert!(instruction.starts_with("CRITICAL INSTRUCTION"));
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = instruction_for("not_a_real_type").unwrap_err();
        assert!(matches!(err, VoiceError::UnknownModificationType(ref t) if t == "not_a_real_type"));
    }

    #[test]
    fn test_tags_are_exact() {
        assert!(instruction_for("Shorter").is_err());
        assert!(instruction_for(" shorter").is_err());
        assert!(instruction_for("shorter").is_ok());
    }

    #[test]
    fn test_every_type_round_trips_through_its_tag() {
        for modification in ModificationType::ALL {
            assert_eq!(modification.as_str().parse::<ModificationType>().unwrap(), modification);
            assert!(!modification.instruction().is_empty());
            assert!(!modification.label().is_empty());
        }
    }

    #[test]
    fn test_serde_uses_snake_case_tags() {
        let json = serde_json::to_string(&ModificationType::AudienceExecutive).unwrap();
        assert_eq!(json, "\"audience_executive\"");
        let parsed: ModificationType = serde_json::from_str("\"more_like_me\"").unwrap();
        assert_eq!(parsed, ModificationType::MoreLikeMe);
    }
}
