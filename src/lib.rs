// This file exposes the modules as public modules in the crate

pub mod config;
pub mod errors;
pub mod export_cache;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod modification_prompts;
pub mod platform_prompts;
pub mod prompt_parser;
pub mod request_builder;
pub mod rule_editor;

pub use errors::{VoiceError, VoiceResult};
pub use models::{ExtractedSections, PlatformExportSet, PlatformId, VoiceMode};
pub use modification_prompts::{ModificationType, instruction_for};
pub use platform_prompts::{ExportStyle, render_all, render_for_platform};
pub use prompt_parser::extract_sections;
