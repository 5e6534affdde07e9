use actix_web::{HttpResponse, Responder, ResponseError, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::errors::ErrorBody;
use crate::export_cache::{CacheStats, ExportCache};
use crate::modification_prompts::ModificationType;
use crate::models::{ExtractedSections, PlatformExportSet, PlatformId, PlatformInfo, RuleType};
use crate::platform_prompts::ExportStyle;
use crate::prompt_parser::{DEFAULT_PREVIEW_LENGTH, extract_sections, first_lines, prompt_preview, voice_summary};
use crate::request_builder::{CompletionRequest, modification_request};
use crate::rule_editor::{RuleOutcome, add_rule};

pub const PREVIEW_LINE_COUNT: usize = 3;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

// Shared state for the JSON API
pub struct AppState {
    pub config: ServiceConfig,
    pub cache: ExportCache,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        let cache = ExportCache::new(config.export_cache_capacity);
        Self { config, cache }
    }
}

#[derive(Deserialize)]
pub struct ProfileRequest {
    pub prompt_text: String,
}

#[derive(Serialize)]
pub struct SectionsResponse {
    pub sections: ExtractedSections,
    pub has_core_content: bool,
}

#[derive(Deserialize)]
pub struct ExportRequest {
    pub prompt_text: String,
    pub platform: Option<String>,
    pub style: Option<ExportStyle>,
}

#[derive(Serialize)]
pub struct SingleExportResponse {
    pub platform: PlatformId,
    pub content: String,
    pub generated_at: String,
}

#[derive(Serialize)]
pub struct AllExportsResponse {
    pub exports: PlatformExportSet,
    pub generated_at: String,
}

#[derive(Serialize)]
pub struct ModificationOption {
    pub id: ModificationType,
    pub label: &'static str,
}

#[derive(Deserialize)]
pub struct ModificationRequest {
    pub original_content: String,
    pub modification_type: String,
    pub temperature: Option<f32>,
    pub prompt_text: Option<String>,
}

#[derive(Serialize)]
pub struct ModificationResponse {
    pub modification_type: ModificationType,
    pub request: CompletionRequest,
}

#[derive(Deserialize)]
pub struct AddRuleRequest {
    pub prompt_text: String,
    pub phrase: String,
    pub rule_type: String,
}

#[derive(Serialize)]
pub struct AddRuleResponse {
    pub success: bool,
    pub message: String,
    pub already_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_text: Option<String>,
}

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub prompt_text: String,
    pub max_len: Option<usize>,
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub preview: String,
    pub first_lines: String,
    pub summary: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: CacheStats,
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorBody {
        error: message.to_string(),
    })
}

// API endpoint to extract sections from a profile
pub async fn sections_handler(req: web::Json<ProfileRequest>) -> impl Responder {
    let sections = extract_sections(&req.prompt_text);
    let has_core_content = sections.has_core_content();
    HttpResponse::Ok().json(SectionsResponse {
        sections,
        has_core_content,
    })
}

// API endpoint to export a profile for one platform or all of them
pub async fn export_handler(req: web::Json<ExportRequest>, data: web::Data<AppState>) -> impl Responder {
    let style = req.style.unwrap_or(data.config.export_style);
    let platform = match req.platform.as_deref().map(str::parse::<PlatformId>) {
        Some(Ok(platform)) => Some(platform),
        Some(Err(e)) => return e.error_response(),
        None => None,
    };

    let exports = data.cache.get_or_render(&req.prompt_text, style);
    let generated_at = Utc::now().to_rfc3339();

    match platform {
        Some(platform) => {
            debug!("Exported profile for {}", platform);
            HttpResponse::Ok().json(SingleExportResponse {
                platform,
                content: exports.get(platform).to_string(),
                generated_at,
            })
        }
        None => HttpResponse::Ok().json(AllExportsResponse {
            exports: (*exports).clone(),
            generated_at,
        }),
    }
}

// API endpoint to list export platforms
pub async fn platforms_handler() -> impl Responder {
    let platforms: Vec<PlatformInfo> = PlatformId::ALL.iter().map(PlatformId::info).collect();
    HttpResponse::Ok().json(platforms)
}

// API endpoint to list modification options
pub async fn modifications_handler() -> impl Responder {
    let options: Vec<ModificationOption> = ModificationType::ALL
        .into_iter()
        .map(|id| ModificationOption { id, label: id.label() })
        .collect();
    HttpResponse::Ok().json(options)
}

// API endpoint to build a modification request for the completion model
pub async fn modification_handler(req: web::Json<ModificationRequest>) -> impl Responder {
    if req.original_content.trim().is_empty() {
        return bad_request("Missing required fields");
    }

    let modification = match req.modification_type.parse::<ModificationType>() {
        Ok(modification) => modification,
        Err(e) => return e.error_response(),
    };

    let request = modification_request(
        req.prompt_text.as_deref(),
        &req.original_content,
        modification,
        req.temperature.unwrap_or(DEFAULT_TEMPERATURE),
    );

    HttpResponse::Ok().json(ModificationResponse {
        modification_type: modification,
        request,
    })
}

// API endpoint to add an avoid/prefer rule to a profile
pub async fn add_rule_handler(req: web::Json<AddRuleRequest>) -> impl Responder {
    let rule_type = match req.rule_type.parse::<RuleType>() {
        Ok(rule_type) => rule_type,
        Err(e) => return e.error_response(),
    };

    match add_rule(&req.prompt_text, &req.phrase, rule_type) {
        Ok(RuleOutcome::Added { prompt_text, message }) => {
            info!("Rule added ({:?})", rule_type);
            HttpResponse::Ok().json(AddRuleResponse {
                success: true,
                message,
                already_exists: false,
                prompt_text: Some(prompt_text),
            })
        }
        Ok(RuleOutcome::AlreadyPresent { message }) => HttpResponse::Ok().json(AddRuleResponse {
            success: true,
            message,
            already_exists: true,
            prompt_text: None,
        }),
        Err(e) => e.error_response(),
    }
}

// API endpoint for profile previews shown in lists
pub async fn preview_handler(req: web::Json<PreviewRequest>) -> impl Responder {
    let max_len = req.max_len.unwrap_or(DEFAULT_PREVIEW_LENGTH);
    HttpResponse::Ok().json(PreviewResponse {
        preview: prompt_preview(&req.prompt_text, max_len),
        first_lines: first_lines(&req.prompt_text, PREVIEW_LINE_COUNT),
        summary: voice_summary(&req.prompt_text),
    })
}

pub async fn health_handler(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        cache: data.cache.stats(),
    })
}

// JSON extractor errors come back in the same `{ "error": ... }` shape
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(err, bad_request(&message)).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::scope("/api")
                .route("/sections", web::post().to(sections_handler))
                .route("/export", web::post().to(export_handler))
                .route("/platforms", web::get().to(platforms_handler))
                .route("/modifications", web::get().to(modifications_handler))
                .route("/modification", web::post().to(modification_handler))
                .route("/prompt/add-rule", web::post().to(add_rule_handler))
                .route("/prompt/preview", web::post().to(preview_handler)),
        )
        .route("/health", web::get().to(health_handler));
}
