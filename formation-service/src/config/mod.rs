use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_TEMPLATE_PATH: &str = "/templates/SUIVI_DE_FORMATION_VIERGE.docx";

#[derive(Debug, Clone)]
pub struct FormationConfig {
    pub common: core_config::Config,
    pub template: TemplateConfig,
}

#[derive(Debug, Clone)]
pub struct TemplateConfig {
    pub path: String,
}

impl FormationConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and the PORT variable).
        let common = core_config::Config::load()?;

        Ok(FormationConfig {
            common,
            template: TemplateConfig {
                path: get_env("TEMPLATE_PATH", DEFAULT_TEMPLATE_PATH),
            },
        })
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
