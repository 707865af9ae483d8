//! Repair Assist API
//!
//! An HTTP service for construction-vehicle repair technicians. It turns
//! vehicle models, error codes and issue descriptions into prompts for a
//! generative-AI backend and returns the generated text, SVG or image
//! content.

mod api;
mod conversion;
mod core;
mod flows;
mod maintenance;
mod models;

use crate::api::endpoints::{AppState, create_router};
use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::provider::{Provider, ProviderError, ProviderType};
use crate::core::providers::{GeminiProvider, OpenAIProvider};
use crate::flows::FlowContext;
use crate::maintenance::MaintenanceStore;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    dotenv::dotenv().ok();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config.log_level);

    print_startup_banner(&config);

    if !config.has_default_api_key() {
        warn!("No default API key configured; clients must send their own key");
    }

    // Create provider based on configuration
    let provider: Arc<dyn Provider> = match build_provider(&config) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to create provider: {}", e);
            std::process::exit(1);
        }
    };

    info!("Using provider: {}", provider.provider_name());

    let app_state = AppState {
        config: config.clone(),
        flows: Arc::new(FlowContext::new(&config, provider)),
        maintenance: Arc::new(MaintenanceStore::new()),
    };

    let app = create_router(app_state);

    // Bind to address
    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn build_provider(config: &Config) -> Result<Arc<dyn Provider>, ProviderError> {
    let provider: Arc<dyn Provider> = match config.provider {
        ProviderType::Gemini => Arc::new(GeminiProvider::new(
            config.base_url.clone(),
            config.request_timeout,
        )?),
        ProviderType::OpenAI => Arc::new(OpenAIProvider::new(
            config.base_url.clone(),
            config.request_timeout,
        )?),
    };
    Ok(provider)
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    println!("🚜 Repair Assist API v0.1.0");
    println!("✅ Configuration loaded successfully");
    println!("   Provider: {:?}", config.provider);
    println!("   Base URL: {}", config.base_url);
    println!("   Text Model: {}", config.text_model);
    println!("   Image Model: {}", config.image_model);
    println!("   Max Output Tokens: {}", config.max_output_tokens);
    println!("   Max History Messages: {}", config.max_history_messages);
    println!("   Request Timeout: {}s", config.request_timeout);
    println!("   Server: {}:{}", config.host, config.port);
    println!(
        "   Default API Key: {}",
        if config.has_default_api_key() {
            "Configured"
        } else {
            "Not set (per-request keys only)"
        }
    );
    println!();
}

/// Print help message
fn print_help() {
    println!("Repair Assist API v0.1.0");
    println!();
    println!("Usage: repair-assist [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Configuration is read from config.toml (override with CONFIG_PATH).");
    println!("A .env file in the working directory is loaded first.");
    println!();
    println!("Environment variables:");
    println!("  CONFIG_PATH    - Path to the TOML configuration file (default: config.toml)");
    println!("  GEMINI_API_KEY - Default Gemini API key when [gemini].api_key is not set");
    println!("  RUST_LOG       - Overrides the configured log level");
    println!();
    println!("Config sections:");
    println!("  provider   - gemini (default) or openai (OpenAI-compatible gateways)");
    println!("  [gemini]   - api_key, base_url");
    println!("  [openai]   - api_key, base_url");
    println!("  [models]   - text_model, image_model");
    println!("  [server]   - host, port, log_level");
    println!("  [request]  - request_timeout, max_history_messages, max_output_tokens, temperature");
}
