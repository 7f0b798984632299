use std::path::PathBuf;

use backoffice_onboarding::config::ApiConfig;
use backoffice_onboarding::onboarding::{OnboardingOrchestrator, ProgressUpdate, load_request};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let manifest_path = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("Usage: backoffice-onboard <manifest.json>");
            eprintln!("  BACKOFFICE_API_BASE_URL and BACKOFFICE_API_TOKEN must be set.");
            std::process::exit(2);
        }
    };

    let config = ApiConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    });

    let request = load_request(&manifest_path).await.unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(2);
    });

    eprintln!("Onboarding registration {}", request.registration_id);
    eprintln!("   API: {}", config.base_url);
    eprintln!("   Documents: {}", request.documents.len());

    let orchestrator = OnboardingOrchestrator::from_config(&config)?;
    let progress = |update: &ProgressUpdate| -> anyhow::Result<()> {
        eprintln!("   {}", update.label);
        Ok(())
    };

    match orchestrator.run(&request, &progress).await {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("Onboarding failed at step {}: {}", e.step, e.message);
            eprintln!("   Progress: {}", e.partial.summary());
            eprintln!("{}", serde_json::to_string_pretty(&e.partial)?);
            std::process::exit(1);
        }
    }
}
