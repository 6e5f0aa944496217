use std::env;
use std::path::Path;

use skinsight::{AnalysisInput, AppConfig, SkinProfile, SkinType, SkincareAgent};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let input = args
        .get(1)
        .ok_or("Please provide a product name, an ingredient list, or an image path")?;

    let config = AppConfig::load()?;
    let agent = SkincareAgent::from_config(&config)?;
    let profile = profile_from_env();

    let input = if Path::new(input).is_file() {
        AnalysisInput::Image(std::fs::read(input)?)
    } else {
        AnalysisInput::Text(input.clone())
    };

    let report = agent.process(input, &profile).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Profile from SKIN_TYPE / SKIN_CONCERNS environment variables.
fn profile_from_env() -> SkinProfile {
    let skin_type = match env::var("SKIN_TYPE").unwrap_or_default().to_lowercase().as_str() {
        "dry" => SkinType::Dry,
        "oily" => SkinType::Oily,
        "combination" => SkinType::Combination,
        "sensitive" => SkinType::Sensitive,
        _ => SkinType::Normal,
    };

    let concerns = env::var("SKIN_CONCERNS")
        .map(|raw| {
            raw.split(',')
                .map(|concern| concern.trim().to_string())
                .filter(|concern| !concern.is_empty())
                .collect()
        })
        .unwrap_or_default();

    SkinProfile::new(skin_type, concerns)
}
