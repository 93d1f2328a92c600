use log::error;
use recipe_import::{server, ImporterConfig, RecipeImporter};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ImporterConfig::load()?;
    let importer = RecipeImporter::builder().config(&config).build()?;

    // One-shot mode: print the import result for a URL given as argument
    if let Some(url) = env::args().nth(1) {
        let response = importer.import(&url).await;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if let Err(e) = server::serve(&config.server, Arc::new(importer)).await {
        error!("{}", e);
        return Err(e.into());
    }
    Ok(())
}
