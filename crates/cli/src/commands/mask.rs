//! `cloakroom mask` — Mask PII in text and print the result.

use super::{build_session, read_input};
use cloakroom_config::AppConfig;

pub async fn run(
    text: Option<String>,
    show_compendium: bool,
    tree: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(text)?;
    let config = AppConfig::load()?;
    let session = build_session(&config)?;

    let masked = session.masker.mask(&text).await?;
    println!("{masked}");

    if show_compendium {
        let export = if tree {
            session.compendium.export_tree().await
        } else {
            session.compendium.export().await
        };
        println!("{}", serde_json::to_string_pretty(&export)?);
    }

    Ok(())
}
