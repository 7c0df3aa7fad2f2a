//! `cloakroom roundtrip` — Mask then unmask, verifying reversibility.

use super::{build_session, read_input};
use cloakroom_config::AppConfig;

pub async fn run(text: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(text)?;
    let config = AppConfig::load()?;
    let session = build_session(&config)?;

    let masked = session.masker.mask(&text).await?;
    let restored = session.masker.unmask(&masked).await;

    println!("masked:   {masked}");
    println!("restored: {restored}");

    if restored == text {
        println!("✅ round trip OK ({} entries)", session.compendium.len().await);
        Ok(())
    } else {
        Err("round trip mismatch: restored text differs from input".into())
    }
}
