//! `cloakroom rules` — Show the active detection rule set.

use super::active_rules;
use cloakroom_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let rules = active_rules(&config);

    let source = if config.detector.rules.is_empty() {
        "built-in"
    } else {
        "config"
    };
    println!("Detection rules ({source}):");
    for rule in &rules {
        println!("  {:<28} {:<14} {}", rule.name, rule.kind.to_string(), rule.pattern);
    }

    Ok(())
}
