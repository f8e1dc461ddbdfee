//! Topics command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use nbevents_actions::TopicRegistry;
use nbevents_store::SqliteStore;

/// Execute the topics command.
///
/// Builds the registry so configuration errors surface here too.
pub fn execute_topics(config: &Config, formatter: &Formatter) -> Result<()> {
    let registry: TopicRegistry<SqliteStore> = TopicRegistry::from_config(&config.actions)?;
    println!(
        "{}",
        formatter.format_topics(&registry.topics(), &config.actions.disabled_topics)?
    );
    Ok(())
}
