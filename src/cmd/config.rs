//! Configuration inspection — `cinder config`.

use anyhow::Result;
use std::path::Path;

use cinder::cinder_config::CinderToml;

use crate::ConfigCommands;

pub fn cmd_config(project_dir: &Path, command: Option<ConfigCommands>) -> Result<()> {
    match command.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => {
            let path = CinderToml::path(project_dir);
            if !path.exists() {
                println!("Using default configuration ({} not found)", path.display());
            }
            let config = CinderToml::load_or_default(project_dir)?;
            println!();
            println!("Model: {}", config.model.name);
            println!("Compression:");
            println!("  enabled: {}", config.compression.enabled);
            println!("  threshold: {}%", config.compression.threshold);
            println!("  strategy: {}", config.compression.strategy);
            println!(
                "  preserve_tool_history: {}",
                config.compression.preserve_tool_history
            );
            println!(
                "  preserve_recent_messages: {}",
                config.compression.preserve_recent_messages
            );
            println!(
                "  notify_before_compression: {}",
                config.compression.notify_before_compression
            );
        }
        ConfigCommands::Validate => {
            // load_or_default already rejects malformed and out-of-domain
            // values, so reaching this line means the file is good.
            CinderToml::load_or_default(project_dir)?;
            println!("Configuration OK");
        }
        ConfigCommands::Init => {
            let path = CinderToml::path(project_dir);
            if CinderToml::init(project_dir)? {
                println!("Created {}", path.display());
            } else {
                println!("Config already exists at {}", path.display());
            }
        }
    }

    Ok(())
}
