//! Context usage status — `cinder status`.

use anyhow::Result;
use std::path::Path;

use cinder::cinder_config::CinderToml;
use cinder::compression::compute_usage;
use cinder::ui::{self, UsageSeverity};

use super::{load_session, session_path};
use crate::Cli;

pub fn cmd_status(project_dir: &Path, cli: &Cli) -> Result<()> {
    let config = CinderToml::load_or_default(project_dir)?;
    let path = session_path(project_dir, cli);

    let Some(session) = load_session(&path)? else {
        println!("No session found at {}", path.display());
        return Ok(());
    };

    let model = cli
        .model
        .clone()
        .unwrap_or_else(|| session.model.clone());
    let usage = compute_usage(session.messages(), &model);
    let severity = UsageSeverity::of(&usage);

    println!();
    println!(
        "Session {} - {} message(s), model {}",
        session.id,
        session.message_count(),
        model
    );
    println!("  {}", ui::status_line(&usage));
    println!("  Severity: {}", severity.painted());

    if let Some(last) = &session.last_compression {
        println!("  Last compression: {}", last.message);
    }
    if session.compression.is_none() && !config.compression.enabled {
        println!("  Compression is disabled in cinder.toml");
    }

    Ok(())
}
