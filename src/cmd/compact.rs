//! Compression check and manual trigger — `cinder compact`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;

use cinder::cinder_config::CinderToml;
use cinder::compression::should_compress;
use cinder::orchestrator::{CompressionOrchestrator, SharedSession};
use cinder::ui;

use super::{JsonFileStore, load_session, session_path};
use crate::Cli;

pub async fn cmd_compact(project_dir: &Path, cli: &Cli, status_only: bool) -> Result<()> {
    let file_config = CinderToml::load_or_default(project_dir)?;
    let path = session_path(project_dir, cli);

    let Some(mut session) = load_session(&path)? else {
        println!("No session found at {}; nothing to compact", path.display());
        return Ok(());
    };

    if let Some(model) = &cli.model {
        session.model = model.clone();
    }
    // Sessions without their own settings inherit the project configuration.
    let config = session
        .compression
        .get_or_insert_with(|| file_config.compression.clone())
        .clone();

    let usage = session.usage();
    let would_compress = should_compress(&usage, &config);

    println!();
    println!("Context Compaction");
    println!("==================");
    println!();
    println!("  {}", ui::status_line(&usage));
    println!(
        "  Policy: threshold {}%, strategy {}, preserve last {} message(s)",
        config.threshold, config.strategy, config.preserve_recent_messages
    );
    println!();

    if status_only {
        if would_compress {
            println!("Status: compression would run");
        } else {
            println!("Status: compression not needed");
        }
        return Ok(());
    }

    // The engine never sees this prompt; warning the user before the run is
    // the caller's job.
    if would_compress && config.notify_before_compression && !cli.yes {
        let proceed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Context at {}% of the budget; compress now?",
                usage.usage_percentage
            ))
            .default(true)
            .interact()?;
        if !proceed {
            println!("Compaction cancelled.");
            return Ok(());
        }
    }

    let shared: SharedSession = Arc::new(Mutex::new(session));
    let orchestrator = CompressionOrchestrator::new(JsonFileStore::new(path.clone()));

    match orchestrator.run(&shared).await? {
        None => println!("Compression is not configured for this session."),
        Some(result) => {
            println!("{}", result.message);
            if result.compressed {
                println!();
                println!("  Strategy: {}", result.strategy);
                println!(
                    "  Tokens: {} -> {} ({}% reduction)",
                    result.original_token_count,
                    result.compressed_token_count,
                    result.reduction_percentage
                );
                if let Some(summary) = &result.summary {
                    let excerpt: String = summary.chars().take(200).collect();
                    println!("  Summary: {excerpt}");
                }
                println!("  Session saved to {}", path.display());
            }
        }
    }

    Ok(())
}
