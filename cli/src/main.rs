//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use roundtable_application::{LlmGateway, RoundtableController};
use roundtable_domain::RoundtableStatus;
use roundtable_infrastructure::{ChatCompletionsGateway, ConfigLoader, InMemorySessionStore};
use roundtable_presentation::{Cli, ConsoleFormatter, DiscussionReporter, OutputFormat};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    // === Dependency Injection ===
    let gateway = Arc::new(ChatCompletionsGateway::new(&config.provider)?);
    if !gateway.is_configured() {
        info!("no API key configured, personas will answer with built-in replies");
    }

    let store = Arc::new(InMemorySessionStore::new());
    let controller = RoundtableController::new(gateway, store)
        .with_timing(config.discussion.timing())
        .with_settings(config.discussion.settings());

    if cli.list_personas {
        for persona in controller.list_personas() {
            println!(
                "{} {} ({}) - {}",
                persona.avatar,
                persona.name,
                persona.role,
                persona.expertise.join(", ")
            );
        }
        return Ok(());
    }

    let question = match cli.question {
        Some(q) => q,
        None => bail!("A clinical question is required. See --help for usage."),
    };
    let title = cli.title.clone().unwrap_or_else(|| question.clone());

    let reporter = Arc::new(DiscussionReporter::new());
    if !cli.quiet {
        controller.subscribe(reporter.clone()).await;
    }

    let session = controller.create_session(title, question).await;
    info!(session = %session.id, "roundtable created");

    controller.start_discussion(&session.id).await?;

    if cli.interactive {
        run_interactive(&controller, &session.id).await?;
    } else {
        controller.join(&session.id).await?;
    }

    if !cli.quiet {
        reporter.finish();
    }

    let snapshot = controller.get_session(&session.id).await?;
    if snapshot.status != RoundtableStatus::Completed {
        warn!("discussion ended before completion (status: {})", snapshot.status);
    }
    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&snapshot),
        OutputFormat::Summary => ConsoleFormatter::format_summary_only(&snapshot),
        OutputFormat::Json => ConsoleFormatter::format_json(&snapshot),
    };
    println!("{}", output);

    controller.shutdown().await;
    Ok(())
}

/// Forward stdin lines as interventions until the discussion finishes.
///
/// Lines starting with `@<role>` are addressed to one persona; everything
/// else is broadcast and routed by keyword affinity.
async fn run_interactive<G: LlmGateway + 'static>(
    controller: &RoundtableController<G>,
    session_id: &str,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let join = controller.join(session_id);
    tokio::pin!(join);

    loop {
        tokio::select! {
            result = &mut join => {
                result?;
                break;
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let (target, content) = parse_intervention(&line);
                        if content.is_empty() {
                            continue;
                        }
                        if let Err(e) = controller
                            .send_user_message(session_id, &content, &target)
                            .await
                        {
                            eprintln!("无法发送: {}", e);
                        }
                    }
                    Ok(None) => {
                        // stdin closed; wait out the discussion
                        (&mut join).await?;
                        break;
                    }
                    Err(e) => {
                        warn!("stdin error: {}", e);
                        (&mut join).await?;
                        break;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Split a line into (target role, content); default target is "all"
fn parse_intervention(line: &str) -> (String, String) {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix('@') {
        if let Some((role, content)) = rest.split_once(char::is_whitespace) {
            return (role.to_string(), content.trim().to_string());
        }
        return (rest.to_string(), String::new());
    }
    ("all".to_string(), line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intervention_broadcast() {
        let (target, content) = parse_intervention("样本量如何确定？");
        assert_eq!(target, "all");
        assert_eq!(content, "样本量如何确定？");
    }

    #[test]
    fn test_parse_intervention_targeted() {
        let (target, content) = parse_intervention("@statistician 每组需要多少例？");
        assert_eq!(target, "statistician");
        assert_eq!(content, "每组需要多少例？");
    }

    #[test]
    fn test_parse_intervention_target_without_content() {
        let (target, content) = parse_intervention("@statistician");
        assert_eq!(target, "statistician");
        assert!(content.is_empty());
    }
}
