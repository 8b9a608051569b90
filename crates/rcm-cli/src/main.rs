//! `rcm`: command-line client for the RCM failure-mode server.
//!
//! # Usage
//!
//! ```
//! rcm --url http://localhost:8080 types
//! rcm list "Motor Eléctrico"
//! rcm add Turbina --description "Desbalance del rotor" \
//!   --frequency Low --severity Major --detectability Medium
//! rcm rpn Low Critical Medium
//! ```

mod client;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, NewFailureMode};
use rcm_core::{
  origin::MutationOutcome,
  risk::{classify_risk, compute_rpn},
  scale::{Detectability, Frequency, Severity},
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rcm", about = "Command-line client for the RCM failure-mode server")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the rcm server (default: http://localhost:8080).
  #[arg(long, env = "RCM_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every equipment type.
  Types,
  /// List the failure modes of an equipment type.
  List { equipment_type: String },
  /// Search descriptions, causes and effects.
  Search { query: String },
  /// Add a custom failure mode.
  Add {
    equipment_type: String,
    #[arg(long)]
    description:    String,
    #[arg(long)]
    frequency:      Frequency,
    /// A label or a 1–10 score.
    #[arg(long)]
    severity:       Severity,
    #[arg(long)]
    detectability:  Detectability,
    /// Explicit id; generated by the server when omitted.
    #[arg(long)]
    id:             Option<String>,
    #[arg(long = "cause")]
    causes:         Vec<String>,
    #[arg(long = "effect")]
    effects:        Vec<String>,
    #[arg(long = "detection")]
    detection:      Vec<String>,
    #[arg(long = "action")]
    actions:        Vec<String>,
  },
  /// Delete a custom failure mode.
  Delete { equipment_type: String, id: String },
  /// Print the merged knowledge base as JSON.
  Export,
  /// Replace the custom overlay with an exported JSON file.
  Import { file: PathBuf },
  /// Drop every custom failure mode.
  Reset,
  /// Counts per partition.
  Stats,
  /// Risk ranking of an equipment type.
  Risk { equipment_type: String },
  /// Compute an RPN locally.
  Rpn {
    frequency:     Frequency,
    severity:      Severity,
    detectability: Detectability,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

fn resolve_url(flag: Option<String>, file_cfg: &ConfigFile) -> String {
  flag
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(ApiConfig {
    base_url: resolve_url(args.url, &file_cfg),
  })?;

  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    // Computed locally; no request is sent.
    Command::Rpn { frequency, severity, detectability } => {
      let rpn = compute_rpn(frequency, severity, detectability);
      println!("{rpn} {}", classify_risk(rpn));
    }
    Command::Types => {
      for t in client.equipment_types().await? {
        println!("{t}");
      }
    }
    Command::List { equipment_type } => {
      print!("{}", render::failure_modes(&client.list(&equipment_type).await?));
    }
    Command::Search { query } => {
      print!("{}", render::search_results(&client.search(&query).await?));
    }
    Command::Add {
      equipment_type,
      description,
      frequency,
      severity,
      detectability,
      id,
      causes,
      effects,
      detection,
      actions,
    } => {
      let body = NewFailureMode {
        id,
        description,
        causes,
        effects,
        detection_methods: detection,
        preventive_actions: actions,
        frequency,
        severity,
        detectability,
      };
      let created = client.add(&equipment_type, &body).await?;
      println!("added {} to {}", created.id, created.equipment_type);
    }
    Command::Delete { equipment_type, id } => {
      match client.delete(&equipment_type, &id).await? {
        MutationOutcome::Applied => println!("deleted {id}"),
        MutationOutcome::NotCustom => {
          bail!("{id} is a built-in failure mode and cannot be deleted")
        }
        MutationOutcome::NotFound => bail!("{id} not found in {equipment_type}"),
      }
    }
    Command::Export => println!("{}", client.export().await?),
    Command::Import { file } => {
      let document = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
      if !client.import(document).await? {
        bail!("{} is not a valid failure-mode export", file.display());
      }
      println!("imported {}", file.display());
    }
    Command::Reset => {
      client.reset().await?;
      println!("custom failure modes cleared");
    }
    Command::Stats => print!("{}", render::statistics(&client.statistics().await?)),
    Command::Risk { equipment_type } => {
      print!("{}", render::risk(&client.risk(&equipment_type).await?));
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory as _;

  use super::*;

  #[test]
  fn args_are_well_formed() {
    Args::command().debug_assert();
  }

  #[test]
  fn flag_overrides_config_file() {
    let file = ConfigFile { url: "http://file:1".into() };
    assert_eq!(resolve_url(Some("http://flag:2".into()), &file), "http://flag:2");
    assert_eq!(resolve_url(None, &file), "http://file:1");
    assert_eq!(resolve_url(None, &ConfigFile::default()), DEFAULT_URL);
  }

  #[test]
  fn parses_add_with_repeated_lists() {
    let args = Args::try_parse_from([
      "rcm", "add", "Turbina",
      "--description", "Desbalance",
      "--frequency", "low",
      "--severity", "7",
      "--detectability", "Very High",
      "--cause", "Desgaste",
      "--cause", "Suciedad",
    ])
    .unwrap();
    match args.command {
      Command::Add { severity, detectability, causes, .. } => {
        assert_eq!(severity, Severity::Major);
        assert_eq!(detectability, Detectability::VeryHigh);
        assert_eq!(causes.len(), 2);
      }
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[test]
  fn rejects_unknown_labels() {
    assert!(Args::try_parse_from(["rcm", "rpn", "Never", "Minor", "High"]).is_err());
  }
}
