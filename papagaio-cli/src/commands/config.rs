//! `papagaio config`: inspect and edit config.ini.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use papagaio_core::{paths, store, ConfigDocument, Settings};

use crate::context::context;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration (file merged with defaults).
    Show {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print one value.
    Get {
        /// `Section.key`, e.g. `General.model`.
        key: SettingKey,
    },
    /// Set one value and save.
    Set {
        /// `Section.key`, e.g. `General.model`.
        key: SettingKey,
        value: String,
        /// Refuse values the daemon would not accept.
        #[arg(long)]
        strict: bool,
    },
    /// Check every known key and report invalid values.
    Validate,
    /// Print the config file location.
    Path,
}

/// `Section.key` address parsed from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingKey {
    pub section: String,
    pub key: String,
}

impl FromStr for SettingKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((section, key)) if !section.is_empty() && !key.is_empty() => Ok(Self {
                section: section.to_string(),
                key: key.to_string(),
            }),
            _ => Err(format!(
                "expected <section>.<key> (e.g. General.model), got '{s}'"
            )),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.key)
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "key")]
    key: String,
    #[tabled(rename = "value")]
    value: String,
}

pub fn run(command: ConfigCommand) -> Result<()> {
    let home = context()?.home;

    match command {
        ConfigCommand::Show { json } => {
            let doc = store::load_at(&home).context("failed to load configuration")?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&doc).context("failed to render config JSON")?
                );
            } else {
                print_document(&doc);
            }
        }
        ConfigCommand::Get { key } => {
            let doc = store::load_at(&home).context("failed to load configuration")?;
            match doc.get(&key.section, &key.key) {
                Some(value) => println!("{value}"),
                None => bail!("no such setting: {key}"),
            }
        }
        ConfigCommand::Set { key, value, strict } => {
            if strict {
                Settings::validate_value(&key.section, &key.key, &value)?;
            }
            store::set_at(&home, &key.section, &key.key, &value)
                .with_context(|| format!("failed to set {key}"))?;
            println!("{key} = {value}");
        }
        ConfigCommand::Validate => {
            let doc = store::load_at(&home).context("failed to load configuration")?;
            let errors = Settings::validate_document(&doc);
            if errors.is_empty() {
                println!("{}", "configuration is valid".green());
                return Ok(());
            }
            for err in &errors {
                println!("{} {err}", "✗".red());
            }
            bail!("{} invalid setting(s)", errors.len());
        }
        ConfigCommand::Path => {
            println!("{}", paths::config_path(&home).display());
        }
    }

    Ok(())
}

fn print_document(doc: &ConfigDocument) {
    for (name, section) in doc.sections() {
        println!("{}", format!("[{name}]").bold());
        if section.is_empty() {
            println!("  {}", "(empty)".bright_black());
            continue;
        }
        let rows: Vec<EntryRow> = section
            .iter()
            .map(|(key, value)| EntryRow {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }
}
