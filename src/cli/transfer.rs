use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use giftwise::{
    AppData,
    domain::{Clock, SystemClock, query::tag_vocabulary},
    storage::{self, load_config},
};
use tracing::instrument;

use super::{
    OutputFormat, open_store,
    terminal::Colorize,
};

#[derive(Debug, Parser)]
pub struct Export {
    /// Directory to write the backup into
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

impl Export {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = open_store(root);
        let data = AppData {
            people: store.people().to_vec(),
            dark_mode: load_config(root).dark_mode,
        };

        let path = storage::export(&data, &self.dir, SystemClock.today())
            .with_context(|| format!("Failed to write backup to {}", self.dir.display()))?;
        println!(
            "{}",
            format!("✅ Exported {} people to {}", data.people.len(), path.display()).success()
        );
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Import {
    /// The backup file to read
    file: PathBuf,
}

impl Import {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let people = match storage::import(&self.file) {
            Ok(people) => people,
            Err(e) => {
                tracing::warn!("Import of {} failed: {e}", self.file.display());
                anyhow::bail!("Error importing data. Please check the file format.");
            }
        };

        let mut store = open_store(root);
        let count = people.len();
        store.replace_all(people);
        println!(
            "{}",
            format!("✅ Imported {count} people from {}", self.file.display()).success()
        );
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Tags {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Tags {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = open_store(root);
        let tags = tag_vocabulary(store.people());

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tags)?),
            OutputFormat::Table if tags.is_empty() => println!("No tags in use."),
            OutputFormat::Table => {
                for tag in tags {
                    println!("{}", format!("#{tag}").info());
                }
            }
        }
        Ok(())
    }
}
