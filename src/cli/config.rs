use std::path::Path;

use clap::Parser;
use giftwise::{AppData, SortOrder, storage};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Config {
    #[command(subcommand)]
    command: Option<Setting>,
}

#[derive(Debug, clap::Subcommand)]
enum Setting {
    /// Switch the dark colour theme on or off
    DarkMode {
        #[arg(value_enum)]
        state: Switch,
    },

    /// The sort order used when a gift list doesn't name one
    DefaultSort {
        /// default, price-asc, price-desc or priority
        order: SortOrder,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Switch {
    On,
    Off,
    Toggle,
}

impl Config {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let path = storage::config_path(root);
        let mut config = storage::load_config(root);

        match self.command {
            None => {
                println!("Configuration ({})", path.display());
                println!("{}", "─────────────".dim());
                println!("dark_mode:    {}", config.dark_mode);
                println!("default_sort: {}", config.default_sort);
                return Ok(());
            }
            Some(Setting::DarkMode { state }) => {
                match state {
                    Switch::On => config.dark_mode = true,
                    Switch::Off => config.dark_mode = false,
                    Switch::Toggle => {
                        config.toggle_dark_mode();
                    }
                }
                println!(
                    "{}",
                    format!("✅ Dark mode {}", if config.dark_mode { "on" } else { "off" })
                        .success()
                );
            }
            Some(Setting::DefaultSort { order }) => {
                config.default_sort = order;
                println!("{}", format!("✅ Default sort set to {order}").success());
            }
        }

        config
            .save(&path)
            .map_err(|e| anyhow::anyhow!("Failed to save config: {e}"))?;

        // The data file carries the flag as well.
        let data_path = storage::data_path(root);
        if let Ok(text) = std::fs::read_to_string(&data_path) {
            let mut data = AppData::from_json(&text)?;
            data.dark_mode = config.dark_mode;
            std::fs::write(&data_path, data.to_json()?)?;
        }
        Ok(())
    }
}
