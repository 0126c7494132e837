use std::path::{Path, PathBuf};

mod config;
mod gift;
mod person;
mod show;
mod status;
mod terminal;
mod transfer;

use clap::ArgAction;
use giftwise::{
    Backend, FileBackend, Id, Person, Store, ValidationError,
    domain::{ConfirmationToken, query::compare_names},
    storage,
};
use tracing::instrument;

use self::{
    config::Config,
    show::Show,
    status::Status,
    terminal::Colorize,
    transfer::{Export, Import, Tags},
};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory holding the data file and preferences
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show everyone with their totals (default)
    Status(Status),

    /// Create the preferences file and an empty data file
    Init,

    /// Add, edit, delete or list people
    #[command(subcommand)]
    Person(person::Command),

    /// Add, edit, delete or list gift ideas
    #[command(subcommand)]
    Gift(gift::Command),

    /// Show one person's budget summary and gift list
    Show(Show),

    /// List every tag in use
    Tags(Tags),

    /// Write a dated backup file
    Export(Export),

    /// Replace all data with the contents of a backup file
    Import(Import),

    /// Show or change preferences
    Config(Config),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root)?,
            Self::Init => init(root)?,
            Self::Person(command) => command.run(root)?,
            Self::Gift(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::Tags(command) => command.run(root)?,
            Self::Export(command) => command.run(root)?,
            Self::Import(command) => command.run(root)?,
            Self::Config(command) => command.run(root)?,
        }
        Ok(())
    }
}

#[instrument]
fn init(root: &Path) -> anyhow::Result<()> {
    let config_path = storage::config_path(root);
    if config_path.exists() {
        anyhow::bail!(
            "Already initialized (found existing {})",
            config_path.display()
        );
    }

    giftwise::Config::default()
        .save(&config_path)
        .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

    let data_path = storage::data_path(root);
    if !data_path.exists() {
        let store = open_store(root);
        storage::Backend::save(store.backend(), store.people())
            .map_err(|e| anyhow::anyhow!("Failed to create data file: {e}"))?;
    }

    println!("Initialized GiftWise in {}", root.display());
    println!("  Created: {}", config_path.display());
    println!("  Created: {}", data_path.display());
    println!();
    println!("Next steps:");
    println!("  giftwise person add \"Alex\" --budget 100");
    println!("  giftwise gift add Alex \"Board game\" --price 35");

    Ok(())
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Open the store kept in `root`.
fn open_store(root: &Path) -> Store<FileBackend> {
    Store::open(FileBackend::in_root(root))
}

/// Find a person by id, or by name ignoring case.
fn find_person<'a, B: Backend>(store: &'a Store<B>, reference: &str) -> anyhow::Result<&'a Person> {
    if let Some(person) = store.person(&Id::from(reference)) {
        return Ok(person);
    }

    let mut matches: Vec<&Person> = store
        .people()
        .iter()
        .filter(|person| same_text(person.name(), reference))
        .collect();

    match matches.len() {
        0 => anyhow::bail!("Person '{reference}' not found"),
        1 => Ok(matches.remove(0)),
        _ => {
            matches.sort_by(|a, b| compare_names(a.name(), b.name()));
            let ids: Vec<String> = matches.iter().map(|p| p.id().to_string()).collect();
            anyhow::bail!(
                "'{reference}' matches {} people; use an id instead: {}",
                matches.len(),
                ids.join(", ")
            )
        }
    }
}

/// Find a gift of `person` by id, or by title ignoring case.
fn find_gift(person: &Person, reference: &str) -> anyhow::Result<Id> {
    if let Some(gift) = person.gift(&Id::from(reference)) {
        return Ok(gift.id().clone());
    }

    let matches: Vec<&Id> = person
        .gifts()
        .iter()
        .filter(|gift| same_text(gift.title(), reference))
        .map(giftwise::Gift::id)
        .collect();

    match matches.as_slice() {
        [] => anyhow::bail!("Gift '{reference}' not found for {}", person.name()),
        [id] => Ok((*id).clone()),
        ids => anyhow::bail!(
            "'{reference}' matches {} gifts; use an id instead: {}",
            ids.len(),
            ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        ),
    }
}

/// Whether a stored name or title is what the user typed, ignoring case.
fn same_text(stored: &str, typed: &str) -> bool {
    stored
        .chars()
        .flat_map(char::to_lowercase)
        .eq(typed.trim().chars().flat_map(char::to_lowercase))
}

/// Ask the user to approve a deletion, unless `yes` was given.
fn confirm(token: &ConfirmationToken, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }

    println!("{}", token.title().warning());
    let approved = dialoguer::Confirm::new()
        .with_prompt(token.message())
        .default(false)
        .interact()?;

    if !approved {
        println!("Cancelled");
    }
    Ok(approved)
}

/// Turn a rejected draft into a user-facing error naming the field.
fn invalid(error: ValidationError) -> anyhow::Error {
    anyhow::anyhow!("Invalid {}: {}", error.field, error.message())
}
