use std::path::Path;

use clap::Parser;
use giftwise::{
    PersonDraft, TagFilter,
    domain::{
        DeleteTarget,
        query::filter_people,
        summary::{Summary, format_currency},
        validation::parse_amount,
    },
};
use serde_json::json;
use tracing::instrument;

use super::{
    OutputFormat, confirm, find_person, invalid, open_store,
    terminal::{Colorize, budget_label, is_narrow},
};

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Add a person
    Add(Add),

    /// Change a person's name, notes or budget
    Edit(Edit),

    /// Delete a person and all of their gift ideas
    Delete(Delete),

    /// List people, sorted by name
    List(List),
}

impl Command {
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Add(command) => command.run(root),
            Self::Edit(command) => command.run(root),
            Self::Delete(command) => command.run(root),
            Self::List(command) => command.run(root),
        }
    }
}

#[derive(Debug, Parser)]
pub struct Add {
    /// The person's name
    name: String,

    /// Free-form notes (interests, sizes, ...)
    #[arg(long, default_value = "")]
    notes: String,

    /// Spending cap in dollars (0 for none)
    #[arg(long, default_value = "0")]
    budget: String,
}

impl Add {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut store = open_store(root);
        let draft = PersonDraft {
            name: self.name,
            notes: self.notes,
            budget: parse_amount(&self.budget),
        };

        let id = store.add_person(draft).map_err(invalid)?;
        if let Some(person) = store.person(&id) {
            println!("{}", format!("✅ Added {} ({id})", person.name()).success());
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Edit {
    /// Id or name of the person
    person: String,

    /// New name
    #[arg(long)]
    name: Option<String>,

    /// New notes
    #[arg(long)]
    notes: Option<String>,

    /// New budget in dollars (0 for none)
    #[arg(long)]
    budget: Option<String>,
}

impl Edit {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut store = open_store(root);
        let person = find_person(&store, &self.person)?;
        let id = person.id().clone();

        let mut draft = PersonDraft::from(person);
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(notes) = self.notes {
            draft.notes = notes;
        }
        if let Some(budget) = self.budget {
            draft.budget = parse_amount(&budget);
        }

        store.edit_person(&id, draft).map_err(invalid)?;
        println!("{}", format!("✅ Updated {id}").success());
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Delete {
    /// Id or name of the person
    person: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

impl Delete {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut store = open_store(root);
        let person = find_person(&store, &self.person)?;
        let name = person.name().to_string();

        let Some(token) = store.request_delete(DeleteTarget::Person(person.id().clone())) else {
            anyhow::bail!("Person '{}' not found", self.person);
        };

        if !confirm(&token, self.yes)? {
            return Ok(());
        }

        store.commit_delete(token);
        println!("{}", format!("✅ Deleted {name}").success());
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct List {
    /// Only people whose name contains this text (case-insensitive)
    #[arg(long, default_value = "")]
    search: String,

    /// Only people with at least one gift carrying this tag
    #[arg(long, default_value = "all")]
    tag: TagFilter,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = open_store(root);
        let people = filter_people(store.people(), &self.search, &self.tag);

        match self.output {
            OutputFormat::Json => {
                let rows: Vec<_> = people
                    .iter()
                    .map(|person| {
                        let summary = Summary::of(person);
                        json!({
                            "id": person.id(),
                            "name": person.name(),
                            "notes": person.notes(),
                            "budget": person.budget(),
                            "gifts": summary.gift_count,
                            "totalCost": summary.total_cost,
                            "budgetStatus": summary.status.as_str(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
            OutputFormat::Table => {
                if people.is_empty() {
                    println!("No people found. Add one with 'giftwise person add'.");
                    return Ok(());
                }

                let narrow = is_narrow();
                for person in people {
                    let summary = Summary::of(person);
                    if narrow {
                        println!("{} ({})", person.name(), summary.gift_count);
                    } else {
                        println!(
                            "{:<24} {:>3} gifts  {:>10}  {}  {}",
                            person.name(),
                            summary.gift_count,
                            format_currency(summary.total_cost),
                            budget_label(summary.status),
                            person.id().to_string().dim(),
                        );
                    }
                }
            }
        }
        Ok(())
    }
}
