use std::path::Path;

use clap::Parser;
use giftwise::{
    Gift, GiftQuery, Person,
    domain::{
        Clock, SystemClock,
        query::{days_until, is_due_soon, is_overdue},
        summary::{Summary, format_currency},
    },
    storage::load_config,
};
use serde_json::json;
use tracing::instrument;

use super::{
    OutputFormat, find_person, open_store,
    terminal::{Colorize, budget_label, is_narrow, priority_label},
};

#[derive(Debug, Parser)]
pub struct Show {
    /// Id or name of the person
    person: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = open_store(root);
        let person = find_person(&store, &self.person)?;
        let summary = Summary::of(person);

        match self.output {
            OutputFormat::Json => Self::output_json(person, &summary)?,
            OutputFormat::Table => {
                let query = GiftQuery {
                    sort: load_config(root).default_sort,
                    ..GiftQuery::default()
                };
                let clock = SystemClock;
                Self::output_pretty(person, &summary);
                println!();
                print_gifts(&query.apply(person.gifts(), &clock), &clock);
            }
        }
        Ok(())
    }

    fn output_json(person: &Person, summary: &Summary) -> anyhow::Result<()> {
        let output = json!({
            "id": person.id(),
            "name": person.name(),
            "notes": person.notes(),
            "budget": person.budget(),
            "totalCost": summary.total_cost,
            "totalSpent": summary.total_spent,
            "remaining": summary.remaining(),
            "budgetStatus": summary.status.as_str(),
            "gifts": summary.gift_count,
            "purchased": summary.purchased_count,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_pretty(person: &Person, summary: &Summary) {
        println!("{}", person.name());
        println!("{}", "─".repeat(person.name().chars().count().max(8)).dim());
        if !person.notes().is_empty() {
            println!("{}", person.notes());
            println!();
        }

        println!(
            "Gift ideas: {} ({} purchased)",
            summary.gift_count, summary.purchased_count
        );
        println!("Total cost: {}", format_currency(summary.total_cost));
        println!("Spent:      {}", format_currency(summary.total_spent));

        if let Some(remaining) = summary.remaining() {
            println!("Budget:     {}", format_currency(summary.budget));
            println!(
                "Remaining:  {}  {}",
                format_currency(remaining),
                budget_label(summary.status)
            );
        } else {
            println!("Budget:     {}", budget_label(summary.status));
        }
    }
}

/// Print a gift list, one gift per line.
pub fn print_gifts(gifts: &[&Gift], clock: &impl Clock) {
    if gifts.is_empty() {
        println!("No gift ideas match.");
        return;
    }

    let today = clock.today();
    let narrow = is_narrow();

    for gift in gifts {
        let mark = if gift.purchased() { "[x]" } else { "[ ]" };
        let title = if gift.purchased() {
            gift.title().struck()
        } else {
            gift.title().to_string()
        };

        if narrow {
            println!("{mark} {title} {}", format_currency(gift.price()));
            continue;
        }

        let mut line = format!(
            "{mark} {title:<32} {:>10}  {:<6}",
            format_currency(gift.price()),
            priority_label(gift.priority()),
        );

        if let Some(due) = gift.due_date() {
            let label = format!("due {due}");
            let label = if is_overdue(gift, today) {
                format!("{label} (overdue)").danger()
            } else if is_due_soon(gift, today) {
                format!("{label} (in {} days)", days_until(due, today)).warning()
            } else {
                label.dim()
            };
            line.push_str("  ");
            line.push_str(&label);
        }

        if !gift.tags().is_empty() {
            line.push_str("  ");
            line.push_str(&format!("#{}", gift.tags().join(" #")).info());
        }

        println!("{line}");

        if !gift.url().is_empty() {
            println!("      {}", gift.url().dim());
        }
    }
}
