use std::path::Path;

use clap::Parser;
use giftwise::{
    BudgetStatus,
    domain::{
        Clock, SystemClock,
        query::{compare_names, is_due_soon, is_overdue},
        summary::{Summary, format_currency},
    },
};
use serde_json::{Value, json};
use tracing::instrument;

use super::{
    OutputFormat, open_store,
    terminal::{Colorize, budget_label, is_narrow},
};

#[derive(Debug, Parser, Default)]
#[command(about = "Show everyone with their totals")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

struct Row<'a> {
    name: &'a str,
    summary: Summary,
    due_soon: usize,
    overdue: usize,
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = open_store(root);
        let today = SystemClock.today();

        let mut people: Vec<_> = store.people().iter().collect();
        people.sort_by(|a, b| compare_names(a.name(), b.name()));

        let rows: Vec<Row> = people
            .into_iter()
            .map(|person| Row {
                name: person.name(),
                summary: Summary::of(person),
                due_soon: person
                    .gifts()
                    .iter()
                    .filter(|gift| !gift.purchased() && is_due_soon(gift, today))
                    .count(),
                overdue: person
                    .gifts()
                    .iter()
                    .filter(|gift| is_overdue(gift, today))
                    .count(),
            })
            .collect();

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&Self::report(&rows))?);
            }
            OutputFormat::Table if self.quiet => Self::output_quiet(&rows),
            OutputFormat::Table if rows.is_empty() => {
                println!("No people found yet. Add one with 'giftwise person add'.");
            }
            OutputFormat::Table => Self::output_table(&rows),
        }
        Ok(())
    }

    fn report(rows: &[Row]) -> Value {
        let people: Vec<_> = rows
            .iter()
            .map(|row| {
                json!({
                    "name": row.name,
                    "gifts": row.summary.gift_count,
                    "purchased": row.summary.purchased_count,
                    "totalCost": row.summary.total_cost,
                    "budget": row.summary.budget,
                    "budgetStatus": row.summary.status.as_str(),
                    "dueSoon": row.due_soon,
                    "overdue": row.overdue,
                })
            })
            .collect();

        json!({
            "people": people,
            "totalCost": rows.iter().fold(0.0, |total, row| total + row.summary.total_cost),
            "totalSpent": rows.iter().fold(0.0, |total, row| total + row.summary.total_spent),
        })
    }

    fn output_quiet(rows: &[Row]) {
        let gifts: usize = rows.iter().map(|row| row.summary.gift_count).sum();
        let over = rows
            .iter()
            .filter(|row| row.summary.status == BudgetStatus::Over)
            .count();
        let due_soon: usize = rows.iter().map(|row| row.due_soon).sum();
        println!(
            "people={} gifts={gifts} over_budget={over} due_soon={due_soon}",
            rows.len()
        );
    }

    fn output_table(rows: &[Row]) {
        let narrow = is_narrow();

        println!("People");
        println!("{}", "──────".dim());

        for row in rows {
            let progress = format!(
                "{}/{}",
                row.summary.purchased_count, row.summary.gift_count
            );
            if narrow {
                println!("{} {progress}", row.name);
                continue;
            }

            let mut line = format!(
                "{:<24} {progress:>7}  {:>10}  {}",
                row.name,
                format_currency(row.summary.total_cost),
                budget_label(row.summary.status),
            );
            if row.overdue > 0 {
                line.push_str(&format!("  {} overdue", row.overdue).danger());
            }
            if row.due_soon > 0 {
                line.push_str(&format!("  {} due soon", row.due_soon).warning());
            }
            println!("{line}");
        }

        let total = rows.iter().fold(0.0, |total, row| total + row.summary.total_cost);
        let spent = rows.iter().fold(0.0, |total, row| total + row.summary.total_spent);
        println!();
        println!(
            "Planned {}, spent {}",
            format_currency(total),
            format_currency(spent)
        );
    }
}
