use std::path::Path;

use chrono::NaiveDate;
use clap::Parser;
use giftwise::{
    GiftDraft, GiftQuery, Priority, SortOrder, StatusFilter, TagFilter,
    domain::{
        DeleteTarget, SystemClock,
        gift::parse_tags,
        validation::parse_amount,
    },
    storage::load_config,
};
use serde_json::json;
use tracing::instrument;

use super::{
    OutputFormat, confirm, find_gift, find_person, invalid, open_store, show,
    terminal::Colorize,
};

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Add a gift idea for a person
    Add(Add),

    /// Change the fields of a gift idea
    Edit(Edit),

    /// Delete a gift idea
    Delete(Delete),

    /// Flip a gift between purchased and not purchased
    Toggle(Toggle),

    /// List a person's gift ideas, filtered and sorted
    List(List),

    /// Mark every gift of a person as purchased
    MarkAll(PersonArg),

    /// Mark every gift of a person as not purchased
    UnmarkAll(PersonArg),

    /// Delete every purchased gift of a person
    DeletePurchased(DeletePurchased),
}

impl Command {
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Add(command) => command.run(root),
            Self::Edit(command) => command.run(root),
            Self::Delete(command) => command.run(root),
            Self::Toggle(command) => command.run(root),
            Self::List(command) => command.run(root),
            Self::MarkAll(command) => command.set_all(root, true),
            Self::UnmarkAll(command) => command.set_all(root, false),
            Self::DeletePurchased(command) => command.run(root),
        }
    }
}

#[derive(Debug, Parser)]
pub struct Add {
    /// Id or name of the person
    person: String,

    /// Short description of the gift
    title: String,

    /// Price in dollars
    #[arg(long, default_value = "0")]
    price: String,

    /// Link to the product
    #[arg(long, default_value = "")]
    url: String,

    /// How important the gift is
    #[arg(long, default_value_t = Priority::Medium)]
    priority: Priority,

    /// Comma separated labels
    #[arg(long, default_value = "")]
    tags: String,

    /// Link to a picture of the gift
    #[arg(long, default_value = "")]
    image_url: String,

    /// The day the gift is needed by (YYYY-MM-DD)
    #[arg(long)]
    due: Option<NaiveDate>,

    /// Record the gift as already purchased
    #[arg(long)]
    purchased: bool,
}

impl Add {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut store = open_store(root);
        let person_id = find_person(&store, &self.person)?.id().clone();

        let draft = GiftDraft {
            title: self.title,
            price: parse_amount(&self.price),
            purchased: self.purchased,
            url: self.url,
            priority: self.priority,
            tags: parse_tags(&self.tags),
            image_url: self.image_url,
            due_date: self.due,
        };

        match store.add_gift(&person_id, draft).map_err(invalid)? {
            Some(id) => println!("{}", format!("✅ Added gift {id}").success()),
            None => anyhow::bail!("Person '{}' not found", self.person),
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Edit {
    /// Id or name of the person
    person: String,

    /// Id or title of the gift
    gift: String,

    /// New title
    #[arg(long)]
    title: Option<String>,

    /// New price in dollars
    #[arg(long)]
    price: Option<String>,

    /// New product link (empty to clear)
    #[arg(long)]
    url: Option<String>,

    /// New priority
    #[arg(long)]
    priority: Option<Priority>,

    /// New comma separated labels (empty to clear)
    #[arg(long)]
    tags: Option<String>,

    /// New picture link (empty to clear)
    #[arg(long)]
    image_url: Option<String>,

    /// New due date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "no_due")]
    due: Option<NaiveDate>,

    /// Remove the due date
    #[arg(long)]
    no_due: bool,

    /// Set the purchased flag
    #[arg(long)]
    purchased: Option<bool>,
}

impl Edit {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut store = open_store(root);
        let person = find_person(&store, &self.person)?;
        let person_id = person.id().clone();
        let gift_id = find_gift(person, &self.gift)?;

        let Some(gift) = person.gift(&gift_id) else {
            anyhow::bail!("Gift '{}' not found", self.gift);
        };
        let mut draft = GiftDraft::from(gift);

        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(price) = self.price {
            draft.price = parse_amount(&price);
        }
        if let Some(url) = self.url {
            draft.url = url;
        }
        if let Some(priority) = self.priority {
            draft.priority = priority;
        }
        if let Some(tags) = self.tags {
            draft.tags = parse_tags(&tags);
        }
        if let Some(image_url) = self.image_url {
            draft.image_url = image_url;
        }
        if self.no_due {
            draft.due_date = None;
        } else if self.due.is_some() {
            draft.due_date = self.due;
        }
        if let Some(purchased) = self.purchased {
            draft.purchased = purchased;
        }

        store
            .edit_gift(&person_id, &gift_id, draft)
            .map_err(invalid)?;
        println!("{}", format!("✅ Updated gift {gift_id}").success());
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Delete {
    /// Id or name of the person
    person: String,

    /// Id or title of the gift
    gift: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

impl Delete {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut store = open_store(root);
        let person = find_person(&store, &self.person)?;
        let target = DeleteTarget::Gift {
            person: person.id().clone(),
            gift: find_gift(person, &self.gift)?,
        };

        let Some(token) = store.request_delete(target) else {
            anyhow::bail!("Gift '{}' not found", self.gift);
        };

        if !confirm(&token, self.yes)? {
            return Ok(());
        }

        store.commit_delete(token);
        println!("{}", "✅ Deleted gift".success());
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Toggle {
    /// Id or name of the person
    person: String,

    /// Id or title of the gift
    gift: String,
}

impl Toggle {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut store = open_store(root);
        let person = find_person(&store, &self.person)?;
        let person_id = person.id().clone();
        let gift_id = find_gift(person, &self.gift)?;

        match store.toggle_purchased(&person_id, &gift_id) {
            Some(true) => println!("{}", "✅ Marked as purchased".success()),
            Some(false) => println!("{}", "Marked as not purchased".info()),
            None => anyhow::bail!("Gift '{}' not found", self.gift),
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct PersonArg {
    /// Id or name of the person
    person: String,
}

impl PersonArg {
    #[instrument]
    fn set_all(self, root: &Path, purchased: bool) -> anyhow::Result<()> {
        let mut store = open_store(root);
        let person_id = find_person(&store, &self.person)?.id().clone();

        let changed = if purchased {
            store.mark_all_purchased(&person_id)
        } else {
            store.unmark_all_purchased(&person_id)
        };
        if !changed {
            anyhow::bail!("Person '{}' not found", self.person);
        }

        let message = if purchased {
            "✅ Marked every gift as purchased"
        } else {
            "✅ Marked every gift as not purchased"
        };
        println!("{}", message.success());
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct DeletePurchased {
    /// Id or name of the person
    person: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

impl DeletePurchased {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut store = open_store(root);
        let person = find_person(&store, &self.person)?;
        let purchased = person.gifts().iter().filter(|gift| gift.purchased()).count();

        let Some(token) = store.request_delete(DeleteTarget::PurchasedGifts(person.id().clone()))
        else {
            println!("No purchased gifts to delete.");
            return Ok(());
        };

        if !confirm(&token, self.yes)? {
            return Ok(());
        }

        store.commit_delete(token);
        println!(
            "{}",
            format!("✅ Deleted {purchased} purchased gift(s)").success()
        );
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct List {
    /// Id or name of the person
    person: String,

    /// Only gifts carrying this tag ("all" for every gift)
    #[arg(long, default_value = "all")]
    tag: TagFilter,

    /// Only gifts in this state: all, purchased, not-purchased, due-soon
    #[arg(long, default_value = "all")]
    status: StatusFilter,

    /// Ordering: default, price-asc, price-desc, priority
    #[arg(long)]
    sort: Option<SortOrder>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let store = open_store(root);
        let person = find_person(&store, &self.person)?;

        let query = GiftQuery {
            tag: self.tag,
            status: self.status,
            sort: self
                .sort
                .unwrap_or_else(|| load_config(root).default_sort),
        };
        let clock = SystemClock;
        let gifts = query.apply(person.gifts(), &clock);

        match self.output {
            OutputFormat::Json => {
                let rows: Vec<_> = gifts
                    .iter()
                    .map(|gift| {
                        json!({
                            "id": gift.id(),
                            "title": gift.title(),
                            "price": gift.price(),
                            "purchased": gift.purchased(),
                            "url": gift.url(),
                            "priority": gift.priority().as_str(),
                            "tags": gift.tags(),
                            "imageUrl": gift.image_url(),
                            "dueDate": gift.due_date().map(|date| date.to_string()),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
            OutputFormat::Table => show::print_gifts(&gifts, &clock),
        }
        Ok(())
    }
}
