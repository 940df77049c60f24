//! Person subcommands and how their results are printed.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use serde_json::json;
use tether_core::config::PageConfig;
use tether_core::{
    Name, Page, Pager, Person, PersonController, PersonForCreate, PersonForUpdate, RecordId,
};

#[derive(Subcommand, Debug, PartialEq)]
pub enum PersonCommand {
    /// Show one person
    Get {
        /// Full (`person:abc`) or bare (`abc`) id
        id: String,
    },

    /// List persons one page at a time
    List {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Page size
        #[arg(long, default_value_t = PageConfig::DEFAULT_LIMIT, value_parser = clap::value_parser!(u8).range(1..))]
        limit: u8,
    },

    /// Create a person
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        first: String,

        #[arg(long)]
        last: String,

        /// Opt in to marketing
        #[arg(long)]
        marketing: bool,
    },

    /// Update the given fields of a person
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, requires = "last")]
        first: Option<String>,

        #[arg(long, requires = "first")]
        last: Option<String>,

        #[arg(long)]
        marketing: Option<bool>,
    },

    /// Delete a person
    Delete { id: String },
}

/// Run one person command and return what should be printed.
pub async fn run(persons: &PersonController, command: PersonCommand, json: bool) -> Result<String> {
    match command {
        PersonCommand::Get { id } => {
            let key = key_of(&id)?;
            let person = persons
                .get(&key)
                .await
                .with_context(|| format!("Failed to get person {}", key))?;
            render_person(&person, json)
        }
        PersonCommand::List { page, limit } => {
            let start = Page::new(page, limit);
            start.validate()?;

            let mut pager = Pager::new(persons.clone(), start);
            let items = pager.fetch().await.context("Failed to list persons")?;
            render_list(start, pager.current(), &items, json)
        }
        PersonCommand::Create {
            title,
            first,
            last,
            marketing,
        } => {
            let data = PersonForCreate {
                title,
                name: Name { first, last },
                marketing: marketing.then_some(true),
            };
            let id = persons
                .create(&data)
                .await
                .context("Failed to create person")?;
            Ok(render_id("Created", &id, json))
        }
        PersonCommand::Update {
            id,
            title,
            first,
            last,
            marketing,
        } => {
            let name = match (first, last) {
                (Some(first), Some(last)) => Some(Name { first, last }),
                (None, None) => None,
                _ => bail!("--first and --last must be given together"),
            };
            let data = PersonForUpdate {
                title,
                name,
                marketing,
            };
            if data.is_empty() {
                bail!("Nothing to update: pass --title, --first/--last or --marketing");
            }

            let key = key_of(&id)?;
            let id = persons
                .update(&key, &data)
                .await
                .with_context(|| format!("Failed to update person {}", key))?;
            Ok(render_id("Updated", &id, json))
        }
        PersonCommand::Delete { id } => {
            let key = key_of(&id)?;
            let id = persons
                .delete(&key)
                .await
                .with_context(|| format!("Failed to delete person {}", key))?;
            Ok(render_id("Deleted", &id, json))
        }
    }
}

/// Controllers take the bare key; ids printed by write commands carry the
/// table prefix.
fn key_of(raw: &str) -> Result<String> {
    Ok(RecordId::parse(raw)?.key().to_string())
}

fn person_line(person: &Person) -> String {
    format!(
        "{}\t{}\t{} {}\tmarketing: {}",
        person.id,
        person.title,
        person.name.first,
        person.name.last,
        if person.marketing { "yes" } else { "no" }
    )
}

fn render_person(person: &Person, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(person)?);
    }
    Ok(person_line(person))
}

fn render_list(requested: Page, shown: Page, items: &[Person], json: bool) -> Result<String> {
    if json {
        let body = json!({
            "page": shown.page,
            "limit": shown.limit,
            "items": items,
        });
        return Ok(serde_json::to_string_pretty(&body)?);
    }

    let mut lines = Vec::new();
    if shown != requested {
        lines.push(format!(
            "Page {} is empty, showing page {}",
            requested.page, shown.page
        ));
    }
    if items.is_empty() {
        lines.push(format!("No persons on page {}", shown.page));
    }
    lines.extend(items.iter().map(person_line));
    Ok(lines.join("\n"))
}

fn render_id(action: &str, id: &str, json: bool) -> String {
    if json {
        return json!({ "id": id }).to_string();
    }
    format!("{} {}", action, id)
}
