//! Operator console
//!
//! Each invocation mounts a [`ListController`], runs one command against
//! it and prints the resulting view. Outcomes are reported by the
//! controller's notifier; the exit code says whether the command worked.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::config::AdminConfig;
use crate::controller::{DeleteOutcome, ListController, ListView};
use crate::notify::ConsoleNotifier;
use crate::prompt::{ConfirmPrompt, FixedAnswer, StdinPrompt};
use crate::view::{ALL_CATEGORIES, SortKey};

#[derive(Debug, Parser)]
#[command(name = "catalog-admin", version, about = "Manage the product catalog")]
pub struct Cli {
    #[command(flatten)]
    pub config: AdminConfig,

    /// Delete without asking for confirmation
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List products
    List {
        /// Match against name or description, case-insensitive
        #[arg(long, short = 's', default_value = "")]
        search: String,

        /// Category name, or "all"
        #[arg(long, short = 'c', default_value = ALL_CATEGORIES)]
        category: String,

        /// name, price or category
        #[arg(long, default_value_t = SortKey::Name)]
        sort: SortKey,
    },

    /// Show category filter options and server categories
    Categories,

    /// Delete a product
    Delete {
        /// Product id
        id: String,
    },

    /// Edit a product
    Edit(EditArgs),
}

#[derive(Debug, clap::Args)]
pub struct EditArgs {
    /// Product id
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    #[arg(long)]
    pub shipping: Option<String>,

    /// Category id
    #[arg(long)]
    pub category: Option<String>,

    /// Subcategory id ("" clears it)
    #[arg(long)]
    pub subcategory: Option<String>,
}

pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let api = cli.config.client_config().build_catalog()?;
    let prompt: Box<dyn ConfirmPrompt> = if cli.yes {
        Box::new(FixedAnswer(true))
    } else {
        Box::new(StdinPrompt)
    };
    let controller = ListController::new(api, prompt, ConsoleNotifier);
    let report = controller.mount().await;

    let ok = match cli.command {
        Command::List {
            search,
            category,
            sort,
        } => {
            controller.set_search(search).await;
            controller.set_category_filter(&category).await;
            controller.set_sort(sort).await;
            print_list(&controller.snapshot().await, cli.json)?;
            report.products_error.is_none()
        }
        Command::Categories => {
            print_categories(&controller.snapshot().await, cli.json)?;
            report.categories_error.is_none()
        }
        Command::Delete { id } => match controller.delete(&id).await {
            Ok(DeleteOutcome::Removed) => true,
            Ok(DeleteOutcome::Cancelled) => {
                println!("Delete cancelled");
                true
            }
            Err(_) => false,
        },
        Command::Edit(args) => edit(&controller, args).await,
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn edit<C, P, N>(controller: &ListController<C, P, N>, args: EditArgs) -> bool
where
    C: catalog_client::CatalogApi,
    P: ConfirmPrompt,
    N: crate::notify::Notifier,
{
    if controller.begin_edit(&args.id).await.is_err() {
        return false;
    }
    if let Some(category) = &args.category {
        if controller.set_draft_category(category).await.is_err() {
            return false;
        }
    }
    if let Some(subcategory) = &args.subcategory {
        if controller.set_draft_subcategory(subcategory).await.is_err() {
            return false;
        }
    }
    let EditArgs {
        name,
        description,
        price,
        shipping,
        ..
    } = args;
    let applied = controller
        .update_draft(|draft| {
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(price) = price {
                draft.price = price;
            }
            if let Some(shipping) = shipping {
                draft.shipping_charge = shipping;
            }
        })
        .await;
    applied.is_ok() && controller.submit().await.is_ok()
}

fn print_list(view: &ListView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&view.cards)?);
        return Ok(());
    }
    if view.cards.is_empty() {
        println!("No products found. {}", view.empty_hint());
        return Ok(());
    }
    for card in &view.cards {
        let category = match (&card.category, &card.subcategory) {
            (Some(c), Some(s)) => format!("{c} / {s}"),
            (Some(c), None) => c.clone(),
            (None, _) => "-".to_string(),
        };
        println!(
            "{:<26} {:<28} {:<24} {:>12}  shipping {}",
            card.id, card.name, category, card.price, card.shipping
        );
        println!("    {}", card.description);
    }
    println!("{}", view.summary());
    Ok(())
}

fn print_categories(view: &ListView, json: bool) -> anyhow::Result<()> {
    if json {
        let value = serde_json::json!({
            "filterOptions": view.category_options,
            "categories": view.categories,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    println!("Filter options: {}", view.category_options.join(", "));
    for category in &view.categories {
        println!("{:<26} {}", category.id, category.name);
    }
    Ok(())
}
