//! `semitools ref` command - Reference tables

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::output::{effective_format, print_empty, print_json, print_table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::reference;
use crate::entities::reference::{ReferenceTable, REFERENCE_DATA_VERSION};

#[derive(Subcommand, Debug)]
pub enum RefCommands {
    /// Show reference tables
    List(ListArgs),

    /// Show tables whose title, item name or value matches
    Search(SearchArgs),

    /// List table categories
    Categories,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only tables in this category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Only the table with this title
    #[arg(long, short = 't')]
    pub title: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Case-insensitive search text
    pub query: String,
}

/// Run a ref subcommand
pub fn run(cmd: RefCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RefCommands::List(args) => {
            let tables: Vec<&ReferenceTable> = match (&args.title, &args.category) {
                (Some(title), _) => reference::table(title).into_iter().collect(),
                (None, Some(category)) => reference::by_category(category),
                (None, None) => reference::tables().iter().collect(),
            };
            print_tables(&tables, global)
        }
        RefCommands::Search(args) => print_tables(&reference::filter(&args.query), global),
        RefCommands::Categories => {
            let categories = reference::categories();
            if effective_format(global.format) == OutputFormat::Json {
                return print_json(&categories);
            }
            for category in categories {
                println!("{}", category);
            }
            Ok(())
        }
    }
}

fn print_tables(tables: &[&ReferenceTable], global: &GlobalOpts) -> Result<()> {
    if effective_format(global.format) == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "version": REFERENCE_DATA_VERSION,
            "tables": tables,
        }));
    }
    if tables.is_empty() {
        print_empty("reference tables");
        return Ok(());
    }
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{} {}",
            style(table.title).bold(),
            style(format!("[{}]", table.category)).dim()
        );
        let rows = table
            .items
            .iter()
            .map(|item| {
                vec![
                    item.name.to_string(),
                    item.value.to_string(),
                    item.unit.to_string(),
                    item.description.unwrap_or("").to_string(),
                ]
            })
            .collect();
        print_table(&["NAME", "VALUE", "UNIT", "DESCRIPTION"], rows);
    }
    Ok(())
}
