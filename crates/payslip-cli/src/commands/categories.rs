//! Categories command - inspect or export the category mapping.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use payslip_core::CategoryMap;

use super::config::load_config;

/// Arguments for the categories command.
#[derive(Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    command: CategoriesCommand,
}

#[derive(Subcommand)]
enum CategoriesCommand {
    /// Print the effective mapping as JSON
    Show {
        /// Categories file to show instead of the configured one
        #[arg(long)]
        categories: Option<PathBuf>,
    },

    /// Write the built-in mapping to a file for editing
    Init {
        /// Output path (default: categories.json)
        #[arg(short, long, default_value = "categories.json")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn run(args: CategoriesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        CategoriesCommand::Show { categories } => {
            let config = load_config(config_path)?;
            let path = categories.or(config.parser.categories_file);
            let map = CategoryMap::load_or_default(path.as_deref());

            println!("{}", serde_json::to_string_pretty(&map)?);
            Ok(())
        }
        CategoriesCommand::Init { output, force } => {
            if output.exists() && !force {
                anyhow::bail!(
                    "Categories file already exists at {}. Use --force to overwrite.",
                    output.display()
                );
            }

            fs::write(&output, serde_json::to_string_pretty(&CategoryMap::default())?)?;

            println!(
                "{} Wrote {} default categories to {}",
                style("✓").green(),
                CategoryMap::default().len(),
                output.display()
            );
            Ok(())
        }
    }
}
