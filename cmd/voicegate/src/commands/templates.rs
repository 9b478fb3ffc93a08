//! Template listing and removal.

use clap::{Args, Subcommand};
use serde::Serialize;

use voicegate_templates::{Category, TemplateStore};

use super::{get_config, open_store, print_result, print_success};
use crate::Cli;

/// List or remove enrolled templates.
#[derive(Args)]
pub struct TemplatesCommand {
    #[command(subcommand)]
    command: TemplatesSubcommand,
}

#[derive(Subcommand)]
enum TemplatesSubcommand {
    /// List labels and sample counts
    #[command(alias = "ls")]
    List {
        /// Only this category (command or speaker)
        category: Option<Category>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove every template with a label
    #[command(alias = "rm")]
    Forget {
        /// Category (command or speaker)
        category: Category,
        /// Label to remove
        label: String,
    },
}

#[derive(Serialize)]
struct LabelCount {
    category: Category,
    label: String,
    samples: usize,
}

impl TemplatesCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let store = open_store(cli, &cfg)?;

        match &self.command {
            TemplatesSubcommand::List { category, json } => {
                let categories = match category {
                    Some(c) => vec![*c],
                    None => Category::ALL.to_vec(),
                };

                let mut rows = Vec::new();
                for c in categories {
                    for (label, samples) in store.labels(c)? {
                        rows.push(LabelCount {
                            category: c,
                            label,
                            samples,
                        });
                    }
                }

                if *json {
                    return print_result(&rows, true);
                }
                if rows.is_empty() {
                    println!("No templates enrolled ({})", store.path().display());
                    return Ok(());
                }
                println!("{:<10} {:<20} {}", "CATEGORY", "LABEL", "SAMPLES");
                for r in rows {
                    println!("{:<10} {:<20} {}", r.category, r.label, r.samples);
                }
                Ok(())
            }

            TemplatesSubcommand::Forget { category, label } => {
                let n = store.remove(*category, label)?;
                if n == 0 {
                    anyhow::bail!("no {category} templates labelled \"{label}\"");
                }
                print_success(&format!("Removed {n} {category} template(s) \"{label}\""));
                Ok(())
            }
        }
    }
}
