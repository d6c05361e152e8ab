use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use content_gateway::content::extract_root;
use content_gateway::redirects::{find_match, parse_rules, Rule, RuleAction};

#[derive(Parser)]
#[command(name = "redirects-cli")]
#[command(about = "Validate and test _redirects files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a rules file and print its rules
    Check { file: PathBuf },
    /// Show which rule, if any, handles a request path
    Match {
        file: PathBuf,
        /// Path relative to the site root, e.g. /blog/post
        path: String,
        /// Site root used to resolve the action, e.g. /ipfs/bafy...
        #[arg(short, long)]
        root: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load(file: &Path) -> Result<Vec<Rule>, Box<dyn std::error::Error>> {
    let content = std::fs::read(file)?;
    Ok(parse_rules(&content)?)
}

fn run(command: Commands) -> Result<Value, Box<dyn std::error::Error>> {
    match command {
        Commands::Check { file } => {
            let rules = load(&file)?;
            Ok(json!({ "rules": rules }))
        }
        Commands::Match { file, path, root } => {
            let rules = load(&file)?;
            let Some(found) = find_match(&rules, &path) else {
                return Ok(json!({ "matched": false }));
            };

            let mut output = json!({
                "matched": true,
                "rule": found.rule,
                "destination": found.destination,
                "splat": found.captures.splat,
                "params": found
                    .captures
                    .params
                    .iter()
                    .map(|(name, value)| (name.clone(), Value::from(value.as_str())))
                    .collect::<serde_json::Map<String, Value>>(),
            });

            if let Some(root) = root {
                let root = extract_root(&root)?;
                output["action"] = match found.action(&root)? {
                    RuleAction::Redirect { target, status } => {
                        json!({ "type": "redirect", "target": target, "status": status })
                    }
                    RuleAction::Rewrite(target) => {
                        json!({ "type": "rewrite", "target": target.to_string() })
                    }
                    RuleAction::NotFound(target) => {
                        json!({ "type": "not_found", "target": target.to_string() })
                    }
                };
            }
            Ok(output)
        }
    }
}
