use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;
use triage_core::{AuditRecord, Credentials, OrderingResult, PreferenceSource, Prioritizer, TextGenerationProvider};

mod audit;
mod auth;
mod config;
mod llm;
mod logging;
mod memory;
mod state;

use config::Config;
use memory::{Memory, Rule};

#[derive(Parser, Debug)]
#[command(
    name = "triage",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TRIAGE_BUILD_SHA"), ")"),
    about = "Personal task tracker with AI-assisted ordering"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Order open tasks and explain each position
    Prioritize {
        /// JSON array of task records
        #[arg(long)]
        tasks: PathBuf,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Skip the remote provider even when a key is configured
        #[arg(long)]
        heuristic: bool,

        /// Do not append to the audit log
        #[arg(long)]
        no_audit: bool,
    },

    /// Show or change ordering preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },

    /// Show which provider a prioritize call would use
    Providers,

    /// Manage ~/.triage/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Store provider keys in ~/.triage/auth.json
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    Show,

    Set {
        /// Put dated tasks first, earliest deadline first
        #[arg(long, value_enum)]
        deadline: Option<Toggle>,

        /// Rank lower priority numbers first
        #[arg(long, value_enum)]
        priority: Option<Toggle>,
    },

    /// Record one completed task
    Complete,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    Init,
    Show,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    PasteOpenrouterKey,
    PasteOpenaiKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn enabled(self) -> bool {
        self == Toggle::On
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let home = state::ensure_triage_home()?;
    let cfg = config::load_config(&home)?;
    logging::init(&cfg.log_level);

    match cli.command {
        Command::Prioritize {
            tasks,
            json,
            heuristic,
            no_audit,
        } => {
            prioritize(&home, &cfg, &tasks, json, heuristic, no_audit)?;
        }

        Command::Prefs { command } => {
            let mut mem = Memory::open(&state::memory_path(&home))?;
            match command {
                PrefsCommand::Show => print_prefs(&mem),
                PrefsCommand::Set { deadline, priority } => {
                    if let Some(t) = deadline {
                        mem.set_rule(Rule::PreferDeadline, t.enabled())?;
                    }
                    if let Some(t) = priority {
                        mem.set_rule(Rule::PreferHighPriority, t.enabled())?;
                    }
                    println!("Preferences saved.");
                    print_prefs(&mem);
                }
                PrefsCommand::Complete => {
                    let n = mem.record_completion()?;
                    println!("Task completed. Total completions: {n}");
                }
            }
        }

        Command::Providers => {
            let creds = auth::resolve_credentials(&home)?;
            match creds.select(|k| cfg.llm.model_for(k)) {
                Some(choice) => println!(
                    "provider={} model={} timeout={}s",
                    choice.kind.as_str(),
                    choice.model,
                    cfg.llm.timeout_secs
                ),
                None => {
                    println!("No provider key found (set OPENROUTER_API_KEY or OPENAI_API_KEY, or run `triage auth ...`).");
                    println!("Ordering will use the deterministic heuristic.");
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&home)?,
            ConfigCommand::Show => {
                let s = toml::to_string_pretty(&cfg).context("serialize config")?;
                println!("# {}\n{}", config::config_path(&home).display(), s);
            }
        },

        Command::Auth { command } => match command {
            AuthCommand::PasteOpenrouterKey => auth::openrouter_paste_key(&home)?,
            AuthCommand::PasteOpenaiKey => auth::openai_paste_key(&home)?,
        },
    }

    Ok(())
}

fn build_prioritizer(cfg: &Config, creds: &Credentials, heuristic: bool) -> Result<Prioritizer> {
    if heuristic {
        return Ok(Prioritizer::heuristic_only());
    }

    let provider: Option<Box<dyn TextGenerationProvider>> = match creds.select(|k| cfg.llm.model_for(k)) {
        Some(choice) => Some(Box::new(llm::ChatProvider::new(choice, &cfg.llm)?) as Box<dyn TextGenerationProvider>),
        None => None,
    };

    Ok(Prioritizer::new(provider).with_timeout(Duration::from_secs(cfg.llm.timeout_secs)))
}

fn prioritize(home: &Path, cfg: &Config, tasks_path: &Path, json: bool, heuristic: bool, no_audit: bool) -> Result<()> {
    let tasks = state::load_tasks(tasks_path)?;
    let mem = Memory::open(&state::memory_path(home))?;
    let prefs = mem.preferences();
    let today = triage_core::time::today_in(&cfg.profile.timezone)?;

    let creds = auth::resolve_credentials(home)?;
    let prioritizer = build_prioritizer(cfg, &creds, heuristic)?;
    let result = prioritizer.prioritize_on(tasks, &prefs, today);

    if cfg.audit.enabled && !no_audit {
        let record = AuditRecord::new(&result, &prefs, Utc::now());
        let path = state::resolve(home, &cfg.audit.file);
        if let Err(e) = audit::append(&path, &record) {
            warn!(error = %e, path = %path.display(), "could not write audit row");
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &OrderingResult) {
    let via = match (&result.provider, &result.model) {
        (Some(p), Some(m)) => format!(" via {p} ({m})"),
        _ => String::new(),
    };
    println!("# Prioritized tasks [{}{}]\n", result.mode, via);

    if result.is_empty() {
        println!("(no open tasks)");
        return;
    }

    for (i, t) in result.ordered_tasks.iter().enumerate() {
        let due = t.deadline_str().map(|d| format!(" | due {d}")).unwrap_or_default();
        println!("{}. #{} {} | P{}{}", i + 1, t.task_id, t.description, t.priority, due);
        if let Some(r) = &t.reason {
            println!("   {r}");
        }
    }
}

fn print_prefs(mem: &Memory) {
    let rules = mem.rules();
    println!("prefer_deadline      = {}", rules.prefer_deadline);
    println!("prefer_high_priority = {}", rules.prefer_high_priority);
    println!("completions          = {}", mem.completions_count);
    if let Some(ts) = &mem.last_updated {
        println!("last_updated         = {ts}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_flag_skips_provider() {
        let creds = Credentials {
            openrouter_api_key: Some("sk-or-test".into()),
            ..Credentials::default()
        };
        let p = build_prioritizer(&Config::default(), &creds, true).unwrap();
        assert_eq!(p.provider_name(), None);

        let p = build_prioritizer(&Config::default(), &creds, false).unwrap();
        assert_eq!(p.provider_name(), Some("openrouter"));
    }

    #[test]
    fn test_no_credentials_builds_heuristic() {
        let p = build_prioritizer(&Config::default(), &Credentials::default(), false).unwrap();
        assert_eq!(p.provider_name(), None);
    }
}
