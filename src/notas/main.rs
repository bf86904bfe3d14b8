use chrono::NaiveDate;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use notas::api::NotasApi;
use notas::commands::config::ConfigAction;
use notas::commands::{CmdMessage, MessageLevel};
use notas::config::NotasConfig;
use notas::corpus::Corpus;
use notas::error::{NotasError, Result};
use notas::model::{Block, DayActivity, DocumentActivity};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "notas=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let api = init_api(&cli)?;

    match cli.command {
        Commands::Load { path } => {
            let result = api.load_document(&path)?;
            print_messages(&result.messages);
            print_json(&result.blocks)
        }
        Commands::Save { path, file } => {
            let blocks = read_blocks(file)?;
            let result = api.save_document(&path, blocks)?;
            print_messages(&result.messages);
            Ok(())
        }
        Commands::Append { path, content } => {
            let result = api.append_block(&path, &content)?;
            print_messages(&result.messages);
            Ok(())
        }
        Commands::Create { path, name } => {
            let result = api.create_entry(&path, &name)?;
            print_messages(&result.messages);
            print_lines(&result.paths);
            Ok(())
        }
        Commands::Tree { path } => {
            let result = api.tree(&path)?;
            print_json(&result.tree)
        }
        Commands::Hints { path } => {
            let result = api.hints(&path)?;
            print_lines(&result.paths);
            Ok(())
        }
        Commands::Search { query, path } => {
            let result = api.search(&path, &query)?;
            print_json(&result.search_results)
        }
        Commands::Activity { path } => {
            let result = api.activity(&path)?;
            print_json(&ActivityReport {
                days: &result.activity,
                documents: &result.documents,
            })
        }
        Commands::Trash { path } => {
            let result = api.trash(&path)?;
            print_messages(&result.messages);
            print_lines(&result.paths);
            Ok(())
        }
        Commands::Image { path, file, name } => {
            let bytes = std::fs::read(&file)
                .map_err(|e| NotasError::io(file.display().to_string(), e))?;
            let name = name.unwrap_or_else(|| {
                file.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            let result = api.store_image(&path, &bytes, &name)?;
            print_messages(&result.messages);
            print_json(&result.image)
        }
        Commands::Config { key, value } => handle_config(&api, key, value),
    }
}

fn init_api(cli: &Cli) -> Result<NotasApi> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => ProjectDirs::from("com", "notas", "notas")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                NotasError::InvalidInput(
                    "Could not determine a config directory, pass --config-dir".to_string(),
                )
            })?,
    };
    let config = NotasConfig::load(&config_dir)?;
    let corpus = Corpus::open(&cli.root, config)?;
    Ok(NotasApi::new(corpus, config_dir))
}

fn handle_config(api: &NotasApi, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            for key in NotasConfig::keys() {
                println!("{} = {}", key, config.get(key).unwrap_or_default());
            }
        }
    } else {
        for message in &result.messages {
            println!("{}", message.content);
        }
    }
    Ok(())
}

fn read_blocks(file: Option<PathBuf>) -> Result<Vec<Block>> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| NotasError::io(path.display().to_string(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| NotasError::io("<stdin>", e))?;
            buf
        }
    };
    let blocks: Vec<Block> = serde_json::from_str(&raw)?;
    Ok(blocks.into_iter().map(|b| Block::new(b.content, b.metadata)).collect())
}

#[derive(Serialize)]
struct ActivityReport<'a> {
    days: &'a BTreeMap<NaiveDate, DayActivity>,
    documents: &'a [DocumentActivity],
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Messages go to stderr so stdout stays machine-readable.
fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => eprintln!("{}", message.content.dimmed()),
            MessageLevel::Success => eprintln!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}
