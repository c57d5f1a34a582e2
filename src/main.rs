//! Command-line interface for the jmdict_rs library.
//!
//! This CLI converts JMdict into typed JSON, looks up words, shows random
//! entries, and manages the local cache.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use jmdict_rs::{
    Entry, Jmdict, KanaType, LoadOptions, TagEnum, data,
    error::Result,
    progress::{self, ProgressReporter, ProgressUpdate},
};
use log::{LevelFilter, debug, error, info};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// File name of the mapped-entry cache inside the data directory.
const DEFAULT_ENTRIES_FILE: &str = "entries.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "JMdict converter and lookup CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory for downloaded and generated files (optional)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path of the mapped-entry JSON cache (defaults to <data-dir>/entries.json)
    #[arg(long, global = true)]
    entries: Option<PathBuf>,

    /// Download the source again even if today's copy is cached
    #[arg(long, global = true, default_value_t = false)]
    force_download: bool,

    /// Map from XML again, ignoring an existing entry cache
    #[arg(long, global = true, default_value_t = false)]
    force_reload: bool,

    /// Set verbosity level (use -v, -vv, or -vvv for increasing verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download, parse and map JMdict, writing the entries as JSON
    Convert {
        /// Output file
        output: PathBuf,
        /// Pretty-print the JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Look up a word by reading or English gloss
    Lookup {
        /// The word to look up
        term: String,
    },
    /// Show a random entry
    Random,
    /// Remove downloaded source files and the entry cache
    ClearCache,
}

/// Sets up logging based on verbosity level.
fn setup_logging(verbose: u8) {
    let log_level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter(None, log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

/// Creates a progress reporter for displaying download and processing progress.
fn create_progress_reporter(
    multi_progress: MultiProgress,
    progress_bars: Arc<Mutex<HashMap<String, ProgressBar>>>,
) -> ProgressReporter {
    progress::reporter(Box::new(move |update: ProgressUpdate| {
        let Ok(mut bars) = progress_bars.lock() else {
            return true;
        };

        if update.current_item == 0 && !bars.contains_key(&update.stage_description) {
            // Create new progress bar for this stage
            let pb = multi_progress.add(ProgressBar::new(update.total_items.unwrap_or(0)));
            let style_template = if update.total_items.is_some() {
                "{prefix:>12.cyan.bold} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} ({percent}%) {msg}"
            } else {
                "{prefix:>12.cyan.bold} [{elapsed_precise}] {spinner} {msg}"
            };

            if let Ok(style) = ProgressStyle::default_bar().template(style_template) {
                pb.set_style(style.progress_chars("##-"));
            }
            pb.set_prefix(update.stage_description.clone());
            pb.set_message(update.message.unwrap_or_default());
            pb.enable_steady_tick(Duration::from_millis(100));
            bars.insert(update.stage_description.clone(), pb);
        } else if let Some(pb) = bars.get(&update.stage_description) {
            // Update existing progress bar
            pb.set_position(update.current_item);
            if let Some(msg) = update.message {
                pb.set_message(msg);
            }
            if let Some(total) = update.total_items {
                if update.current_item >= total {
                    pb.finish_and_clear();
                }
            }
        }
        true
    }))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let data_dir = match data::get_data_dir(cli.data_dir.as_deref()) {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to resolve data directory: {}", e);
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
    };
    let entries_path = cli
        .entries
        .clone()
        .unwrap_or_else(|| data_dir.join(DEFAULT_ENTRIES_FILE));

    if let Commands::ClearCache = cli.command {
        info!("Clearing cache in {:?}...", data_dir);
        let result = data::clear_cache(&data_dir).and_then(|removed| {
            if entries_path.exists() {
                std::fs::remove_file(&entries_path)?;
                return Ok(removed + 1);
            }
            Ok(removed)
        });
        match result {
            Ok(removed) => println!(
                "{}",
                format!("Cache cleared ({} file(s) removed).", removed).green()
            ),
            Err(e) => {
                error!("Failed to clear cache: {}", e);
                eprintln!("{}", format!("Error clearing cache: {}", e).red());
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let load_options = match &cli.command {
        Commands::Convert { output, pretty } => LoadOptions {
            data_dir: Some(data_dir.clone()),
            output_path: Some(output.clone()),
            force_download: cli.force_download,
            // An explicit conversion always maps from XML.
            force_reload: true,
            pretty: *pretty,
        },
        _ => LoadOptions {
            data_dir: Some(data_dir.clone()),
            output_path: Some(entries_path),
            force_download: cli.force_download,
            force_reload: cli.force_reload || cli.force_download,
            pretty: false,
        },
    };

    info!("Loading JMdict data...");
    let start_load = Instant::now();

    let multi_progress = MultiProgress::new();
    let progress_bars = Arc::new(Mutex::new(HashMap::<String, ProgressBar>::new()));
    let reporter = create_progress_reporter(multi_progress.clone(), progress_bars.clone());

    let load_handle = tokio::spawn(async move {
        Jmdict::load_with_options(load_options, Some(reporter)).await
    });

    let load_result = load_handle.await.unwrap_or_else(|e| {
        eprintln!("Error awaiting loading task: {}", e);
        std::process::exit(1);
    });

    // Clean up progress bars
    if let Ok(bars) = progress_bars.lock() {
        for (_, pb) in bars.iter() {
            pb.finish_and_clear();
        }
    }
    drop(multi_progress);
    std::io::stdout().flush().ok();

    let dict = match load_result {
        Ok(dict) => {
            info!(
                "JMdict loaded: {} entries in {:?}.",
                dict.len(),
                start_load.elapsed()
            );
            dict
        }
        Err(e) => {
            error!("Failed to load JMdict data: {}", e);
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Convert { output, .. } => {
            println!(
                "{}",
                format!("Wrote {} entries to {}.", dict.len(), output.display()).green()
            );
        }
        Commands::Lookup { term } => handle_lookup(&dict, &term),
        Commands::Random => handle_random(&dict),
        Commands::ClearCache => unreachable!("handled before loading"),
    }

    Ok(())
}

/// Handles the lookup command by printing every matching entry.
fn handle_lookup(dict: &Jmdict, term: &str) {
    info!("Looking up: '{}'", term);
    let start_lookup = Instant::now();
    let entries = dict.lookup(term);
    debug!("lookup for '{}' took: {:?}", term, start_lookup.elapsed());

    if entries.is_empty() {
        println!("No entries found for '{}'.", term.yellow());
        return;
    }

    for entry in entries {
        print_entry(entry);
    }
}

fn handle_random(dict: &Jmdict) {
    info!("Getting random entry...");
    match dict.random_entry() {
        Some(entry) => print_entry(entry),
        None => eprintln!("{}", "The dictionary is empty.".red()),
    }
}

/// Prints one entry: readings, then numbered senses with their tags.
/// `[hiragana+katakana]`, or `None` for a reading in neither script.
fn kana_label(kinds: &[KanaType]) -> Option<String> {
    if kinds.is_empty() {
        return None;
    }
    let names: Vec<String> = kinds.iter().map(ToString::to_string).collect();
    Some(format!("[{}]", names.join("+")))
}

fn print_entry(entry: &Entry) {
    let readings: Vec<String> = entry
        .reading_elements
        .iter()
        .map(|element| {
            let mut text = element.reading.reading.bold().cyan().to_string();
            if let Some(label) = kana_label(&element.reading.kana_type) {
                text.push_str(&format!(" {}", label.dimmed()));
            }
            if !element.is_true_kanji_reading {
                text.push_str(&" (no kanji)".dimmed().to_string());
            }
            text
        })
        .collect();
    let common = if entry.is_common() {
        " common".green().to_string()
    } else {
        String::new()
    };
    println!("\n{} {}{}", readings.join(", "), format!("#{}", entry.id).dimmed(), common);

    for (index, sense) in entry.sense_elements.iter().enumerate() {
        let mut tags: Vec<&str> = Vec::new();
        if let Some(pos) = sense.part_of_speech {
            tags.push(pos.token());
        }
        if let Some(dialect) = sense.dialect {
            tags.push(dialect.token());
        }
        for field in sense.fields.iter().flatten().flatten() {
            tags.push(field.token());
        }
        for misc in sense.miscellaneous.iter().flatten().flatten() {
            tags.push(misc.token());
        }

        let glosses: Vec<&str> = sense
            .glossary
            .iter()
            .map(|t| t.translation.as_str())
            .collect();
        println!(
            "  {}: {} {}",
            (index + 1).to_string().bold(),
            glosses.join("; "),
            tags.join(" ").italic()
        );
        if let Some(info) = &sense.sense_info {
            println!("        {}", info.dimmed());
        }
        if let Some(restrictions) = &sense.lexeme_restrictions {
            for restriction in restrictions {
                println!(
                    "        {} {}: {}",
                    "only".magenta(),
                    restriction.kind,
                    restriction.contents.join(", ").green()
                );
            }
        }
        if let Some(antonyms) = &sense.antonyms {
            println!("        {}: {}", "Antonyms".magenta(), antonyms.join(", ").green());
        }
    }
}
