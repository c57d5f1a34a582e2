// Declare modules
pub mod data;
pub mod error;
pub mod export;
pub mod mapper;
pub mod models;
pub mod parse;
pub mod progress;
pub mod raw;
pub mod tags;

// Re-export key types for easier use
pub use error::{JmdictError, Result};
pub use mapper::{MappingReport, classify_kana, map_dictionary, map_entries, map_entry};
pub use models::{
    Entry, JapaneseReading, KanaType, KanjiElement, LexemeRestriction, LexemeType,
    ReadingElement, SenseElement, Translation,
};
pub use tags::{
    Dialect, Field, FrequencyRating, GlossaryType, KanjiInfo, Language, Miscellaneous,
    PartOfSpeech, Priority, ReadingInfo, TagEnum,
};

use log::info;
use progress::{ProgressReporter, ProgressUpdate, report_progress};
use raw::RawDictionary;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options for loading JMdict data.
#[derive(Debug, Default, Clone)]
pub struct LoadOptions {
    /// Directory for the downloaded source file.
    /// If None, the default location based on ProjectDirs will be used.
    pub data_dir: Option<PathBuf>,
    /// Where to persist the mapped entries as JSON. When the file already
    /// exists it is loaded instead of re-mapping, unless `force_reload` is set.
    pub output_path: Option<PathBuf>,
    /// Re-download the source even if today's file is cached.
    pub force_download: bool,
    /// Ignore an existing output file and map from XML again.
    pub force_reload: bool,
    /// Pretty-print the JSON output.
    pub pretty: bool,
}

/// Reads and parses the JMdict XML file at `path` into the raw entry tree.
pub async fn load_raw_dictionary(path: &Path) -> Result<RawDictionary> {
    info!("Reading and parsing XML file: {:?}", path);
    let xml_content = tokio::fs::read_to_string(path).await?;
    parse::parse_jmdict(xml_content).await
}

/// The main JMdict interface: mapped entries plus an id index.
#[derive(Clone)] // Clone is cheap due to Arc
pub struct Jmdict {
    entries: Arc<Vec<Entry>>,
    by_id: Arc<HashMap<u64, usize>>,
}

impl Jmdict {
    /// Loads JMdict using default options (automatic data directory, no output file).
    pub async fn load() -> Result<Self> {
        Self::load_with_options(LoadOptions::default(), None).await
    }

    /// Loads JMdict with specific options: ensures the source is present,
    /// parses it, maps every entry and optionally writes the result.
    pub async fn load_with_options(
        options: LoadOptions,
        reporter: Option<ProgressReporter>,
    ) -> Result<Self> {
        if let Some(output) = options.output_path.as_deref() {
            if output.exists() && !options.force_reload {
                info!("Using existing mapped entries: {:?}", output);
                let output = output.to_path_buf();
                let entries =
                    tokio::task::spawn_blocking(move || export::read_entries(&output)).await??;
                return Ok(Self::from_entries(entries));
            }
        }

        let data_dir = data::get_data_dir(options.data_dir.as_deref())?;
        let xml_path = data::ensure_data(&data_dir, options.force_download, reporter.clone()).await?;
        info!("JMdict XML data available at: {:?}", xml_path);

        let raw = load_raw_dictionary(&xml_path).await?;

        let stage = "Mapping entries".to_string();
        let total = raw.entries.len() as u64;
        if let Some(ref reporter) = reporter {
            report_progress(reporter, ProgressUpdate::new_stage(stage.clone(), Some(total)));
        }
        let (entries, report) =
            tokio::task::spawn_blocking(move || map_dictionary(&raw.entries)).await?;
        info!(
            "Mapped {} entries, skipped {} malformed.",
            report.mapped, report.skipped
        );
        if let Some(ref reporter) = reporter {
            report_progress(
                reporter,
                ProgressUpdate::new(
                    stage,
                    total,
                    Some(total),
                    Some(format!("{} skipped", report.skipped)),
                ),
            );
        }

        let entries = match options.output_path {
            Some(output) => {
                let pretty = options.pretty;
                tokio::task::spawn_blocking(move || -> Result<Vec<Entry>> {
                    export::write_entries(&output, &entries, pretty)?;
                    Ok(entries)
                })
                .await??
            }
            None => entries,
        };

        Ok(Self::from_entries(entries))
    }

    /// Parses and maps an in-memory JMdict document. Malformed entries are skipped.
    pub fn from_xml_str(xml: &str) -> Result<(Self, MappingReport)> {
        let raw = parse::parse_jmdict_str(xml)?;
        let (entries, report) = map_dictionary(&raw.entries);
        Ok((Self::from_entries(entries), report))
    }

    /// Wraps already-mapped entries, keeping their order.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let by_id = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.id, index))
            .collect();
        Jmdict {
            entries: Arc::new(entries),
            by_id: Arc::new(by_id),
        }
    }

    /// All entries in source order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by its `ent_seq`.
    pub fn get(&self, id: u64) -> Option<&Entry> {
        self.by_id.get(&id).map(|&index| &self.entries[index])
    }

    /// Entries with a reading equal to `term`, or a translation equal to it
    /// (case-insensitive). Source order is kept.
    pub fn lookup(&self, term: &str) -> Vec<&Entry> {
        let term = term.trim();
        if term.is_empty() {
            return Vec::new();
        }
        let lowered = term.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                entry
                    .reading_elements
                    .iter()
                    .any(|element| element.reading.reading == term)
                    || entry
                        .translations()
                        .any(|t| t.translation.to_lowercase() == lowered)
            })
            .collect()
    }

    /// A uniformly chosen entry, or `None` when empty.
    pub fn random_entry(&self) -> Option<&Entry> {
        use rand::seq::IndexedRandom;
        self.entries.choose(&mut rand::rng())
    }
}
