//! Data download and management for JMdict.
//!
//! This module handles downloading the gzipped JMdict XML from the EDRDG
//! server, caching it locally under a date-stamped name, and decompressing it.

use crate::error::{JmdictError, Result};
use crate::progress::{ProgressReporter, ProgressUpdate, report_progress};
use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use directories_next::ProjectDirs;
use flate2::read::GzDecoder;
use futures::StreamExt;
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Subdirectory name within user's data directory
pub const JMDICT_SUBDIR: &str = "jmdict-rs";
/// Resource name, also the prefix of every cached file.
pub const JMDICT_NAME: &str = "JMdict";
const JMDICT_DOWNLOAD_URL: &str = "http://ftp.edrdg.org/pub/Nihongo/JMdict.gz";

/// Gets the project's data directory path, or `override_dir` if given.
/// Creates the directory if it doesn't exist.
pub fn get_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    let data_dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => ProjectDirs::from("org", "JmdictRs", JMDICT_SUBDIR)
            .ok_or(JmdictError::DataDirNotFound)?
            .data_dir()
            .to_path_buf(),
    };
    fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

/// `JMdict-YYYY-M-D`, dated by the UTC day of the upstream release.
///
/// Upstream regenerates the file daily just after 03:00 UTC; before 03:01
/// the previous day's file is still the current one.
pub fn source_file_stem(now: DateTime<Utc>) -> String {
    let cutoff = NaiveTime::from_hms_opt(3, 1, 0).unwrap_or_default();
    let date = if now.time() < cutoff {
        (now - Duration::days(1)).date_naive()
    } else {
        now.date_naive()
    };
    let stem = format!("{}-{}-{}-{}", JMDICT_NAME, date.year(), date.month(), date.day());
    sanitize_file_name(&stem)
}

/// Drops characters that are reserved in file names on common platforms.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '/' | '\\' | '?' | '%' | '*' | ':' | '|' | '"' | '<' | '>'))
        .collect()
}

/// Downloads a file from a URL to a specified path using streaming with progress reporting.
///
/// The destination is removed again if the download does not complete.
async fn download_file(
    url: &str,
    dest_path: &Path,
    reporter: Option<ProgressReporter>,
) -> Result<()> {
    let stage_desc = "Downloading JMdict".to_string();

    info!(
        "Downloading data from {} to {:?} (streaming)...",
        url, dest_path
    );
    let response = reqwest::get(url).await?.error_for_status()?;

    let total_size = response.content_length();

    if let Some(ref reporter) = reporter {
        report_progress(
            reporter,
            ProgressUpdate::new(stage_desc.clone(), 0, total_size, None),
        );
    }

    let partial = scopeguard::guard(dest_path.to_path_buf(), |path| {
        warn!("Download incomplete; removing {:?}", path);
        let _ = fs::remove_file(&path);
    });

    let mut dest_file = BufWriter::new(File::create(dest_path)?);
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        dest_file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;

        if let Some(ref reporter) = reporter {
            report_progress(
                reporter,
                ProgressUpdate::new(stage_desc.clone(), downloaded, total_size, None),
            );
        }
    }

    dest_file.flush()?;
    scopeguard::ScopeGuard::into_inner(partial);

    if let Some(ref reporter) = reporter {
        let total = total_size.unwrap_or(downloaded);
        report_progress(
            reporter,
            ProgressUpdate::new(
                stage_desc,
                total,
                Some(total),
                Some("Download complete.".to_string()),
            ),
        );
    }

    info!("Download complete ({} bytes).", downloaded);
    Ok(())
}

/// Decompresses a GZipped file with progress reporting.
async fn decompress_gz(
    gz_path: &Path,
    dest_path: &Path,
    reporter: Option<ProgressReporter>,
) -> Result<()> {
    let stage_desc = "Decompressing JMdict".to_string();

    info!("Decompressing {:?} to {:?}...", gz_path, dest_path);

    if let Some(ref reporter) = reporter {
        report_progress(reporter, ProgressUpdate::new_stage(stage_desc.clone(), None));
    }

    let gz_path = gz_path.to_path_buf();
    let dest_path = dest_path.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let gz_file = File::open(&gz_path)?;
        let mut decoder = GzDecoder::new(BufReader::new(gz_file));
        let mut dest_file = BufWriter::new(File::create(&dest_path)?);
        io::copy(&mut decoder, &mut dest_file)?;
        dest_file.flush()?;
        Ok::<(), std::io::Error>(())
    })
    .await??;

    if let Some(ref reporter) = reporter {
        report_progress(
            reporter,
            ProgressUpdate::new(
                stage_desc,
                1,
                Some(1),
                Some("Decompression complete.".to_string()),
            ),
        );
    }

    info!("Decompression complete.");
    Ok(())
}

/// Ensures today's JMdict XML file is present in `data_dir`, downloading
/// and/or decompressing it if necessary.
pub async fn ensure_data(
    data_dir: &Path,
    force_download: bool,
    reporter: Option<ProgressReporter>,
) -> Result<PathBuf> {
    let stem = source_file_stem(Utc::now());
    let xml_path = data_dir.join(format!("{stem}.xml"));
    let gz_path = data_dir.join(format!("{stem}.xml.gz"));

    if force_download {
        info!("Forced download requested; discarding cached {}.", stem);
        for path in [&xml_path, &gz_path] {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
    }

    if xml_path.exists() {
        info!("Found existing JMdict XML data file: {:?}", xml_path);
        return Ok(xml_path);
    } else {
        info!("JMdict XML data file not found at {:?}.", xml_path);
    }

    if !gz_path.exists() {
        info!("JMdict GZ archive not found at {:?}. Downloading...", gz_path);
        download_file(JMDICT_DOWNLOAD_URL, &gz_path, reporter.clone()).await?;
    } else {
        info!("Found existing JMdict GZ archive: {:?}", gz_path);
    }

    decompress_gz(&gz_path, &xml_path, reporter).await?;

    // The archive is only needed until the XML exists.
    if let Err(e) = fs::remove_file(&gz_path) {
        warn!("Could not remove archive {:?}: {}", gz_path, e);
    }

    Ok(xml_path)
}

/// Removes every cached JMdict file from `data_dir`. Returns how many were removed.
pub fn clear_cache(data_dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for dir_entry in fs::read_dir(data_dir)? {
        let dir_entry = dir_entry?;
        let name = dir_entry.file_name();
        let is_cached_source = name
            .to_str()
            .is_some_and(|name| name.starts_with(&format!("{JMDICT_NAME}-")));
        if is_cached_source && dir_entry.file_type()?.is_file() {
            debug!("Removing cached file {:?}", dir_entry.path());
            fs::remove_file(dir_entry.path())?;
            removed += 1;
        }
    }
    info!("Removed {} cached file(s) from {:?}.", removed, data_dir);
    Ok(removed)
}
