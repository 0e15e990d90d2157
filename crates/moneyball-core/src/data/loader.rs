// CSV fetching and parsing.
//
// Each profile lists a fixed set of CSV files under one base location. Files
// are fetched one after another; a file that fails to download or parse is
// recorded in the report and skipped, the rest still load.

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::{ColumnsConfig, HttpConfig, ProfileConfig};
use crate::data::table::{PlayerRow, PlayerTable};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("request for {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {file}: {source}")]
    Csv { file: String, source: csv::Error },

    #[error("{file} has no `{column}` column")]
    MissingColumn { file: String, column: String },
}

// ---------------------------------------------------------------------------
// Fetchers
// ---------------------------------------------------------------------------

/// Retrieves the raw text of one CSV resource.
#[async_trait]
pub trait CsvFetcher: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<String, LoadError>;
}

/// Plain HTTP GET, no retries.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LoadError::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CsvFetcher for HttpFetcher {
    async fn fetch(&self, location: &str) -> Result<String, LoadError> {
        let http_err = |source| LoadError::Http {
            url: location.to_string(),
            source,
        };
        let response = self
            .client
            .get(location)
            .send()
            .await
            .map_err(http_err)?
            .error_for_status()
            .map_err(http_err)?;
        response.text().await.map_err(http_err)
    }
}

/// Reads CSV files from the local filesystem.
pub struct FileFetcher;

#[async_trait]
impl CsvFetcher for FileFetcher {
    async fn fetch(&self, location: &str) -> Result<String, LoadError> {
        tokio::fs::read_to_string(location)
            .await
            .map_err(|source| LoadError::Io {
                path: location.to_string(),
                source,
            })
    }
}

/// True if the base location is an HTTP(S) URL rather than a directory.
pub fn is_remote(base: &str) -> bool {
    base.starts_with("http://") || base.starts_with("https://")
}

/// Join a base location and a file name.
pub fn resolve_location(base: &str, file: &str) -> String {
    if is_remote(base) {
        if base.ends_with('/') {
            format!("{base}{file}")
        } else {
            format!("{base}/{file}")
        }
    } else {
        Path::new(base).join(file).display().to_string()
    }
}

/// Pick the fetcher matching the profile's base location.
pub fn fetcher_for(
    profile: &ProfileConfig,
    http: &HttpConfig,
) -> Result<Box<dyn CsvFetcher>, LoadError> {
    if is_remote(&profile.base_url) {
        let fetcher = HttpFetcher::new(Duration::from_secs(http.timeout_secs))?;
        Ok(Box::new(fetcher))
    } else {
        Ok(Box::new(FileFetcher))
    }
}

// ---------------------------------------------------------------------------
// Load report
// ---------------------------------------------------------------------------

/// A file that could not be loaded.
#[derive(Debug)]
pub struct FileFailure {
    pub file: String,
    pub error: LoadError,
}

/// Outcome of loading every file of a profile.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Rows of every file that loaded, concatenated in file order.
    pub table: PlayerTable,
    pub loaded: Vec<String>,
    pub failures: Vec<FileFailure>,
}

/// Fetch and parse every file of the profile.
pub async fn load_profile(fetcher: &dyn CsvFetcher, profile: &ProfileConfig) -> LoadReport {
    let mut report = LoadReport::default();

    for file in &profile.files {
        let location = resolve_location(&profile.base_url, file);
        let result = match fetcher.fetch(&location).await {
            Ok(text) => parse_csv(text.as_bytes(), file, &profile.columns),
            Err(e) => Err(e),
        };
        match result {
            Ok(table) => {
                info!(
                    "Loaded {} rows, {} stat columns from {}",
                    table.len(),
                    table.columns().len(),
                    file
                );
                report.table.append(table);
                report.loaded.push(file.clone());
            }
            Err(error) => {
                warn!("Failed to load {}: {}", file, error);
                report.failures.push(FileFailure {
                    file: file.clone(),
                    error,
                });
            }
        }
    }

    report
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Cell spellings read as a missing value.
const MISSING_MARKERS: &[&str] = &["", "nan", "na", "n/a", "null", "none"];

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m))
}

/// Parse a statistic cell. Missing markers and non-finite numbers are `None`.
fn parse_value(cell: &str) -> Option<f64> {
    if is_missing(cell) {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_numeric_cell(cell: &str) -> bool {
    is_missing(cell) || cell.parse::<f64>().is_ok()
}

/// Parse one statistics CSV into a table.
///
/// The identity columns named in `columns` must exist (nation and cluster are
/// optional). Every other column is kept only if all of its non-missing
/// cells are numeric; text columns are dropped. Rows with an empty player,
/// team or position, and rows the CSV reader rejects, are skipped.
pub fn parse_csv<R: Read>(
    rdr: R,
    file: &str,
    columns: &ColumnsConfig,
) -> Result<PlayerTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            file: file.to_string(),
            source,
        })?
        .clone();

    let find = |name: &str| headers.iter().position(|h| h == name);
    let require = |name: &str| {
        find(name).ok_or_else(|| LoadError::MissingColumn {
            file: file.to_string(),
            column: name.to_string(),
        })
    };

    let player_idx = require(&columns.player)?;
    let team_idx = require(&columns.team)?;
    let position_idx = require(&columns.position)?;
    let nation_idx = columns.nation.as_deref().and_then(find);
    let cluster_idx = columns.cluster.as_deref().and_then(find);
    if let (Some(name), None) = (columns.nation.as_deref(), nation_idx) {
        debug!("{} has no `{}` column; nation left empty", file, name);
    }
    if let (Some(name), None) = (columns.cluster.as_deref(), cluster_idx) {
        debug!("{} has no `{}` column; cluster left empty", file, name);
    }

    let mut candidates: Vec<(usize, String)> = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        if header.is_empty() || columns.is_identity(header) {
            continue;
        }
        if candidates.iter().any(|(_, h)| h == header) {
            warn!("{}: duplicate column `{}`, keeping the first", file, header);
            continue;
        }
        candidates.push((idx, header.to_string()));
    }

    let mut records = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => warn!("{}: skipping malformed row: {}", file, e),
        }
    }

    candidates.retain(|(idx, header)| {
        let numeric = records
            .iter()
            .all(|r| r.get(*idx).map_or(true, is_numeric_cell));
        if !numeric {
            debug!("{}: column `{}` is not numeric, dropped", file, header);
        }
        numeric
    });

    let optional = |record: &csv::StringRecord, idx: Option<usize>| {
        idx.and_then(|i| record.get(i))
            .filter(|v| !is_missing(v))
            .map(str::to_string)
    };

    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        let player = record.get(player_idx).unwrap_or_default();
        let team = record.get(team_idx).unwrap_or_default();
        let position = record.get(position_idx).unwrap_or_default();
        if player.is_empty() || team.is_empty() || position.is_empty() {
            warn!(
                "{}: skipping row with empty identity (player='{}', team='{}', position='{}')",
                file, player, team, position
            );
            continue;
        }

        let mut row = PlayerRow::new(player, team, position);
        row.nation = optional(record, nation_idx);
        row.cluster = optional(record, cluster_idx);
        for (idx, header) in &candidates {
            if let Some(value) = record.get(*idx).and_then(parse_value) {
                row.stats.insert(header.clone(), value);
            }
        }
        rows.push(row);
    }

    let stat_columns = candidates.into_iter().map(|(_, h)| h).collect();
    Ok(PlayerTable::from_rows(stat_columns, rows))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
