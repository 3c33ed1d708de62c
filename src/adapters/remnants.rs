use crate::config::SyncConfig;
use crate::domain::model::RemnantRecord;
use crate::domain::ports::RemnantsSource;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Reader};
use reqwest::Client;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Downloads the supplier stock archive and turns its spreadsheet into records.
pub struct RemnantsFetcher {
    client: Client,
    url: String,
    work_dir: PathBuf,
    file_name: String,
    header_row: usize,
}

impl RemnantsFetcher {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.remnants_url.clone(),
            work_dir: config.work_dir.clone(),
            file_name: config.remnants_file.clone(),
            header_row: config.header_row,
        })
    }

    async fn download_archive(&self) -> Result<Vec<u8>> {
        tracing::debug!("Downloading remnants archive from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::HttpError {
                status: status.as_u16(),
                url: self.url.clone(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    fn extract_archive(&self, archive: Vec<u8>) -> Result<PathBuf> {
        let mut zip = zip::ZipArchive::new(Cursor::new(archive))?;
        std::fs::create_dir_all(&self.work_dir)?;
        zip.extract(&self.work_dir)?;

        let path = self.work_dir.join(&self.file_name);
        if !path.is_file() {
            return Err(SyncError::MissingFileError {
                path: path.display().to_string(),
            });
        }
        Ok(path)
    }
}

#[async_trait]
impl RemnantsSource for RemnantsFetcher {
    async fn download_remnants(&self) -> Result<Vec<RemnantRecord>> {
        let archive = self.download_archive().await?;
        let path = self.extract_archive(archive)?;

        let parsed = read_rows(&path).map(|rows| rows_to_records(rows, self.header_row));

        // The extracted file is removed whether or not it parsed.
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::warn!("Could not remove {}: {}", path.display(), e);
        }

        let records = parsed?;
        tracing::info!("📄 Read {} remnant rows from {}", records.len(), self.file_name);
        Ok(records)
    }
}

/// Reads every row of the first sheet as text. `.csv` goes through the csv reader,
/// anything else through calamine.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        read_csv_rows(path)
    } else {
        read_workbook_rows(path)
    }
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(spreadsheet_error)?;

    reader
        .records()
        .map(|row| {
            row.map(|record| record.iter().map(str::to_string).collect())
                .map_err(spreadsheet_error)
        })
        .collect()
}

fn read_workbook_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SyncError::SpreadsheetError {
            message: format!("{} has no worksheets", path.display()),
        })??;

    // calamine trims leading empty rows; pad them back so row indexes match the sheet.
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows = vec![Vec::new(); first_row];
    rows.extend(
        range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>()),
    );
    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn spreadsheet_error(err: csv::Error) -> SyncError {
    SyncError::SpreadsheetError {
        message: err.to_string(),
    }
}

/// Column names for a header row. Blank headers become `Unnamed: <index>` and repeated
/// names get `.1`, `.2`, ... suffixes, so no column shadows another.
fn column_names(header: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(header.len());
    header
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let base = match raw.trim() {
                "" => format!("Unnamed: {}", i),
                name => name.to_string(),
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            name
        })
        .collect()
}

/// Row `header_row` names the columns; every later row becomes a record.
/// Cells missing from a short row are stored as empty strings.
pub fn rows_to_records(rows: Vec<Vec<String>>, header_row: usize) -> Vec<RemnantRecord> {
    let mut rows = rows.into_iter().skip(header_row);
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let columns = column_names(&header);

    rows.map(|row| {
        columns
            .iter()
            .enumerate()
            .map(|(i, column)| (column.clone(), row.get(i).cloned().unwrap_or_default()))
            .collect()
    })
    .collect()
}
