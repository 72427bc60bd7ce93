use crate::core::upload::TempUpload;
use crate::domain::model::{ContactRecord, ImportSummary, NewContact, RowError};
use crate::domain::ports::{ChunkSource, ContactStore};
use crate::utils::error::{ContactError, Result};
use csv::StringRecord;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ImportLimits {
    pub upload_dir: PathBuf,
    pub max_file_bytes: u64,
    pub max_rows: usize,
    pub timeout: Duration,
}

/// A failed import. `rows_seen` and `rejected` keep whatever was learned
/// before the failure; nothing is persisted when a job fails.
#[derive(Debug)]
pub struct ImportFailure {
    pub error: ContactError,
    pub rows_seen: usize,
    pub rejected: Vec<RowError>,
}

impl From<ContactError> for ImportFailure {
    fn from(error: ContactError) -> Self {
        Self {
            error,
            rows_seen: 0,
            rejected: Vec::new(),
        }
    }
}

/// Rows parsed out of one CSV file.
#[derive(Debug, Default)]
pub struct ParsedBatch {
    pub rows_seen: usize,
    pub records: Vec<ContactRecord>,
    pub rejected: Vec<RowError>,
}

/// Header positions of the contact columns.
#[derive(Debug, Default)]
struct ColumnMap {
    name: Option<usize>,
    first_name: Option<usize>,
    last_name: Option<usize>,
    email: Option<usize>,
    phone: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut columns = Self::default();

        for (index, header) in headers.iter().enumerate() {
            let normalized: String = header
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase();

            let slot = match normalized.as_str() {
                "name" | "fullname" => &mut columns.name,
                "firstname" | "givenname" => &mut columns.first_name,
                "lastname" | "surname" | "familyname" => &mut columns.last_name,
                "email" | "emailaddress" => &mut columns.email,
                "phone" | "phonenumber" | "mobile" => &mut columns.phone,
                _ => continue,
            };
            // first matching column wins
            slot.get_or_insert(index);
        }

        if columns.name.is_none() && (columns.first_name.is_none() || columns.last_name.is_none()) {
            return Err(ContactError::validation(
                "CSV header must contain a name column or both firstName and lastName",
            ));
        }

        Ok(columns)
    }

    fn candidate(&self, record: &StringRecord) -> NewContact {
        let field = |index: Option<usize>| index.and_then(|i| record.get(i)).map(str::to_string);

        NewContact {
            name: field(self.name),
            first_name: field(self.first_name),
            last_name: field(self.last_name),
            email: field(self.email),
            phone: field(self.phone),
        }
    }
}

/// Parses CSV rows into contact records, rejecting rows without a usable name.
///
/// Structural CSV errors (unequal field counts, invalid UTF-8) and going past
/// `max_rows` abort the whole batch.
pub fn parse_contacts<R: Read>(reader: R, max_rows: usize, owner: Option<&str>) -> Result<ParsedBatch> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut batch = ParsedBatch::default();
    if headers.is_empty() {
        return Ok(batch);
    }
    let columns = ColumnMap::from_headers(&headers)?;

    for (index, result) in csv_reader.records().enumerate() {
        let row = index + 1;
        if row > max_rows {
            return Err(ContactError::RowLimitExceeded { limit: max_rows });
        }

        let record = result?;
        batch.rows_seen = row;

        match columns.candidate(&record).into_record(owner) {
            Ok(contact) => batch.records.push(contact),
            Err(e) => {
                tracing::debug!("Rejecting CSV row {}: {}", row, e);
                batch.rejected.push(RowError {
                    row,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(batch)
}

pub struct ImportPipeline {
    store: Arc<dyn ContactStore>,
    limits: ImportLimits,
}

impl ImportPipeline {
    pub fn new(store: Arc<dyn ContactStore>, limits: ImportLimits) -> Self {
        Self { store, limits }
    }

    pub fn limits(&self) -> &ImportLimits {
        &self.limits
    }

    /// Runs one import job: receive, parse, validate, bulk insert, clean up.
    ///
    /// The temp upload is removed before this returns, whatever the outcome.
    pub async fn run<C: ChunkSource>(
        &self,
        source: Option<C>,
        owner: Option<String>,
    ) -> std::result::Result<ImportSummary, ImportFailure> {
        let Some(mut source) = source else {
            tracing::warn!("Import requested without a file");
            return Err(ContactError::validation("No file provided").into());
        };

        let upload = TempUpload::create(&self.limits.upload_dir)?;
        tracing::info!("📥 Import started ({})", upload.path().display());

        let outcome = match tokio::time::timeout(
            self.limits.timeout,
            self.execute(&upload, &mut source, owner),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(ContactError::Timeout {
                after: self.limits.timeout,
            }
            .into()),
        };

        if let Err(e) = upload.close() {
            tracing::error!("❌ Failed to remove upload file: {}", e);
        }

        match &outcome {
            Ok(summary) => tracing::info!(
                "✅ Import finished: {} rows seen, {} inserted, {} rejected",
                summary.rows_seen,
                summary.inserted,
                summary.rejected.len()
            ),
            Err(failure) => tracing::warn!(
                "❌ Import failed after {} rows: {}",
                failure.rows_seen,
                failure.error
            ),
        }

        outcome
    }

    async fn execute<C: ChunkSource>(
        &self,
        upload: &TempUpload,
        source: &mut C,
        owner: Option<String>,
    ) -> std::result::Result<ImportSummary, ImportFailure> {
        upload.receive(source, self.limits.max_file_bytes).await?;

        let file = upload.reopen()?;
        let max_rows = self.limits.max_rows;
        let batch = tokio::task::spawn_blocking(move || {
            parse_contacts(std::io::BufReader::new(file), max_rows, owner.as_deref())
        })
        .await
        .map_err(|e| ContactError::Processing {
            message: format!("CSV parser task failed: {}", e),
        })??;

        let ParsedBatch {
            rows_seen,
            records,
            rejected,
        } = batch;

        if records.is_empty() {
            return Ok(ImportSummary {
                rows_seen,
                inserted: 0,
                rejected,
            });
        }

        match self.store.insert_many(records).await {
            Ok(inserted) => Ok(ImportSummary {
                rows_seen,
                inserted,
                rejected,
            }),
            Err(error) => Err(ImportFailure {
                error,
                rows_seen,
                rejected,
            }),
        }
    }
}
