use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::page::DataSource;
use crate::models::settings::ReadPolicy;
use crate::models::student::StudentData;

/// Where a write goes when the API refuses it.
pub trait LocalFallback {
    fn store(&self, data: &StudentData) -> Result<(), CoreError>;
}

/// Result of a read, tagged with where the data came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub source: DataSource,
    /// The API failure that caused a fallback, if any
    pub error: Option<String>,
}

impl<T> Fetched<T> {
    pub fn remote(data: T) -> Self {
        Self {
            data,
            source: DataSource::Remote,
            error: None,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source != DataSource::Remote
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            source: self.source,
            error: self.error,
        }
    }
}

/// Resolve an API read against the read policy.
///
/// | outcome            | ServeCache            | ServeDefault | Propagate |
/// |--------------------|-----------------------|--------------|-----------|
/// | Ok                 | Remote                | Remote       | Remote    |
/// | remote failure     | Cache, else Default   | Default      | Err       |
/// | any other failure  | Err                   | Err          | Err       |
///
/// Only transport and API failures are papered over; a local bug such as a
/// validation error always reaches the caller.
pub fn resolve<T>(
    result: Result<T, CoreError>,
    cached: Option<T>,
    policy: ReadPolicy,
    default: impl FnOnce() -> T,
) -> Result<Fetched<T>, CoreError> {
    let err = match result {
        Ok(data) => return Ok(Fetched::remote(data)),
        Err(e) if !e.is_remote() || policy == ReadPolicy::Propagate => return Err(e),
        Err(e) => e,
    };

    let (data, source) = match (policy, cached) {
        (ReadPolicy::ServeCache, Some(data)) => (data, DataSource::Cache),
        _ => (default(), DataSource::Default),
    };
    warn!(error = %err, ?source, "API read failed, serving fallback");
    Ok(Fetched {
        data,
        source,
        error: Some(err.to_string()),
    })
}

/// Where a write ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The API accepted the write
    Persisted,
    /// The API failed; the data went to the local store instead
    StoredLocally { reason: String },
}

impl WriteOutcome {
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        matches!(self, WriteOutcome::Persisted)
    }
}

/// Settle an API write.
///
/// On a remote failure the local writer, if any, is invoked and the write
/// reports `StoredLocally`. Without a local writer, or when the local write
/// itself fails, the error propagates.
pub fn settle_write<F>(result: Result<(), CoreError>, local: Option<F>) -> Result<WriteOutcome, CoreError>
where
    F: FnOnce() -> Result<(), CoreError>,
{
    let err = match result {
        Ok(()) => return Ok(WriteOutcome::Persisted),
        Err(e) if !e.is_remote() => return Err(e),
        Err(e) => e,
    };
    let Some(write_locally) = local else {
        return Err(err);
    };
    write_locally()?;
    info!(error = %err, "API write failed, stored locally");
    Ok(WriteOutcome::StoredLocally {
        reason: err.to_string(),
    })
}
