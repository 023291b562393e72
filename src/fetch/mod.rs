use crate::error::Result;
use crate::records::Period;

pub mod archives;
pub mod decode;
pub mod period;
pub mod profile;
pub mod scheduler;
pub mod transport;

#[cfg(test)]
pub(crate) mod stub;

pub use archives::ArchiveLister;
pub use decode::{PlayerProfile, RawGameRecord};
pub use period::{FetchTask, PeriodFetcher};
pub use profile::{ProfileCache, ProfileLookup};
pub use scheduler::FetchScheduler;
pub use transport::{HttpResponse, HttpTransport, Transport};

/// Default number of monthly archives fetched at the same time.
pub const PERIOD_CONCURRENCY_LIMIT: usize = 10;

pub type FetchResult<T> = Result<T>;

#[inline]
pub fn ensure_concurrency_limit(limit: usize) -> usize {
    limit.max(1)
}

/// URL layout of the public player API.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn profile(&self, username: &str) -> String {
        format!("{}/{}", self.base_url, username)
    }

    pub fn archives(&self, username: &str) -> String {
        format!("{}/{}/games/archives", self.base_url, username)
    }

    pub fn period(&self, username: &str, period: Period) -> String {
        format!(
            "{}/{}/games/{}/{:02}",
            self.base_url, username, period.year, period.month
        )
    }
}
