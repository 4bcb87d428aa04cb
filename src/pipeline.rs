use std::collections::HashSet;

use tracing::{info, warn};

use crate::browser::PageSource;
use crate::bulletin::parse_bulletin;
use crate::cache::PageCache;
use crate::error::{FetchError, MonthError};
use crate::index::parse_index;
use crate::model::{MonthStub, MonthlyRecord};

/// What happened to one month found on an index page.
#[derive(Debug)]
pub enum MonthOutcome {
    Appended(MonthlyRecord),
    Dropped {
        year: i32,
        month: u32,
        reason: MonthError,
    },
    /// Same (year, month) already collected from an earlier index page.
    Duplicate { year: i32, month: u32 },
}

/// Everything one run collected, owned by the caller.
#[derive(Debug, Default)]
pub struct Harvest {
    pub records: Vec<MonthlyRecord>,
    pub dropped: Vec<(i32, u32, String)>,
    pub duplicates: Vec<(i32, u32)>,
}

impl Harvest {
    fn push(&mut self, outcome: MonthOutcome) {
        match outcome {
            MonthOutcome::Appended(record) => self.records.push(record),
            MonthOutcome::Dropped { year, month, reason } => {
                self.dropped.push((year, month, reason.to_string()))
            }
            MonthOutcome::Duplicate { year, month } => self.duplicates.push((year, month)),
        }
    }
}

/// Fetches and parses one month's bulletin. Any failure only drops the month.
pub fn fill_month<S: PageSource>(cache: &PageCache<S>, stub: MonthStub) -> MonthOutcome {
    let parsed = cache
        .get_page(&stub.cache_name(), &stub.href)
        .map_err(MonthError::from)
        .and_then(|html| parse_bulletin(&html).map_err(MonthError::from));
    match parsed {
        Ok(figures) => MonthOutcome::Appended(stub.complete(figures)),
        Err(reason) => {
            warn!(year = stub.year, month = stub.month, %reason, "drop");
            MonthOutcome::Dropped {
                year: stub.year,
                month: stub.month,
                reason,
            }
        }
    }
}

pub fn process_index_page<S: PageSource>(
    cache: &PageCache<S>,
    page_id: &str,
    seen: &mut HashSet<(i32, u32)>,
) -> Result<Vec<MonthOutcome>, FetchError> {
    info!(page_id, "begin process");
    let html = cache.get_page(page_id, page_id)?;
    let stubs = parse_index(&html);
    info!(page_id, months = stubs.len(), "index parsed");

    let mut outcomes = Vec::with_capacity(stubs.len());
    for stub in stubs {
        if seen.contains(&stub.key()) {
            warn!(year = stub.year, month = stub.month, page_id, "duplicate month skipped");
            outcomes.push(MonthOutcome::Duplicate {
                year: stub.year,
                month: stub.month,
            });
            continue;
        }
        let key = stub.key();
        let outcome = fill_month(cache, stub);
        if let MonthOutcome::Appended(_) = outcome {
            seen.insert(key);
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Walks every index page in order and collects the parsed months.
/// Only an index page that cannot be fetched aborts the run.
pub fn collect_records<S: PageSource>(
    cache: &PageCache<S>,
    page_ids: &[String],
) -> Result<Harvest, FetchError> {
    let mut harvest = Harvest::default();
    let mut seen = HashSet::new();
    for page_id in page_ids {
        for outcome in process_index_page(cache, page_id, &mut seen)? {
            harvest.push(outcome);
        }
    }
    info!(
        records = harvest.records.len(),
        dropped = harvest.dropped.len(),
        duplicates = harvest.duplicates.len(),
        "collection finished"
    );
    Ok(harvest)
}
