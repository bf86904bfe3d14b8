use crate::commands::{helpers, search, CmdResult};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::model::{DayActivity, DocumentActivity, CREATED_KEY};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet};

/// Per-day counts of blocks created and modified under `rel`, plus a summary
/// per document, most recently touched first.
///
/// A modification only counts towards a day when it differs from the day the
/// block was created. Unlike search this tolerates timestamps it cannot read:
/// such values simply do not count.
pub fn run(corpus: &Corpus, rel: &str) -> Result<CmdResult> {
    let dir = helpers::directory_path(corpus, rel)?;
    let format = &corpus.config().timestamp_format;

    let mut days: BTreeMap<NaiveDate, DayActivity> = BTreeMap::new();
    let mut tallies: BTreeMap<String, DocumentTally> = BTreeMap::new();
    for result in search::scan(corpus, &dir, "")? {
        let created = result
            .metadata
            .get(CREATED_KEY)
            .and_then(|v| v.as_str())
            .and_then(|v| stamp_of(v, format));
        let modified = stamp_of(&result.modified, format);

        let created_day = created.map(|stamp| stamp.date());
        if let Some(day) = created_day {
            days.entry(day).or_default().created += 1;
        }
        if let Some(day) = modified.map(|stamp| stamp.date()) {
            if Some(day) != created_day {
                days.entry(day).or_default().modified += 1;
            }
        }

        tallies.entry(result.path).or_default().add(created, modified);
    }

    let mut tallies: Vec<(String, DocumentTally)> = tallies.into_iter().collect();
    tallies.sort_by(|a, b| b.1.last.cmp(&a.1.last));
    let documents = tallies
        .into_iter()
        .map(|(link, tally)| DocumentActivity {
            link,
            blocks: tally.blocks,
            created_days: tally.created_days.len(),
            modified_days: tally.modified_days.len(),
            last_modified: tally.last.map(|stamp| stamp.format(format).to_string()),
        })
        .collect();

    Ok(CmdResult::default().with_activity(days, documents))
}

#[derive(Default)]
struct DocumentTally {
    blocks: usize,
    created_days: BTreeSet<NaiveDate>,
    modified_days: BTreeSet<NaiveDate>,
    last: Option<NaiveDateTime>,
}

impl DocumentTally {
    fn add(&mut self, created: Option<NaiveDateTime>, modified: Option<NaiveDateTime>) {
        self.blocks += 1;
        self.created_days.extend(created.map(|stamp| stamp.date()));
        self.modified_days.extend(modified.map(|stamp| stamp.date()));
        self.last = self.last.max(modified.or(created));
    }
}

fn stamp_of(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, format).ok()
}
