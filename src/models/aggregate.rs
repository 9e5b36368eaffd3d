use chrono::{NaiveDate, Weekday};
use serde::{Serialize, Serializer};
use std::fmt;

use super::record::Dimension;
use crate::config::{MONTH_ABBREVIATIONS, WEEKDAY_NAMES};

// ---------------------------------------------------------------------------
// KeyPart / GroupKey — Typed group keys
// ---------------------------------------------------------------------------

/// One component of a group key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Text(String),
    Date(NaiveDate),
    Weekday(Weekday),
    /// Calendar month, 1 = January.
    Month(u32),
    Year(i32),
    YearMonth { year: i32, month: u32 },
}

impl KeyPart {
    /// Map an ISO day number (1 = Monday .. 7 = Sunday) to a weekday key.
    pub fn weekday_from_iso(n: i64) -> Option<Self> {
        let day = match n {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            7 => Weekday::Sun,
            _ => return None,
        };
        Some(KeyPart::Weekday(day))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            KeyPart::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self, KeyPart::Weekday(Weekday::Sat | Weekday::Sun))
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Text(s) => f.write_str(s),
            KeyPart::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            KeyPart::Weekday(w) => {
                f.write_str(WEEKDAY_NAMES[w.num_days_from_monday() as usize])
            }
            KeyPart::Month(m) => match MONTH_ABBREVIATIONS.get((*m as usize).wrapping_sub(1)) {
                Some(name) => f.write_str(name),
                None => write!(f, "{}", m),
            },
            KeyPart::Year(y) => write!(f, "{}", y),
            KeyPart::YearMonth { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}

impl Serialize for KeyPart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A group key: one part per grouping dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(pub Vec<KeyPart>);

impl GroupKey {
    pub fn single(part: KeyPart) -> Self {
        GroupKey(vec![part])
    }

    pub fn text(s: &str) -> Self {
        GroupKey::single(KeyPart::Text(s.to_string()))
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    /// First component; every key has at least one.
    pub fn first(&self) -> Option<&KeyPart> {
        self.0.first()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// AggregateStats / AggregateResult — Output of the aggregator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateStats {
    pub sum: f64,
    pub mean: f64,
    pub count: u64,
}

impl AggregateStats {
    /// Build stats from a sum and a row count, deriving the mean.
    pub fn from_sum(sum: f64, count: u64) -> Self {
        let mean = if count == 0 { 0.0 } else { sum / count as f64 };
        Self { sum, mean, count }
    }

    pub fn get(&self, field: StatField) -> f64 {
        match field {
            StatField::Sum => self.sum,
            StatField::Mean => self.mean,
            StatField::Count => self.count as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    Sum,
    Mean,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateEntry {
    pub key: GroupKey,
    pub stats: AggregateStats,
}

/// Ordered mapping from group key to `{sum, mean, count}`.
///
/// Entries appear once per distinct key, in natural key order (weekdays
/// Monday first, calendar values ascending, text lexicographic).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub dimensions: Vec<Dimension>,
    entries: Vec<AggregateEntry>,
}

impl AggregateResult {
    pub fn new(dimensions: Vec<Dimension>, entries: Vec<AggregateEntry>) -> Self {
        Self {
            dimensions,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AggregateEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregateEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.entries.iter().map(|e| &e.key)
    }

    pub fn get(&self, key: &GroupKey) -> Option<&AggregateStats> {
        self.entries.iter().find(|e| &e.key == key).map(|e| &e.stats)
    }

    /// Look up an entry by its display label (e.g. `"Monday"`, `"Store A"`).
    pub fn get_by_label(&self, label: &str) -> Option<&AggregateStats> {
        self.entries
            .iter()
            .find(|e| e.key.to_string() == label)
            .map(|e| &e.stats)
    }

    /// Sum of `sum` over every group.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.stats.sum).sum()
    }

    /// Entry with the largest value of `field`; the first one wins ties.
    pub fn max_by(&self, field: StatField) -> Option<&AggregateEntry> {
        self.entries.iter().fold(None, |best: Option<&AggregateEntry>, e| match best {
            Some(b) if b.stats.get(field) >= e.stats.get(field) => Some(b),
            _ => Some(e),
        })
    }

    /// Entry with the smallest value of `field`; the first one wins ties.
    pub fn min_by(&self, field: StatField) -> Option<&AggregateEntry> {
        self.entries.iter().fold(None, |best: Option<&AggregateEntry>, e| match best {
            Some(b) if b.stats.get(field) <= e.stats.get(field) => Some(b),
            _ => Some(e),
        })
    }
}

impl<'a> IntoIterator for &'a AggregateResult {
    type Item = &'a AggregateEntry;
    type IntoIter = std::slice::Iter<'a, AggregateEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// RankedEntry — Output of the ranker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub key: GroupKey,
    pub value: f64,
}
