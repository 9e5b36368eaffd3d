use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::aggregate::KeyPart;
use crate::error::{Result, SalesError};

// ---------------------------------------------------------------------------
// SalesRecord — One transaction row of the input dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub sales: f64,
    #[serde(default)]
    pub store_id: Option<String>,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl SalesRecord {
    /// Create a record carrying only the two required columns.
    pub fn new(date: NaiveDate, sales: f64) -> Self {
        Self {
            date,
            sales,
            store_id: None,
            store_name: None,
            item_id: None,
            item_name: None,
            category: None,
        }
    }

    pub fn store(mut self, id: &str, name: &str) -> Self {
        self.store_id = Some(id.to_string());
        self.store_name = Some(name.to_string());
        self
    }

    pub fn store_id(mut self, id: &str) -> Self {
        self.store_id = Some(id.to_string());
        self
    }

    pub fn item(mut self, id: &str, name: &str) -> Self {
        self.item_id = Some(id.to_string());
        self.item_name = Some(name.to_string());
        self
    }

    pub fn item_id(mut self, id: &str) -> Self {
        self.item_id = Some(id.to_string());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }
}

// ---------------------------------------------------------------------------
// Schema — Which optional columns the dataset actually carries
// ---------------------------------------------------------------------------

/// Column presence for the optional fields of a dataset.
///
/// A column counts as present when at least one record has a value for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub store_id: bool,
    pub store_name: bool,
    pub item_id: bool,
    pub item_name: bool,
    pub category: bool,
}

impl Schema {
    pub fn infer(records: &[SalesRecord]) -> Self {
        let mut schema = Schema::default();
        for r in records {
            schema.store_id |= r.store_id.is_some();
            schema.store_name |= r.store_name.is_some();
            schema.item_id |= r.item_id.is_some();
            schema.item_name |= r.item_name.is_some();
            schema.category |= r.category.is_some();
        }
        schema
    }

    pub fn union(&self, other: &Schema) -> Schema {
        Schema {
            store_id: self.store_id || other.store_id,
            store_name: self.store_name || other.store_name,
            item_id: self.item_id || other.item_id,
            item_name: self.item_name || other.item_name,
            category: self.category || other.category,
        }
    }

    /// Whether the dataset can be grouped by `dim`.
    pub fn has(&self, dim: Dimension) -> bool {
        match dim {
            Dimension::StoreId => self.store_id,
            Dimension::StoreName => self.store_name,
            Dimension::ItemId => self.item_id,
            Dimension::ItemName => self.item_name,
            Dimension::Category => self.category,
            Dimension::Date
            | Dimension::DayOfWeek
            | Dimension::Month
            | Dimension::Year
            | Dimension::YearMonth => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Dimension — A column (or calendar extraction) to group by
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Date,
    StoreId,
    StoreName,
    ItemId,
    ItemName,
    Category,
    DayOfWeek,
    Month,
    Year,
    YearMonth,
}

impl Dimension {
    /// Source column the dimension reads from.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::StoreId => "store_id",
            Dimension::StoreName => "store_name",
            Dimension::ItemId => "item_id",
            Dimension::ItemName => "item_name",
            Dimension::Category => "category",
            Dimension::Date
            | Dimension::DayOfWeek
            | Dimension::Month
            | Dimension::Year
            | Dimension::YearMonth => "date",
        }
    }

    pub fn is_optional(self) -> bool {
        self.column() != "date"
    }

    /// SQL expression producing the group key.
    ///
    /// Every expression sorts in the natural presentation order of its key,
    /// e.g. `isodow` yields 1 (Monday) through 7 (Sunday).
    pub fn sql_expr(self) -> &'static str {
        match self {
            Dimension::Date => "date",
            Dimension::DayOfWeek => "isodow(date)",
            Dimension::Month => "month(date)",
            Dimension::Year => "year(date)",
            Dimension::YearMonth => "year(date) * 100 + month(date)",
            other => other.column(),
        }
    }

    /// Human-readable axis label.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Date => "Date",
            Dimension::StoreId | Dimension::StoreName => "Store",
            Dimension::ItemId | Dimension::ItemName => "Item",
            Dimension::Category => "Category",
            Dimension::DayOfWeek => "Day of Week",
            Dimension::Month => "Month",
            Dimension::Year => "Year",
            Dimension::YearMonth => "Month",
        }
    }

    /// Decode a key column value returned by DuckDB into a typed key part.
    pub(crate) fn parse_key(self, value: &Value) -> Result<KeyPart> {
        let bad = || {
            SalesError::InvalidInput(format!(
                "unexpected {:?} key value: {}",
                self, value
            ))
        };

        match self {
            Dimension::Date => {
                let s = value.as_str().ok_or_else(bad)?;
                let date: NaiveDate = s.parse().map_err(|_| bad())?;
                Ok(KeyPart::Date(date))
            }
            Dimension::DayOfWeek => {
                let n = value.as_i64().ok_or_else(bad)?;
                KeyPart::weekday_from_iso(n).ok_or_else(bad)
            }
            Dimension::Month => {
                let n = value.as_i64().ok_or_else(bad)?;
                if (1..=12).contains(&n) {
                    Ok(KeyPart::Month(n as u32))
                } else {
                    Err(bad())
                }
            }
            Dimension::Year => {
                let n = value.as_i64().ok_or_else(bad)?;
                Ok(KeyPart::Year(n as i32))
            }
            Dimension::YearMonth => {
                // Encoded as year * 100 + month; euclidean split keeps
                // negative years intact
                let n = value.as_i64().ok_or_else(bad)?;
                let year = i32::try_from(n.div_euclid(100)).map_err(|_| bad())?;
                let month = n.rem_euclid(100) as u32;
                if (1..=12).contains(&month) {
                    Ok(KeyPart::YearMonth { year, month })
                } else {
                    Err(bad())
                }
            }
            _ => {
                let s = value.as_str().ok_or_else(bad)?;
                Ok(KeyPart::Text(s.to_string()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Metric — Numeric field to aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Sales,
}

impl Metric {
    pub fn column(self) -> &'static str {
        match self {
            Metric::Sales => "sales",
        }
    }
}
