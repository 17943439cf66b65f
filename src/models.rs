//! Parsed CSV rows and the field vocabulary charts are declared against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Columns understood by the aggregator. Header names are matched exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    Country,
    Cancer,
    Year,
    Articles,
    #[serde(rename = "ASR")]
    Asr,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Country,
        Field::Cancer,
        Field::Year,
        Field::Articles,
        Field::Asr,
    ];

    /// Column name as it appears in the CSV header.
    pub fn header(self) -> &'static str {
        match self {
            Field::Country => "Country",
            Field::Cancer => "Cancer",
            Field::Year => "Year",
            Field::Articles => "Articles",
            Field::Asr => "ASR",
        }
    }

    pub fn from_header(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.header() == name)
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Small set of [`Field`]s, used to declare what a chart requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldSet(u8);

impl FieldSet {
    pub const EMPTY: FieldSet = FieldSet(0);

    pub fn of(fields: &[Field]) -> Self {
        fields.iter().fold(Self::EMPTY, |set, f| set.with(*f))
    }

    pub fn with(self, field: Field) -> Self {
        FieldSet(self.0 | field.bit())
    }

    pub fn contains(self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Field::header).collect();
        f.write_str(&names.join(","))
    }
}

/// One data row (one line of a CSV dataset).
///
/// Every field is optional: datasets carry different column subsets, and a cell
/// that is empty or fails to parse is recorded as `None` rather than coerced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub country: Option<String>,
    pub cancer: Option<String>,
    pub year: Option<i32>,
    pub articles: Option<u64>,
    pub asr: Option<f64>,
}

impl Record {
    /// Build a record from a header-aligned row of trimmed cells.
    pub fn from_cells(columns: &[Option<Field>], cells: &[&str]) -> Self {
        let mut rec = Record::default();
        for (field, cell) in columns.iter().zip(cells) {
            let Some(field) = field else { continue };
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            match field {
                Field::Country => rec.country = Some(cell.to_string()),
                Field::Cancer => rec.cancer = Some(cell.to_string()),
                Field::Year => rec.year = cell.parse::<i32>().ok(),
                Field::Articles => rec.articles = cell.parse::<u64>().ok(),
                Field::Asr => rec.asr = cell.parse::<f64>().ok().filter(|v| v.is_finite()),
            }
        }
        rec
    }

    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Country => self.country.is_some(),
            Field::Cancer => self.cancer.is_some(),
            Field::Year => self.year.is_some(),
            Field::Articles => self.articles.is_some(),
            Field::Asr => self.asr.is_some(),
        }
    }

    /// True when every field in `required` is present.
    pub fn satisfies(&self, required: FieldSet) -> bool {
        required.iter().all(|f| self.has(f))
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn cancer(&self) -> Option<&str> {
        self.cancer.as_deref()
    }
}

/// Composite grouping key for Country×Year sums.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountryYear {
    pub country: String,
    pub year: i32,
}
