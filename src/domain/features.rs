use crate::domain::errors::PredictError;
use chrono::{Datelike, NaiveDate};

/// Textual day-first format accepted for prediction dates, matching the
/// format of the source page.
pub const DAY_FIRST_FORMAT: &str = "%d/%m/%Y";

/// The (year, month, day) numeric encoding of a calendar date used as
/// regressor input. Built transiently for training and prediction,
/// never persisted.
///
/// The regressor consumes rows in exactly this column order; keep
/// [`FeatureRow::to_input`] as the single place that defines it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureRow {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl FeatureRow {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// The numeric row handed to the regressor: `[year, month, day]`.
    pub fn to_input(self) -> [f64; 3] {
        [self.year as f64, self.month as f64, self.day as f64]
    }
}

/// The Predictor's optional day argument, in its three accepted forms.
///
/// Numeric day values are passed through to the model without calendar
/// validation; only the textual form goes through a date parser.
#[derive(Debug, Clone, PartialEq)]
pub enum DaySpec {
    /// A concrete calendar date. Overrides the year/month arguments.
    Date(NaiveDate),
    /// A `DD/MM/YYYY` string. Overrides the year/month arguments.
    Text(String),
    /// A raw day-of-month, combined with the year/month arguments.
    DayOfMonth(u32),
}

impl DaySpec {
    /// Resolves this spec against the requested year/month into the
    /// feature row to predict.
    pub fn resolve(&self, year: i32, month: u32) -> Result<FeatureRow, PredictError> {
        match self {
            DaySpec::Date(date) => Ok(FeatureRow::from_date(*date)),
            DaySpec::Text(text) => {
                let date = NaiveDate::parse_from_str(text, DAY_FIRST_FORMAT).map_err(|e| {
                    PredictError::InvalidDate {
                        input: text.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(FeatureRow::from_date(date))
            }
            DaySpec::DayOfMonth(day) => Ok(FeatureRow::new(year, month, *day)),
        }
    }
}
