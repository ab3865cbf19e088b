use crate::application::model::TrainedModel;
use crate::domain::errors::PredictError;
use crate::domain::features::{DaySpec, FeatureRow};

/// Days sampled to approximate a monthly average. Day 30 is assumed to
/// exist, which is off for February, and the mean is not
/// calendar-weighted.
const MONTH_SAMPLE_DAYS: [u32; 3] = [1, 15, 30];

/// One prediction for the day described by `day`, in any of its three
/// forms. A date-carrying form overrides the year/month arguments.
pub fn predict_day(
    model: &TrainedModel,
    year: i32,
    month: u32,
    day: DaySpec,
) -> Result<f64, PredictError> {
    let row = day.resolve(year, month)?;
    model.predict_row(row)
}

/// Approximate average price for the given month: the mean of the
/// model's predictions at days {1, 15, 30}.
pub fn predict_month(model: &TrainedModel, year: i32, month: u32) -> Result<f64, PredictError> {
    let mut sum = 0.0;
    for day in MONTH_SAMPLE_DAYS {
        sum += model.predict_row(FeatureRow::new(year, month, day))?;
    }
    Ok(sum / MONTH_SAMPLE_DAYS.len() as f64)
}
