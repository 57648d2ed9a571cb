//! Derived statistics over a batch of weather records.

use crate::types::WeatherRecord;

/// The hottest and coldest records of one batch.
#[derive(Debug, Clone)]
pub struct TemperatureExtremes {
    pub hottest: WeatherRecord,
    pub coldest: WeatherRecord,
}

/// Pick the hottest and coldest records by their Fahrenheit reading.
///
/// Exact ties keep the record seen first, so the result is stable for a
/// given input order. Returns `None` only for an empty slice; batch
/// results with zero successes never reach this point because the fetch
/// cycle fails as a whole instead.
pub fn temperature_extremes(records: &[WeatherRecord]) -> Option<TemperatureExtremes> {
    let first = records.first()?;
    let mut hottest = first;
    let mut coldest = first;

    for record in records {
        if record.temperature.fahrenheit > hottest.temperature.fahrenheit {
            hottest = record;
        }
        if record.temperature.fahrenheit < coldest.temperature.fahrenheit {
            coldest = record;
        }
    }

    Some(TemperatureExtremes {
        hottest: hottest.clone(),
        coldest: coldest.clone(),
    })
}
