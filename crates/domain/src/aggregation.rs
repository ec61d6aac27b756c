//! Multi-source aggregation
//!
//! Merges the successful readings of one refresh for one city into a single
//! reading:
//! - temperature is the arithmetic mean,
//! - humidity comes from the first reading that has one (provider call order),
//! - time is the most recent observation time.

use crate::entities::NormalizedWeather;
use crate::errors::DomainError;

/// Source tag carried by merged readings
pub const AGGREGATED_SOURCE: &str = "aggregated";

/// Merge readings for `city` into one aggregated reading
///
/// The resulting reading uses `city` as its city, whatever the providers
/// echoed back.
///
/// # Errors
///
/// Returns `DomainError::NoReadings` if `readings` is empty. Callers are
/// expected to skip aggregation when no provider succeeded.
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(
    city: &str,
    readings: &[NormalizedWeather],
) -> Result<NormalizedWeather, DomainError> {
    let latest = readings
        .iter()
        .map(NormalizedWeather::time)
        .max()
        .ok_or(DomainError::NoReadings)?;

    let sum: f64 = readings.iter().map(NormalizedWeather::temperature).sum();
    let temperature = sum / readings.len() as f64;
    let humidity = readings.iter().find_map(NormalizedWeather::humidity);

    Ok(NormalizedWeather::new(
        city,
        temperature,
        humidity,
        AGGREGATED_SOURCE,
        latest,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn reading(temp: f64, humidity: Option<f64>, time: DateTime<Utc>) -> NormalizedWeather {
        NormalizedWeather::new("somewhere", temp, humidity, "test", time)
    }

    #[test]
    fn paris_example() {
        let readings = vec![
            reading(10.0, None, at(8)),
            reading(20.0, Some(55.0), at(9)),
        ];

        let agg = aggregate("Paris", &readings).unwrap();

        assert!((agg.temperature() - 15.0).abs() < f64::EPSILON);
        assert_eq!(agg.humidity(), Some(55.0));
        assert_eq!(agg.time(), at(9));
        assert_eq!(agg.source(), AGGREGATED_SOURCE);
        assert_eq!(agg.city(), "Paris");
    }

    #[test]
    fn single_reading_passes_through_values() {
        let agg = aggregate("Oslo", &[reading(-4.5, Some(80.0), at(3))]).unwrap();
        assert!((agg.temperature() + 4.5).abs() < f64::EPSILON);
        assert_eq!(agg.humidity(), Some(80.0));
        assert_eq!(agg.time(), at(3));
    }

    #[test]
    fn first_humidity_wins_not_average() {
        let readings = vec![
            reading(1.0, Some(40.0), at(1)),
            reading(2.0, Some(90.0), at(2)),
        ];
        assert_eq!(aggregate("x", &readings).unwrap().humidity(), Some(40.0));
    }

    #[test]
    fn humidity_absent_when_no_source_reports_it() {
        let readings = vec![reading(1.0, None, at(1)), reading(2.0, None, at(2))];
        assert!(aggregate("x", &readings).unwrap().humidity().is_none());
    }

    #[test]
    fn latest_time_wins_regardless_of_order() {
        let readings = vec![reading(1.0, None, at(12)), reading(2.0, None, at(6))];
        assert_eq!(aggregate("x", &readings).unwrap().time(), at(12));
    }

    #[test]
    fn uses_requested_city_not_provider_echo() {
        let echoed = NormalizedWeather::new("Paris, FR", 3.0, None, "openweathermap", at(1));
        assert_eq!(aggregate("paris", &[echoed]).unwrap().city(), "paris");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(aggregate("x", &[]).unwrap_err(), DomainError::NoReadings);
    }
}
