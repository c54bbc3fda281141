use chrono::{DateTime, Utc};

/// Converts a point in time to the fractional epoch seconds used by the
/// tracker and its persisted record.
pub fn epoch_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn epoch_seconds_keeps_subsecond_precision() {
        let time = Utc.timestamp_micros(5_000_250_000).unwrap();
        assert_eq!(epoch_seconds(time), 5000.25);
    }
}
