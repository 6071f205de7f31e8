//! Plain-text rendering of API responses

use std::fmt::Write;

use presentation_http::handlers::vineyards::{SeasonResponse, VineyardResponse};

/// Cumulative GDD thresholds reported in the season summary
const MILESTONE_STEP: i64 = 500;

/// One line per vineyard: ID, base temperature, coordinates and name
#[must_use]
pub fn vineyard_table(vineyards: &[VineyardResponse]) -> String {
    if vineyards.is_empty() {
        return "No vineyards registered.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<36}  {:>6}  {:>10}  {:>11}  NAME",
        "ID", "BASE", "LAT", "LON"
    );
    for v in vineyards {
        let _ = writeln!(
            out,
            "{:<36}  {:>6.1}  {:>10.4}  {:>11.4}  {}",
            v.id, v.gdd_base_temp, v.location.latitude, v.location.longitude, v.name
        );
    }
    out
}

/// Season total followed by the first day each cumulative milestone was reached
#[must_use]
pub fn season_summary(season: &SeasonResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", season.vineyard.name, season.year);

    let (Some(first), Some(last)) = (season.gdd_data.first(), season.gdd_data.last()) else {
        let _ = writeln!(out, "No data for this season.");
        return out;
    };

    let _ = writeln!(
        out,
        "Season: {} to {} ({} days)",
        first.date,
        last.date,
        season.gdd_data.len()
    );
    let _ = writeln!(out, "Total GDD: {:.1}", season.total_gdd);

    let mut next = MILESTONE_STEP;
    for day in &season.gdd_data {
        while day.cumulative_gdd >= next {
            let _ = writeln!(out, "  {next:>5} GDD reached {}", day.date_formatted);
            next += MILESTONE_STEP;
        }
    }
    out
}

/// One row per day
#[must_use]
pub fn season_table(season: &SeasonResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8}  {:>6}  {:>6}  {:>6}  {:>6}",
        "DATE", "MAX", "MIN", "GDD", "TOTAL"
    );
    for day in &season.gdd_data {
        let _ = writeln!(
            out,
            "{:<8}  {:>6.1}  {:>6.1}  {:>6.1}  {:>6}",
            day.date_formatted, day.max_temp, day.min_temp, day.daily_gdd, day.cumulative_gdd
        );
    }
    out
}

/// Comma-separated values with a header row
#[must_use]
pub fn season_csv(season: &SeasonResponse) -> String {
    let mut out = String::from("date,max_temp,min_temp,daily_gdd,cumulative_gdd\n");
    for day in &season.gdd_data {
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            day.date, day.max_temp, day.min_temp, day.daily_gdd, day.cumulative_gdd
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};
    use presentation_http::handlers::vineyards::{
        GddDayResponse, LocationDto, SeasonVineyardResponse,
    };

    use super::*;

    fn location() -> LocationDto {
        LocationDto {
            latitude: 38.5025,
            longitude: -122.2654,
            address: None,
        }
    }

    /// `days` days of 10 GDD each starting March 1
    fn season(days: u64) -> SeasonResponse {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let gdd_data = (0..days)
            .map(|i| {
                let date = start.checked_add_days(Days::new(i)).unwrap();
                GddDayResponse {
                    date,
                    date_formatted: date.format("%b %-d").to_string(),
                    daily_gdd: 10.0,
                    cumulative_gdd: i64::try_from(i + 1).unwrap() * 10,
                    max_temp: 70.0,
                    min_temp: 50.0,
                }
            })
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let total_gdd = days as f64 * 10.0;
        SeasonResponse {
            vineyard: SeasonVineyardResponse {
                name: "Block 4".to_string(),
                location: location(),
            },
            gdd_data,
            total_gdd,
            year: 2024,
        }
    }

    #[test]
    fn empty_vineyard_list() {
        assert_eq!(vineyard_table(&[]), "No vineyards registered.\n");
    }

    #[test]
    fn vineyard_rows() {
        let now = chrono::Utc::now();
        let table = vineyard_table(&[VineyardResponse {
            id: "0191e5a0-0000-7000-8000-000000000000".to_string(),
            name: "Block 4".to_string(),
            location: location(),
            gdd_base_temp: 50.0,
            created_at: now,
            updated_at: now,
        }]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("Block 4"));
        assert!(lines[1].contains("-122.2654"));
        assert!(lines[1].contains("50.0"));
    }

    #[test]
    fn summary_lists_milestones() {
        let summary = season_summary(&season(120));
        assert!(summary.contains("Block 4 (2024)"));
        assert!(summary.contains("2024-03-01 to 2024-06-28 (120 days)"));
        assert!(summary.contains("Total GDD: 1200.0"));
        assert!(summary.contains("500 GDD reached Apr 19"));
        assert!(summary.contains("1000 GDD reached Jun 8"));
        assert!(!summary.contains("1500 GDD"));
    }

    #[test]
    fn summary_of_empty_season() {
        let summary = season_summary(&season(0));
        assert!(summary.contains("No data for this season."));
    }

    #[test]
    fn table_has_one_row_per_day() {
        let table = season_table(&season(3));
        assert_eq!(table.lines().count(), 4);
        assert!(table.lines().nth(1).unwrap().starts_with("Mar 1"));
    }

    #[test]
    fn csv_rows() {
        let csv = season_csv(&season(2));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,max_temp,min_temp,daily_gdd,cumulative_gdd");
        assert_eq!(lines[1], "2024-03-01,70,50,10,10");
        assert_eq!(lines[2], "2024-03-02,70,50,10,20");
    }
}
