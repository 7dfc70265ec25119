//! Station filtering by fuel availability and opening hours.

use chrono::NaiveDateTime;

use crate::model::{FuelTypeId, Selection, Station};
use crate::schedule::is_open_now;

/// Keep the stations that sell the selected fuel and, if requested, are open at `now`.
///
/// The result preserves input order. With no fuel type (or a blank one) every
/// station passes the fuel check; with `open_now_only` unset every station
/// passes the opening-hours check.
#[must_use]
pub fn filter_stations(
    stations: &[Station],
    fuel_type: Option<&FuelTypeId>,
    open_now_only: bool,
    now: NaiveDateTime,
) -> Vec<Station> {
    let filter = StationFilter {
        require_fuel: fuel_type.is_some_and(|id| !id.is_empty()),
        open_now_only,
        now,
    };
    filter.apply(stations)
}

#[derive(Debug, Clone, Copy)]
/// Predicate built from a [`Selection`] at a fixed instant.
pub struct StationFilter {
    require_fuel: bool,
    open_now_only: bool,
    now: NaiveDateTime,
}

impl StationFilter {
    /// Build the predicate for `selection` evaluated at `now`.
    #[must_use]
    pub fn new(selection: &Selection, now: NaiveDateTime) -> Self {
        Self {
            require_fuel: selection.fuel_type().is_some_and(|id| !id.is_empty()),
            open_now_only: selection.open_now_only(),
            now,
        }
    }

    /// Whether a single station passes.
    #[must_use]
    pub fn accepts(&self, station: &Station) -> bool {
        let has_fuel = !self.require_fuel || station.sells_fuel();
        let is_open = !self.open_now_only || is_open_now(&station.schedule, self.now);
        has_fuel && is_open
    }

    /// Stable filter over `stations`.
    #[must_use]
    pub fn apply(&self, stations: &[Station]) -> Vec<Station> {
        stations
            .iter()
            .filter(|station| self.accepts(station))
            .cloned()
            .collect()
    }
}

/// Human-readable line for one station.
#[must_use]
pub fn format_station_line(station: &Station) -> String {
    let price = station.price.as_ref().map_or("", |price| price.as_str());
    format!(
        "{} - {} - {} - {} - {} - {price}€",
        station.name, station.address, station.municipality, station.province, station.schedule
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{MunicipalityId, Price, ProvinceId};

    fn monday_at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .expect("valid test instant")
    }

    fn station(name: &str, schedule: &str, price: &str) -> Station {
        Station {
            name: name.to_owned(),
            address: format!("Calle {name}, 1"),
            municipality: "Madrid".to_owned(),
            province: "MADRID".to_owned(),
            schedule: schedule.to_owned(),
            price: Price::new(price),
        }
    }

    fn sample() -> Vec<Station> {
        vec![
            station("REPSOL", "L-D: 24H", "1,529"),
            station("CEPSA", "L: 08:00-14:00", ""),
            station("BP", "S: 08:00-14:00", "1,499"),
            station("GALP", "L: 06:00-23:00", "0,000"),
        ]
    }

    fn names(stations: &[Station]) -> Vec<&str> {
        stations.iter().map(|station| station.name.as_str()).collect()
    }

    #[test]
    fn no_filters_returns_everything() {
        let stations = sample();
        let filtered = filter_stations(&stations, None, false, monday_at(10));
        assert_eq!(filtered, stations, "unfiltered output differs from input");
    }

    #[test]
    fn blank_fuel_type_counts_as_unselected() {
        let stations = sample();
        let blank = FuelTypeId(String::new());
        let filtered = filter_stations(&stations, Some(&blank), false, monday_at(10));
        assert_eq!(filtered.len(), stations.len(), "blank fuel type filtered stations");
    }

    #[test]
    fn fuel_filter_drops_unpriced_stations() {
        let fuel = FuelTypeId("4".into());
        let filtered = filter_stations(&sample(), Some(&fuel), false, monday_at(10));
        assert_eq!(names(&filtered), ["REPSOL", "BP", "GALP"], "wrong stations kept");
    }

    #[test]
    fn open_now_drops_closed_stations_regardless_of_price() {
        let filtered = filter_stations(&sample(), None, true, monday_at(10));
        assert_eq!(names(&filtered), ["REPSOL", "CEPSA", "GALP"], "wrong stations kept");

        let late = filter_stations(&sample(), None, true, monday_at(15));
        assert_eq!(names(&late), ["REPSOL", "GALP"], "wrong stations kept after 14:00");
    }

    #[test]
    fn both_filters_combine() {
        let fuel = FuelTypeId("4".into());
        let filtered = filter_stations(&sample(), Some(&fuel), true, monday_at(10));
        assert_eq!(names(&filtered), ["REPSOL", "GALP"], "wrong stations kept");
    }

    #[test]
    fn filtering_is_idempotent() {
        let fuel = FuelTypeId("4".into());
        let stations = sample();
        let first = filter_stations(&stations, Some(&fuel), true, monday_at(10));
        let second = filter_stations(&stations, Some(&fuel), true, monday_at(10));
        assert_eq!(first, second, "repeated filtering differs");
        let refiltered = filter_stations(&first, Some(&fuel), true, monday_at(10));
        assert_eq!(first, refiltered, "filtering output again changed it");
    }

    #[test]
    fn filter_from_selection_matches_free_function() {
        let selection = Selection::default()
            .with_province(ProvinceId("28".into()))
            .with_municipality(MunicipalityId("4354".into()))
            .with_fuel_type(FuelTypeId("4".into()))
            .with_open_now_only(true);
        let stations = sample();
        let via_selection = StationFilter::new(&selection, monday_at(10)).apply(&stations);
        let via_function = filter_stations(&stations, selection.fuel_type(), true, monday_at(10));
        assert_eq!(via_selection, via_function, "selection filter diverges");
    }

    #[test]
    fn stale_fuel_type_is_not_applied_after_province_change() {
        let selection = Selection::default()
            .with_province(ProvinceId("28".into()))
            .with_municipality(MunicipalityId("4354".into()))
            .with_fuel_type(FuelTypeId("4".into()))
            .with_province(ProvinceId("08".into()));
        let stations = sample();
        let filtered = StationFilter::new(&selection, monday_at(10)).apply(&stations);
        assert_eq!(filtered, stations, "fuel filter applied without municipality");
    }

    #[test]
    fn station_line_layout() {
        let line = format_station_line(&station("REPSOL", "L-D: 24H", "1,529"));
        assert_eq!(
            line,
            "REPSOL - Calle REPSOL, 1 - Madrid - MADRID - L-D: 24H - 1,529€",
            "unexpected line"
        );
    }

    #[test]
    fn station_line_without_price() {
        let line = format_station_line(&station("CEPSA", "L: 08:00-14:00", ""));
        assert!(line.ends_with("L: 08:00-14:00 - €"), "unexpected line: {line}");
    }
}
