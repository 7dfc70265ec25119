//! Domain data structures for provinces, municipalities, fuel types, stations,
//! and the user's current selection.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a province in the fuel-price directory.
pub struct ProvinceId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a municipality in the fuel-price directory.
pub struct MunicipalityId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a fuel product (diesel, unleaded 95, ...).
pub struct FuelTypeId(pub String);

impl FuelTypeId {
    /// Whether the identifier carries no value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

macro_rules! display_id {
    ($($id:ty),+) => {
        $(impl fmt::Display for $id {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str(&self.0)
            }
        })+
    };
}

display_id!(ProvinceId, MunicipalityId, FuelTypeId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Province catalog entry.
pub struct Province {
    /// Directory identifier.
    pub id: ProvinceId,
    /// Display name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Municipality catalog entry.
pub struct Municipality {
    /// Directory identifier.
    pub id: MunicipalityId,
    /// Display name.
    pub name: String,
    /// Province the municipality belongs to.
    pub province: ProvinceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Fuel product catalog entry.
pub struct FuelType {
    /// Directory identifier.
    pub id: FuelTypeId,
    /// Display name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Price text as published by the directory, e.g. `"1,459"`.
///
/// Never empty: blank source values become `None` on the station instead.
pub struct Price(String);

impl Price {
    /// Wrap a price text, returning `None` when it is blank.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// The price exactly as published.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, reading `,` as the decimal separator.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.0.replace(',', ".").parse().ok()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Deserialize an optional price, mapping missing, `null` and blank text to `None`.
///
/// # Errors
///
/// Returns the deserializer's error when the value is neither text nor `null`.
pub fn deserialize_optional_price<'de, D>(deserializer: D) -> Result<Option<Price>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Price::new))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Gas station returned by a station-price listing.
pub struct Station {
    /// Brand or sign shown at the station.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Municipality name.
    pub municipality: String,
    /// Province name.
    pub province: String,
    /// Opening-hours text, e.g. `"L-V: 07:00-22:00; S: 08:00-14:00"`.
    pub schedule: String,
    /// Price of the queried fuel type; `None` when the station does not sell it.
    #[serde(default, deserialize_with = "deserialize_optional_price")]
    pub price: Option<Price>,
}

impl Station {
    /// Whether the station carries a price for the queried fuel type.
    #[must_use]
    pub fn sells_fuel(&self) -> bool {
        self.price.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Snapshot of the user's cascading filter choices.
///
/// Transitions return a new value; a municipality can only be chosen once a
/// province is, and a fuel type only once a municipality is.
pub struct Selection {
    province: Option<ProvinceId>,
    municipality: Option<MunicipalityId>,
    fuel_type: Option<FuelTypeId>,
    open_now_only: bool,
}

impl Selection {
    /// Select a province, discarding the municipality chosen for the previous one.
    #[must_use]
    pub fn with_province(self, province: ProvinceId) -> Self {
        Self {
            province: Some(province),
            municipality: None,
            ..self
        }
    }

    /// Select a municipality. Ignored while no province is selected.
    #[must_use]
    pub fn with_municipality(self, municipality: MunicipalityId) -> Self {
        if self.province.is_none() {
            return self;
        }
        Self {
            municipality: Some(municipality),
            ..self
        }
    }

    /// Select a fuel type. Ignored while no municipality is selected.
    #[must_use]
    pub fn with_fuel_type(self, fuel_type: FuelTypeId) -> Self {
        if self.municipality.is_none() {
            return self;
        }
        Self {
            fuel_type: Some(fuel_type),
            ..self
        }
    }

    /// Restrict (or stop restricting) results to stations open right now.
    #[must_use]
    pub fn with_open_now_only(self, open_now_only: bool) -> Self {
        Self {
            open_now_only,
            ..self
        }
    }

    /// Selected province.
    #[must_use]
    pub fn province(&self) -> Option<&ProvinceId> {
        self.province.as_ref()
    }

    /// Selected municipality.
    #[must_use]
    pub fn municipality(&self) -> Option<&MunicipalityId> {
        self.municipality.as_ref()
    }

    /// Selected fuel type, hidden while no municipality is selected.
    #[must_use]
    pub fn fuel_type(&self) -> Option<&FuelTypeId> {
        self.municipality.as_ref().and(self.fuel_type.as_ref())
    }

    /// Whether only currently open stations are wanted.
    #[must_use]
    pub fn open_now_only(&self) -> bool {
        self.open_now_only
    }

    /// Parameters for a station listing, present once every level is selected.
    #[must_use]
    pub fn station_query(&self) -> Option<(&MunicipalityId, &FuelTypeId)> {
        self.province.as_ref()?;
        let municipality = self.municipality.as_ref()?;
        let fuel_type = self.fuel_type.as_ref().filter(|id| !id.is_empty())?;
        Some((municipality, fuel_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_selection() -> Selection {
        Selection::default()
            .with_province(ProvinceId("28".into()))
            .with_municipality(MunicipalityId("4354".into()))
            .with_fuel_type(FuelTypeId("4".into()))
    }

    #[test]
    fn municipality_requires_province() {
        let selection = Selection::default().with_municipality(MunicipalityId("4354".into()));
        assert_eq!(selection.municipality(), None, "municipality accepted without province");
    }

    #[test]
    fn fuel_type_requires_municipality() {
        let selection = Selection::default()
            .with_province(ProvinceId("28".into()))
            .with_fuel_type(FuelTypeId("4".into()));
        assert_eq!(selection.fuel_type(), None, "fuel type accepted without municipality");
    }

    #[test]
    fn changing_province_resets_municipality() {
        let selection = complete_selection().with_province(ProvinceId("08".into()));
        assert_eq!(selection.municipality(), None, "municipality survived province change");
        assert_eq!(selection.station_query(), None, "query still complete");
    }

    #[test]
    fn fuel_type_is_hidden_until_municipality_is_chosen_again() {
        let selection = complete_selection().with_province(ProvinceId("08".into()));
        assert_eq!(selection.fuel_type(), None, "fuel type visible without municipality");

        let selection = selection.with_municipality(MunicipalityId("0193".into()));
        assert_eq!(
            selection.fuel_type(),
            Some(&FuelTypeId("4".into())),
            "fuel type not restored"
        );
    }

    #[test]
    fn station_query_needs_every_level() {
        let selection = complete_selection();
        let (municipality, fuel_type) = selection.station_query().expect("complete selection");
        assert_eq!(municipality.0, "4354", "wrong municipality");
        assert_eq!(fuel_type.0, "4", "wrong fuel type");
    }

    #[test]
    fn open_now_flag_does_not_touch_other_fields() {
        let selection = complete_selection().with_open_now_only(true);
        assert!(selection.open_now_only(), "flag not set");
        assert!(selection.station_query().is_some(), "query lost");
    }

    #[test]
    fn blank_price_text_is_absent() {
        assert_eq!(Price::new("   "), None, "blank price accepted");
        assert_eq!(Price::new("").map(|price| price.0), None, "empty price accepted");
    }

    #[test]
    fn zero_price_is_still_a_price() {
        let price = Price::new("0,000").expect("zero is a defined price");
        assert_eq!(price.value(), Some(0.0), "zero not parsed");
    }

    #[test]
    fn price_value_reads_decimal_comma() {
        let price = Price::new("1,459").expect("valid price");
        assert_eq!(price.as_str(), "1,459", "text not preserved");
        assert!(
            price.value().is_some_and(|value| (value - 1.459).abs() < 1e-9),
            "comma decimal not parsed"
        );
    }
}
