//! High-level service facade over the fuel-price directory.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::filter::StationFilter;
use crate::model::{FuelType, Municipality, Province, ProvinceId, Selection, Station};
use crate::ports::{DirectoryPort, PortError};

/// Public entry point for catalog lookups and filtered station listings.
pub struct SurtidorService {
    directory: Arc<dyn DirectoryPort>,
}

impl SurtidorService {
    /// Create a new service bound to the provided directory.
    #[must_use]
    pub fn new(directory: Arc<dyn DirectoryPort>) -> Self {
        Self { directory }
    }

    /// List all provinces.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the directory call fails.
    pub async fn provinces(&self) -> Result<Vec<Province>, PortError> {
        self.directory
            .provinces()
            .await
            .inspect_err(|err| tracing::warn!(%err, "fetching provinces failed"))
    }

    /// List the municipalities of a province.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the directory call fails.
    pub async fn municipalities(
        &self,
        province: &ProvinceId,
    ) -> Result<Vec<Municipality>, PortError> {
        self.directory
            .municipalities(province)
            .await
            .inspect_err(|err| tracing::warn!(%province, %err, "fetching municipalities failed"))
    }

    /// List fuel types, one entry per identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the directory call fails.
    pub async fn fuel_types(&self) -> Result<Vec<FuelType>, PortError> {
        let fuel_types = self
            .directory
            .fuel_types()
            .await
            .inspect_err(|err| tracing::warn!(%err, "fetching fuel types failed"))?;
        Ok(dedup_fuel_types(fuel_types))
    }

    /// Fetch and filter the stations matching `selection` at `now`.
    ///
    /// Returns an empty list without contacting the directory while the
    /// selection lacks a province, municipality or fuel type.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the directory call fails.
    pub async fn stations(
        &self,
        selection: &Selection,
        now: NaiveDateTime,
    ) -> Result<Vec<Station>, PortError> {
        let Some((municipality, fuel_type)) = selection.station_query() else {
            tracing::debug!("selection incomplete, skipping station fetch");
            return Ok(Vec::new());
        };

        let stations = self
            .directory
            .stations(municipality, fuel_type)
            .await
            .inspect_err(|err| {
                tracing::warn!(%municipality, %fuel_type, %err, "fetching stations failed");
            })?;

        let filtered = StationFilter::new(selection, now).apply(&stations);
        tracing::debug!(
            fetched = stations.len(),
            kept = filtered.len(),
            open_now_only = selection.open_now_only(),
            "filtered stations"
        );
        Ok(filtered)
    }
}

/// Collapse fuel types sharing an identifier.
///
/// The last name seen for an identifier wins; the entry keeps the position of
/// the identifier's first occurrence.
#[must_use]
pub fn dedup_fuel_types(fuel_types: Vec<FuelType>) -> Vec<FuelType> {
    let mut positions = HashMap::new();
    let mut unique: Vec<FuelType> = Vec::with_capacity(fuel_types.len());

    for fuel_type in fuel_types {
        match positions.get(&fuel_type.id) {
            Some(&position) => {
                if let Some(existing) = unique.get_mut(position) {
                    *existing = fuel_type;
                }
            }
            None => {
                positions.insert(fuel_type.id.clone(), unique.len());
                unique.push(fuel_type);
            }
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{FuelTypeId, MunicipalityId, Price};

    #[derive(Default)]
    struct FakeDirectory {
        fuel_types: Vec<FuelType>,
        stations: Vec<Station>,
        station_calls: Mutex<Vec<(MunicipalityId, FuelTypeId)>>,
        fail: bool,
    }

    #[async_trait]
    impl DirectoryPort for FakeDirectory {
        async fn provinces(&self) -> Result<Vec<Province>, PortError> {
            if self.fail {
                return Err(PortError::InvalidBaseUrl("offline".into()));
            }
            Ok(vec![Province {
                id: ProvinceId("28".into()),
                name: "MADRID".into(),
            }])
        }

        async fn municipalities(
            &self,
            province: &ProvinceId,
        ) -> Result<Vec<Municipality>, PortError> {
            Ok(vec![Municipality {
                id: MunicipalityId("4354".into()),
                name: "Madrid".into(),
                province: province.clone(),
            }])
        }

        async fn fuel_types(&self) -> Result<Vec<FuelType>, PortError> {
            Ok(self.fuel_types.clone())
        }

        async fn stations(
            &self,
            municipality: &MunicipalityId,
            fuel_type: &FuelTypeId,
        ) -> Result<Vec<Station>, PortError> {
            self.station_calls
                .lock()
                .expect("lock poisoned")
                .push((municipality.clone(), fuel_type.clone()));
            if self.fail {
                return Err(PortError::InvalidBaseUrl("offline".into()));
            }
            Ok(self.stations.clone())
        }
    }

    fn fuel(id: &str, name: &str) -> FuelType {
        FuelType {
            id: FuelTypeId(id.into()),
            name: name.into(),
        }
    }

    fn station(name: &str, schedule: &str, price: &str) -> Station {
        Station {
            name: name.into(),
            address: "Calle Mayor, 1".into(),
            municipality: "Madrid".into(),
            province: "MADRID".into(),
            schedule: schedule.into(),
            price: Price::new(price),
        }
    }

    fn monday_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid test instant")
    }

    fn complete_selection() -> Selection {
        Selection::default()
            .with_province(ProvinceId("28".into()))
            .with_municipality(MunicipalityId("4354".into()))
            .with_fuel_type(FuelTypeId("4".into()))
    }

    #[test]
    fn dedup_keeps_last_name_at_first_position() {
        let unique = dedup_fuel_types(vec![
            fuel("1", "Gasolina 95"),
            fuel("4", "Gasóleo A"),
            fuel("1", "Gasolina 95 E5"),
        ]);
        assert_eq!(
            unique,
            vec![fuel("1", "Gasolina 95 E5"), fuel("4", "Gasóleo A")],
            "unexpected dedup result"
        );
    }

    #[tokio::test]
    async fn fuel_types_are_deduplicated() {
        let directory = FakeDirectory {
            fuel_types: vec![fuel("3", "A"), fuel("3", "B")],
            ..FakeDirectory::default()
        };
        let service = SurtidorService::new(Arc::new(directory));
        let fuel_types = service.fuel_types().await.expect("fake never fails");
        assert_eq!(fuel_types, vec![fuel("3", "B")], "duplicates survived");
    }

    #[tokio::test]
    async fn incomplete_selection_skips_fetch() {
        let directory = Arc::new(FakeDirectory::default());
        let service = SurtidorService::new(Arc::<FakeDirectory>::clone(&directory));
        let selection = Selection::default().with_province(ProvinceId("28".into()));

        let stations = service
            .stations(&selection, monday_noon())
            .await
            .expect("no fetch, no error");

        assert!(stations.is_empty(), "stations returned for incomplete selection");
        assert!(
            directory.station_calls.lock().expect("lock poisoned").is_empty(),
            "directory was queried"
        );
    }

    #[tokio::test]
    async fn stations_are_fetched_and_filtered() {
        let directory = Arc::new(FakeDirectory {
            stations: vec![
                station("OPEN", "L-D: 24H", "1,5"),
                station("UNPRICED", "L-D: 24H", ""),
                station("CLOSED", "S: 08:00-14:00", "1,4"),
            ],
            ..FakeDirectory::default()
        });
        let service = SurtidorService::new(Arc::<FakeDirectory>::clone(&directory));
        let selection = complete_selection().with_open_now_only(true);

        let stations = service
            .stations(&selection, monday_noon())
            .await
            .expect("fake never fails");

        let names: Vec<_> = stations.iter().map(|station| station.name.as_str()).collect();
        assert_eq!(names, ["OPEN"], "wrong stations kept");
        assert_eq!(
            *directory.station_calls.lock().expect("lock poisoned"),
            vec![(MunicipalityId("4354".into()), FuelTypeId("4".into()))],
            "wrong query sent"
        );
    }

    #[tokio::test]
    async fn directory_errors_propagate() {
        let directory = FakeDirectory {
            fail: true,
            ..FakeDirectory::default()
        };
        let service = SurtidorService::new(Arc::new(directory));
        assert!(service.provinces().await.is_err(), "province error swallowed");
        assert!(
            service
                .stations(&complete_selection(), monday_noon())
                .await
                .is_err(),
            "station error swallowed"
        );
    }
}
