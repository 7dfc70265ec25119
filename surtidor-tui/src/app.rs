use std::sync::Arc;

use surtidor_core::{
    model::{FuelType, Municipality, Province, Selection, Station},
    ports::PortError,
    sequence::{RequestSequencer, RequestTag},
    service::SurtidorService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    ProvinceSelect,
    MunicipalitySelect,
    FuelTypeSelect,
    StationList,
}

/// Result of a background fetch, tagged with the request that produced it.
pub(crate) enum Fetched {
    Provinces(RequestTag, Result<Vec<Province>, PortError>),
    Municipalities(RequestTag, Result<Vec<Municipality>, PortError>),
    FuelTypes(RequestTag, Result<Vec<FuelType>, PortError>),
    Stations(RequestTag, Result<Vec<Station>, PortError>),
}

/// One sequencer per kind of listing; a new request only supersedes its own kind.
#[derive(Default)]
pub(crate) struct Requests {
    pub provinces: RequestSequencer,
    pub municipalities: RequestSequencer,
    pub fuel_types: RequestSequencer,
    pub stations: RequestSequencer,
    pub in_flight: usize,
}

pub(crate) struct App {
    pub service: Arc<SurtidorService>,

    pub screen: Screen,
    pub selection: Selection,

    pub provinces: Vec<Province>,
    pub province_list_index: usize,

    pub municipalities: Vec<Municipality>,
    pub municipality_list_index: usize,

    pub fuel_types: Vec<FuelType>,
    pub fuel_type_list_index: usize,

    pub stations: Vec<Station>,
    pub station_list_index: usize,

    pub requests: Requests,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<SurtidorService>) -> Self {
        Self {
            service,
            screen: Screen::ProvinceSelect,
            selection: Selection::default(),
            provinces: Vec::new(),
            province_list_index: 0,
            municipalities: Vec::new(),
            municipality_list_index: 0,
            fuel_types: Vec::new(),
            fuel_type_list_index: 0,
            stations: Vec::new(),
            station_list_index: 0,
            requests: Requests::default(),
            error_message: None,
        }
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.requests.in_flight > 0
    }

    /// Commit the highlighted province; the municipality list starts over.
    pub(crate) fn select_current_province(&mut self) -> bool {
        let Some(province) = self.provinces.get(self.province_list_index) else {
            return false;
        };
        self.selection = self.selection.clone().with_province(province.id.clone());
        self.municipalities.clear();
        self.municipality_list_index = 0;
        self.clear_stations();
        self.screen = Screen::MunicipalitySelect;
        true
    }

    pub(crate) fn select_current_municipality(&mut self) -> bool {
        let Some(municipality) = self.municipalities.get(self.municipality_list_index) else {
            return false;
        };
        self.selection = self
            .selection
            .clone()
            .with_municipality(municipality.id.clone());
        self.clear_stations();
        self.screen = Screen::FuelTypeSelect;
        true
    }

    pub(crate) fn select_current_fuel_type(&mut self) -> bool {
        if self.selection.municipality().is_none() {
            return false;
        }
        let Some(fuel_type) = self.fuel_types.get(self.fuel_type_list_index) else {
            return false;
        };
        self.selection = self.selection.clone().with_fuel_type(fuel_type.id.clone());
        self.screen = Screen::StationList;
        true
    }

    pub(crate) fn toggle_open_now(&mut self) {
        let open_now_only = !self.selection.open_now_only();
        self.selection = self.selection.clone().with_open_now_only(open_now_only);
    }

    /// Drop the station list and ignore any listing still on its way.
    fn clear_stations(&mut self) {
        self.stations.clear();
        self.station_list_index = 0;
        self.requests.stations.cancel();
    }

    pub(crate) fn province_name(&self) -> &str {
        self.selection
            .province()
            .and_then(|id| self.provinces.iter().find(|province| &province.id == id))
            .map_or("<province>", |province| province.name.as_str())
    }

    pub(crate) fn municipality_name(&self) -> &str {
        self.selection
            .municipality()
            .and_then(|id| {
                self.municipalities
                    .iter()
                    .find(|municipality| &municipality.id == id)
            })
            .map_or("<municipality>", |municipality| municipality.name.as_str())
    }

    pub(crate) fn fuel_type_name(&self) -> &str {
        self.selection
            .fuel_type()
            .and_then(|id| self.fuel_types.iter().find(|fuel_type| &fuel_type.id == id))
            .map_or("<fuel type>", |fuel_type| fuel_type.name.as_str())
    }

    /// Apply a finished fetch unless a newer request of the same kind was issued.
    pub(crate) fn apply(&mut self, fetched: Fetched) {
        self.requests.in_flight = self.requests.in_flight.saturating_sub(1);

        match fetched {
            Fetched::Provinces(tag, result) => {
                if !self.requests.provinces.is_current(tag) {
                    return;
                }
                match result {
                    Ok(provinces) => {
                        self.provinces = provinces;
                        self.province_list_index = 0;
                    }
                    Err(err) => self.error_message = Some(format!("Loading provinces failed: {err}")),
                }
            }
            Fetched::Municipalities(tag, result) => {
                if !self.requests.municipalities.is_current(tag) {
                    tracing::debug!("discarding stale municipality list");
                    return;
                }
                match result {
                    Ok(municipalities) => {
                        self.municipalities = municipalities;
                        self.municipality_list_index = 0;
                    }
                    Err(err) => {
                        self.error_message = Some(format!("Loading municipalities failed: {err}"));
                    }
                }
            }
            Fetched::FuelTypes(tag, result) => {
                if !self.requests.fuel_types.is_current(tag) {
                    return;
                }
                match result {
                    Ok(fuel_types) => {
                        self.fuel_types = fuel_types;
                        self.fuel_type_list_index = 0;
                    }
                    Err(err) => {
                        self.error_message = Some(format!("Loading fuel types failed: {err}"));
                    }
                }
            }
            Fetched::Stations(tag, result) => {
                if !self.requests.stations.is_current(tag) {
                    tracing::debug!("discarding stale station list");
                    return;
                }
                match result {
                    Ok(stations) => {
                        self.stations = stations;
                        self.station_list_index = 0;
                    }
                    Err(err) => {
                        self.error_message = Some(format!("Loading stations failed: {err}"));
                    }
                }
            }
        }
    }
}
