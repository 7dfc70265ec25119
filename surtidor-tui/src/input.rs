use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.municipalities`(...) for the selected province
    LoadMunicipalities,
    /// Run `service.stations`(...) for the current selection
    RefreshStations,
}

fn move_up(index: &mut usize) {
    *index = index.saturating_sub(1);
}

fn move_down(index: &mut usize, len: usize) {
    if *index + 1 < len {
        *index += 1;
    }
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Char, Down, Enter, Esc, Left, Up};

    // Global shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q') && key.modifiers.is_empty() {
        return Action::Quit;
    }
    if key.code == Char('o') && key.modifiers.is_empty() {
        app.toggle_open_now();
        return Action::RefreshStations;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::ProvinceSelect => match key.code {
            Up | Char('k') => move_up(&mut app.province_list_index),
            Down | Char('j') => move_down(&mut app.province_list_index, app.provinces.len()),
            Enter | Char(' ') => {
                if app.select_current_province() {
                    action = Action::LoadMunicipalities;
                }
            }
            _ => {}
        },

        Screen::MunicipalitySelect => match key.code {
            Up | Char('k') => move_up(&mut app.municipality_list_index),
            Down | Char('j') => {
                move_down(&mut app.municipality_list_index, app.municipalities.len());
            }
            Enter | Char(' ') => {
                if app.select_current_municipality() {
                    action = Action::RefreshStations;
                }
            }
            Left | Esc => app.screen = Screen::ProvinceSelect,
            _ => {}
        },

        Screen::FuelTypeSelect => match key.code {
            Up | Char('k') => move_up(&mut app.fuel_type_list_index),
            Down | Char('j') => move_down(&mut app.fuel_type_list_index, app.fuel_types.len()),
            Enter | Char(' ') => {
                if app.select_current_fuel_type() {
                    action = Action::RefreshStations;
                }
            }
            Left | Esc => app.screen = Screen::MunicipalitySelect,
            _ => {}
        },

        Screen::StationList => match key.code {
            Up | Char('k') => move_up(&mut app.station_list_index),
            Down | Char('j') => move_down(&mut app.station_list_index, app.stations.len()),
            Char('r') => action = Action::RefreshStations,
            Left | Esc | Char('b') => app.screen = Screen::FuelTypeSelect,
            _ => {}
        },
    }
    action
}
