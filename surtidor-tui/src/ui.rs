use chrono::Local;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
};
use surtidor_core::schedule::is_open_now;

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let open_now = if app.selection.open_now_only() {
        "[x] open now"
    } else {
        "[ ] open now"
    };
    let header = Paragraph::new(format!("surtidor – fuel prices in Spain · {open_now}"))
        .block(Block::default().borders(Borders::ALL).title("Surtidor"));
    frame.render_widget(header, *header_area);

    match app.screen {
        Screen::ProvinceSelect => draw_province_select(frame, app, *content_area),
        Screen::MunicipalitySelect => draw_municipality_select(frame, app, *content_area),
        Screen::FuelTypeSelect => draw_fuel_type_select(frame, app, *content_area),
        Screen::StationList => draw_station_list(frame, app, *content_area),
    }

    let nav_hint = match app.screen {
        Screen::ProvinceSelect => "↑/↓ move · Enter select province · o open now · q/Ctrl-C quit",
        Screen::MunicipalitySelect | Screen::FuelTypeSelect => {
            "↑/↓ move · Enter select · Left/Esc back · o open now · q/Ctrl-C quit"
        }
        Screen::StationList => "↑/↓ move · r reload · o open now · Esc/←/b back · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading() {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_selectable<'a>(
    frame: &mut Frame<'_>,
    area: Rect,
    title: String,
    names: impl Iterator<Item = &'a str>,
    selected: usize,
    placeholder: &str,
) {
    let mut items: Vec<ListItem<'_>> = names.map(|name| ListItem::new(name.to_owned())).collect();
    let is_empty = items.is_empty();
    if is_empty {
        items.push(ListItem::new(placeholder.to_owned()));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_symbol("> ")
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !is_empty {
        state.select(Some(selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_province_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    draw_selectable(
        frame,
        area,
        "Select province (↑/↓, Enter)".to_owned(),
        app.provinces.iter().map(|province| province.name.as_str()),
        app.province_list_index,
        "No provinces loaded yet.",
    );
}

fn draw_municipality_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    draw_selectable(
        frame,
        area,
        format!("Select municipality in {} (↑/↓, Enter)", app.province_name()),
        app.municipalities
            .iter()
            .map(|municipality| municipality.name.as_str()),
        app.municipality_list_index,
        "Select Municipality",
    );
}

fn draw_fuel_type_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    draw_selectable(
        frame,
        area,
        format!("Select fuel type for {} (↑/↓, Enter)", app.municipality_name()),
        app.fuel_types.iter().map(|fuel_type| fuel_type.name.as_str()),
        app.fuel_type_list_index,
        "No fuel types loaded yet.",
    );
}

fn draw_station_list(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = format!(
        "{} in {}, {} (Esc/←/b to go back)",
        app.fuel_type_name(),
        app.municipality_name(),
        app.province_name()
    );

    if app.stations.is_empty() {
        let text = if app.is_loading() {
            "Loading stations…"
        } else {
            "No stations match the current filters."
        };
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let now = Local::now().naive_local();

    let rows = app.stations.iter().map(|station| {
        let open = is_open_now(&station.schedule, now);
        let price = station
            .price
            .as_ref()
            .map_or_else(|| "–".to_owned(), |price| format!("{price}€"));

        let style = if open {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };

        Row::new(vec![
            Cell::from(station.name.clone()),
            Cell::from(station.address.clone()),
            Cell::from(station.schedule.clone()),
            Cell::from(price),
            Cell::from(if open { "open" } else { "closed" }),
        ])
        .style(style)
    });

    let column_widths = [
        Constraint::Length(20),
        Constraint::Min(24),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Station", "Address", "Hours", "Price", "Now"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .column_spacing(1);

    let mut state = TableState::default();
    state.select(Some(app.station_list_index));
    frame.render_stateful_widget(table, area, &mut state);
}
