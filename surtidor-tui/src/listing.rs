use std::io::{self, Write};

use anyhow::Result;
use chrono::Local;
use surtidor_core::{
    filter::format_station_line,
    model::{FuelTypeId, MunicipalityId, ProvinceId, Selection},
    service::SurtidorService,
};

use crate::cli::Command;

/// Run one non-interactive listing and print it, one entry per line.
pub(crate) async fn run(service: &SurtidorService, command: Command) -> Result<()> {
    let lines = match command {
        Command::Provinces => service
            .provinces()
            .await?
            .into_iter()
            .map(|province| format!("{}\t{}", province.id, province.name))
            .collect::<Vec<_>>(),
        Command::Municipalities { province } => service
            .municipalities(&ProvinceId(province))
            .await?
            .into_iter()
            .map(|municipality| format!("{}\t{}", municipality.id, municipality.name))
            .collect(),
        Command::FuelTypes => service
            .fuel_types()
            .await?
            .into_iter()
            .map(|fuel_type| format!("{}\t{}", fuel_type.id, fuel_type.name))
            .collect(),
        Command::Stations {
            province,
            municipality,
            fuel_type,
            open_now,
        } => {
            let selection = station_selection(province, municipality, fuel_type, open_now);
            service
                .stations(&selection, Local::now().naive_local())
                .await?
                .iter()
                .map(format_station_line)
                .collect()
        }
    };

    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn station_selection(
    province: String,
    municipality: String,
    fuel_type: String,
    open_now: bool,
) -> Selection {
    Selection::default()
        .with_province(ProvinceId(province))
        .with_municipality(MunicipalityId(municipality))
        .with_fuel_type(FuelTypeId(fuel_type))
        .with_open_now_only(open_now)
}
