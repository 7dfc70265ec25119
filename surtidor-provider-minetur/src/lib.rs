//! Provider implementation for the Spanish ministry's fuel-price REST service.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use surtidor_core::{
    model::{
        FuelType, FuelTypeId, Municipality, MunicipalityId, Price, Province, ProvinceId, Station,
    },
    ports::{DirectoryPort, PortError},
};

/// Public endpoint of the "PreciosCarburantes" service.
pub const DEFAULT_BASE_URL: &str =
    "https://sedeaplicaciones.minetur.gob.es/ServiciosRESTCarburantes/PreciosCarburantes/";

const PROVINCES_PATH: &str = "Listados/Provincias/";
const MUNICIPALITIES_PATH: &str = "Listados/MunicipiosPorProvincia/";
const PRODUCTS_PATH: &str = "Listados/ProductosPetroliferos/";
const STATIONS_PATH: &str = "EstacionesTerrestres/FiltroMunicipioProducto/";

/// Identifiers arrive as text, but tolerate bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

/// Entry of /Listados/Provincias/ (the key typo is the service's).
#[derive(Debug, Deserialize)]
struct ProvinceEntry {
    #[serde(rename = "IDPovincia")]
    id: RawId,
    #[serde(rename = "Provincia", default)]
    name: String,
}

/// Entry of /Listados/MunicipiosPorProvincia/{id}
#[derive(Debug, Deserialize)]
struct MunicipalityEntry {
    #[serde(rename = "IDMunicipio")]
    id: RawId,
    #[serde(rename = "Municipio", default)]
    name: String,
}

/// Entry of /Listados/ProductosPetroliferos/
#[derive(Debug, Deserialize)]
struct ProductEntry {
    #[serde(rename = "IDProducto")]
    id: RawId,
    #[serde(rename = "NombreProducto", default)]
    name: String,
}

/// Response of /EstacionesTerrestres/FiltroMunicipioProducto/{municipality}/{product}
#[derive(Debug, Deserialize)]
struct StationsResponse {
    #[serde(rename = "ListaEESSPrecio", default)]
    stations: Vec<StationEntry>,
    // Fecha, Nota and ResultadoConsulta are not needed
}

#[derive(Debug, Deserialize)]
struct StationEntry {
    #[serde(rename = "Rótulo", default)]
    name: String,
    #[serde(rename = "Dirección", default)]
    address: String,
    #[serde(rename = "Municipio", default)]
    municipality: String,
    #[serde(rename = "Provincia", default)]
    province: String,
    #[serde(rename = "Horario", default)]
    schedule: String,
    #[serde(rename = "PrecioProducto", default)]
    price: Option<String>,
}

impl From<StationEntry> for Station {
    fn from(entry: StationEntry) -> Self {
        Station {
            name: entry.name,
            address: entry.address,
            municipality: entry.municipality,
            province: entry.province,
            schedule: entry.schedule,
            price: entry.price.as_deref().and_then(Price::new),
        }
    }
}

/// Directory implementation backed by the ministry REST service.
pub struct MineturDirectory {
    client: Client,
    base_url: Url,
}

impl MineturDirectory {
    /// Create a directory bound to the public endpoint.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches [`MineturDirectory::with_base_url`].
    pub fn new(client: Client) -> Result<Self, PortError> {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Create a directory bound to a custom endpoint, e.g. a mirror or a test server.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidBaseUrl`] when `base_url` is not an absolute HTTP(S) URL.
    pub fn with_base_url(client: Client, base_url: &str) -> Result<Self, PortError> {
        // Relative joins drop the last segment unless the base ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_owned()
        } else {
            format!("{base_url}/")
        };

        let parsed = Url::parse(&normalized)
            .map_err(|err| PortError::InvalidBaseUrl(format!("{base_url}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PortError::InvalidBaseUrl(format!(
                "{base_url}: unsupported scheme {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Endpoint the directory talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, PortError> {
        self.base_url
            .join(path)
            .map_err(|err| PortError::InvalidBaseUrl(format!("{path}: {err}")))
    }
}

#[async_trait]
impl DirectoryPort for MineturDirectory {
    async fn provinces(&self) -> Result<Vec<Province>, PortError> {
        let url = self.endpoint(PROVINCES_PATH)?;
        let entries: Vec<ProvinceEntry> = fetch_json(self.client.get(url), "provinces").await?;

        Ok(entries
            .into_iter()
            .map(|entry| Province {
                id: ProvinceId(entry.id.into()),
                name: entry.name,
            })
            .collect())
    }

    async fn municipalities(
        &self,
        province: &ProvinceId,
    ) -> Result<Vec<Municipality>, PortError> {
        let url = self.endpoint(&format!("{MUNICIPALITIES_PATH}{}", province.0.trim()))?;
        let entries: Vec<MunicipalityEntry> =
            fetch_json(self.client.get(url), "municipalities").await?;

        Ok(entries
            .into_iter()
            .map(|entry| Municipality {
                id: MunicipalityId(entry.id.into()),
                name: entry.name,
                province: province.clone(),
            })
            .collect())
    }

    async fn fuel_types(&self) -> Result<Vec<FuelType>, PortError> {
        let url = self.endpoint(PRODUCTS_PATH)?;
        let entries: Vec<ProductEntry> = fetch_json(self.client.get(url), "fuel types").await?;

        Ok(entries
            .into_iter()
            .map(|entry| FuelType {
                id: FuelTypeId(entry.id.into()),
                name: entry.name,
            })
            .collect())
    }

    async fn stations(
        &self,
        municipality: &MunicipalityId,
        fuel_type: &FuelTypeId,
    ) -> Result<Vec<Station>, PortError> {
        let url = self.endpoint(&format!(
            "{STATIONS_PATH}{}/{}",
            municipality.0.trim(),
            fuel_type.0.trim()
        ))?;
        let response: StationsResponse = fetch_json(self.client.get(url), "stations").await?;

        Ok(response.stations.into_iter().map(Station::from).collect())
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(
    req: RequestBuilder,
    context: &'static str,
) -> Result<T, PortError> {
    let resp = req.send().await.map_err(PortError::from)?;
    let url = resp.url().to_string();
    let status = resp.status();
    tracing::debug!(%url, status = status.as_u16(), context, "directory response");

    if !status.is_success() {
        return Err(PortError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    let body = resp.text().await.map_err(PortError::from)?;
    serde_json::from_str(&body).map_err(|source| PortError::Decode { context, source })
}
