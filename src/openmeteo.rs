use chrono::NaiveDateTime;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use crate::error::FetchError;

pub const BASE_URL: &str = "https://api.open-meteo.com";
const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability,weathercode";

/// Anything that can produce the hourly series for a coordinate.
pub trait ForecastSource: Send + Sync {
    fn hourly(&self, lat: f64, lon: f64) -> Result<HourlySeries, FetchError>;
}

#[derive(Debug, Clone)]
pub struct OpenMeteo {
    client: Client,
    base_url: String,
}

impl OpenMeteo {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent("jikan").build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn forecast_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}/v1/forecast?latitude={lat}&longitude={lon}&hourly={HOURLY_FIELDS}&timezone=auto",
            self.base_url
        )
    }
}

impl ForecastSource for OpenMeteo {
    fn hourly(&self, lat: f64, lon: f64) -> Result<HourlySeries, FetchError> {
        let url = self.forecast_url(lat, lon);
        log::info!("GET {url}");
        let response = get_web_json(&self.client, &url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let forecast: Forecast = response.json()?;
        forecast.hourly.check()?;
        Ok(forecast.hourly)
    }
}

#[derive(Deserialize, Debug)]
struct Forecast {
    hourly: HourlySeries,
}

/// Parallel hourly arrays exactly as the service returns them. Index `i`
/// refers to the same hour in every field.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct HourlySeries {
    #[serde(with = "local_minutes")]
    pub time: Vec<NaiveDateTime>,

    pub temperature_2m: Vec<Option<f64>>,

    pub precipitation_probability: Vec<Option<f64>>,

    pub weathercode: Vec<Option<i32>>,
}

impl HourlySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn check(&self) -> Result<(), FetchError> {
        let n = self.time.len();
        let lengths = [
            self.temperature_2m.len(),
            self.precipitation_probability.len(),
            self.weathercode.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(FetchError::Malformed(format!(
                "hourly arrays differ in length: time={n}, others={lengths:?}"
            )));
        }
        Ok(())
    }
}

/// `timezone=auto` timestamps: local wall clock, minute precision, no offset.
mod local_minutes {
    use chrono::NaiveDateTime;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Vec<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(d)?;
        let mut times = Vec::with_capacity(raw.len());
        for t in &raw {
            match parse(t) {
                Some(time) => times.push(time),
                None => return Err(D::Error::custom(format!("bad timestamp {t:?}"))),
            }
        }
        Ok(times)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    local_minutes::parse(raw)
}

fn get_web_json(client: &Client, url: &str) -> Result<Response, reqwest::Error> {
    client.get(url).send()
}
