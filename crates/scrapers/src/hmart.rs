//! H Mart loyalty points inquiry.
//!
//! The inquiry endpoint takes the card number, last name and zip code as a
//! form POST and answers with JSON:
//!
//! ```json
//! {"tpldata": [{"point": "1520", "trdate": "2024-05-01"}]}
//! ```

use crate::error::{ScrapeError, ScrapeResult};
use crate::source::PointsSource;
use async_trait::async_trait;
use checkbot_core::{parse_integer, PointsReading};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

/// Card holder details for the points inquiry.
#[derive(Debug, Clone)]
pub struct HmartCredentials {
    pub card_number: String,
    pub last_name: String,
    pub zip_code: String,
}

impl HmartCredentials {
    fn form(&self) -> [(&'static str, &str); 3] {
        [
            ("custno", self.card_number.as_str()),
            ("lastname", self.last_name.as_str()),
            ("zipcode", self.zip_code.as_str()),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    #[serde(default)]
    tpldata: Vec<PointsRecord>,
}

#[derive(Debug, Deserialize)]
struct PointsRecord {
    point: Value,
    #[serde(default)]
    trdate: Value,
}

/// Points inquiry client.
pub struct HmartClient {
    http: reqwest::Client,
    url: String,
    credentials: HmartCredentials,
}

impl HmartClient {
    pub const POINTS_URL: &'static str =
        "http://scpoint.hmart.com/Controller-DMZPointInquiry/jsp/smc-dmz-get-cust-point.jsp";

    /// Create a client against the production endpoint.
    pub fn new(credentials: HmartCredentials, timeout: Duration) -> ScrapeResult<Self> {
        Self::with_url(credentials, timeout, Self::POINTS_URL)
    }

    /// Create a client against a custom endpoint.
    pub fn with_url(
        credentials: HmartCredentials,
        timeout: Duration,
        url: impl Into<String>,
    ) -> ScrapeResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
            credentials,
        })
    }
}

#[async_trait]
impl PointsSource for HmartClient {
    async fn fetch_points(&self) -> ScrapeResult<PointsReading> {
        info!(
            card = %mask(&self.credentials.card_number),
            zip = %self.credentials.zip_code,
            "Checking points"
        );

        let response = self
            .http
            .post(&self.url)
            .form(&self.credentials.form())
            .send()
            .await?;

        let status = response.status();
        info!(url = %self.url, status = status.as_u16(), "post");
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let reading = parse_points_body(&body)?;
        info!(points = reading.points, as_of = %reading.as_of, "Points fetched");
        Ok(reading)
    }
}

/// Parse the raw text of a points inquiry reply.
///
/// Anything that is not JSON, such as an HTML error page, is a payload error.
pub fn parse_points_body(body: &str) -> ScrapeResult<PointsReading> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ScrapeError::Payload(e.to_string()))?;
    parse_points_response(value)
}

/// Extract the first record of a points inquiry reply.
///
/// `point` arrives as a string on some days and a number on others.
pub fn parse_points_response(body: Value) -> ScrapeResult<PointsReading> {
    let response: PointsResponse =
        serde_json::from_value(body).map_err(|e| ScrapeError::Payload(e.to_string()))?;

    let record = response
        .tpldata
        .into_iter()
        .next()
        .ok_or_else(|| ScrapeError::Payload("empty tpldata".to_string()))?;

    let points = match record.point {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| ScrapeError::Payload(format!("point is not an integer: {}", n)))?,
        Value::String(s) => parse_integer(&s)?,
        other => {
            return Err(ScrapeError::Payload(format!(
                "unexpected point value: {}",
                other
            )))
        }
    };

    let as_of = match record.trdate {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    Ok(PointsReading::new(points, as_of))
}

/// Show only the last four characters of an identifier.
fn mask(value: &str) -> String {
    let visible = value.chars().count().min(4);
    let hidden = value.chars().count() - visible;
    let tail: String = value.chars().skip(hidden).collect();
    format!("{}{}", "*".repeat(hidden), tail)
}
