//! Food-safety API client
//!
//! Barcode lookup goes through two public services:
//!
//! 1. the barcode registry (service `C005`) maps a barcode to a product name and
//!    its item report number
//! 2. the certified-label service maps the report number to nutrition facts text
//!    and an allergy string
//!
//! Both are plain HTTP GET + JSON. Requests are blocking and not retried.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::allergy::split_allergen_text;
use crate::nutrition::parse_nutrient_text;

use super::{ProductLookup, ProductNutrientSource, ScannedProduct, SourceError};

pub const DEFAULT_BARCODE_BASE_URL: &str = "http://openapi.foodsafetykorea.go.kr/api";
pub const DEFAULT_LABEL_URL: &str =
    "http://apis.data.go.kr/B553748/CertImgListServiceV3/getCertImgListServiceV3";

const BARCODE_SERVICE: &str = "C005";

/// Connection settings for both services
#[derive(Debug, Clone)]
pub struct FoodSafetyConfig {
    pub barcode_api_key: String,
    pub label_api_key: String,
    pub barcode_base_url: String,
    pub label_url: String,
    pub timeout: Duration,
}

impl FoodSafetyConfig {
    pub fn new(barcode_api_key: String, label_api_key: String, timeout: Duration) -> Self {
        Self {
            barcode_api_key,
            label_api_key,
            barcode_base_url: DEFAULT_BARCODE_BASE_URL.to_string(),
            label_url: DEFAULT_LABEL_URL.to_string(),
            timeout,
        }
    }
}

/// Product identity from the barcode registry
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeRecord {
    pub name: String,
    pub report_no: String,
}

/// Label text from the certified-label service
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub nutrient_text: Option<String>,
    pub allergy_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BarcodeRow {
    #[serde(rename = "PRDLST_NM")]
    name: Option<String>,
    #[serde(rename = "PRDLST_REPORT_NO")]
    report_no: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BarcodeService {
    #[serde(default)]
    row: Vec<BarcodeRow>,
}

#[derive(Debug, Deserialize)]
struct LabelItem {
    nutrient: Option<Value>,
    allergy: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct LabelItemWrapper {
    item: LabelItem,
}

#[derive(Debug, Deserialize)]
struct LabelBody {
    #[serde(default)]
    items: Vec<LabelItemWrapper>,
}

/// Barcodes are all digits
pub fn is_valid_barcode(barcode: &str) -> bool {
    !barcode.is_empty() && barcode.chars().all(|c| c.is_ascii_digit())
}

/// Extract the first product row of a barcode registry response
pub fn parse_barcode_response(json: &Value) -> Result<Option<BarcodeRecord>, SourceError> {
    let Some(service) = json.get(BARCODE_SERVICE) else {
        return Ok(None);
    };

    let service: BarcodeService =
        serde_json::from_value(service.clone()).map_err(|e| SourceError::Malformed {
            service: "barcode registry",
            detail: e.to_string(),
        })?;

    Ok(service.row.into_iter().next().map(|row| BarcodeRecord {
        name: row.name.unwrap_or_default(),
        report_no: row.report_no.unwrap_or_default(),
    }))
}

/// Extract the first item of a certified-label response
pub fn parse_label_response(json: &Value) -> Result<Option<LabelRecord>, SourceError> {
    let Some(body) = json.get("body") else {
        return Ok(None);
    };

    let body: LabelBody =
        serde_json::from_value(body.clone()).map_err(|e| SourceError::Malformed {
            service: "certified label",
            detail: e.to_string(),
        })?;

    Ok(body.items.into_iter().next().map(|wrapper| LabelRecord {
        nutrient_text: wrapper.item.nutrient.and_then(value_text),
        allergy_text: wrapper.item.allergy.and_then(value_text),
    }))
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

/// Blocking client for the barcode registry and certified-label services
#[derive(Clone)]
pub struct FoodSafetyClient {
    client: Client,
    config: FoodSafetyConfig,
}

impl FoodSafetyClient {
    pub fn new(config: FoodSafetyConfig) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Resolve a barcode to a product name and report number
    pub fn fetch_barcode(&self, barcode: &str) -> Result<Option<BarcodeRecord>, SourceError> {
        let url = format!(
            "{}/{}/{}/json/1/1/BAR_CD={}",
            self.config.barcode_base_url.trim_end_matches('/'),
            self.config.barcode_api_key,
            BARCODE_SERVICE,
            barcode
        );

        let json: Value = self.client.get(&url).send()?.error_for_status()?.json()?;
        parse_barcode_response(&json)
    }

    /// Fetch the certified label for a report number
    pub fn fetch_label(&self, report_no: &str) -> Result<Option<LabelRecord>, SourceError> {
        let json: Value = self
            .client
            .get(&self.config.label_url)
            .query(&[
                ("ServiceKey", self.config.label_api_key.as_str()),
                ("prdlstReportNo", report_no),
                ("returnType", "json"),
                ("numOfRows", "1"),
            ])
            .send()?
            .error_for_status()?
            .json()?;
        parse_label_response(&json)
    }
}

impl ProductNutrientSource for FoodSafetyClient {
    fn lookup(&self, barcode: &str) -> Result<ProductLookup, SourceError> {
        let Some(record) = self.fetch_barcode(barcode)? else {
            tracing::info!("No product registered for barcode {}", barcode);
            return Ok(ProductLookup::NotFound);
        };

        let label = if record.report_no.is_empty() {
            None
        } else {
            self.fetch_label(&record.report_no)?
        };

        let Some(label) = label else {
            tracing::info!("No certified label for '{}' ({})", record.name, record.report_no);
            return Ok(ProductLookup::NutrientsUnavailable {
                name: record.name,
                report_no: record.report_no,
            });
        };

        Ok(ProductLookup::Found(ScannedProduct {
            barcode: barcode.to_string(),
            name: record.name,
            report_no: record.report_no,
            nutrients: label
                .nutrient_text
                .as_deref()
                .map(parse_nutrient_text)
                .unwrap_or_default(),
            allergens: label
                .allergy_text
                .as_deref()
                .map(split_allergen_text)
                .unwrap_or_default(),
        }))
    }
}
