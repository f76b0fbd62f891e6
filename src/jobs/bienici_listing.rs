use std::time::Duration as StdDuration;

use chrono::Utc;
use reqwest::Client;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use serde_json::Value as Json;
use tracing::{error, info};
use url::Url;

use crate::entities::choices::{Choice, HeatingMode, MarketingType, PropertyType};
use crate::entities::{listing, Listing, Surface};
use crate::error::AppError;

/// Listing payload returned by `realEstateAd.json`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BienIciAd {
    pub reference: Option<String>,
    pub postal_code: Option<Json>, // sent as string or number
    pub city: Option<String>,
    pub price: Option<f64>,
    pub surface_area: Option<f64>,
    pub fees: Option<BienIciFees>,
    pub description: Option<String>,
    pub floor: Option<i32>,
    pub construction_year: Option<i32>,
    pub property_type: Option<String>,
    pub coordinates: Option<BienIciCoordinates>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BienIciFees {
    pub yearly: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BienIciCoordinates {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl BienIciAd {
    pub fn postal_code(&self) -> Option<i32> {
        match self.postal_code.as_ref()? {
            Json::String(s) => s.trim().parse().ok(),
            Json::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
            _ => None,
        }
    }

    /// Department derived from the postal code (75001 -> 75).
    pub fn dept_code(&self) -> Option<i32> {
        self.postal_code().map(|code| code / 1000)
    }

    pub fn mapped_property_type(&self) -> PropertyType {
        self.property_type
            .as_deref()
            .and_then(PropertyType::parse)
            .unwrap_or(PropertyType::FALLBACK)
    }

    fn latitude(&self) -> Option<f64> {
        self.coordinates.as_ref().and_then(|c| c.lat)
    }

    fn longitude(&self) -> Option<f64> {
        self.coordinates.as_ref().and_then(|c| c.lng)
    }

    fn yearly_fees(&self) -> Option<f64> {
        self.fees.as_ref().and_then(|f| f.yearly)
    }

    /// Copies the ad onto `model`, leaving columns the ad does not carry untouched.
    fn apply_to(&self, model: &mut listing::ActiveModel, ad_url: &str) {
        model.ad_url = Set(ad_url.to_string());
        model.postal_code = Set(self.postal_code());
        model.dept_code = Set(self.dept_code());
        model.city = Set(self.city.clone().unwrap_or_default());
        model.price = Set(self.price);
        model.surface = Set(self.surface_area.map(|s| Surface(vec![s])));
        model.condominium_expenses = Set(self.yearly_fees());
        model.description = Set(self.description.clone().unwrap_or_default());
        model.floor = Set(self.floor);
        model.construction_year = Set(self.construction_year);
        model.property_type = Set(self.mapped_property_type());
        if self.coordinates.is_some() {
            model.latitude = Set(self.latitude());
            model.longitude = Set(self.longitude());
        }
    }
}

/// Listing id from an ad URL: its last non-empty path segment.
///
/// `https://www.bienici.com/annonce/orpi-1-099934E0KUR9` -> `orpi-1-099934E0KUR9`
pub fn listing_id_from_url(ad_url: &str) -> Result<String, AppError> {
    let url = Url::parse(ad_url).map_err(|e| AppError::InvalidQuery(format!("Invalid URL format: {}", e)))?;
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .ok_or_else(|| AppError::InvalidQuery(format!("No listing id in URL {}", ad_url)))
}

/// Fetches the ad JSON for `ad_url` from `api_url`.
pub async fn fetch_bienici_ad(client: &Client, api_url: &str, ad_url: &str) -> Result<BienIciAd, AppError> {
    let id = listing_id_from_url(ad_url)?;
    info!("Fetching BienIci listing {}", id);

    let response = client.get(api_url).query(&[("id", id.as_str())]).send().await?;
    if !response.status().is_success() {
        let status = response.status();
        error!("BienIci API error: Status {}, id: {}", status, id);
        return Err(AppError::FetchError(format!("request failed with status: {}", status)));
    }

    let ad: BienIciAd = response.json().await?;
    Ok(ad)
}

/// Inserts the ad, or updates the stored listing with the same reference.
pub async fn upsert_bienici_ad<C>(db: &C, ad: &BienIciAd, ad_url: &str) -> Result<listing::Model, AppError>
where
    C: ConnectionTrait,
{
    let reference = ad
        .reference
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::InvalidListing("listing has no reference".to_string()))?;

    let existing = Listing::find()
        .filter(listing::Column::ReferenceId.eq(reference))
        .one(db)
        .await?;

    let model = match existing {
        Some(found) => {
            info!("Updating existing listing {}", reference);
            let mut active: listing::ActiveModel = found.into();
            ad.apply_to(&mut active, ad_url);
            active.update(db).await?
        }
        None => {
            info!("Adding new listing {}", reference);
            let mut active = listing::ActiveModel {
                reference_id: Set(reference.to_string()),
                marketing_type: Set(MarketingType::FALLBACK),
                heating_mode: Set(HeatingMode::FALLBACK),
                water_heating_mode: Set(String::new()),
                publication_start_date: Set(String::new()),
                dealer_name: Set(String::new()),
                energy_classification: Set(String::new()),
                created_at: Set(Utc::now()),
                ..Default::default()
            };
            ad.apply_to(&mut active, ad_url);
            active.insert(db).await?
        }
    };
    Ok(model)
}

/// Fetches one BienIci listing by its public URL and stores it.
pub async fn run_bienici_listing<C>(db: &C, api_url: &str, ad_url: &str) -> Result<listing::Model, AppError>
where
    C: ConnectionTrait,
{
    let client = Client::builder().timeout(StdDuration::from_secs(30)).build()?;
    let ad = fetch_bienici_ad(&client, api_url, ad_url).await?;
    upsert_bienici_ad(db, &ad, ad_url).await
}
