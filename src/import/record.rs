use chrono::Utc;
use sea_orm::{ActiveValue::NotSet, Set};
use serde::Deserialize;

use super::coerce;
use crate::config::BooleanMode;
use crate::entities::choices::{
    BuildingType, Choice, DealerType, HeatingMode, MarketingType, PropertyType,
};
use crate::entities::{listing, Surface};

/// One row of the listings dataset, every column kept as raw optional text.
///
/// Columns missing from the header deserialize to `None`; unknown columns are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawListing {
    #[serde(rename = "REFERENCE_NUMBER")]
    pub reference_number: Option<String>,
    #[serde(rename = "AD_URLS")]
    pub ad_urls: Option<String>,
    #[serde(rename = "PROPERTY_TYPE")]
    pub property_type: Option<String>,
    #[serde(rename = "DEPT_CODE")]
    pub dept_code: Option<String>,
    #[serde(rename = "ZIP_CODE")]
    pub zip_code: Option<String>,
    #[serde(rename = "CITY")]
    pub city: Option<String>,
    #[serde(rename = "INSEE_CODE")]
    pub insee_code: Option<String>,
    #[serde(rename = "LATITUDE")]
    pub latitude: Option<String>,
    #[serde(rename = "LONGITUDE")]
    pub longitude: Option<String>,
    #[serde(rename = "BLUR_RADIUS")]
    pub blur_radius: Option<String>,
    #[serde(rename = "MARKETING_TYPE")]
    pub marketing_type: Option<String>,
    #[serde(rename = "PRICE")]
    pub price: Option<String>,
    #[serde(rename = "DESCRIPTION")]
    pub description: Option<String>,
    #[serde(rename = "SURFACE")]
    pub surface: Option<String>,
    #[serde(rename = "CONDOMINIUM_EXPENSES")]
    pub condominium_expenses: Option<String>,
    #[serde(rename = "CARETAKER")]
    pub caretaker: Option<String>,
    #[serde(rename = "HEATING_MODE")]
    pub heating_mode: Option<String>,
    #[serde(rename = "WATER_HEATING_MODE")]
    pub water_heating_mode: Option<String>,
    #[serde(rename = "ELEVATOR")]
    pub elevator: Option<String>,
    #[serde(rename = "FLOOR")]
    pub floor: Option<String>,
    #[serde(rename = "FLOOR_COUNT")]
    pub floor_count: Option<String>,
    #[serde(rename = "LOT_COUNT")]
    pub lot_count: Option<String>,
    #[serde(rename = "CONSTRUCTION_YEAR")]
    pub construction_year: Option<String>,
    #[serde(rename = "BUILDING_TYPE")]
    pub building_type: Option<String>,
    #[serde(rename = "PARKING")]
    pub parking: Option<String>,
    #[serde(rename = "PARKING_COUNT")]
    pub parking_count: Option<String>,
    #[serde(rename = "TERRACE")]
    pub terrace: Option<String>,
    #[serde(rename = "TERRACE_SURFACE")]
    pub terrace_surface: Option<String>,
    #[serde(rename = "SWIMMING_POOL")]
    pub swimming_pool: Option<String>,
    #[serde(rename = "GARDEN")]
    pub garden: Option<String>,
    #[serde(rename = "STANDING")]
    pub standing: Option<String>,
    #[serde(rename = "NEW_BUILD")]
    pub new_build: Option<String>,
    #[serde(rename = "SMALL_BUILDING")]
    pub small_building: Option<String>,
    #[serde(rename = "CORNER_BUILDING")]
    pub corner_building: Option<String>,
    #[serde(rename = "PUBLICATION_START_DATE")]
    pub publication_start_date: Option<String>,
    #[serde(rename = "DEALER_NAME")]
    pub dealer_name: Option<String>,
    #[serde(rename = "DEALER_TYPE")]
    pub dealer_type: Option<String>,
    #[serde(rename = "ENERGY_CLASSIFICATION")]
    pub energy_classification: Option<String>,
}

/// Why a raw row produced no listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingReference,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::MissingReference => write!(f, "row has no REFERENCE_NUMBER"),
        }
    }
}

impl RawListing {
    /// Maps the row to a listing ready for insertion.
    ///
    /// Individual fields never fail: unparseable values become `None` (or the
    /// choice set's `OTHER`). Only a row without a reference is rejected.
    pub fn into_active_model(self, mode: BooleanMode) -> Result<listing::ActiveModel, Rejection> {
        let reference_id = coerce::present(self.reference_number.as_deref())
            .map(str::to_string)
            .ok_or(Rejection::MissingReference)?;

        let flag = |column: &'static str, raw: &Option<String>| coerce::boolean(column, raw.as_deref(), mode);

        Ok(listing::ActiveModel {
            id: NotSet,
            reference_id: Set(reference_id),
            ad_url: Set(coerce::text(self.ad_urls.as_deref())),
            property_type: Set(choice_or_fallback::<PropertyType>(self.property_type.as_deref())),
            dept_code: Set(coerce::int("DEPT_CODE", self.dept_code.as_deref())),
            postal_code: Set(coerce::int("ZIP_CODE", self.zip_code.as_deref())),
            city: Set(coerce::text(self.city.as_deref())),
            insee_code: Set(coerce::int("INSEE_CODE", self.insee_code.as_deref())),
            latitude: Set(coerce::float("LATITUDE", self.latitude.as_deref())),
            longitude: Set(coerce::float("LONGITUDE", self.longitude.as_deref())),
            blur_radius: Set(coerce::int("BLUR_RADIUS", self.blur_radius.as_deref())),
            marketing_type: Set(choice_or_fallback::<MarketingType>(self.marketing_type.as_deref())),
            price: Set(coerce::float("PRICE", self.price.as_deref())),
            description: Set(coerce::text(self.description.as_deref())),
            surface: Set(coerce::surface("SURFACE", self.surface.as_deref()).map(Surface)),
            condominium_expenses: Set(coerce::float(
                "CONDOMINIUM_EXPENSES",
                self.condominium_expenses.as_deref(),
            )),
            caretaker: Set(flag("CARETAKER", &self.caretaker)),
            heating_mode: Set(choice_or_fallback::<HeatingMode>(self.heating_mode.as_deref())),
            water_heating_mode: Set(coerce::text(self.water_heating_mode.as_deref())),
            elevator: Set(flag("ELEVATOR", &self.elevator)),
            floor: Set(coerce::int("FLOOR", self.floor.as_deref())),
            floor_count: Set(coerce::int("FLOOR_COUNT", self.floor_count.as_deref())),
            lot_count: Set(coerce::int("LOT_COUNT", self.lot_count.as_deref())),
            construction_year: Set(coerce::int("CONSTRUCTION_YEAR", self.construction_year.as_deref())),
            building_type: Set(nullable_choice::<BuildingType>(self.building_type.as_deref())),
            parking: Set(flag("PARKING", &self.parking)),
            parking_count: Set(coerce::int("PARKING_COUNT", self.parking_count.as_deref())),
            terrace: Set(flag("TERRACE", &self.terrace)),
            terrace_surface: Set(coerce::float("TERRACE_SURFACE", self.terrace_surface.as_deref())),
            swimming_pool: Set(flag("SWIMMING_POOL", &self.swimming_pool)),
            garden: Set(flag("GARDEN", &self.garden)),
            standing: Set(flag("STANDING", &self.standing)),
            new_build: Set(flag("NEW_BUILD", &self.new_build)),
            small_building: Set(flag("SMALL_BUILDING", &self.small_building)),
            corner_building: Set(flag("CORNER_BUILDING", &self.corner_building)),
            publication_start_date: Set(coerce::text(self.publication_start_date.as_deref())),
            dealer_name: Set(coerce::text(self.dealer_name.as_deref())),
            dealer_type: Set(nullable_choice::<DealerType>(self.dealer_type.as_deref())),
            energy_classification: Set(coerce::text(self.energy_classification.as_deref())),
            created_at: Set(Utc::now()),
        })
    }
}

/// Non-null classification column: absent or unknown both give `OTHER`.
fn choice_or_fallback<T: Choice>(raw: Option<&str>) -> T {
    coerce::present(raw).map(T::coerce).unwrap_or(T::FALLBACK)
}

/// Nullable classification column: absent stays `None`, unknown gives `OTHER`.
fn nullable_choice<T: Choice>(raw: Option<&str>) -> Option<T> {
    coerce::present(raw).map(T::coerce)
}
