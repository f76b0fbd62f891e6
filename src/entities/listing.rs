use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use super::choices::{BuildingType, DealerType, HeatingMode, MarketingType, PropertyType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    #[sea_orm(unique)]
    pub reference_id: String, // REFERENCE_NUMBER, natural key for re-import
    pub ad_url: String,
    pub property_type: PropertyType,
    pub dept_code: Option<i32>,
    pub postal_code: Option<i32>,
    pub city: String,
    pub insee_code: Option<i32>,
    #[sea_orm(column_type = "Double", nullable)]
    pub latitude: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub longitude: Option<f64>,
    pub blur_radius: Option<i32>,
    pub marketing_type: MarketingType,
    #[sea_orm(column_type = "Double", nullable)]
    pub price: Option<f64>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Json", nullable)]
    pub surface: Option<Surface>, // m², may hold several measurements
    #[sea_orm(column_type = "Double", nullable)]
    pub condominium_expenses: Option<f64>,
    pub caretaker: Option<bool>,
    pub heating_mode: HeatingMode,
    pub water_heating_mode: String,
    pub elevator: Option<bool>,
    pub floor: Option<i32>,
    pub floor_count: Option<i32>,
    pub lot_count: Option<i32>,
    pub construction_year: Option<i32>,
    pub building_type: Option<BuildingType>,
    pub parking: Option<bool>,
    pub parking_count: Option<i32>,
    pub terrace: Option<bool>,
    #[sea_orm(column_type = "Double", nullable)]
    pub terrace_surface: Option<f64>,
    pub swimming_pool: Option<bool>,
    pub garden: Option<bool>,
    pub standing: Option<bool>,
    pub new_build: Option<bool>,
    pub small_building: Option<bool>,
    pub corner_building: Option<bool>,
    pub publication_start_date: String,
    pub dealer_name: String,
    pub dealer_type: Option<DealerType>,
    pub energy_classification: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Ordered surface measurements of a listing, stored as a JSON array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Surface(pub Vec<f64>);

impl Surface {
    /// The measurement used for statistics: the first one listed.
    pub fn primary(&self) -> Option<f64> {
        self.0.first().copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}
