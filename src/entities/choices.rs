//! Closed vocabularies for the listing classification columns.
//!
//! Every set carries an `OTHER` variant so that values the source dataset adds
//! later still map to something storable.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Behaviour shared by the classification enums.
pub trait Choice: ActiveEnum<Value = String> + Copy {
    /// Variant used when a raw value is present but not recognised.
    const FALLBACK: Self;

    /// Case-insensitive match of a raw value against the stored string values.
    fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_uppercase();
        Self::try_from_value(&key).ok()
    }

    /// Like [`Choice::parse`], falling back to [`Choice::FALLBACK`].
    fn coerce(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(Self::FALLBACK)
    }

    /// `(value, label)` pairs, e.g. `("LIFE_ANNUITY", "Life annuity")`.
    fn choices() -> Vec<(String, String)> {
        Self::iter()
            .map(|variant| {
                let value = variant.to_value();
                let label = label_for(&value);
                (value, label)
            })
            .collect()
    }
}

fn label_for(value: &str) -> String {
    let lower = value.replace('_', " ").to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    #[sea_orm(string_value = "APARTMENT")]
    Apartment,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl Choice for PropertyType {
    const FALLBACK: Self = PropertyType::Other;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketingType {
    #[sea_orm(string_value = "SALE")]
    Sale,
    #[sea_orm(string_value = "LIFE_ANNUITY")]
    LifeAnnuity,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl Choice for MarketingType {
    const FALLBACK: Self = MarketingType::Other;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeatingMode {
    #[sea_orm(string_value = "INDIVIDUAL")]
    Individual,
    #[sea_orm(string_value = "COLLECTIVE")]
    Collective,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl Choice for HeatingMode {
    const FALLBACK: Self = HeatingMode::Other;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingType {
    #[sea_orm(string_value = "RECENT")]
    Recent,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl Choice for BuildingType {
    const FALLBACK: Self = BuildingType::Other;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealerType {
    #[sea_orm(string_value = "AGENCY")]
    Agency,
    #[sea_orm(string_value = "PRIVATE")]
    Private,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl Choice for DealerType {
    const FALLBACK: Self = DealerType::Other;
}
