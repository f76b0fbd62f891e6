//! Price / surface / fee statistics over a subset of listings.

use std::fmt;
use std::str::FromStr;

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter, QuerySelect};
use serde::Serialize;
use tracing::info;

use crate::entities::{listing, Listing, Surface};
use crate::error::AppError;

/// Which listings to aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatisticsQuery {
    Department(i32),
    /// Matched case-insensitively.
    City(String),
    PostalCode(i32),
}

impl StatisticsQuery {
    /// Builds a query from a `(query_type, query_value)` pair such as `("city", "Paris")`.
    pub fn parse(query_type: &str, query_value: &str) -> Result<Self, AppError> {
        let value = query_value.trim();
        if value.is_empty() {
            return Err(AppError::InvalidQuery("query value is empty".to_string()));
        }
        let number = || {
            value
                .parse::<i32>()
                .map_err(|_| AppError::InvalidQuery(format!("{} must be an integer, got '{}'", query_type, value)))
        };

        match query_type {
            "department" => Ok(StatisticsQuery::Department(number()?)),
            "city" => Ok(StatisticsQuery::City(value.to_string())),
            "postal_code" => Ok(StatisticsQuery::PostalCode(number()?)),
            other => Err(AppError::InvalidQuery(format!(
                "unknown query type '{}' (expected department, city or postal_code)",
                other
            ))),
        }
    }

    pub fn query_type(&self) -> &'static str {
        match self {
            StatisticsQuery::Department(_) => "department",
            StatisticsQuery::City(_) => "city",
            StatisticsQuery::PostalCode(_) => "postal_code",
        }
    }
}

impl fmt::Display for StatisticsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatisticsQuery::Department(code) => write!(f, "department: {}", code),
            StatisticsQuery::City(city) => write!(f, "city: {}", city),
            StatisticsQuery::PostalCode(code) => write!(f, "postal_code: {}", code),
        }
    }
}

impl FromStr for StatisticsQuery {
    type Err = AppError;

    /// Parses `type=value`, e.g. `department=75`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (query_type, value) = s
            .split_once('=')
            .ok_or_else(|| AppError::InvalidQuery(format!("expected type=value, got '{}'", s)))?;
        Self::parse(query_type.trim(), value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingStatistics {
    pub query_type: String,
    pub query_value: String,
    pub count: usize,
    pub mean_price: f64,
    pub mean_surface: f64,
    pub mean_fees: f64,
    pub mean_fees_per_sqm: f64,
    pub quantile_10_price: f64,
    pub quantile_90_price: f64,
    pub quantile_10_surface: f64,
    pub quantile_90_surface: f64,
    pub quantile_10_fees: f64,
    pub quantile_90_fees: f64,
    pub quantile_10_fees_per_sqm: f64,
    pub quantile_90_fees_per_sqm: f64,
}

/// The three columns the statistics read.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct ListingFigures {
    pub price: Option<f64>,
    pub surface: Option<Surface>,
    pub condominium_expenses: Option<f64>,
}

impl ListingFigures {
    pub fn primary_surface(&self) -> Option<f64> {
        self.surface.as_ref().and_then(Surface::primary)
    }

    pub fn fees_per_sqm(&self) -> Option<f64> {
        let fees = self.condominium_expenses?;
        let surface = self.primary_surface()?;
        if surface > 0.0 {
            Some(fees / surface)
        } else {
            None
        }
    }
}

/// Loads the figures of every listing matching `query`.
pub async fn load_figures<C>(db: &C, query: &StatisticsQuery) -> Result<Vec<ListingFigures>, AppError>
where
    C: ConnectionTrait,
{
    let select = Listing::find()
        .select_only()
        .column(listing::Column::Price)
        .column(listing::Column::Surface)
        .column(listing::Column::CondominiumExpenses);

    let select = match query {
        StatisticsQuery::Department(code) => select.filter(listing::Column::DeptCode.eq(*code)),
        StatisticsQuery::PostalCode(code) => select.filter(listing::Column::PostalCode.eq(*code)),
        StatisticsQuery::City(city) => select.filter(
            Expr::expr(Func::lower(Expr::col(listing::Column::City))).eq(city.to_lowercase()),
        ),
    };

    Ok(select.into_model::<ListingFigures>().all(db).await?)
}

/// Statistics for the listings matching `query`; `None` when nothing matches.
pub async fn compute_statistics<C>(db: &C, query: &StatisticsQuery) -> Result<Option<ListingStatistics>, AppError>
where
    C: ConnectionTrait,
{
    let figures = load_figures(db, query).await?;
    if figures.is_empty() {
        return Ok(None);
    }
    let stats = summarize(query, &figures);
    info!("Calculated stats for {}: {} listings", query, stats.count);
    Ok(Some(stats))
}

/// Aggregates already loaded figures.
pub fn summarize(query: &StatisticsQuery, figures: &[ListingFigures]) -> ListingStatistics {
    let prices: Vec<f64> = figures.iter().filter_map(|f| f.price).collect();
    let surfaces: Vec<f64> = figures.iter().filter_map(ListingFigures::primary_surface).collect();
    let fees: Vec<f64> = figures.iter().filter_map(|f| f.condominium_expenses).collect();
    let fees_per_sqm: Vec<f64> = figures.iter().filter_map(ListingFigures::fees_per_sqm).collect();

    let query_value = match query {
        StatisticsQuery::Department(code) | StatisticsQuery::PostalCode(code) => code.to_string(),
        StatisticsQuery::City(city) => city.clone(),
    };

    ListingStatistics {
        query_type: query.query_type().to_string(),
        query_value,
        count: figures.len(),
        mean_price: mean(&prices),
        mean_surface: mean(&surfaces),
        mean_fees: mean(&fees),
        mean_fees_per_sqm: mean(&fees_per_sqm),
        quantile_10_price: quantile(&prices, 0.1),
        quantile_90_price: quantile(&prices, 0.9),
        quantile_10_surface: quantile(&surfaces, 0.1),
        quantile_90_surface: quantile(&surfaces, 0.9),
        quantile_10_fees: quantile(&fees, 0.1),
        quantile_90_fees: quantile(&fees, 0.9),
        quantile_10_fees_per_sqm: quantile(&fees_per_sqm, 0.1),
        quantile_90_fees_per_sqm: quantile(&fees_per_sqm, 0.9),
    }
}

/// Arithmetic mean of the finite values, 0.0 when there are none.
pub fn mean(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return 0.0;
    }
    finite.iter().sum::<f64>() / finite.len() as f64
}

/// Quantile `q` in [0, 1] with linear interpolation between closest ranks,
/// 0.0 for an empty series.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q = q.clamp(0.0, 1.0);
    let rank = (sorted.len() - 1) as f64 * q;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
