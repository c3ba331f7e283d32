use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PackageType {
    Individual,
    Group,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PricingMode {
    Custom,
    Calculated,
}

/// A purchasable bundle of sessions.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PackageDefinition {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub sessions_count: i32,
    pub session_duration_id: String,
    pub package_type: PackageType,
    /// Required (> 1) for group and mixed packages, null for individual.
    pub max_group_size: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewPackageParams {
    pub name: String,
    pub description: Option<String>,
    pub sessions_count: i32,
    pub session_duration_id: String,
    pub package_type: PackageType,
    pub max_group_size: Option<i32>,
}

impl PackageDefinition {
    pub fn new(params: NewPackageParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            description: params.description,
            sessions_count: params.sessions_count,
            session_duration_id: params.session_duration_id,
            package_type: params.package_type,
            max_group_size: params.max_group_size,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.sessions_count < 1 {
            return Err(AppError::Validation("Sessions count must be at least 1".into()));
        }
        match self.package_type {
            PackageType::Individual => {
                if self.max_group_size.is_some() {
                    return Err(AppError::Validation(
                        "Individual packages must not define a max group size".into(),
                    ));
                }
            }
            PackageType::Group | PackageType::Mixed => match self.max_group_size {
                Some(size) if size > 1 => {}
                _ => {
                    return Err(AppError::Validation(
                        "Group and mixed packages require a max group size greater than 1".into(),
                    ))
                }
            },
        }
        Ok(())
    }
}

/// Price of a package in one currency. Amounts are integer minor units.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PackagePrice {
    pub id: String,
    pub package_definition_id: String,
    pub currency_code: String,
    pub price: i64,
    pub pricing_mode: PricingMode,
    pub created_at: DateTime<Utc>,
}

impl PackagePrice {
    pub fn new(
        package_definition_id: String,
        currency_code: String,
        price: i64,
        pricing_mode: PricingMode,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            package_definition_id,
            currency_code,
            price,
            pricing_mode,
            created_at: Utc::now(),
        }
    }
}
