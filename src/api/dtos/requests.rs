use crate::domain::models::booking::{BookingStatus, BookingType};
use crate::domain::models::package::{PackageType, PricingMode};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
pub struct CreateDurationRequest {
    pub name: String,
    pub minutes: i32,
}

#[derive(Deserialize)]
pub struct UpdateDurationRequest {
    pub name: Option<String>,
    pub minutes: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateTemplateRequest {
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i32,
    pub session_duration_id: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default = "default_true")]
    pub auto_available: bool,
}

#[derive(Deserialize)]
pub struct UpdateTemplateRequest {
    pub day_of_week: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub capacity: Option<i32>,
    pub session_duration_id: Option<String>,
    pub is_available: Option<bool>,
    pub auto_available: Option<bool>,
}

#[derive(Deserialize)]
pub struct GenerateSlotsRequest {
    pub template_ids: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub overwrite_existing: bool,
}

#[derive(Deserialize)]
pub struct SlotQuery {
    pub schedule_template_id: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub is_available: Option<bool>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Deserialize)]
pub struct SetSlotAvailabilityRequest {
    pub is_available: bool,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub client_id: String,
    pub schedule_slot_id: String,
    pub user_package_id: Option<String>,
    pub booking_type: BookingType,
    pub group_size: Option<i32>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub discount_amount: Option<i64>,
    pub currency_code: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct BookingQuery {
    pub client_id: Option<String>,
    pub schedule_slot_id: Option<String>,
    pub status: Option<BookingStatus>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    pub description: Option<String>,
    pub sessions_count: i32,
    pub session_duration_id: String,
    pub package_type: PackageType,
    pub max_group_size: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sessions_count: Option<i32>,
    pub session_duration_id: Option<String>,
    pub package_type: Option<PackageType>,
    pub max_group_size: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpsertPriceRequest {
    pub currency_code: String,
    pub price: i64,
    pub pricing_mode: PricingMode,
}

#[derive(Deserialize)]
pub struct PriceQuery {
    pub currency: Option<String>,
}

#[derive(Deserialize)]
pub struct PurchasePackageRequest {
    pub client_id: String,
    pub package_definition_id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct UserPackageQuery {
    pub client_id: String,
}

#[derive(Deserialize)]
pub struct CreateClientRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateCurrencyRequest {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub exchange_rate: f64,
}
