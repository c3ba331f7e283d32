use crate::domain::models::package::PricingMode;
use crate::domain::ports::{CurrencyRepository, PackageRepository};
use crate::error::AppError;
use serde::Serialize;
use std::sync::Arc;

/// A resolved price, in minor units of `currency_code`. Callers snapshot
/// this onto bookings/purchases; it is never recomputed retroactively.
#[derive(Debug, Serialize, Clone)]
pub struct PriceQuote {
    pub amount: i64,
    pub currency_code: String,
}

pub struct PricingResolver {
    package_repo: Arc<dyn PackageRepository>,
    currency_repo: Arc<dyn CurrencyRepository>,
    default_currency: String,
}

impl PricingResolver {
    pub fn new(
        package_repo: Arc<dyn PackageRepository>,
        currency_repo: Arc<dyn CurrencyRepository>,
        default_currency: String,
    ) -> Self {
        Self { package_repo, currency_repo, default_currency }
    }

    /// Custom price rows are returned unchanged. Calculated rows, and
    /// currencies without a row of their own, derive from the
    /// default-currency price times the exchange rate.
    pub async fn resolve(
        &self,
        package_definition_id: &str,
        currency_code: Option<&str>,
    ) -> Result<PriceQuote, AppError> {
        let code = currency_code.unwrap_or(&self.default_currency);

        let currency = self
            .currency_repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Unknown currency: {}", code)))?;

        if let Some(price) = self.package_repo.find_price(package_definition_id, code).await? {
            if price.pricing_mode == PricingMode::Custom {
                return Ok(PriceQuote { amount: price.price, currency_code: code.to_string() });
            }
        } else if code == self.default_currency {
            return Err(AppError::NotFound(format!(
                "No price configured for package {} in {}",
                package_definition_id, code
            )));
        }

        let base = self
            .package_repo
            .find_price(package_definition_id, &self.default_currency)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No base-currency price configured for package {}",
                    package_definition_id
                ))
            })?;

        Ok(PriceQuote {
            amount: convert_minor_units(base.price, currency.exchange_rate),
            currency_code: code.to_string(),
        })
    }
}

/// Rounds once, at resolution time, to whole minor units.
pub fn convert_minor_units(base: i64, exchange_rate: f64) -> i64 {
    (base as f64 * exchange_rate).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_and_rounds_to_minor_units() {
        // 120.00 at 3.785 -> 454.20
        assert_eq!(convert_minor_units(12000, 3.785), 45420);
        // half rounds up
        assert_eq!(convert_minor_units(101, 0.5), 51);
        assert_eq!(convert_minor_units(12000, 1.0), 12000);
    }
}
