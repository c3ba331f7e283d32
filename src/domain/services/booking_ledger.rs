use crate::domain::models::booking::{Booking, BookingStatus, BookingType, NewBookingParams};
use crate::domain::models::user_package::{SessionPool, UserPackage};
use crate::domain::ports::{
    BookingRepository, ClientRegistry, PackageRepository, PaymentMethodPolicy,
    ScheduleSlotRepository, UserPackageRepository,
};
use crate::domain::services::pricing::PricingResolver;
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub struct CreateBookingParams {
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

/// Owns the booking state machine and every mutation of slot capacity and
/// package session balances. All checks that gate a write re-run as SQL
/// guards inside the repository transaction; the ledger's own checks exist
/// to reject bad requests before anything is touched and to give precise
/// errors.
pub struct BookingLedger {
    booking_repo: Arc<dyn BookingRepository>,
    slot_repo: Arc<dyn ScheduleSlotRepository>,
    user_package_repo: Arc<dyn UserPackageRepository>,
    package_repo: Arc<dyn PackageRepository>,
    clients: Arc<dyn ClientRegistry>,
    payment_policy: Arc<dyn PaymentMethodPolicy>,
    pricing: Arc<PricingResolver>,
}

impl BookingLedger {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        slot_repo: Arc<dyn ScheduleSlotRepository>,
        user_package_repo: Arc<dyn UserPackageRepository>,
        package_repo: Arc<dyn PackageRepository>,
        clients: Arc<dyn ClientRegistry>,
        payment_policy: Arc<dyn PaymentMethodPolicy>,
        pricing: Arc<PricingResolver>,
    ) -> Self {
        Self {
            booking_repo,
            slot_repo,
            user_package_repo,
            package_repo,
            clients,
            payment_policy,
            pricing,
        }
    }

    pub async fn create_booking(&self, params: CreateBookingParams) -> Result<Booking, AppError> {
        self.clients
            .lookup(&params.client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".into()))?;

        let group_size = match params.booking_type {
            BookingType::Individual => match params.group_size {
                None | Some(1) => 1,
                Some(_) => {
                    return Err(AppError::InvalidGroupSize(
                        "Individual bookings have a group size of 1".into(),
                    ))
                }
            },
            BookingType::Group => match params.group_size {
                Some(size) if size >= 2 => size,
                _ => {
                    return Err(AppError::InvalidGroupSize(
                        "Group bookings require a group size of at least 2".into(),
                    ))
                }
            },
        };

        let slot = self
            .slot_repo
            .find_by_id(&params.schedule_slot_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Schedule slot not found".into()))?;
        if !slot.is_available {
            return Err(AppError::SlotUnavailable("The schedule slot is not open for booking".into()));
        }

        let pool = match params.booking_type {
            BookingType::Individual => SessionPool::Individual,
            BookingType::Group => SessionPool::Group,
        };

        let user_package = self
            .resolve_user_package(&params, pool)
            .await?;

        if user_package.client_id != params.client_id {
            return Err(AppError::Validation(
                "The package does not belong to the booking client".into(),
            ));
        }
        if !user_package.is_active {
            return Err(AppError::Validation("The package is no longer active".into()));
        }
        if user_package.is_expired(Utc::now()) {
            return Err(AppError::Validation("The package has expired".into()));
        }

        let definition = self
            .package_repo
            .find_definition(&user_package.package_definition_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Package definition not found".into()))?;

        if params.booking_type == BookingType::Group {
            match definition.max_group_size {
                None => {
                    return Err(AppError::InvalidGroupSize(
                        "The package does not allow group sessions".into(),
                    ))
                }
                Some(max) if group_size > max => {
                    return Err(AppError::InvalidGroupSize(format!(
                        "Group size {} exceeds the package maximum of {}",
                        group_size, max
                    )))
                }
                Some(_) => {}
            }
        }

        // Friendly pre-checks. The transactional guards in the repository
        // are the authority under concurrency.
        if slot.booked_count + group_size > slot.capacity {
            return Err(AppError::SlotFull(format!(
                "The slot has {} of {} seats taken",
                slot.booked_count, slot.capacity
            )));
        }
        if user_package.remaining(pool) < 1 {
            return Err(AppError::InsufficientSessions(
                "No sessions remaining in the package".into(),
            ));
        }

        let status = match &params.payment_method {
            Some(method) if !self.payment_policy.requires_confirmation(method).await? => {
                BookingStatus::Confirmed
            }
            _ => BookingStatus::Pending,
        };

        let quote = self
            .pricing
            .resolve(&definition.id, params.currency_code.as_deref())
            .await?;

        let discount = params.discount_amount.unwrap_or(0);
        if discount < 0 || discount > quote.amount {
            return Err(AppError::Validation(
                "Discount must be between zero and the total amount".into(),
            ));
        }

        let booking = Booking::new(NewBookingParams {
            client_id: params.client_id,
            schedule_slot_id: params.schedule_slot_id,
            user_package_id: user_package.id.clone(),
            booking_type: params.booking_type,
            group_size,
            status,
            payment_method: params.payment_method,
            notes: params.notes,
            total_amount: quote.amount,
            discount_amount: discount,
            currency_code: quote.currency_code,
        });

        let created = self.booking_repo.create_reserved(&booking).await?;
        info!(
            booking_id = %created.id,
            slot_id = %created.schedule_slot_id,
            status = %created.status,
            "booking created"
        );
        Ok(created)
    }

    async fn resolve_user_package(
        &self,
        params: &CreateBookingParams,
        pool: SessionPool,
    ) -> Result<UserPackage, AppError> {
        if let Some(id) = &params.user_package_id {
            return self
                .user_package_repo
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::NotFound("User package not found".into()));
        }

        let auto_assign = match &params.payment_method {
            Some(method) => self.payment_policy.auto_assign_package(method).await?,
            None => false,
        };
        if !auto_assign {
            return Err(AppError::Validation(
                "user_package_id is required for this payment method".into(),
            ));
        }

        self.user_package_repo
            .find_auto_assignable(&params.client_id, pool)
            .await?
            .ok_or_else(|| {
                AppError::InsufficientSessions(
                    "No active package with remaining sessions to assign".into(),
                )
            })
    }

    pub async fn update_status(
        &self,
        booking_id: &str,
        new_status: BookingStatus,
        reason: Option<String>,
    ) -> Result<Booking, AppError> {
        let mut booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        let from = booking.status;
        if !from.can_transition(new_status) {
            return Err(AppError::InvalidTransition(
                from.to_string(),
                new_status.to_string(),
            ));
        }

        // Leaving an active state for cancelled/no-show gives the seats and
        // the reserved session back; completing does not.
        let release = from.is_active()
            && matches!(new_status, BookingStatus::Cancelled | BookingStatus::NoShow);

        booking.status = new_status;
        if new_status == BookingStatus::Cancelled {
            booking.cancelled_at = Some(Utc::now());
            booking.cancelled_reason = reason;
        }

        let updated = self.booking_repo.transition(&booking, from, release).await?;
        info!(booking_id = %updated.id, status = %updated.status, "booking status updated");
        Ok(updated)
    }

    /// Deletion applies cancellation side effects exactly once: an active
    /// booking releases its seats and session, a terminal one releases
    /// nothing further.
    pub async fn delete_booking(&self, booking_id: &str) -> Result<(), AppError> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        self.booking_repo.delete(&booking).await?;
        info!(booking_id = %booking.id, "booking deleted");
        Ok(())
    }
}
