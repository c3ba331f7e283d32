use super::user_package::SessionPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow)
    }

    /// Active bookings occupy slot seats and hold reserved sessions.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Legal edges:
    /// pending -> confirmed -> completed; pending|confirmed -> cancelled;
    /// pending|confirmed -> no-show.
    pub fn can_transition(self, to: BookingStatus) -> bool {
        match (self, to) {
            (BookingStatus::Pending, BookingStatus::Confirmed) => true,
            (BookingStatus::Pending, BookingStatus::Cancelled) => true,
            (BookingStatus::Pending, BookingStatus::NoShow) => true,
            (BookingStatus::Confirmed, BookingStatus::Completed) => true,
            (BookingStatus::Confirmed, BookingStatus::Cancelled) => true,
            (BookingStatus::Confirmed, BookingStatus::NoShow) => true,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no-show",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingType {
    Individual,
    Group,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub client_id: String,
    pub schedule_slot_id: String,
    pub user_package_id: String,
    pub booking_type: BookingType,
    pub group_size: i32,
    pub status: BookingStatus,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    /// Price snapshot taken at booking time, in minor units of
    /// `currency_code`. Never recomputed.
    pub total_amount: i64,
    pub discount_amount: i64,
    pub final_amount: i64,
    pub currency_code: String,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub client_id: String,
    pub schedule_slot_id: String,
    pub user_package_id: String,
    pub booking_type: BookingType,
    pub group_size: i32,
    pub status: BookingStatus,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub total_amount: i64,
    pub discount_amount: i64,
    pub currency_code: String,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_id: params.client_id,
            schedule_slot_id: params.schedule_slot_id,
            user_package_id: params.user_package_id,
            booking_type: params.booking_type,
            group_size: params.group_size,
            status: params.status,
            payment_method: params.payment_method,
            notes: params.notes,
            total_amount: params.total_amount,
            discount_amount: params.discount_amount,
            final_amount: params.total_amount - params.discount_amount,
            currency_code: params.currency_code,
            cancelled_at: None,
            cancelled_reason: None,
            created_at: Utc::now(),
        }
    }

    /// Slot capacity consumed by this booking: 1 seat for an individual
    /// session, one per attendee for a group session.
    pub fn occupied_seats(&self) -> i32 {
        match self.booking_type {
            BookingType::Individual => 1,
            BookingType::Group => self.group_size,
        }
    }

    pub fn session_pool(&self) -> SessionPool {
        match self.booking_type {
            BookingType::Individual => SessionPool::Individual,
            BookingType::Group => SessionPool::Group,
        }
    }

    /// Sessions debited from the pool. A group booking consumes one group
    /// session regardless of its size; seats and sessions are different
    /// units.
    pub fn reserved_sessions(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_transitions() {
        assert!(BookingStatus::Pending.can_transition(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition(BookingStatus::Cancelled));
        assert!(BookingStatus::Pending.can_transition(BookingStatus::NoShow));
        assert!(BookingStatus::Confirmed.can_transition(BookingStatus::Completed));
        assert!(BookingStatus::Confirmed.can_transition(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition(BookingStatus::NoShow));
    }

    #[test]
    fn terminal_states_are_frozen() {
        for terminal in [BookingStatus::Completed, BookingStatus::Cancelled, BookingStatus::NoShow] {
            for target in [
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::Completed,
                BookingStatus::Cancelled,
                BookingStatus::NoShow,
            ] {
                assert!(!terminal.can_transition(target), "{} -> {}", terminal, target);
            }
        }
    }

    #[test]
    fn pending_cannot_skip_to_completed() {
        assert!(!BookingStatus::Pending.can_transition(BookingStatus::Completed));
        assert!(!BookingStatus::Confirmed.can_transition(BookingStatus::Pending));
        assert!(!BookingStatus::Pending.can_transition(BookingStatus::Pending));
    }

    #[test]
    fn wire_form_uses_kebab_case() {
        assert_eq!(serde_json::to_string(&BookingStatus::NoShow).unwrap(), "\"no-show\"");
        assert_eq!(BookingStatus::NoShow.to_string(), "no-show");
    }
}
