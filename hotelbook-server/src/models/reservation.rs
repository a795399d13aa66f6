//! Reservation rules: stay dates, cost, cancellability and refunds
//!
//! Everything here is pure so the day boundaries can be tested without a
//! database; repositories pass in `today`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{optional_text, positive_id};
use super::ValidationError;

/// Longest bookable stay
const MAX_NIGHTS: i64 = 30;
const MAX_GUESTS: i32 = 20;
const MAX_REASON_LEN: usize = 500;

/// Days before check-in that still earn a full refund
const FULL_REFUND_DAYS: i64 = 7;
/// Days before check-in that still earn a partial refund
const PARTIAL_REFUND_DAYS: i64 = 2;
const PARTIAL_REFUND_RATE: f64 = 0.5;

/// Lifecycle of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReservationStatus {
    Reserved,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserved => "Reserved",
            Self::CheckedIn => "CheckedIn",
            Self::CheckedOut => "CheckedOut",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Reserved" => Ok(Self::Reserved),
            "CheckedIn" => Ok(Self::CheckedIn),
            "CheckedOut" => Ok(Self::CheckedOut),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(ValidationError::InvalidVariant {
                field: "Status",
                value: other.to_owned(),
            }),
        }
    }
}

/// Half-open stay `[check_in, check_out)`, at least one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayDates {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, ValidationError> {
        if check_out <= check_in {
            return Err(ValidationError::OutOfRange {
                field: "CheckOutDate",
                reason: "must be after CheckInDate".to_owned(),
            });
        }
        let nights = (check_out - check_in).num_days();
        if nights > MAX_NIGHTS {
            return Err(ValidationError::OutOfRange {
                field: "CheckOutDate",
                reason: format!("stay cannot exceed {} nights", MAX_NIGHTS),
            });
        }
        Ok(Self { check_in, check_out })
    }

    /// Both dates or neither; a lone date is a validation error.
    pub fn from_optional(
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    ) -> Result<Option<Self>, ValidationError> {
        match (check_in, check_out) {
            (Some(a), Some(b)) => Self::new(a, b).map(Some),
            (None, None) => Ok(None),
            (None, Some(_)) => Err(ValidationError::Empty { field: "CheckInDate" }),
            (Some(_), None) => Err(ValidationError::Empty { field: "CheckOutDate" }),
        }
    }

    /// Reject stays that start before `today`.
    pub fn starting_from(self, today: NaiveDate) -> Result<Self, ValidationError> {
        if self.check_in < today {
            return Err(ValidationError::OutOfRange {
                field: "CheckInDate",
                reason: "cannot be in the past".to_owned(),
            });
        }
        Ok(self)
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Total cost for the stay at a nightly price, rounded to cents.
    pub fn cost(&self, price_per_night: f64) -> f64 {
        round_cents(price_per_night * self.nights() as f64)
    }
}

/// Validated reservation request
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationInput {
    pub user_id: i32,
    pub room_id: i32,
    pub stay: StayDates,
    pub guests: i32,
}

impl ReservationInput {
    pub fn new(
        user_id: i32,
        room_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: i32,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        if !(1..=MAX_GUESTS).contains(&guests) {
            return Err(ValidationError::OutOfRange {
                field: "NumberOfGuests",
                reason: format!("must be between 1 and {}", MAX_GUESTS),
            });
        }
        Ok(Self {
            user_id: positive_id("UserID", user_id)?,
            room_id: positive_id("RoomID", room_id)?,
            stay: StayDates::new(check_in, check_out)?.starting_from(today)?,
            guests,
        })
    }
}

/// Validated cancellation request
#[derive(Debug, Clone, PartialEq)]
pub struct CancellationInput {
    pub reservation_id: i32,
    pub reason: String,
}

impl CancellationInput {
    pub fn new(reservation_id: i32, reason: Option<&str>) -> Result<Self, ValidationError> {
        Ok(Self {
            reservation_id: positive_id("ReservationID", reservation_id)?,
            reason: optional_text("Reason", reason, MAX_REASON_LEN)?,
        })
    }
}

/// Why a reservation cannot be cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelRejection {
    AlreadyCancelled,
    StayStarted(ReservationStatus),
    CheckInPassed,
}

impl fmt::Display for CancelRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyCancelled => write!(f, "reservation is already cancelled"),
            Self::StayStarted(status) => {
                write!(f, "reservation cannot be cancelled once {}", status.as_str())
            }
            Self::CheckInPassed => {
                write!(f, "reservation cannot be cancelled on or after its check-in date")
            }
        }
    }
}

/// A reservation is cancellable while `Reserved` and before its check-in day.
pub fn check_cancellable(
    status: ReservationStatus,
    check_in: NaiveDate,
    today: NaiveDate,
) -> Result<(), CancelRejection> {
    match status {
        ReservationStatus::Cancelled => Err(CancelRejection::AlreadyCancelled),
        ReservationStatus::CheckedIn | ReservationStatus::CheckedOut => {
            Err(CancelRejection::StayStarted(status))
        }
        ReservationStatus::Reserved if check_in <= today => Err(CancelRejection::CheckInPassed),
        ReservationStatus::Reserved => Ok(()),
    }
}

/// Refund for a cancellation made on `today`.
///
/// - 7+ days ahead: full refund
/// - 2..=6 days ahead: half
/// - otherwise nothing
pub fn refund_amount(total_cost: f64, check_in: NaiveDate, today: NaiveDate) -> f64 {
    let days_ahead = (check_in - today).num_days();
    if days_ahead >= FULL_REFUND_DAYS {
        round_cents(total_cost)
    } else if days_ahead >= PARTIAL_REFUND_DAYS {
        round_cents(total_cost * PARTIAL_REFUND_RATE)
    } else {
        0.0
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, d).unwrap()
    }

    #[test]
    fn stay_requires_checkout_after_checkin() {
        assert!(StayDates::new(day(10), day(10)).is_err());
        assert!(StayDates::new(day(10), day(9)).is_err());
        assert_eq!(StayDates::new(day(10), day(13)).unwrap().nights(), 3);
    }

    #[test]
    fn stay_length_is_bounded() {
        let start = day(1);
        assert!(StayDates::new(start, start + chrono::Days::new(30)).is_ok());
        assert!(StayDates::new(start, start + chrono::Days::new(31)).is_err());
    }

    #[test]
    fn optional_dates_need_both() {
        assert_eq!(StayDates::from_optional(None, None).unwrap(), None);
        assert!(StayDates::from_optional(Some(day(1)), None).is_err());
        assert!(StayDates::from_optional(None, Some(day(2))).is_err());
        assert!(StayDates::from_optional(Some(day(1)), Some(day(2)))
            .unwrap()
            .is_some());
    }

    #[test]
    fn cost_is_nights_times_price() {
        let stay = StayDates::new(day(10), day(13)).unwrap();
        assert_eq!(stay.cost(99.99), 299.97);
    }

    #[test]
    fn reservation_cannot_start_in_past() {
        let err = ReservationInput::new(1, 1, day(9), day(11), 2, day(10)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "CheckInDate", .. }));
        assert!(ReservationInput::new(1, 1, day(10), day(11), 2, day(10)).is_ok());
    }

    #[test]
    fn reservation_guest_bounds() {
        assert!(ReservationInput::new(1, 1, day(10), day(11), 0, day(1)).is_err());
        assert!(ReservationInput::new(1, 1, day(10), day(11), 21, day(1)).is_err());
    }

    #[test]
    fn cancellable_only_before_check_in() {
        let status = ReservationStatus::Reserved;
        assert!(check_cancellable(status, day(11), day(10)).is_ok());
        assert_eq!(
            check_cancellable(status, day(10), day(10)),
            Err(CancelRejection::CheckInPassed)
        );
        assert_eq!(
            check_cancellable(status, day(5), day(10)),
            Err(CancelRejection::CheckInPassed)
        );
    }

    #[test]
    fn cancelled_or_started_stays_rejected() {
        assert_eq!(
            check_cancellable(ReservationStatus::Cancelled, day(20), day(10)),
            Err(CancelRejection::AlreadyCancelled)
        );
        assert!(matches!(
            check_cancellable(ReservationStatus::CheckedIn, day(20), day(10)),
            Err(CancelRejection::StayStarted(_))
        ));
    }

    #[test]
    fn refund_tiers_at_boundaries() {
        let check_in = day(20);
        assert_eq!(refund_amount(300.0, check_in, day(13)), 300.0); // 7 days
        assert_eq!(refund_amount(300.0, check_in, day(14)), 150.0); // 6 days
        assert_eq!(refund_amount(300.0, check_in, day(18)), 150.0); // 2 days
        assert_eq!(refund_amount(300.0, check_in, day(19)), 0.0); // 1 day
    }

    #[test]
    fn rejection_messages() {
        assert_eq!(
            CancelRejection::AlreadyCancelled.to_string(),
            "reservation is already cancelled"
        );
        assert_eq!(
            CancelRejection::StayStarted(ReservationStatus::CheckedOut).to_string(),
            "reservation cannot be cancelled once CheckedOut"
        );
    }
}
