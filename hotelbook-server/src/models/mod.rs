//! Domain models with validation at construction
//!
//! All request input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod user;
pub mod room;
pub mod reservation;
pub mod search;
pub mod pagination;

pub use validation::ValidationError;
pub use user::{Email, Role, UserInput};
pub use room::{AmenityInput, RoomFields, RoomInput, RoomStatus, RoomTypeInput};
pub use reservation::{
    check_cancellable, refund_amount, CancelRejection, CancellationInput, ReservationInput,
    ReservationStatus, StayDates,
};
pub use search::{AvailabilityCriteria, AvailabilityParams, RoomTypeCriteria};
pub use pagination::{Paginated, Pagination, PaginationParams};
