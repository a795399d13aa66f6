//! Read-only projections returned across the API boundary
//!
//! DTOs are shaped for callers, not for tables: they never flow back into
//! write paths. Keys serialize exactly as declared (PascalCase, `ID` suffix).

pub mod hotel_search;

pub use hotel_search::{AmenitySearchDto, RoomDetailsDto, RoomSearchDto, RoomTypeSearchDto};
