//! Route handlers organized by resource

pub mod health;
pub mod users;
pub mod room_types;
pub mod rooms;
pub mod amenities;
pub mod room_amenities;
pub mod hotel_search;
pub mod reservations;
pub mod cancellations;

use serde::Deserialize;
use utoipa::IntoParams;

/// `IsActive` list filter shared by catalog resources
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
#[into_params(parameter_in = Query)]
pub struct ActiveQuery {
    pub is_active: Option<bool>,
}
