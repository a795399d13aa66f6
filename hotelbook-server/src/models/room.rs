//! Room type, room and amenity input validation

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{optional_text, positive_id, required_text};
use super::ValidationError;

const MAX_TYPE_NAME_LEN: usize = 50;
const MAX_ROOM_NUMBER_LEN: usize = 10;
const MAX_SHORT_TEXT_LEN: usize = 50;
const MAX_FEATURES_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_OCCUPANCY: i32 = 20;
const MAX_PRICE: f64 = 100_000.0;

/// Operational state of a room
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RoomStatus {
    #[default]
    Available,
    Occupied,
    UnderMaintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Occupied => "Occupied",
            Self::UnderMaintenance => "UnderMaintenance",
        }
    }
}

impl FromStr for RoomStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(Self::Available),
            "Occupied" => Ok(Self::Occupied),
            "UnderMaintenance" => Ok(Self::UnderMaintenance),
            other => Err(ValidationError::InvalidVariant {
                field: "Status",
                value: other.to_owned(),
            }),
        }
    }
}

/// Validated room type fields
#[derive(Debug, Clone, PartialEq)]
pub struct RoomTypeInput {
    pub type_name: String,
    pub accessibility_features: String,
    pub description: String,
    pub is_active: bool,
}

impl RoomTypeInput {
    pub fn new(
        type_name: &str,
        accessibility_features: Option<&str>,
        description: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            type_name: required_text("TypeName", type_name, MAX_TYPE_NAME_LEN)?,
            accessibility_features: optional_text(
                "AccessibilityFeatures",
                accessibility_features,
                MAX_FEATURES_LEN,
            )?,
            description: optional_text("Description", description, MAX_DESCRIPTION_LEN)?,
            is_active: is_active.unwrap_or(true),
        })
    }
}

/// Validated room fields
#[derive(Debug, Clone, PartialEq)]
pub struct RoomInput {
    pub room_number: String,
    pub room_type_id: i32,
    pub price: f64,
    pub bed_type: String,
    pub view_type: String,
    pub max_occupancy: i32,
    pub status: RoomStatus,
    pub is_active: bool,
}

/// Raw room fields as received, before validation
#[derive(Debug, Clone, Default)]
pub struct RoomFields<'a> {
    pub room_number: &'a str,
    pub room_type_id: i32,
    pub price: f64,
    pub bed_type: &'a str,
    pub view_type: Option<&'a str>,
    pub max_occupancy: i32,
    pub status: Option<RoomStatus>,
    pub is_active: Option<bool>,
}

impl RoomInput {
    pub fn new(fields: RoomFields<'_>) -> Result<Self, ValidationError> {
        Ok(Self {
            room_number: required_text("RoomNumber", fields.room_number, MAX_ROOM_NUMBER_LEN)?,
            room_type_id: positive_id("RoomTypeID", fields.room_type_id)?,
            price: validate_price("Price", fields.price)?,
            bed_type: required_text("BedType", fields.bed_type, MAX_SHORT_TEXT_LEN)?,
            view_type: optional_text("ViewType", fields.view_type, MAX_SHORT_TEXT_LEN)?,
            max_occupancy: validate_occupancy(fields.max_occupancy)?,
            status: fields.status.unwrap_or_default(),
            is_active: fields.is_active.unwrap_or(true),
        })
    }
}

/// Validated amenity fields
#[derive(Debug, Clone, PartialEq)]
pub struct AmenityInput {
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

impl AmenityInput {
    pub fn new(
        name: &str,
        description: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_text("Name", name, MAX_SHORT_TEXT_LEN)?,
            description: optional_text("Description", description, MAX_FEATURES_LEN)?,
            is_active: is_active.unwrap_or(true),
        })
    }
}

/// Price per night: finite, positive, bounded.
pub fn validate_price(field: &'static str, price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() || price <= 0.0 || price > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field,
            reason: format!("must be greater than 0 and at most {}", MAX_PRICE),
        });
    }
    Ok(price)
}

fn validate_occupancy(n: i32) -> Result<i32, ValidationError> {
    if !(1..=MAX_OCCUPANCY).contains(&n) {
        return Err(ValidationError::OutOfRange {
            field: "MaxOccupancy",
            reason: format!("must be between 1 and {}", MAX_OCCUPANCY),
        });
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite<'a>() -> RoomFields<'a> {
        RoomFields {
            room_number: "701",
            room_type_id: 3,
            price: 249.5,
            bed_type: "King",
            view_type: Some("Sea"),
            max_occupancy: 2,
            ..Default::default()
        }
    }

    #[test]
    fn room_defaults_to_available_and_active() {
        let room = RoomInput::new(suite()).unwrap();
        assert_eq!(room.status, RoomStatus::Available);
        assert!(room.is_active);
        assert_eq!(room.view_type, "Sea");
    }

    #[test]
    fn rejects_non_positive_or_nan_price() {
        for price in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = RoomInput::new(RoomFields { price, ..suite() }).unwrap_err();
            assert!(matches!(err, ValidationError::OutOfRange { field: "Price", .. }));
        }
    }

    #[test]
    fn rejects_occupancy_out_of_bounds() {
        assert!(RoomInput::new(RoomFields { max_occupancy: 0, ..suite() }).is_err());
        assert!(RoomInput::new(RoomFields { max_occupancy: 21, ..suite() }).is_err());
    }

    #[test]
    fn rejects_unknown_room_type_id() {
        let err = RoomInput::new(RoomFields { room_type_id: 0, ..suite() }).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "RoomTypeID", .. }));
    }

    #[test]
    fn status_parses_exact_names() {
        assert_eq!(
            "UnderMaintenance".parse::<RoomStatus>().unwrap(),
            RoomStatus::UnderMaintenance
        );
        assert!("under maintenance".parse::<RoomStatus>().is_err());
    }

    #[test]
    fn room_type_requires_name() {
        assert!(matches!(
            RoomTypeInput::new(" ", None, None, None).unwrap_err(),
            ValidationError::Empty { field: "TypeName" }
        ));
        let rt = RoomTypeInput::new("Suite", Some("Wheelchair ramp"), None, None).unwrap();
        assert_eq!(rt.description, "");
    }

    #[test]
    fn amenity_name_bounded() {
        let long = "x".repeat(51);
        assert!(matches!(
            AmenityInput::new(&long, None, None).unwrap_err(),
            ValidationError::TooLong { max: 50, .. }
        ));
    }
}
