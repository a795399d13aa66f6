//! Hotel search projections

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::RoomStatus;

/// Room type as shown in search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RoomTypeSearchDto {
    #[serde(rename = "RoomTypeID")]
    pub room_type_id: i32,
    pub type_name: String,
    pub accessibility_features: String,
    pub description: String,
}

/// Amenity as shown in room details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct AmenitySearchDto {
    #[serde(rename = "AmenityID")]
    pub amenity_id: i32,
    pub name: String,
    pub description: String,
}

/// One available room with its type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RoomSearchDto {
    #[serde(rename = "RoomID")]
    pub room_id: i32,
    pub room_number: String,
    pub price: f64,
    pub bed_type: String,
    pub view_type: String,
    pub max_occupancy: i32,
    pub status: RoomStatus,
    pub room_type: RoomTypeSearchDto,
}

/// Room with its type and the type's amenities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RoomDetailsDto {
    #[serde(rename = "RoomID")]
    pub room_id: i32,
    pub room_number: String,
    pub price: f64,
    pub bed_type: String,
    pub view_type: String,
    pub max_occupancy: i32,
    pub status: RoomStatus,
    pub is_active: bool,
    pub room_type: RoomTypeSearchDto,
    pub amenities: Vec<AmenitySearchDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn suite() -> RoomTypeSearchDto {
        RoomTypeSearchDto {
            room_type_id: 1,
            type_name: "Suite".into(),
            accessibility_features: "Wheelchair ramp".into(),
            description: "Top floor".into(),
        }
    }

    #[test]
    fn room_type_keys_keep_declared_casing() {
        let value = serde_json::to_value(suite()).unwrap();
        assert_eq!(
            value,
            json!({
                "RoomTypeID": 1,
                "TypeName": "Suite",
                "AccessibilityFeatures": "Wheelchair ramp",
                "Description": "Top floor"
            })
        );
        assert!(value.get("roomTypeId").is_none());
        assert!(value.get("RoomTypeId").is_none());
    }

    #[test]
    fn room_type_parses_from_declared_casing() {
        let parsed: RoomTypeSearchDto = serde_json::from_value(json!({
            "RoomTypeID": 1,
            "TypeName": "Suite",
            "AccessibilityFeatures": "Wheelchair ramp",
            "Description": "Top floor"
        }))
        .unwrap();
        assert_eq!(parsed, suite());
    }

    #[test]
    fn nested_dtos_keep_casing() {
        let details = RoomDetailsDto {
            room_id: 7,
            room_number: "701".into(),
            price: 250.0,
            bed_type: "King".into(),
            view_type: "Sea".into(),
            max_occupancy: 2,
            status: RoomStatus::Available,
            is_active: true,
            room_type: suite(),
            amenities: vec![AmenitySearchDto {
                amenity_id: 3,
                name: "Minibar".into(),
                description: String::new(),
            }],
        };
        let value = serde_json::to_value(details).unwrap();
        assert_eq!(value["RoomID"], 7);
        assert_eq!(value["Status"], "Available");
        assert_eq!(value["RoomType"]["RoomTypeID"], 1);
        assert_eq!(value["Amenities"][0]["AmenityID"], 3);
        assert_eq!(value["MaxOccupancy"], 2);
    }
}
