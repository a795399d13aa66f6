//! OpenAPI document and Swagger UI
//!
//! Only merged into the router in the Development environment.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::routes::{
    amenities, cancellations, health, hotel_search, reservations, room_amenities, room_types,
    rooms, users,
};

/// Where the browser UI lives
pub const SWAGGER_PATH: &str = "/swagger";
/// Where the JSON document lives
pub const OPENAPI_JSON_PATH: &str = "/swagger/v1/swagger.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "Hotel Booking API", description = "Rooms, search, reservations and cancellations"),
    paths(
        health::health,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        room_types::list_room_types,
        room_types::get_room_type,
        room_types::create_room_type,
        room_types::update_room_type,
        room_types::set_room_type_active,
        room_types::delete_room_type,
        rooms::list_rooms,
        rooms::get_room,
        rooms::create_room,
        rooms::update_room,
        rooms::delete_room,
        amenities::list_amenities,
        amenities::get_amenity,
        amenities::create_amenity,
        amenities::update_amenity,
        amenities::delete_amenity,
        room_amenities::list_room_type_amenities,
        room_amenities::list_amenity_room_types,
        room_amenities::link_amenity,
        room_amenities::unlink_amenity,
        hotel_search::search_room_types,
        hotel_search::get_room_type,
        hotel_search::search_availability,
        hotel_search::get_room_details,
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::quote_reservation,
        cancellations::list_cancellations,
        cancellations::get_cancellation,
        cancellations::cancel_reservation,
    ),
    tags(
        (name = "users", description = "Guest and staff accounts"),
        (name = "room types", description = "Room categories"),
        (name = "rooms", description = "Physical rooms"),
        (name = "amenities", description = "Amenities offered by room types"),
        (name = "room amenities", description = "Room type and amenity links"),
        (name = "hotel search", description = "Read-only search projections"),
        (name = "reservations", description = "Bookings"),
        (name = "cancellations", description = "Cancelled bookings and refunds"),
    )
)]
pub struct ApiDoc;

/// Swagger UI at `/swagger`, JSON at `/swagger/v1/swagger.json`
pub fn swagger_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new(SWAGGER_PATH)
        .url(OPENAPI_JSON_PATH, ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/health",
            "/api/users/{id}",
            "/api/roomtypes/{id}/active",
            "/api/roomtypes/{id}/amenities/{amenity_id}",
            "/api/hotelsearch/availability",
            "/api/reservations/quote",
            "/api/cancellations",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn search_dto_schema_keeps_declared_casing() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("\"RoomTypeID\""));
        assert!(json.contains("\"AccessibilityFeatures\""));
    }
}
