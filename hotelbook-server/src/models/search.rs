//! Hotel search criteria
//!
//! Criteria are validated up front so the repository only has to turn each
//! present field into a SQL predicate.

use chrono::NaiveDate;

use super::reservation::StayDates;
use super::validation::optional_text;
use super::ValidationError;

const MAX_NAME_FILTER_LEN: usize = 50;
const MAX_AMENITY_FILTERS: usize = 20;
const MAX_GUESTS: i32 = 20;

/// Room type search filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomTypeCriteria {
    /// Case-insensitive substring of the type name
    pub type_name: Option<String>,
    /// Only room types that list accessibility features
    pub accessible_only: bool,
}

impl RoomTypeCriteria {
    pub fn new(type_name: Option<&str>, accessible: Option<bool>) -> Result<Self, ValidationError> {
        Ok(Self {
            type_name: non_empty(optional_text("TypeName", type_name, MAX_NAME_FILTER_LEN)?),
            accessible_only: accessible.unwrap_or(false),
        })
    }
}

/// Raw availability query fields
#[derive(Debug, Clone, Default)]
pub struct AvailabilityParams<'a> {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub room_type_name: Option<&'a str>,
    pub guests: Option<i32>,
    /// Comma-separated amenity IDs
    pub amenities: Option<&'a str>,
}

/// Validated availability search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityCriteria {
    pub stay: Option<StayDates>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub room_type_name: Option<String>,
    pub guests: Option<i32>,
    /// Deduplicated; the room type must offer every one
    pub amenity_ids: Vec<i32>,
}

impl AvailabilityCriteria {
    pub fn new(params: AvailabilityParams<'_>) -> Result<Self, ValidationError> {
        let min_price = params
            .min_price
            .map(|p| price_bound("MinPrice", p))
            .transpose()?;
        let max_price = params
            .max_price
            .map(|p| price_bound("MaxPrice", p))
            .transpose()?;

        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                return Err(ValidationError::OutOfRange {
                    field: "MinPrice",
                    reason: "cannot exceed MaxPrice".to_owned(),
                });
            }
        }

        if let Some(guests) = params.guests {
            if !(1..=MAX_GUESTS).contains(&guests) {
                return Err(ValidationError::OutOfRange {
                    field: "Guests",
                    reason: format!("must be between 1 and {}", MAX_GUESTS),
                });
            }
        }

        Ok(Self {
            stay: StayDates::from_optional(params.check_in, params.check_out)?,
            min_price,
            max_price,
            room_type_name: non_empty(optional_text(
                "RoomTypeName",
                params.room_type_name,
                MAX_NAME_FILTER_LEN,
            )?),
            guests: params.guests,
            amenity_ids: match params.amenities {
                Some(list) => parse_id_list("Amenities", list)?,
                None => Vec::new(),
            },
        })
    }
}

/// Price filter bound: any finite amount from 0 up.
fn price_bound(field: &'static str, price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::OutOfRange {
            field,
            reason: "must be a finite amount of at least 0".to_owned(),
        });
    }
    Ok(price)
}

/// Parse `"3, 1,3"` into `[1, 3]`.
pub fn parse_id_list(field: &'static str, list: &str) -> Result<Vec<i32>, ValidationError> {
    let mut ids = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id: i32 = part.parse().map_err(|_| ValidationError::InvalidFormat {
            field,
            reason: "must be a comma-separated list of positive integers",
        })?;
        if id <= 0 {
            return Err(ValidationError::InvalidFormat {
                field,
                reason: "must be a comma-separated list of positive integers",
            });
        }
        ids.push(id);
    }
    ids.sort_unstable();
    ids.dedup();

    if ids.len() > MAX_AMENITY_FILTERS {
        return Err(ValidationError::OutOfRange {
            field,
            reason: format!("at most {} ids", MAX_AMENITY_FILTERS),
        });
    }
    Ok(ids)
}

/// `%needle%` for ILIKE with `\`, `%` and `_` escaped.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_list_is_sorted_and_deduplicated() {
        assert_eq!(parse_id_list("Amenities", "3, 1,3,,").unwrap(), vec![1, 3]);
        assert!(parse_id_list("Amenities", "").unwrap().is_empty());
    }

    #[test]
    fn id_list_rejects_garbage() {
        assert!(parse_id_list("Amenities", "1,two").is_err());
        assert!(parse_id_list("Amenities", "0").is_err());
        assert!(parse_id_list("Amenities", "-4").is_err());
    }

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("suite"), "%suite%");
        assert_eq!(contains_pattern("100%_\\"), "%100\\%\\_\\\\%");
    }

    #[test]
    fn blank_filters_are_ignored() {
        let criteria = RoomTypeCriteria::new(Some("   "), None).unwrap();
        assert_eq!(criteria, RoomTypeCriteria::default());
    }

    #[test]
    fn price_range_must_be_ordered() {
        let err = AvailabilityCriteria::new(AvailabilityParams {
            min_price: Some(300.0),
            max_price: Some(100.0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "MinPrice", .. }));
    }

    #[test]
    fn zero_is_a_valid_price_bound() {
        let criteria = AvailabilityCriteria::new(AvailabilityParams {
            min_price: Some(0.0),
            max_price: Some(0.0),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(criteria.min_price, Some(0.0));

        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = AvailabilityCriteria::new(AvailabilityParams {
                max_price: Some(bad),
                ..Default::default()
            })
            .unwrap_err();
            assert!(matches!(err, ValidationError::OutOfRange { field: "MaxPrice", .. }));
        }
    }

    #[test]
    fn lone_check_in_is_rejected() {
        let err = AvailabilityCriteria::new(AvailabilityParams {
            check_in: NaiveDate::from_ymd_opt(2030, 1, 1),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "CheckOutDate" });
    }

    #[test]
    fn empty_params_mean_no_filters() {
        let criteria = AvailabilityCriteria::new(AvailabilityParams::default()).unwrap();
        assert_eq!(criteria, AvailabilityCriteria::default());
    }
}
