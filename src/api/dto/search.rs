//! DTO for the place search endpoint.

use serde::Deserialize;

use crate::application::services::PlaceFilter;

/// Request body for `POST /api/v1/places_search`.
///
/// Every list is optional; `null` and `[]` both mean "no filter". Other keys
/// are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PlacesSearchRequest {
    #[serde(default)]
    pub states: Option<Vec<String>>,
    #[serde(default)]
    pub cities: Option<Vec<String>>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
}

impl From<PlacesSearchRequest> for PlaceFilter {
    fn from(r: PlacesSearchRequest) -> Self {
        PlaceFilter {
            states: r.states.unwrap_or_default(),
            cities: r.cities.unwrap_or_default(),
            amenities: r.amenities.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_is_empty_filter() {
        let req: PlacesSearchRequest = serde_json::from_value(json!({})).unwrap();
        assert!(PlaceFilter::from(req).is_empty());
    }

    #[test]
    fn test_null_and_empty_lists_are_no_filter() {
        let req: PlacesSearchRequest = serde_json::from_value(json!({
            "states": null,
            "cities": [],
            "extra": "ignored"
        }))
        .unwrap();
        assert!(PlaceFilter::from(req).is_empty());
    }

    #[test]
    fn test_lists_are_kept() {
        let req: PlacesSearchRequest =
            serde_json::from_value(json!({"states": ["s1"], "amenities": ["a1", "a2"]})).unwrap();
        let filter = PlaceFilter::from(req);

        assert_eq!(filter.states, vec!["s1"]);
        assert!(filter.cities.is_empty());
        assert_eq!(filter.amenities, vec!["a1", "a2"]);
    }

    #[test]
    fn test_non_string_ids_rejected() {
        let res = serde_json::from_value::<PlacesSearchRequest>(json!({"states": [1, 2]}));
        assert!(res.is_err());
    }
}
