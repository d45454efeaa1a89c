use super::require_non_empty;
use crate::client::FlickrClient;
use crate::error::{FlickrError, Result};
use crate::params::{params, Params};
use crate::types::PlacesResponse;

/// Sub-client for `flickr.places.*`. None of these require authentication,
/// so requests go out unsigned.
pub struct Places<'a> {
    pub(crate) client: &'a FlickrClient,
}

impl<'a> Places<'a> {
    /// `flickr.places.find`: place IDs matching a free-text query.
    ///
    /// Not a geocoder; Flickr rounds up to the nearest place type that has
    /// an ID (a street address yields its city).
    pub fn find(&self, query: &str) -> Result<PlacesResponse> {
        require_non_empty("query", query)?;
        self.client.flickr_get_with(
            params([("method", "flickr.places.find"), ("query", query)]),
            false,
        )
    }

    /// `flickr.places.findByLatLon`: the place containing a coordinate.
    ///
    /// `accuracy` ranges from 1 (world) to 16 (street); Flickr defaults to 16.
    /// Coordinates are truncated to four decimal places.
    pub fn find_by_lat_lon(&self, lat: f64, lon: f64, accuracy: Option<u8>) -> Result<PlacesResponse> {
        check_range("latitude", lat, 90.0)?;
        check_range("longitude", lon, 180.0)?;

        let mut p = params([
            ("method", "flickr.places.findByLatLon".to_string()),
            ("lat", truncate_coordinate(lat)),
            ("lon", truncate_coordinate(lon)),
        ]);
        if let Some(accuracy) = accuracy {
            if !(1..=16).contains(&accuracy) {
                return Err(FlickrError::InvalidArgument(format!(
                    "accuracy must be between 1 and 16, got {accuracy}"
                )));
            }
            p.insert("accuracy".to_string(), accuracy.to_string());
        }
        self.client.flickr_get_with(p, false)
    }

    /// `flickr.places.getChildrenWithPhotosPublic`: child locations with
    /// public photos. One of `place_id` or `woe_id` is required.
    pub fn get_children_with_photos_public(
        &self,
        place_id: Option<&str>,
        woe_id: Option<&str>,
    ) -> Result<PlacesResponse> {
        let place_id = place_id.filter(|s| !s.trim().is_empty());
        let woe_id = woe_id.filter(|s| !s.trim().is_empty());
        if place_id.is_none() && woe_id.is_none() {
            return Err(FlickrError::InvalidArgument(
                "either place_id or woe_id is required".to_string(),
            ));
        }

        let mut p = Params::new();
        p.insert("method".to_string(), "flickr.places.getChildrenWithPhotosPublic".to_string());
        if let Some(place_id) = place_id {
            p.insert("place_id".to_string(), place_id.to_string());
        }
        if let Some(woe_id) = woe_id {
            p.insert("woe_id".to_string(), woe_id.to_string());
        }
        self.client.flickr_get_with(p, false)
    }
}

fn check_range(name: &str, value: f64, limit: f64) -> Result<()> {
    if !value.is_finite() || value.abs() > limit {
        return Err(FlickrError::InvalidArgument(format!(
            "{name} must be between -{limit} and {limit}, got {value}"
        )));
    }
    Ok(())
}

/// Keep at most four decimal places, without rounding.
fn truncate_coordinate(value: f64) -> String {
    let s = value.to_string();
    match s.find('.') {
        Some(dot) => s[..(dot + 5).min(s.len())].to_string(),
        None => s,
    }
}
