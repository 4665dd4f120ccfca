//! MazeMap search client
//!
//! One GET per room query against the public search endpoint. The response
//! carries GeoJSON geometry, so coordinates arrive as `[longitude, latitude]`.

use serde::Deserialize;
use std::time::Duration;

use crate::core::{Coordinates, LocationInfo};
use crate::error::LookupError;

use super::links::{google_maps_url, mazemap_poi_url};

const SEARCH_URL: &str = "https://search.mazemap.com/search/equery/";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

// No campus id filter: all campuses are searched, results near Perth rank first.
const BOOST_LNG: &str = "115.89582570734012";
const BOOST_LAT: &str = "-32.00742307052456";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<PlaceHit>,
}

/// One search result (only the fields we use)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaceHit {
    geometry: Option<Geometry>,
    z_value: Option<f64>,
    disp_bld_names: Option<BuildingNames>,
    poi_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct Geometry {
    coordinates: Vec<f64>,
}

/// `dispBldNames` is a list upstream but has been seen as a bare string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BuildingNames {
    One(String),
    Many(Vec<String>),
}

impl BuildingNames {
    fn first(&self) -> Option<&str> {
        match self {
            BuildingNames::One(name) => Some(name.as_str()),
            BuildingNames::Many(names) => names.first().map(String::as_str),
        }
    }
}

impl PlaceHit {
    /// Build a fully populated [`LocationInfo`], or `None` if any field is missing.
    pub(super) fn to_location(&self, room: &str) -> Option<LocationInfo> {
        let coordinates = match self.geometry.as_ref()?.coordinates.as_slice() {
            [lng, lat, ..] => Coordinates {
                lat: *lat,
                lng: *lng,
            },
            _ => return None,
        };
        let floor = self.z_value? as i32;
        let place_name = self.disp_bld_names.as_ref()?.first()?.trim();
        if place_name.is_empty() {
            return None;
        }
        let poi_id = self.poi_id?;

        Some(LocationInfo {
            place_name: place_name.to_string(),
            room: room.to_string(),
            floor,
            coordinates,
            map_url: google_maps_url(coordinates),
            campus_map_url: mazemap_poi_url(coordinates, floor, poi_id),
        })
    }
}

/// Search backend seam; the live client and test doubles implement it.
pub(crate) trait PlaceSearch {
    fn search(&self, query: &str) -> Result<Vec<PlaceHit>, LookupError>;
}

/// Blocking MazeMap client with a global request timeout
pub(crate) struct MazeMapSearch {
    agent: ureq::Agent,
}

impl MazeMapSearch {
    pub(crate) fn new() -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(LOOKUP_TIMEOUT))
            .build()
            .into();
        Self { agent }
    }
}

impl Default for MazeMapSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceSearch for MazeMapSearch {
    fn search(&self, query: &str) -> Result<Vec<PlaceHit>, LookupError> {
        let response = self
            .agent
            .get(SEARCH_URL)
            .query("q", query)
            .query("rows", "1")
            .query("start", "0")
            .query("withpois", "true")
            .query("withbuilding", "true")
            .query("withtype", "true")
            .query("withcampus", "true")
            .query("lng", BOOST_LNG)
            .query("lat", BOOST_LAT)
            .query("boostbydistance", "true")
            .call()?;

        let mut body = response.into_body();
        let parsed: SearchResponse = serde_json::from_reader(body.as_reader())?;
        Ok(parsed.result)
    }
}
