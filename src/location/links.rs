use crate::core::Coordinates;

/// Google Maps search link for a coordinate pair
pub(super) fn google_maps_url(at: Coordinates) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={}%2C{}",
        at.lat, at.lng
    )
}

/// MazeMap deep link that opens and highlights one POI.
/// POI ids are globally unique, so no campus id is needed.
pub(super) fn mazemap_poi_url(at: Coordinates, floor: i32, poi_id: i64) -> String {
    format!(
        "https://use.mazemap.com/#v=1&zlevel={floor}&center={},{}&zoom=18&sharepoitype=poi&sharepoi={poi_id}",
        at.lng, at.lat
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const AT: Coordinates = Coordinates {
        lat: -32.00742,
        lng: 115.89582,
    };

    #[test]
    fn google_link_is_lat_then_lng() {
        assert_eq!(
            google_maps_url(AT),
            "https://www.google.com/maps/search/?api=1&query=-32.00742%2C115.89582"
        );
    }

    #[test]
    fn mazemap_link_centers_lng_first() {
        let url = mazemap_poi_url(AT, 2, 99999);
        assert!(url.contains("zlevel=2"));
        assert!(url.contains("center=115.89582,-32.00742"));
        assert!(url.ends_with("sharepoi=99999"));
    }
}
