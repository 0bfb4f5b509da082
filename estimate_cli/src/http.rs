//! HTTP-backed collaborators: BAN address search, Overpass building context,
//! Street View embed URLs.

use std::time::Duration;

use serde::Deserialize;

use estimate_core::errors::ServiceError;
use estimate_core::services::{
    AddressCandidate, AddressResolver, BuildingContext, ContextProvider, Coordinates, ImageryProvider, ImageryRef,
};

const BAN_URL: &str = "https://api-adresse.data.gouv.fr/search/";
const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
const STREETVIEW_URL: &str = "https://www.google.com/maps/embed/v1/streetview";

const ADDRESS_TIMEOUT: Duration = Duration::from_secs(5);
const CONTEXT_TIMEOUT: Duration = Duration::from_secs(25);

/// Buildings this close to the address are considered
const CONTEXT_RADIUS_M: u32 = 20;

/// Buildings completed before this year are flagged as period style
const PERIOD_STYLE_BEFORE_YEAR: i32 = 1914;

fn client(service: &str, timeout: Duration) -> Result<reqwest::blocking::Client, ServiceError> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("ravel/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ServiceError::NotConfigured {
            service: service.to_string(),
            reason: e.to_string(),
        })
}

fn transport_error(service: &str, e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout {
            service: service.to_string(),
        }
    } else if e.is_decode() || e.is_status() {
        ServiceError::BadResponse {
            service: service.to_string(),
            reason: e.to_string(),
        }
    } else {
        ServiceError::Unavailable {
            service: service.to_string(),
            reason: e.to_string(),
        }
    }
}

// ============================================================================
// Address search (Base Adresse Nationale)
// ============================================================================

#[derive(Debug, Deserialize)]
struct BanResponse {
    #[serde(default)]
    features: Vec<BanFeature>,
}

#[derive(Debug, Deserialize)]
struct BanFeature {
    #[serde(default)]
    properties: BanProperties,
    geometry: Option<BanGeometry>,
}

#[derive(Debug, Default, Deserialize)]
struct BanProperties {
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BanGeometry {
    /// GeoJSON order: longitude, latitude
    #[serde(default)]
    coordinates: Vec<f64>,
}

/// Candidates from a BAN GeoJSON body; features without a label or a
/// position are skipped.
fn parse_ban(body: &str) -> Result<Vec<AddressCandidate>, ServiceError> {
    let response: BanResponse = serde_json::from_str(body).map_err(|e| ServiceError::BadResponse {
        service: "address search".to_string(),
        reason: e.to_string(),
    })?;

    Ok(response
        .features
        .into_iter()
        .filter_map(|feature| {
            let label = feature.properties.label?;
            let coords = feature.geometry?.coordinates;
            match coords.as_slice() {
                [lon, lat, ..] => Some(AddressCandidate {
                    label,
                    coordinates: Coordinates::new(*lat, *lon),
                }),
                _ => None,
            }
        })
        .collect())
}

pub struct BanAddressResolver {
    limit: u32,
}

impl BanAddressResolver {
    pub fn new(limit: u32) -> Self {
        BanAddressResolver { limit }
    }
}

impl AddressResolver for BanAddressResolver {
    fn search(&self, query: &str) -> Result<Vec<AddressCandidate>, ServiceError> {
        let service = "address search";
        let limit = self.limit.to_string();
        let body = client(service, ADDRESS_TIMEOUT)?
            .get(BAN_URL)
            .query(&[("q", query), ("limit", limit.as_str()), ("autocomplete", "1")])
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| transport_error(service, e))?;
        parse_ban(&body)
    }
}

// ============================================================================
// Building context (OpenStreetMap via Overpass)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(default)]
    tags: std::collections::HashMap<String, String>,
}

fn overpass_query(at: Coordinates) -> String {
    format!(
        "[out:json][timeout:25];\n\
         (\n  way[\"building\"](around:{r},{lat},{lon});\n  relation[\"building\"](around:{r},{lat},{lon});\n);\n\
         out body;\n>;\nout skel qt;\n",
        r = CONTEXT_RADIUS_M,
        lat = at.latitude,
        lon = at.longitude
    )
}

/// Hints from the first tagged buildings in an Overpass body
fn parse_overpass(body: &str) -> Result<BuildingContext, ServiceError> {
    let response: OverpassResponse = serde_json::from_str(body).map_err(|e| ServiceError::BadResponse {
        service: "building context".to_string(),
        reason: e.to_string(),
    })?;

    let mut context = BuildingContext::default();
    let mut has_shop = false;

    for tags in response.elements.iter().map(|e| &e.tags).filter(|t| !t.is_empty()) {
        if context.level_count_hint.is_none() {
            context.level_count_hint = tags
                .get("building:levels")
                .or_else(|| tags.get("levels"))
                .and_then(|v| v.trim().parse::<i32>().ok())
                .filter(|n| *n > 0);
        }
        if tags.contains_key("shop") || tags.contains_key("building:use") {
            has_shop = true;
        }
        if context.period_style_suspected.is_none() {
            context.period_style_suspected = period_style_from_tags(tags);
        }
    }

    context.has_ground_floor_retail = Some(has_shop);
    Ok(context)
}

fn period_style_from_tags(tags: &std::collections::HashMap<String, String>) -> Option<bool> {
    if let Some(style) = tags.get("building:architecture") {
        return Some(style.to_lowercase().contains("haussmann"));
    }
    let year: i32 = tags.get("start_date")?.get(..4)?.parse().ok()?;
    Some(year < PERIOD_STYLE_BEFORE_YEAR)
}

pub struct OverpassContextProvider;

impl ContextProvider for OverpassContextProvider {
    fn lookup(&self, at: Coordinates) -> Result<BuildingContext, ServiceError> {
        let service = "building context";
        let body = client(service, CONTEXT_TIMEOUT)?
            .post(OVERPASS_URL)
            .body(overpass_query(at))
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| transport_error(service, e))?;
        parse_overpass(&body)
    }
}

// ============================================================================
// Street-level imagery (Google Street View embed)
// ============================================================================

pub struct StreetViewImagery {
    api_key: Option<String>,
    pitch_deg: f64,
    fov_deg: u32,
}

impl StreetViewImagery {
    pub fn new(api_key: Option<String>) -> Self {
        StreetViewImagery {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            pitch_deg: 10.0,
            fov_deg: 90,
        }
    }
}

impl ImageryProvider for StreetViewImagery {
    fn frame(&self, at: Coordinates, bearing_deg: Option<f64>) -> Result<ImageryRef, ServiceError> {
        let key = self.api_key.as_deref().ok_or_else(|| ServiceError::NotConfigured {
            service: "imagery".to_string(),
            reason: "no Street View API key".to_string(),
        })?;
        let mut url = format!(
            "{STREETVIEW_URL}?key={key}&location={},{}&fov={}&pitch={}",
            at.latitude, at.longitude, self.fov_deg, self.pitch_deg
        );
        if let Some(heading) = bearing_deg {
            url.push_str(&format!("&heading={heading}"));
        }
        Ok(ImageryRef { url, is_fallback: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ban_swaps_lon_lat() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                { "properties": { "label": "3 Rue Daval 75011 Paris" },
                  "geometry": { "type": "Point", "coordinates": [2.371, 48.855] } },
                { "properties": {}, "geometry": { "coordinates": [2.0, 48.0] } },
                { "properties": { "label": "No position" } }
            ]
        }"#;
        let candidates = parse_ban(body).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].coordinates.latitude, 48.855);
        assert_eq!(candidates[0].coordinates.longitude, 2.371);
    }

    #[test]
    fn test_parse_ban_rejects_garbage() {
        assert!(matches!(parse_ban("<html>"), Err(ServiceError::BadResponse { .. })));
    }

    #[test]
    fn test_parse_overpass() {
        let body = r#"{ "elements": [
            { "type": "node" },
            { "type": "way", "tags": { "building": "apartments", "building:levels": "6", "start_date": "1868" } },
            { "type": "way", "tags": { "building": "retail", "shop": "bakery", "building:levels": "2" } }
        ] }"#;
        let context = parse_overpass(body).unwrap();
        assert_eq!(context.level_count_hint, Some(6));
        assert_eq!(context.has_ground_floor_retail, Some(true));
        assert_eq!(context.period_style_suspected, Some(true));
    }

    #[test]
    fn test_parse_overpass_empty() {
        let context = parse_overpass(r#"{ "elements": [] }"#).unwrap();
        assert_eq!(context.level_count_hint, None);
        assert_eq!(context.has_ground_floor_retail, Some(false));
    }

    #[test]
    fn test_overpass_query_mentions_position() {
        let query = overpass_query(Coordinates::new(48.855, 2.371));
        assert!(query.contains("around:20,48.855,2.371"));
    }

    #[test]
    fn test_streetview_requires_key() {
        let at = Coordinates::new(48.855, 2.371);
        assert!(StreetViewImagery::new(None).frame(at, None).is_err());
        assert!(StreetViewImagery::new(Some("  ".to_string())).frame(at, None).is_err());

        let frame = StreetViewImagery::new(Some("k".to_string())).frame(at, Some(120.0)).unwrap();
        assert!(!frame.is_fallback);
        assert!(frame.url.contains("location=48.855,2.371"));
        assert!(frame.url.ends_with("&heading=120"));
    }
}
