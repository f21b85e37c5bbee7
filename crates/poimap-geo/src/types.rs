//! Map provider response types.
//!
//! The provider serializes most numeric fields as JSON strings (`"page": "1"`,
//! `"noorLat": "37.55"`) but occasionally as numbers. The `lenient_*` helpers
//! accept either and treat anything unparseable as absent.

use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// search (GET tmap/pois)
// ---------------------------------------------------------------------------

/// Top-level search body: `{ "searchPoiInfo": { ... } }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEnvelope {
    pub search_poi_info: SearchPoiInfo,
}

/// Paging metadata plus the records of one search page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPoiInfo {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub count: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub page: Option<u32>,
    #[serde(default)]
    pub pois: Pois,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pois {
    #[serde(default)]
    pub poi: Vec<PoiRecord>,
}

/// A single raw point-of-interest record.
///
/// Address parts follow the provider's administrative hierarchy:
/// province/city, district, neighborhood, detail, then the lot number
/// split into main (`firstNo`) and sub (`secondNo`) parts.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub noor_lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub noor_lon: Option<f64>,
    #[serde(default)]
    pub upper_addr_name: Option<String>,
    #[serde(default)]
    pub middle_addr_name: Option<String>,
    #[serde(default)]
    pub lower_addr_name: Option<String>,
    #[serde(default)]
    pub detail_addr_name: Option<String>,
    #[serde(default)]
    pub first_no: Option<String>,
    #[serde(default)]
    pub second_no: Option<String>,
}

// ---------------------------------------------------------------------------
// reverse geocoding (GET tmap/geo/reversegeocoding)
// ---------------------------------------------------------------------------

/// Top-level reverse-geocoding body: `{ "addressInfo": { ... } }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocodeEnvelope {
    pub address_info: AddressInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    #[serde(default)]
    pub full_address: Option<String>,
}

// ---------------------------------------------------------------------------
// error body
// ---------------------------------------------------------------------------

/// Error body the provider attaches to non-2xx responses:
/// `{ "error": { "id": "404", "category": "gw", "code": "...", "message": "..." } }`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(f64),
    Text(String),
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Lenient>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Lenient::Number(n)) => Some(n),
        Some(Lenient::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    }
    .filter(|n| n.is_finite()))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Lenient>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Lenient::Number(n)) => whole_u32(n),
        Some(Lenient::Text(s)) => s.trim().parse::<u32>().ok(),
        None => None,
    })
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn whole_u32(n: f64) -> Option<u32> {
    (n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&n)).then(|| n as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_envelope_accepts_string_numbers() {
        let body = serde_json::json!({
            "searchPoiInfo": {
                "totalCount": "42",
                "count": "1",
                "page": "2",
                "pois": { "poi": [{
                    "name": "Seoul Station",
                    "noorLat": "37.55467",
                    "noorLon": "126.97060",
                    "upperAddrName": "Seoul"
                }]}
            }
        });
        let env: SearchEnvelope = serde_json::from_value(body).unwrap();
        let info = env.search_poi_info;
        assert_eq!(info.total_count, Some(42));
        assert_eq!(info.page, Some(2));
        let poi = &info.pois.poi[0];
        assert_eq!(poi.name.as_deref(), Some("Seoul Station"));
        assert!((poi.noor_lat.unwrap() - 37.554_67).abs() < 1e-9);
    }

    #[test]
    fn search_envelope_accepts_native_numbers() {
        let body = serde_json::json!({
            "searchPoiInfo": {
                "totalCount": 3,
                "page": 1,
                "pois": { "poi": [{ "noorLat": 37.5, "noorLon": 127.0 }] }
            }
        });
        let env: SearchEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(env.search_poi_info.total_count, Some(3));
        assert_eq!(env.search_poi_info.pois.poi[0].noor_lon, Some(127.0));
        assert!(env.search_poi_info.pois.poi[0].name.is_none());
    }

    #[test]
    fn unparseable_coordinate_is_treated_as_absent() {
        let body = serde_json::json!({ "noorLat": "north", "noorLon": null });
        let poi: PoiRecord = serde_json::from_value(body).unwrap();
        assert!(poi.noor_lat.is_none());
        assert!(poi.noor_lon.is_none());
    }

    #[test]
    fn negative_page_is_treated_as_absent() {
        let body = serde_json::json!({ "page": -1 });
        let info: SearchPoiInfo = serde_json::from_value(body).unwrap();
        assert!(info.page.is_none());
    }

    #[test]
    fn missing_pois_defaults_to_empty() {
        let body = serde_json::json!({ "searchPoiInfo": { "page": "1" } });
        let env: SearchEnvelope = serde_json::from_value(body).unwrap();
        assert!(env.search_poi_info.pois.poi.is_empty());
    }

    #[test]
    fn reverse_geocode_envelope_requires_address_info() {
        let missing = serde_json::from_value::<ReverseGeocodeEnvelope>(serde_json::json!({}));
        assert!(missing.is_err());

        let no_address: ReverseGeocodeEnvelope =
            serde_json::from_value(serde_json::json!({ "addressInfo": {} })).unwrap();
        assert!(no_address.address_info.full_address.is_none());
    }
}
