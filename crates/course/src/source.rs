//! Route documents: GeoJSON with a single `LineString` course.
//!
//! Accepted shapes:
//! - a bare `LineString` geometry,
//! - a `Feature` whose geometry is a `LineString`,
//! - a `FeatureCollection`; the first `LineString` feature is the course and
//!   any point features (aid stations, start pins) are ignored.
//!
//! Positions are `[lng, lat]` or `[lng, lat, ele]`; extra members are ignored.

use foundation::math::Coordinate;
use serde_json::Value;
use tracing::debug;

use crate::error::RouteSourceError;
use crate::route::Route;

pub fn parse_geojson_route(text: &str) -> Result<Route, RouteSourceError> {
    let doc: Value =
        serde_json::from_str(text).map_err(|e| RouteSourceError::InvalidJson(e.to_string()))?;
    route_from_geojson(&doc)
}

pub fn route_from_geojson(doc: &Value) -> Result<Route, RouteSourceError> {
    let route = match type_of(doc)? {
        "FeatureCollection" => {
            let features = doc
                .get("features")
                .and_then(Value::as_array)
                .ok_or(RouteSourceError::MissingGeometry)?;
            let line = features
                .iter()
                .filter_map(|f| f.get("geometry"))
                .find(|g| g.get("type").and_then(Value::as_str) == Some("LineString"))
                .ok_or(RouteSourceError::MissingGeometry)?;
            line_string(line)?
        }
        "Feature" => {
            let geometry = doc
                .get("geometry")
                .filter(|g| !g.is_null())
                .ok_or(RouteSourceError::MissingGeometry)?;
            geometry_route(geometry)?
        }
        _ => geometry_route(doc)?,
    };
    debug!(points = route.len(), "parsed route document");
    Ok(route)
}

fn type_of(v: &Value) -> Result<&str, RouteSourceError> {
    v.get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| RouteSourceError::InvalidJson("missing \"type\" member".to_string()))
}

fn geometry_route(geometry: &Value) -> Result<Route, RouteSourceError> {
    match type_of(geometry)? {
        "LineString" => line_string(geometry),
        other => Err(RouteSourceError::UnsupportedGeometry(other.to_string())),
    }
}

fn line_string(geometry: &Value) -> Result<Route, RouteSourceError> {
    let coords = geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .ok_or(RouteSourceError::MissingGeometry)?;
    coords
        .iter()
        .enumerate()
        .map(|(index, p)| position(p).ok_or(RouteSourceError::InvalidPosition { index }))
        .collect::<Result<Vec<_>, _>>()
        .map(Route::new)
}

fn position(p: &Value) -> Option<Coordinate> {
    let arr = p.as_array()?;
    if arr.len() < 2 {
        return None;
    }
    let lng = arr[0].as_f64()?;
    let lat = arr[1].as_f64()?;
    let ele = match arr.get(2) {
        None | Some(Value::Null) => 0.0,
        Some(v) => v.as_f64()?,
    };
    Some(Coordinate::new(lng, lat, ele))
}
