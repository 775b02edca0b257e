//! Delivery routes and their stops

use serde::{Deserialize, Serialize};

/// A route as returned by `/Routes`
///
/// `route_date` is a compact `YYYYMMDD` string; use
/// [`crate::util::parse_to_yyyymmdd`] to normalize user input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: i64,
    pub name: String,
    pub route_date: String,
    #[serde(default)]
    pub van_id: Option<i64>,
    #[serde(default)]
    pub van_name: Option<String>,
    #[serde(default)]
    pub driver_id: Option<i64>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub stops: Vec<RouteStop>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A stop on a route, visiting one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    #[serde(default)]
    pub id: Option<i64>,
    pub location_id: i64,
    #[serde(default)]
    pub location_name: Option<String>,
    pub sequence: u32,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub name: String,
    pub route_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub van_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<i64>,
    pub location_ids: Vec<i64>,
}
