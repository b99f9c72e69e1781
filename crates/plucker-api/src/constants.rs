//! API constants

/// Prefix shared by every media browser route.
pub const API_PREFIX: &str = "/plucker";

/// Path of the served OpenAPI document.
pub const OPENAPI_PATH: &str = "/api/openapi.json";
