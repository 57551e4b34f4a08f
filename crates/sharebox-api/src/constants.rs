//! API constants
//!
//! Handler path annotations for the OpenAPI document are literals and must be
//! kept in sync with [`API_PREFIX`].

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Current API version segment
pub const API_VERSION: &str = "v0";

/// Versioned prefix every session route is nested under
pub const API_PREFIX: &str = "/api/v0";

/// Path the OpenAPI document is served from
pub const OPENAPI_JSON_PATH: &str = "/api/openapi.json";
