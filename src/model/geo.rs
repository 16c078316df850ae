use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// WGS-84 coordinate pair as reported by a device GPS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    #[schema(example = json!(-7.740165594931652))]
    pub latitude: f64,
    #[schema(example = 110.35828466491625)]
    pub longitude: f64,
}
