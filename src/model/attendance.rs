use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::model::geo::GeoPoint;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Late,
    Excused,
    Sick,
    Absent,
}

impl AttendanceStatus {
    /// Statuses an admin assigns by hand. The engine only ever derives
    /// `Present`/`Late` at check-in.
    pub fn is_administrative(self) -> bool {
        matches!(self, Self::Excused | Self::Sick | Self::Absent)
    }
}

/// One record per (user_id, date). Created by check-in (or an admin marking
/// excused/sick/absent), completed once by check-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceEvent {
    #[schema(example = "2026-08-24-7f3a")]
    pub id: String,
    pub user_id: String,
    #[schema(example = "2026-08-24", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "08:50:00", value_type = Option<String>)]
    pub check_in_time: Option<NaiveTime>,
    #[schema(example = "18:05:00", value_type = Option<String>)]
    pub check_out_time: Option<NaiveTime>,
    pub check_in_location: Option<GeoPoint>,
    pub check_out_location: Option<GeoPoint>,
    pub check_in_photo: Option<String>,
    pub check_out_photo: Option<String>,
    pub status: AttendanceStatus,
}
