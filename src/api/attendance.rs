use crate::auth::auth::AuthUser;
use crate::engine::error::AttendanceError;
use crate::model::attendance::{AttendanceEvent, AttendanceStatus};
use crate::model::geo::GeoPoint;
use crate::store::{AttendanceStore, UserStore};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = json!(-7.740165594931652))]
    pub latitude: f64,
    #[schema(example = 110.35828466491625)]
    pub longitude: f64,
    /// Camera capture, usually a base64 data URL
    pub photo: String,
}

impl CheckInRequest {
    fn location(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub full_name: String,
    pub job_title: String,
    pub department: String,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceWithUser {
    #[serde(flatten)]
    pub event: AttendanceEvent,
    pub user: Option<UserSummary>,
}

#[derive(Serialize, ToSchema)]
pub struct DailyStats {
    #[schema(example = 3)]
    pub total: usize,
    #[schema(example = 2)]
    pub present: usize,
    #[schema(example = 1)]
    pub late: usize,
    #[schema(example = 0)]
    pub absent: usize,
}

#[derive(Deserialize, ToSchema)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize, ToSchema)]
pub struct StatsQuery {
    #[schema(example = "2026-08-24", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct RangeQuery {
    #[schema(example = "2026-08-01", value_type = String, format = "date")]
    pub start: NaiveDate,
    #[schema(example = "2026-08-31", value_type = String, format = "date")]
    pub end: NaiveDate,
}

#[derive(Deserialize, ToSchema)]
pub struct SetStatusRequest {
    pub user_id: String,
    #[schema(example = "2026-08-24", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "sick")]
    pub status: AttendanceStatus,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully",
            "data": {}
        })),
        (status = 400, description = "Outside the office radius"),
        (status = 409, description = "Already checked in today"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    users: web::Data<UserStore>,
    attendance: web::Data<AttendanceStore>,
    payload: web::Json<CheckInRequest>,
) -> Result<HttpResponse, AttendanceError> {
    let user = users
        .lookup(&auth.user_id)
        .ok_or(AttendanceError::UnknownUser)?;

    let event = attendance.check_in(&user.id, payload.location(), payload.photo.clone())?;

    info!(user_id = %user.id, status = %event.status, "Checked in");

    let message = if event.status == AttendanceStatus::Late {
        "Checked in successfully, recorded as late"
    } else {
        "Checked in successfully"
    };

    Ok(HttpResponse::Ok().json(json!({
        "message": message,
        "data": event
    })))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked out successfully"),
        (status = 400, description = "Outside the office radius"),
        (status = 409, description = "Not checked in, or already checked out"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    users: web::Data<UserStore>,
    attendance: web::Data<AttendanceStore>,
    payload: web::Json<CheckInRequest>,
) -> Result<HttpResponse, AttendanceError> {
    let user = users
        .lookup(&auth.user_id)
        .ok_or(AttendanceError::UnknownUser)?;

    let event = attendance.check_out(&user.id, payload.location(), payload.photo.clone())?;

    info!(user_id = %user.id, "Checked out");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Checked out successfully",
        "data": event
    })))
}

/// Today's record for the caller, or null
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Today's attendance, null when absent", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today(auth: AuthUser, attendance: web::Data<AttendanceStore>) -> impl Responder {
    let event = attendance.today(&auth.user_id);
    HttpResponse::Ok().json(json!({ "data": event }))
}

/// The caller's attendance history, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/history",
    params(
        ("limit" = Option<usize>, Query, description = "Max records, default 30")
    ),
    responses(
        (status = 200, description = "Attendance history", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn history(
    auth: AuthUser,
    attendance: web::Data<AttendanceStore>,
    query: web::Query<HistoryQuery>,
) -> impl Responder {
    let events = attendance.history(&auth.user_id, query.limit.unwrap_or(30));
    HttpResponse::Ok().json(json!({ "data": events }))
}

fn with_users(events: Vec<AttendanceEvent>, users: &UserStore) -> Vec<AttendanceWithUser> {
    events
        .into_iter()
        .map(|event| {
            let user = users.lookup(&event.user_id).map(|u| UserSummary {
                id: u.id,
                full_name: u.full_name,
                job_title: u.job_title,
                department: u.department,
            });
            AttendanceWithUser { event, user }
        })
        .collect()
}

/// All records for one day, admin view
#[utoipa::path(
    get,
    path = "/api/attendance/date/{date}",
    params(
        ("date" = String, Path, description = "Calendar day")
    ),
    responses(
        (status = 200, description = "Records for the day with user data", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn by_date(
    auth: AuthUser,
    users: web::Data<UserStore>,
    attendance: web::Data<AttendanceStore>,
    path: web::Path<NaiveDate>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let events = attendance.by_date(path.into_inner());
    Ok(HttpResponse::Ok().json(json!({ "data": with_users(events, &users) })))
}

/// Daily dashboard stats, admin view
#[utoipa::path(
    get,
    path = "/api/attendance/stats",
    params(
        ("date" = Option<String>, Query, description = "Defaults to today")
    ),
    responses(
        (status = 200, description = "Counts for the day", body = DailyStats),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn stats(
    auth: AuthUser,
    users: web::Data<UserStore>,
    attendance: web::Data<AttendanceStore>,
    query: web::Query<StatsQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let date = query.date.unwrap_or_else(|| attendance.today_date());
    let total = users.employee_count();
    let (present, late) = attendance.status_counts(date);

    Ok(HttpResponse::Ok().json(DailyStats {
        total,
        present,
        late,
        absent: total.saturating_sub(present + late),
    }))
}

/// Records in a date range, admin view. Downstream report tooling consumes
/// this output; the service itself does no file formatting.
#[utoipa::path(
    get,
    path = "/api/attendance/range",
    params(
        ("start" = String, Query, description = "Range start, inclusive"),
        ("end" = String, Query, description = "Range end, inclusive")
    ),
    responses(
        (status = 200, description = "Records in the range with user data", body = Object),
        (status = 400, description = "start is after end"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn range(
    auth: AuthUser,
    users: web::Data<UserStore>,
    attendance: web::Data<AttendanceStore>,
    query: web::Query<RangeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if query.start > query.end {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "start must not be after end"
        })));
    }

    let events = attendance.range(query.start, query.end);
    Ok(HttpResponse::Ok().json(json!({ "data": with_users(events, &users) })))
}

/// Admin override: mark a user excused, sick or absent for a date
#[utoipa::path(
    put,
    path = "/api/attendance/status",
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status recorded", body = Object),
        (status = 400, description = "Status is not an administrative one"),
        (status = 404, description = "Unknown user"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn set_status(
    auth: AuthUser,
    users: web::Data<UserStore>,
    attendance: web::Data<AttendanceStore>,
    payload: web::Json<SetStatusRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if !payload.status.is_administrative() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Only excused, sick or absent can be assigned manually"
        })));
    }

    if users.lookup(&payload.user_id).is_none() {
        return Err(AttendanceError::UnknownUser.into());
    }

    let event =
        attendance.set_administrative_status(&payload.user_id, payload.date, payload.status);

    info!(user_id = %payload.user_id, status = %payload.status, date = %payload.date, "Status set by admin");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Status recorded",
        "data": event
    })))
}
