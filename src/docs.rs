use crate::api::attendance::{
    AttendanceWithUser, CheckInRequest, DailyStats, SetStatusRequest, UserSummary,
};
use crate::api::employee::{
    CreateEmployee, EmployeeListResponse, EmployeeResponse, UpdateEmployee,
};
use crate::model::attendance::{AttendanceEvent, AttendanceStatus};
use crate::model::geo::GeoPoint;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Presensi API",
        version = "1.0.0",
        description = r#"
## Employee Attendance (Presensi) Service

Employees check in and out with a photo and a GPS coordinate validated
against the office geofence; admins manage the directory and read daily
records and stats.

### Key Features
- **Attendance**
  - Check-in/check-out with geofence validation and late detection
  - Daily records, personal history, dashboard stats, report ranges
- **Employee Management**
  - Create, update, list, and delete employee profiles

### Security
Protected endpoints use **JWT Bearer authentication**. Admin-only
operations require the admin role.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today,
        crate::api::attendance::history,
        crate::api::attendance::by_date,
        crate::api::attendance::stats,
        crate::api::attendance::range,
        crate::api::attendance::set_status,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee
    ),
    components(
        schemas(
            GeoPoint,
            AttendanceEvent,
            AttendanceStatus,
            AttendanceWithUser,
            UserSummary,
            CheckInRequest,
            SetStatusRequest,
            DailyStats,
            CreateEmployee,
            UpdateEmployee,
            EmployeeResponse,
            EmployeeListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Check-in/check-out and attendance queries"),
        (name = "Employee", description = "Employee directory management"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
