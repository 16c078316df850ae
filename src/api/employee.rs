use crate::auth::auth::AuthUser;
use crate::model::role::Role;
use crate::model::user::User;
use crate::store::{AttendanceStore, RefreshTokenStore, UserStore, users};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "dewi.lestari")]
    pub username: String,
    pub password: String,
    #[schema(example = "Dewi Lestari")]
    pub full_name: String,
    #[schema(example = "dewi@lestari.co.id", format = "email")]
    pub email: String,
    #[schema(example = "Account Executive")]
    pub job_title: String,
    #[schema(example = "Sales")]
    pub department: String,
    /// 1 = admin, 2 = employee; defaults to employee
    pub role_id: Option<u8>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub role_id: Option<u8>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeQuery {
    /// Pass "employee" to exclude admin accounts
    pub role: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeResponse {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub job_title: String,
    pub department: String,
    pub role_id: u8,
}

impl From<User> for EmployeeResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            job_title: user.job_title,
            department: user.department,
            role_id: user.role_id,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<EmployeeResponse>,
    #[schema(example = 4)]
    pub total: usize,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Missing fields or bad role"),
        (status = 409, description = "Username already exists"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    store: web::Data<UserStore>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payload = payload.into_inner();
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Username and password must not be empty"
        })));
    }

    let role_id = payload.role_id.unwrap_or(Role::Employee.id());
    if Role::from_id(role_id).is_none() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Unknown role"
        })));
    }

    let created = store.create(users::NewUser {
        username: payload.username.trim().to_string(),
        password: payload.password,
        full_name: payload.full_name,
        email: payload.email,
        job_title: payload.job_title,
        department: payload.department,
        role_id,
    });

    match created {
        Some(user) => {
            info!(user_id = %user.id, username = %user.username, "Employee created");
            Ok(HttpResponse::Created().json(EmployeeResponse::from(user)))
        }
        None => Ok(HttpResponse::Conflict().json(json!({
            "error": "Username already exists"
        }))),
    }
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/employees",
    params(
        ("role" = Option<String>, Query, description = "Pass \"employee\" to exclude admins")
    ),
    responses(
        (status = 200, description = "Employee list", body = EmployeeListResponse),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    store: web::Data<UserStore>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let employees_only = query.role.as_deref() == Some("employee");
    let data: Vec<EmployeeResponse> = store
        .list(employees_only)
        .into_iter()
        .map(EmployeeResponse::from)
        .collect();

    let total = data.len();
    Ok(HttpResponse::Ok().json(EmployeeListResponse { data, total }))
}

/// Get one employee
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Employee profile", body = EmployeeResponse),
        (status = 404, description = "Not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    store: web::Data<UserStore>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();
    // employees may read their own profile; everything else is admin only
    if auth.user_id != id {
        auth.require_admin()?;
    }

    match store.lookup(&id) {
        Some(user) => Ok(HttpResponse::Ok().json(EmployeeResponse::from(user))),
        None => Ok(HttpResponse::NotFound().json(json!({ "error": "User not found" }))),
    }
}

/// Update employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(
        ("id" = String, Path, description = "User id")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 404, description = "Not found"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    store: web::Data<UserStore>,
    path: web::Path<String>,
    payload: web::Json<UpdateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payload = payload.into_inner();
    if let Some(role_id) = payload.role_id {
        if Role::from_id(role_id).is_none() {
            return Ok(HttpResponse::BadRequest().json(json!({ "error": "Unknown role" })));
        }
    }

    let updated = store.update(
        &path.into_inner(),
        users::UserUpdate {
            full_name: payload.full_name,
            email: payload.email,
            job_title: payload.job_title,
            department: payload.department,
            role_id: payload.role_id,
            password: payload.password,
        },
    );

    match updated {
        Some(user) => {
            info!(user_id = %user.id, "Employee updated");
            Ok(HttpResponse::Ok().json(EmployeeResponse::from(user)))
        }
        None => Ok(HttpResponse::NotFound().json(json!({ "error": "User not found" }))),
    }
}

/// Delete employee. Cascades: attendance records and refresh tokens go too.
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id" = String, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 404, description = "Not found"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    store: web::Data<UserStore>,
    attendance: web::Data<AttendanceStore>,
    tokens: web::Data<RefreshTokenStore>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();
    if !store.delete(&id) {
        return Ok(HttpResponse::NotFound().json(json!({ "error": "User not found" })));
    }

    let removed = attendance.remove_user(&id);
    tokens.revoke_all_for_user(&id);

    info!(user_id = %id, removed_records = removed, "Employee deleted");

    Ok(HttpResponse::Ok().json(json!({ "message": "Employee deleted" })))
}
