use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, test};
use chrono::{NaiveDate, NaiveTime};
use serde_json::{Value, json};

use presensi::clock::FixedClock;
use presensi::config::{Config, OfficeConfig};
use presensi::model::geo::GeoPoint;
use presensi::routes;
use presensi::store::{AttendanceStore, RefreshTokenStore, UserStore};

const OFFICE: GeoPoint = GeoPoint {
    latitude: -7.740165594931652,
    longitude: 110.35828466491625,
};

fn test_config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        jwt_secret: "test-secret".to_string(),
        access_token_ttl: 900,
        refresh_token_ttl: 604_800,
        rate_login_per_min: 60,
        rate_protected_per_min: 1000,
        api_prefix: "/api".to_string(),
        company_name: "PT Lestari Bumi Persada".to_string(),
        office: OfficeConfig {
            location: OFFICE,
            radius_meters: 100.0,
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            late_tolerance_minutes: 15,
        },
    }
}

fn peer() -> SocketAddr {
    "127.0.0.1:34567".parse().unwrap()
}

macro_rules! build_app {
    ($config:expr, $clock:expr) => {{
        let users = Data::new(UserStore::new());
        users.seed_demo_directory();
        let attendance = Data::new(AttendanceStore::new($config.office.clone(), $clock));
        let tokens = Data::new(RefreshTokenStore::new());
        let config_data = $config.clone();

        test::init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .app_data(users.clone())
                .app_data(attendance.clone())
                .app_data(tokens.clone())
                .app_data(Data::new($config.clone()))
                .configure(move |cfg| routes::configure(cfg, config_data.clone())),
        )
        .await
    }};
}

macro_rules! login {
    ($app:expr, $username:expr, $password:expr) => {{
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr(peer())
            .set_json(json!({ "username": $username, "password": $password }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body["access_token"]
            .as_str()
            .expect("login must return an access token")
            .to_string()
    }};
}

fn check_body(latitude: f64, longitude: f64) -> Value {
    json!({
        "latitude": latitude,
        "longitude": longitude,
        "photo": "data:image/jpeg;base64,dGVzdA=="
    })
}

fn morning_clock() -> Arc<FixedClock> {
    let at = NaiveDate::from_ymd_opt(2026, 8, 24)
        .unwrap()
        .and_hms_opt(8, 50, 0)
        .unwrap();
    Arc::new(FixedClock(at))
}

#[actix_web::test]
async fn check_in_and_out_round_trip() {
    let config = test_config();
    let app = build_app!(config, morning_clock());

    let token = login!(app, "budi.santoso", "budi123");

    // nothing recorded yet
    let req = test::TestRequest::get()
        .uri("/api/attendance/today")
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].is_null());

    // 08:50 inside the radius: present
    let req = test::TestRequest::post()
        .uri("/api/attendance/check-in")
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(check_body(OFFICE.latitude, OFFICE.longitude))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "present");
    assert!(body["data"]["check_out_time"].is_null());

    // checking in again the same day conflicts
    let req = test::TestRequest::post()
        .uri("/api/attendance/check-in")
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(check_body(OFFICE.latitude, OFFICE.longitude))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    // check-out completes the record, status untouched
    let req = test::TestRequest::post()
        .uri("/api/attendance/check-out")
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(check_body(OFFICE.latitude, OFFICE.longitude))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "present");
    assert!(!body["data"]["check_out_time"].is_null());

    // history now holds the single day
    let req = test::TestRequest::get()
        .uri("/api/attendance/history?limit=10")
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn out_of_range_check_in_is_rejected() {
    let config = test_config();
    let app = build_app!(config, morning_clock());

    let token = login!(app, "siti.rahayu", "siti123");

    // ~150 m north of the office
    let req = test::TestRequest::post()
        .uri("/api/attendance/check-in")
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(check_body(OFFICE.latitude + 150.0 / 111_320.0, OFFICE.longitude))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // no record was created
    let req = test::TestRequest::get()
        .uri("/api/attendance/today")
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].is_null());
}

#[actix_web::test]
async fn admin_stats_and_status_override() {
    let config = test_config();
    let app = build_app!(config, morning_clock());

    let employee = login!(app, "budi.santoso", "budi123");
    let admin = login!(app, "admin", "admin123");

    let req = test::TestRequest::post()
        .uri("/api/attendance/check-in")
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {employee}")))
        .set_json(check_body(OFFICE.latitude, OFFICE.longitude))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // stats are admin only
    let req = test::TestRequest::get()
        .uri("/api/attendance/stats?date=2026-08-24")
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {employee}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::get()
        .uri("/api/attendance/stats?date=2026-08-24")
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {admin}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["present"], 1);
    assert_eq!(body["late"], 0);
    assert_eq!(body["absent"], 2);

    // engine-derived statuses cannot be assigned manually
    let req = test::TestRequest::put()
        .uri("/api/attendance/status")
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {admin}")))
        .set_json(json!({ "user_id": "nobody", "date": "2026-08-24", "status": "late" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn protected_routes_require_a_token() {
    let config = test_config();
    let app = build_app!(config, morning_clock());

    let req = test::TestRequest::get()
        .uri("/api/attendance/today")
        .peer_addr(peer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .peer_addr(peer())
        .set_json(json!({ "username": "budi.santoso", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}
