use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::config::OfficeConfig;
use crate::engine::error::AttendanceError;
use crate::engine::{geofence, schedule};
use crate::model::attendance::{AttendanceEvent, AttendanceStatus};
use crate::model::geo::GeoPoint;

/// Owns every attendance record and the check-in/check-out transitions.
/// All reads go through its accessors; nothing else mutates the map.
///
/// The single mutex serializes the precondition-check-and-insert of check-in,
/// so two concurrent check-ins for the same (user, day) yield exactly one
/// record and one `AlreadyCheckedIn`.
pub struct AttendanceStore {
    office: OfficeConfig,
    clock: Arc<dyn Clock>,
    records: Mutex<HashMap<(String, NaiveDate), AttendanceEvent>>,
}

impl AttendanceStore {
    pub fn new(office: OfficeConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            office,
            clock,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn today_date(&self) -> NaiveDate {
        self.clock.now().date()
    }

    fn ensure_within_office(&self, location: GeoPoint) -> Result<(), AttendanceError> {
        if geofence::within_radius(location, self.office.location, self.office.radius_meters) {
            Ok(())
        } else {
            Err(AttendanceError::OutOfRange)
        }
    }

    /// First transition of the day: creates the record, deriving
    /// `present`/`late` from the work schedule. Fails without side effects.
    pub fn check_in(
        &self,
        user_id: &str,
        location: GeoPoint,
        photo: String,
    ) -> Result<AttendanceEvent, AttendanceError> {
        self.ensure_within_office(location)?;

        let now = self.clock.now();
        let date = now.date();

        let status = if schedule::is_late(
            now,
            self.office.work_start,
            self.office.late_tolerance_minutes,
        ) {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        };

        let mut records = self.records.lock().unwrap();
        let key = (user_id.to_string(), date);
        if records.contains_key(&key) {
            return Err(AttendanceError::AlreadyCheckedIn);
        }

        let event = AttendanceEvent {
            id: format!("{date}-{user_id}"),
            user_id: user_id.to_string(),
            date,
            check_in_time: Some(now.time()),
            check_out_time: None,
            check_in_location: Some(location),
            check_out_location: None,
            check_in_photo: Some(photo),
            check_out_photo: None,
            status,
        };
        records.insert(key, event.clone());
        Ok(event)
    }

    /// Closes today's record. Status is not recomputed here; whatever
    /// check-in derived stands.
    pub fn check_out(
        &self,
        user_id: &str,
        location: GeoPoint,
        photo: String,
    ) -> Result<AttendanceEvent, AttendanceError> {
        self.ensure_within_office(location)?;

        let now = self.clock.now();
        let key = (user_id.to_string(), now.date());

        let mut records = self.records.lock().unwrap();
        let event = records.get_mut(&key).ok_or(AttendanceError::NotCheckedIn)?;
        if event.check_out_time.is_some() {
            return Err(AttendanceError::AlreadyCheckedOut);
        }

        event.check_out_time = Some(now.time());
        event.check_out_location = Some(location);
        event.check_out_photo = Some(photo);
        Ok(event.clone())
    }

    pub fn today(&self, user_id: &str) -> Option<AttendanceEvent> {
        let key = (user_id.to_string(), self.clock.now().date());
        self.records.lock().unwrap().get(&key).cloned()
    }

    /// A user's records, newest first.
    pub fn history(&self, user_id: &str, limit: usize) -> Vec<AttendanceEvent> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<AttendanceEvent> = records
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        out.truncate(limit);
        out
    }

    pub fn by_date(&self, date: NaiveDate) -> Vec<AttendanceEvent> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<AttendanceEvent> = records
            .values()
            .filter(|e| e.date == date)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        out
    }

    /// Inclusive date range, newest first. Feeds report/export consumers.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> Vec<AttendanceEvent> {
        let records = self.records.lock().unwrap();
        let mut out: Vec<AttendanceEvent> = records
            .values()
            .filter(|e| e.date >= start && e.date <= end)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date).then(a.user_id.cmp(&b.user_id)));
        out
    }

    /// (present, late) counts for one day.
    pub fn status_counts(&self, date: NaiveDate) -> (usize, usize) {
        let records = self.records.lock().unwrap();
        let mut present = 0;
        let mut late = 0;
        for event in records.values().filter(|e| e.date == date) {
            match event.status {
                AttendanceStatus::Present => present += 1,
                AttendanceStatus::Late => late += 1,
                _ => {}
            }
        }
        (present, late)
    }

    /// Admin override: marks a user excused/sick/absent for a date. Creates a
    /// bare record when none exists; engine-derived statuses are not accepted
    /// here (callers guard with `is_administrative`).
    pub fn set_administrative_status(
        &self,
        user_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> AttendanceEvent {
        let mut records = self.records.lock().unwrap();
        let key = (user_id.to_string(), date);
        let event = records.entry(key).or_insert_with(|| AttendanceEvent {
            id: format!("{date}-{user_id}"),
            user_id: user_id.to_string(),
            date,
            check_in_time: None,
            check_out_time: None,
            check_in_location: None,
            check_out_location: None,
            check_in_photo: None,
            check_out_photo: None,
            status,
        });
        event.status = status;
        event.clone()
    }

    /// Cascade for user deletion.
    pub fn remove_user(&self, user_id: &str) -> usize {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|(uid, _), _| uid != user_id);
        before - records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{NaiveDateTime, NaiveTime};

    const OFFICE: GeoPoint = GeoPoint {
        latitude: -7.740165594931652,
        longitude: 110.35828466491625,
    };

    fn office_config() -> OfficeConfig {
        OfficeConfig {
            location: OFFICE,
            radius_meters: 100.0,
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            late_tolerance_minutes: 15,
        }
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 8, 24)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn store_at(h: u32, m: u32, s: u32) -> AttendanceStore {
        AttendanceStore::new(office_config(), Arc::new(FixedClock(at(h, m, s))))
    }

    fn photo() -> String {
        "data:image/jpeg;base64,xxxx".to_string()
    }

    #[test]
    fn check_in_before_cutoff_is_present() {
        let store = store_at(8, 50, 0);
        let event = store.check_in("budi", OFFICE, photo()).unwrap();

        assert_eq!(event.status, AttendanceStatus::Present);
        assert_eq!(event.check_in_time, Some(at(8, 50, 0).time()));
        assert!(event.check_out_time.is_none());
        assert_eq!(store.today("budi").unwrap().id, event.id);
    }

    #[test]
    fn check_in_at_cutoff_is_present_one_second_later_late() {
        let on_time = store_at(9, 15, 0).check_in("budi", OFFICE, photo()).unwrap();
        assert_eq!(on_time.status, AttendanceStatus::Present);

        let late = store_at(9, 15, 1).check_in("budi", OFFICE, photo()).unwrap();
        assert_eq!(late.status, AttendanceStatus::Late);
    }

    #[test]
    fn out_of_range_check_in_creates_nothing() {
        let store = store_at(8, 50, 0);
        // ~150 m north of the office, radius is 100 m
        let far = GeoPoint {
            latitude: OFFICE.latitude + 150.0 / 111_320.0,
            longitude: OFFICE.longitude,
        };

        assert_eq!(
            store.check_in("budi", far, photo()),
            Err(AttendanceError::OutOfRange)
        );
        assert!(store.today("budi").is_none());
    }

    #[test]
    fn second_check_in_same_day_is_rejected() {
        let store = store_at(8, 50, 0);
        store.check_in("budi", OFFICE, photo()).unwrap();

        assert_eq!(
            store.check_in("budi", OFFICE, photo()),
            Err(AttendanceError::AlreadyCheckedIn)
        );
        assert_eq!(store.history("budi", 30).len(), 1);
    }

    struct TestClock(Mutex<NaiveDateTime>);

    impl Clock for TestClock {
        fn now(&self) -> NaiveDateTime {
            *self.0.lock().unwrap()
        }
    }

    #[test]
    fn check_out_completes_the_record_and_keeps_status() {
        let clock = Arc::new(TestClock(Mutex::new(at(8, 50, 0))));
        let store = AttendanceStore::new(office_config(), Arc::clone(&clock) as Arc<dyn Clock>);
        store.check_in("budi", OFFICE, photo()).unwrap();

        *clock.0.lock().unwrap() = at(18, 5, 0);
        let event = store.check_out("budi", OFFICE, photo()).unwrap();

        assert_eq!(event.status, AttendanceStatus::Present);
        assert_eq!(event.check_out_time, Some(at(18, 5, 0).time()));
        assert!(event.check_out_location.is_some());
    }

    #[test]
    fn check_out_without_check_in_fails() {
        let store = store_at(18, 0, 0);
        assert_eq!(
            store.check_out("budi", OFFICE, photo()),
            Err(AttendanceError::NotCheckedIn)
        );
    }

    #[test]
    fn double_check_out_fails() {
        let store = store_at(8, 50, 0);
        store.check_in("budi", OFFICE, photo()).unwrap();
        store.check_out("budi", OFFICE, photo()).unwrap();

        assert_eq!(
            store.check_out("budi", OFFICE, photo()),
            Err(AttendanceError::AlreadyCheckedOut)
        );
    }

    #[test]
    fn out_of_range_check_out_leaves_record_open() {
        let store = store_at(8, 50, 0);
        store.check_in("budi", OFFICE, photo()).unwrap();

        let far = GeoPoint {
            latitude: OFFICE.latitude + 150.0 / 111_320.0,
            longitude: OFFICE.longitude,
        };
        assert_eq!(
            store.check_out("budi", far, photo()),
            Err(AttendanceError::OutOfRange)
        );
        assert!(store.today("budi").unwrap().check_out_time.is_none());
    }

    #[test]
    fn concurrent_check_ins_yield_one_record() {
        let store = Arc::new(store_at(8, 50, 0));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.check_in("budi", OFFICE, photo()))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let ok = results.iter().filter(|r| r.is_ok()).count();
        let dup = results
            .iter()
            .filter(|r| **r == Err(AttendanceError::AlreadyCheckedIn))
            .count();

        assert_eq!(ok, 1);
        assert_eq!(dup, 1);
        assert_eq!(store.history("budi", 30).len(), 1);
    }

    #[test]
    fn administrative_status_upserts() {
        let store = store_at(8, 50, 0);
        let date = at(8, 50, 0).date();

        let event = store.set_administrative_status("siti", date, AttendanceStatus::Sick);
        assert_eq!(event.status, AttendanceStatus::Sick);
        assert!(event.check_in_time.is_none());

        let event = store.set_administrative_status("siti", date, AttendanceStatus::Excused);
        assert_eq!(event.status, AttendanceStatus::Excused);
        assert_eq!(store.by_date(date).len(), 1);
    }

    #[test]
    fn stats_count_present_and_late_only() {
        let store = store_at(9, 20, 0);
        let date = at(9, 20, 0).date();
        store.check_in("budi", OFFICE, photo()).unwrap();
        store.set_administrative_status("siti", date, AttendanceStatus::Sick);

        let (present, late) = store.status_counts(date);
        assert_eq!(present, 0);
        assert_eq!(late, 1);
    }

    #[test]
    fn deleting_a_user_cascades() {
        let store = store_at(8, 50, 0);
        store.check_in("budi", OFFICE, photo()).unwrap();
        store.check_in("siti", OFFICE, photo()).unwrap();

        assert_eq!(store.remove_user("budi"), 1);
        assert!(store.today("budi").is_none());
        assert!(store.today("siti").is_some());
    }
}
