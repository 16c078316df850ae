use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Whether a check-in instant falls after the tolerated arrival window.
/// The cutoff is work_start + tolerance on the check-in's own calendar day;
/// arriving exactly at the cutoff is on time.
pub fn is_late(check_in: NaiveDateTime, work_start: NaiveTime, tolerance_minutes: i64) -> bool {
    let cutoff = check_in.date().and_time(work_start) + Duration::minutes(tolerance_minutes);
    check_in > cutoff
}
