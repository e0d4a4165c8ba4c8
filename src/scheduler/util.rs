use chrono::{Duration, NaiveDate};

pub(super) fn date_at(start: NaiveDate, day: usize) -> NaiveDate {
    start + Duration::days(day as i64)
}

pub(super) fn slot_number(min_slot: i32, offset: usize) -> i32 {
    min_slot + offset as i32
}
