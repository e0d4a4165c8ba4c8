use super::SchedError;
use crate::model::{Classroom, Course, Period};
use std::collections::HashSet;

/// Plafond de cellules d'une table d'occupation (jours × créneaux × salles
/// ou étudiants).
const MAX_OCCUPANCY_CELLS: usize = 1 << 25;

/// Rejette les entrées mal formées avant tout placement.
///
/// Les contrôles s'enchaînent dans un ordre fixe et s'arrêtent à la première
/// violation.
pub(super) fn validate(
    courses: &[Course],
    rooms: &[Classroom],
    period: &Period,
) -> Result<(), SchedError> {
    if courses.is_empty() {
        return Err(SchedError::InvalidInput(
            "no courses provided for scheduling".to_string(),
        ));
    }
    if rooms.is_empty() {
        return Err(SchedError::InvalidInput(
            "no classrooms available for exams".to_string(),
        ));
    }

    if period.start_date > period.end_date {
        return Err(SchedError::InvalidInput(format!(
            "start date {} is after end date {}",
            period.start_date, period.end_date
        )));
    }
    if period.min_slot < 0 || period.max_slot < period.min_slot {
        return Err(SchedError::InvalidInput(format!(
            "invalid slot range {}..={}",
            period.min_slot, period.max_slot
        )));
    }
    if period.max_exams_per_day == 0 {
        return Err(SchedError::InvalidInput(
            "max exams per day must be positive".to_string(),
        ));
    }

    let mut codes = HashSet::with_capacity(courses.len());
    for course in courses {
        if !codes.insert(&course.code) {
            return Err(SchedError::InvalidInput(format!(
                "duplicate course code: {}",
                course.code
            )));
        }
    }

    let mut room_ids = HashSet::with_capacity(rooms.len());
    for room in rooms {
        if !room_ids.insert(&room.id) {
            return Err(SchedError::InvalidInput(format!(
                "duplicate classroom id: {}",
                room.id
            )));
        }
        if room.capacity == 0 {
            return Err(SchedError::InvalidInput(format!(
                "classroom {} has zero capacity",
                room.id
            )));
        }
    }

    let max_capacity = rooms.iter().map(|r| r.capacity).max().unwrap_or(0);
    let oversized: Vec<&str> = courses
        .iter()
        .filter(|c| c.student_count > max_capacity as usize)
        .map(|c| c.code.as_str())
        .collect();
    if !oversized.is_empty() {
        return Err(SchedError::CapacityInfeasible(format!(
            "courses exceed maximum classroom capacity ({max_capacity}): {}",
            oversized.join(", ")
        )));
    }

    if let Some(course) = courses.iter().find(|c| c.student_count != c.enrolled.len()) {
        return Err(SchedError::InvalidInput(format!(
            "student count mismatch for course {}: reported {}, enrolled {}",
            course.code,
            course.student_count,
            course.enrolled.len()
        )));
    }

    let days = period.total_days();
    let slots = period.slots_per_day();
    let available = days
        .saturating_mul(slots)
        .saturating_mul(rooms.len() as i64);
    if (courses.len() as i64) > available {
        return Err(SchedError::CapacityInfeasible(format!(
            "{n} courses need {n} exam slots, but only {available} are available \
             (days: {days}, slots/day: {slots}, rooms: {rooms})",
            n = courses.len(),
            rooms = rooms.len()
        )));
    }

    let students: HashSet<_> = courses.iter().flat_map(|c| &c.enrolled).collect();
    let width = rooms.len().max(students.len());
    let cells = usize::try_from(days)
        .ok()
        .zip(usize::try_from(slots).ok())
        .and_then(|(d, s)| d.checked_mul(s))
        .and_then(|grid| grid.checked_mul(width));
    match cells {
        Some(cells) if cells <= MAX_OCCUPANCY_CELLS => Ok(()),
        _ => Err(SchedError::InvalidInput(format!(
            "exam period too large: {days} days x {slots} slots/day x {width} rooms or students \
             exceeds {MAX_OCCUPANCY_CELLS} occupancy cells"
        ))),
    }
}
