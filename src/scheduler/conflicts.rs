use super::{Conflict, ConflictKind};
use crate::model::{Course, CourseCode, Exam, RoomId, ScheduleResult, StudentId};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Rejoue les règles sur un planning terminé et liste les violations.
///
/// Purement consultatif : rien n'est corrigé.
pub(super) fn audit_conflicts(schedule: &ScheduleResult, courses: &[Course]) -> Vec<Conflict> {
    let period = &schedule.period;
    let by_code: HashMap<&CourseCode, &Course> = courses.iter().map(|c| (&c.code, c)).collect();
    let mut out = Vec::new();

    let mut rooms: BTreeMap<(NaiveDate, i32, &RoomId), Vec<&Exam>> = BTreeMap::new();
    for exam in &schedule.exams {
        rooms
            .entry((exam.date, exam.slot, &exam.classroom_id))
            .or_default()
            .push(exam);
    }
    for ((date, slot, room), exams) in rooms {
        if exams.len() > 1 {
            out.push(Conflict {
                kind: ConflictKind::DoubleBooking,
                student: None,
                date,
                message: format!(
                    "Classroom {room} hosts {} exams at slot {slot} on {date}",
                    exams.len()
                ),
                exams: exams.into_iter().cloned().collect(),
            });
        }
    }

    for exam in &schedule.exams {
        if let Some(course) = by_code.get(&exam.course_code) {
            if (exam.capacity as usize) < course.student_count {
                out.push(Conflict {
                    kind: ConflictKind::CapacityExceeded,
                    student: None,
                    date: exam.date,
                    message: format!(
                        "Course {} has {} students but classroom {} holds {}",
                        exam.course_code, course.student_count, exam.classroom_id, exam.capacity
                    ),
                    exams: vec![exam.clone()],
                });
            }
        }
        if !period.contains_date(exam.date) || !period.contains_slot(exam.slot) {
            out.push(Conflict {
                kind: ConflictKind::RoomUnavailable,
                student: None,
                date: exam.date,
                message: format!(
                    "Exam {} is placed outside the exam period (slot {} on {})",
                    exam.course_code, exam.slot, exam.date
                ),
                exams: vec![exam.clone()],
            });
        }
    }

    let mut by_student: BTreeMap<&StudentId, BTreeMap<NaiveDate, Vec<&Exam>>> = BTreeMap::new();
    for exam in &schedule.exams {
        let Some(course) = by_code.get(&exam.course_code) else {
            continue;
        };
        for student in &course.enrolled {
            by_student
                .entry(student)
                .or_default()
                .entry(exam.date)
                .or_default()
                .push(exam);
        }
    }

    let max_per_day = period.max_exams_per_day as usize;
    let gap = i64::from(period.min_gap_between_exams);
    for (student, days) in by_student {
        for (date, mut exams) in days {
            if exams.len() > max_per_day {
                out.push(Conflict {
                    kind: ConflictKind::MaxExamsExceeded,
                    student: Some(student.clone()),
                    date,
                    message: format!(
                        "Student {student} has {} exams on {date} (max: {max_per_day})",
                        exams.len()
                    ),
                    exams: exams.iter().map(|&e| e.clone()).collect(),
                });
            }

            exams.sort_by_key(|e| e.slot);
            for (idx, a) in exams.iter().enumerate() {
                for b in exams.iter().skip(idx + 1) {
                    if i64::from(b.slot) - i64::from(a.slot) > gap {
                        break;
                    }
                    out.push(Conflict {
                        kind: ConflictKind::ConsecutiveExams,
                        student: Some(student.clone()),
                        date,
                        message: format!(
                            "Student {student} has consecutive exams at slots {} and {} on {date}",
                            a.slot, b.slot
                        ),
                        exams: vec![(*a).clone(), (*b).clone()],
                    });
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Period, ScheduleId};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn exam(code: &str, room: &str, date: NaiveDate, slot: i32, capacity: u32) -> Exam {
        Exam {
            course_code: CourseCode::new(code),
            classroom_id: RoomId::new(room),
            date,
            slot,
            duration_hours: 2,
            capacity,
        }
    }

    fn schedule(exams: Vec<Exam>) -> ScheduleResult {
        ScheduleResult {
            id: ScheduleId::new("s"),
            name: "test".into(),
            period: Period::new(day(6), day(7), 1, 4),
            exams,
            conflicts: Vec::new(),
            attempts: 1,
        }
    }

    #[test]
    fn clean_schedule_has_no_conflicts() {
        let courses = vec![Course::new("A", ["s1"]), Course::new("B", ["s1"])];
        let s = schedule(vec![
            exam("A", "R1", day(6), 1, 10),
            exam("B", "R1", day(6), 3, 10),
        ]);
        assert!(audit_conflicts(&s, &courses).is_empty());
    }

    #[test]
    fn reports_daily_cap_and_close_slots() {
        let courses = vec![
            Course::new("A", ["s1"]),
            Course::new("B", ["s1"]),
            Course::new("C", ["s1"]),
        ];
        let s = schedule(vec![
            exam("A", "R1", day(6), 1, 10),
            exam("B", "R1", day(6), 2, 10),
            exam("C", "R1", day(6), 4, 10),
        ]);
        let conflicts = audit_conflicts(&s, &courses);
        let kinds: Vec<ConflictKind> = conflicts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            [ConflictKind::MaxExamsExceeded, ConflictKind::ConsecutiveExams]
        );
        assert_eq!(conflicts[0].exams.len(), 3);
        assert_eq!(conflicts[1].student, Some(StudentId::new("s1")));
        let slots: Vec<i32> = conflicts[1].exams.iter().map(|e| e.slot).collect();
        assert_eq!(slots, [1, 2]);
    }

    #[test]
    fn reports_structural_violations() {
        let courses = vec![Course::new("A", ["s1", "s2"]), Course::new("B", ["s3"])];
        let s = schedule(vec![
            exam("A", "R1", day(6), 1, 1),
            exam("B", "R1", day(6), 1, 1),
            exam("Z", "R2", day(9), 7, 10),
        ]);
        let kinds: Vec<ConflictKind> = audit_conflicts(&s, &courses)
            .iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(
            kinds,
            [
                ConflictKind::DoubleBooking,
                ConflictKind::CapacityExceeded,
                ConflictKind::RoomUnavailable,
            ]
        );
    }
}
