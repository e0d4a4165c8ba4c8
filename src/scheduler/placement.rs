use super::occupancy::Occupancy;
use super::{util, PlacementFailure};
use crate::model::{Classroom, Course, Exam, Period};
use std::collections::HashMap;

/// Emplacement engagé pour un cours : indices denses (jour, créneau, salle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Spot {
    pub day: usize,
    pub slot: usize,
    pub room: usize,
}

#[derive(Debug)]
struct Candidate<'a> {
    course: &'a Course,
    students: Vec<usize>,
    /// Indices des salles assez grandes, capacité croissante.
    rooms: Vec<usize>,
}

/// Moteur de placement glouton avec retour arrière local.
///
/// Le retour arrière est de profondeur 1 : en cas d'échec, seul le dernier
/// placement est défait, puis les deux cours sont permutés. C'est une
/// heuristique ; elle peut échouer alors qu'un planning faisable existe.
#[derive(Debug)]
pub(super) struct Engine<'a> {
    candidates: Vec<Candidate<'a>>,
    rooms: Vec<&'a Classroom>,
    period: Period,
    days: usize,
    slots: usize,
    min_gap: usize,
    occupancy: Occupancy,
}

impl<'a> Engine<'a> {
    /// `courses` et `rooms` doivent déjà être ordonnés et validés.
    pub(super) fn new(courses: &[&'a Course], rooms: Vec<&'a Classroom>, period: &Period) -> Self {
        let mut student_index: HashMap<&str, usize> = HashMap::new();
        let candidates = courses
            .iter()
            .map(|&course| {
                let students = course
                    .enrolled
                    .iter()
                    .map(|s| {
                        let next = student_index.len();
                        *student_index.entry(s.as_str()).or_insert(next)
                    })
                    .collect();
                let fitting = rooms
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.capacity as usize >= course.student_count)
                    .map(|(idx, _)| idx)
                    .collect();
                Candidate {
                    course,
                    students,
                    rooms: fitting,
                }
            })
            .collect();

        let days = period.total_days() as usize;
        let slots = period.slots_per_day() as usize;
        let occupancy = Occupancy::new(days, slots, rooms.len(), student_index.len());
        Self {
            candidates,
            rooms,
            period: *period,
            days,
            slots,
            min_gap: period.min_gap_between_exams as usize,
            occupancy,
        }
    }

    pub(super) fn course_count(&self) -> usize {
        self.candidates.len()
    }

    /// Une tentative complète sur `order` (permutation de `0..course_count()`).
    ///
    /// `order` est réordonné sur place par les permutations de retour
    /// arrière. En cas de succès, renvoie les placements dans l'ordre
    /// d'engagement ; en cas d'échec, aucun placement n'est conservé.
    pub(super) fn run(
        &mut self,
        order: &mut [usize],
    ) -> Result<Vec<(usize, Spot)>, PlacementFailure> {
        self.occupancy.reset();
        let max_per_day = self.period.max_exams_per_day;
        let budget = order.len() * 2;
        let mut backtracks = 0usize;
        let mut placed: Vec<(usize, Spot)> = Vec::with_capacity(order.len());

        let mut i = 0usize;
        while i < order.len() {
            let current = order[i];
            if let Some(spot) = self.find_spot(current) {
                let students = &self.candidates[current].students;
                self.occupancy
                    .commit(students, spot.day, spot.slot, spot.room, max_per_day);
                placed.push((current, spot));
                i += 1;
                continue;
            }

            let course = self.candidates[current].course;
            if i == 0 || backtracks >= budget {
                self.occupancy.reset();
                return Err(PlacementFailure {
                    course: course.code.clone(),
                    students: course.student_count,
                });
            }

            backtracks += 1;
            let Some((previous, spot)) = placed.pop() else {
                break;
            };
            let students = &self.candidates[previous].students;
            self.occupancy
                .release(students, spot.day, spot.slot, spot.room, max_per_day);
            #[cfg(feature = "logging")]
            tracing::debug!(
                failed = course.code.as_str(),
                undone = self.candidates[previous].course.code.as_str(),
                backtracks,
                "backtracking one placement"
            );
            order.swap(i - 1, i);
            i -= 1;
        }

        debug_assert_eq!(placed.len(), order.len());
        Ok(placed)
    }

    /// Premier triplet valide, parcouru jour × salle × créneau.
    fn find_spot(&self, course: usize) -> Option<Spot> {
        let candidate = &self.candidates[course];
        let max_per_day = self.period.max_exams_per_day;
        for day in 0..self.days {
            for &room in &candidate.rooms {
                for slot in 0..self.slots {
                    if !self.occupancy.room_free(day, slot, room) {
                        continue;
                    }
                    let free = candidate.students.iter().all(|&s| {
                        self.occupancy
                            .student_available(s, day, slot, max_per_day, self.min_gap)
                    });
                    if free {
                        return Some(Spot { day, slot, room });
                    }
                }
            }
        }
        None
    }

    pub(super) fn exam_for(&self, course: usize, spot: Spot, duration_hours: u32) -> Exam {
        let room = self.rooms[spot.room];
        Exam {
            course_code: self.candidates[course].course.code.clone(),
            classroom_id: room.id.clone(),
            date: util::date_at(self.period.start_date, spot.day),
            slot: util::slot_number(self.period.min_slot, spot.slot),
            duration_hours,
            capacity: room.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn first_fit_scans_day_then_room_then_slot() {
        let courses = [Course::new("A", ["s1"]), Course::new("B", ["s2"])];
        let rooms = [Classroom::new("R1", 10), Classroom::new("R2", 10)];
        let period = Period::new(day(6), day(7), 1, 2);
        let refs: Vec<&Course> = courses.iter().collect();
        let mut engine = Engine::new(&refs, rooms.iter().collect(), &period);

        let mut order = vec![0, 1];
        let placed = engine.run(&mut order).unwrap();
        assert_eq!(placed[0].1, Spot { day: 0, slot: 0, room: 0 });
        assert_eq!(placed[1].1, Spot { day: 0, slot: 1, room: 0 });
    }

    #[test]
    fn shared_student_is_pushed_apart() {
        let courses = [Course::new("A", ["s1"]), Course::new("B", ["s1"])];
        let rooms = [Classroom::new("R1", 10)];
        let period = Period::new(day(6), day(6), 1, 4);
        let refs: Vec<&Course> = courses.iter().collect();
        let mut engine = Engine::new(&refs, rooms.iter().collect(), &period);

        let placed = engine.run(&mut [0, 1]).unwrap();
        let slots: Vec<usize> = placed.iter().map(|(_, s)| s.slot).collect();
        assert_eq!(slots, [0, 2]);
    }

    #[test]
    fn first_course_failure_aborts_attempt() {
        let courses = [Course::new("A", ["s1", "s2"])];
        let rooms = [Classroom::new("R1", 1)];
        let period = Period::new(day(6), day(6), 1, 1);
        let refs: Vec<&Course> = courses.iter().collect();
        let mut engine = Engine::new(&refs, rooms.iter().collect(), &period);

        let err = engine.run(&mut [0]).unwrap_err();
        assert_eq!(err.course.as_str(), "A");
        assert_eq!(err.students, 2);
    }

    #[test]
    fn backtrack_swaps_failed_course_ahead() {
        // P prend le créneau 1 et bloque b autour ; Q (a, b) ne trouve rien.
        // Après avoir défait P et permuté, Q passe au créneau 2 et P se
        // replie dans la seconde salle.
        let courses = [
            Course::new("M", ["a"]),
            Course::new("P", ["b"]),
            Course::new("Q", ["a", "b"]),
        ];
        let rooms = [Classroom::new("R1", 5), Classroom::new("R2", 5)];
        let period = Period::new(day(6), day(6), 0, 2);
        let refs: Vec<&Course> = courses.iter().collect();
        let mut engine = Engine::new(&refs, rooms.iter().collect(), &period);

        let mut order = vec![0, 1, 2];
        let placed = engine.run(&mut order).unwrap();
        assert_eq!(order, [0, 2, 1]);
        assert_eq!(
            placed,
            [
                (0, Spot { day: 0, slot: 0, room: 0 }),
                (2, Spot { day: 0, slot: 2, room: 0 }),
                (1, Spot { day: 0, slot: 0, room: 1 }),
            ]
        );
    }

    #[test]
    fn depth_one_backtrack_can_miss_a_feasible_order() {
        // P, R, Q tiendrait (a aux créneaux 0 et 2), mais en partant de R
        // le moteur ne fait qu'alterner P et Q jusqu'à épuiser le budget.
        let courses = [
            Course::new("R", ["b"]),
            Course::new("P", ["a"]),
            Course::new("Q", ["a"]),
        ];
        let rooms = [Classroom::new("R1", 5)];
        let period = Period::new(day(6), day(6), 0, 2);
        let refs: Vec<&Course> = courses.iter().collect();
        let mut engine = Engine::new(&refs, rooms.iter().collect(), &period);

        let err = engine.run(&mut [0, 1, 2]).unwrap_err();
        assert!(["P", "Q"].contains(&err.course.as_str()));

        let placed = engine.run(&mut [1, 0, 2]).unwrap();
        assert_eq!(placed.len(), 3);
    }

    #[test]
    fn spreads_to_later_days() {
        let courses = [
            Course::new("W", ["w1"]),
            Course::new("Y", ["s1"]),
            Course::new("Z", ["s1"]),
        ];
        let rooms = [Classroom::new("R1", 5)];
        let period = Period::new(day(6), day(8), 1, 1);
        let refs: Vec<&Course> = courses.iter().collect();
        let mut engine = Engine::new(&refs, rooms.iter().collect(), &period);

        let placed = engine.run(&mut [0, 1, 2]).unwrap();
        let days: Vec<usize> = placed.iter().map(|(_, s)| s.day).collect();
        assert_eq!(days, [0, 1, 2]);
    }

    #[test]
    fn exam_uses_calendar_date_and_slot_number() {
        let courses = [Course::new("A", ["s1"])];
        let rooms = [Classroom::new("R1", 12)];
        let period = Period::new(day(6), day(7), 3, 5);
        let refs: Vec<&Course> = courses.iter().collect();
        let engine = Engine::new(&refs, rooms.iter().collect(), &period);

        let exam = engine.exam_for(0, Spot { day: 1, slot: 2, room: 0 }, 2);
        assert_eq!(exam.date, day(7));
        assert_eq!(exam.slot, 5);
        assert_eq!(exam.capacity, 12);
        assert_eq!(exam.classroom_id.as_str(), "R1");
    }
}
