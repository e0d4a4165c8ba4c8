mod conflicts;
mod metrics;
mod occupancy;
mod placement;
mod preprocess;
mod types;
mod util;
mod validate;

pub use metrics::{improvement_suggestions, schedule_metrics, ScheduleMetrics};
pub use types::{Conflict, ConflictKind, PlacementFailure, SchedError, ScheduleOptions};

use crate::model::{Classroom, Course, Period, ScheduleId, ScheduleResult};
use chrono::NaiveDate;
use placement::Engine;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Scheduler : construit un planning d'examens par appel, sans état global.
///
/// Le générateur aléatoire ne sert qu'à mélanger l'ordre des cours lors des
/// tentatives de reprise ; la première tentative est déterministe.
#[derive(Debug)]
pub struct Scheduler<R = StdRng> {
    opts: ScheduleOptions,
    rng: R,
}

impl Scheduler<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(ScheduleOptions::default(), StdRng::from_os_rng())
    }

    /// Mélanges reproductibles (tests, rejeu).
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ScheduleOptions::default(), StdRng::seed_from_u64(seed))
    }
}

impl Default for Scheduler<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Scheduler<R> {
    pub fn with_rng(opts: ScheduleOptions, rng: R) -> Self {
        Self { opts, rng }
    }

    pub fn options(&self) -> ScheduleOptions {
        self.opts
    }

    pub fn options_mut(&mut self) -> &mut ScheduleOptions {
        &mut self.opts
    }

    /// Place chaque cours exactement une fois ou échoue explicitement.
    ///
    /// Valide les entrées, ordonne cours et salles, puis enchaîne jusqu'à
    /// `max_attempts` passes du moteur de placement (les suivantes sur un
    /// ordre mélangé). Le planning renvoyé est trié par (date, créneau) et
    /// porte les diagnostics de l'audit. Aucun planning partiel n'est jamais
    /// renvoyé.
    pub fn generate_schedule(
        &mut self,
        name: &str,
        courses: &[Course],
        rooms: &[Classroom],
        period: Period,
    ) -> Result<ScheduleResult, SchedError> {
        validate::validate(courses, rooms, &period)?;

        let ordered_courses = preprocess::order_courses(courses);
        let ordered_rooms = preprocess::order_rooms(rooms);
        let mut engine = Engine::new(&ordered_courses, ordered_rooms, &period);

        let max_attempts = self.opts.max_attempts.max(1);
        let mut attempt = 0usize;
        loop {
            let mut order: Vec<usize> = (0..engine.course_count()).collect();
            if attempt > 0 {
                order.shuffle(&mut self.rng);
            }
            #[cfg(feature = "logging")]
            tracing::debug!(attempt, courses = order.len(), "starting placement attempt");

            match engine.run(&mut order) {
                Ok(placements) => {
                    let mut exams: Vec<_> = placements
                        .into_iter()
                        .map(|(course, spot)| {
                            engine.exam_for(course, spot, self.opts.exam_duration_hours)
                        })
                        .collect();
                    exams.sort_by_key(|e| (e.date, e.slot));

                    let mut schedule = ScheduleResult {
                        id: ScheduleId::random(),
                        name: name.to_string(),
                        period,
                        exams,
                        conflicts: Vec::new(),
                        attempts: attempt + 1,
                    };
                    schedule.conflicts = conflicts::audit_conflicts(&schedule, courses);
                    #[cfg(feature = "logging")]
                    tracing::info!(
                        exams = schedule.exams.len(),
                        attempts = schedule.attempts,
                        conflicts = schedule.conflicts.len(),
                        "schedule generated"
                    );
                    return Ok(schedule);
                }
                Err(failure) => {
                    #[cfg(feature = "logging")]
                    tracing::warn!(attempt, error = %failure, "placement attempt failed");
                    attempt += 1;
                    if attempt >= max_attempts {
                        return Err(SchedError::PlacementFailed {
                            attempts: max_attempts,
                            source: failure,
                        });
                    }
                }
            }
        }
    }

    pub fn audit_conflicts(&self, schedule: &ScheduleResult, courses: &[Course]) -> Vec<Conflict> {
        conflicts::audit_conflicts(schedule, courses)
    }
}

/// Génère un planning avec les réglages par défaut (2 examens/jour max,
/// écart minimal d'un créneau, 3 tentatives).
pub fn generate_schedule(
    name: &str,
    courses: &[Course],
    rooms: &[Classroom],
    start_date: NaiveDate,
    end_date: NaiveDate,
    min_slot: i32,
    max_slot: i32,
) -> Result<ScheduleResult, SchedError> {
    let period = Period::new(start_date, end_date, min_slot, max_slot);
    Scheduler::new().generate_schedule(name, courses, rooms, period)
}

/// Audit autonome d'un planning existant (par ex. rechargé depuis un fichier).
pub fn audit_conflicts(schedule: &ScheduleResult, courses: &[Course]) -> Vec<Conflict> {
    conflicts::audit_conflicts(schedule, courses)
}
