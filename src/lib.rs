#![forbid(unsafe_code)]
//! Examplan — planification de sessions d'examens universitaires (sans BD).
//!
//! - Placement glouton (cours, salle, date, créneau) avec retour arrière local.
//! - Contraintes dures : pas de double réservation de salle ni d'étudiant,
//!   capacité, plafond d'examens par jour, écart minimal entre examens.
//! - Jusqu'à trois tentatives, les suivantes sur un ordre mélangé.
//! - Audit des conflits résiduels, consultatif.
//! - Le cœur ne fait aucune E/S ; les imports/exports CSV/JSON sont dans `io`.

#[cfg(feature = "serde")]
pub mod io;
pub mod model;
pub mod scheduler;

pub use model::{
    Classroom, Course, CourseCode, Exam, Period, RoomId, ScheduleId, ScheduleResult, StudentId,
};
pub use scheduler::{
    audit_conflicts, generate_schedule, improvement_suggestions, schedule_metrics, Conflict,
    ConflictKind, PlacementFailure, SchedError, ScheduleMetrics, ScheduleOptions, Scheduler,
};
