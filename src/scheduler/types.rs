use crate::model::{CourseCode, Exam, StudentId};
use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options de génération
#[derive(Debug, Clone, Copy)]
pub struct ScheduleOptions {
    /// Nombre maximal de tentatives (la première sans mélange).
    pub max_attempts: usize,
    pub exam_duration_hours: u32,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            exam_duration_hours: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ConflictKind {
    MaxExamsExceeded,
    ConsecutiveExams,
    DoubleBooking,
    CapacityExceeded,
    RoomUnavailable,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKind::MaxExamsExceeded => "MAX_EXAMS_EXCEEDED",
            ConflictKind::ConsecutiveExams => "CONSECUTIVE_EXAMS",
            ConflictKind::DoubleBooking => "DOUBLE_BOOKING",
            ConflictKind::CapacityExceeded => "CAPACITY_EXCEEDED",
            ConflictKind::RoomUnavailable => "ROOM_UNAVAILABLE",
        }
    }
}

/// Diagnostic produit par l'audit ; jamais réinjecté dans le planning.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Conflict {
    pub kind: ConflictKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub student: Option<StudentId>,
    pub date: NaiveDate,
    pub exams: Vec<Exam>,
    pub message: String,
}

/// Cours impossible à placer lors d'une tentative.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot place course {course} (students: {students}); consider extending the exam period or the slots per day")]
pub struct PlacementFailure {
    pub course: CourseCode,
    pub students: usize,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("capacity infeasible: {0}")]
    CapacityInfeasible(String),
    #[error("failed to generate schedule after {attempts} attempts: {source}")]
    PlacementFailed {
        attempts: usize,
        #[source]
        source: PlacementFailure,
    },
}
