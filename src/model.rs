use crate::scheduler::Conflict;
use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Code de cours (identifiant unique, ex. `CSE101`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CourseCode(String);

impl CourseCode {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiant fort pour une salle
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoomId(String);

impl RoomId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiant fort pour un étudiant
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StudentId(String);

impl StudentId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiant d'un planning généré
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleId(String);

impl ScheduleId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Cours à examiner et ses inscrits.
///
/// `student_count` est l'effectif déclaré par la source de données ; le
/// validateur refuse tout cours dont l'effectif diffère de `enrolled.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Course {
    pub code: CourseCode,
    pub student_count: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enrolled: BTreeSet<StudentId>,
}

impl Course {
    pub fn new<C, I, S>(code: C, students: I) -> Self
    where
        C: AsRef<str>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let enrolled: BTreeSet<StudentId> = students.into_iter().map(StudentId::new).collect();
        Self {
            code: CourseCode::new(code),
            student_count: enrolled.len(),
            enrolled,
        }
    }

    /// Inscrit un étudiant ; renvoie `false` s'il l'était déjà.
    pub fn enroll<S: AsRef<str>>(&mut self, student: S) -> bool {
        let added = self.enrolled.insert(StudentId::new(student));
        self.student_count = self.enrolled.len();
        added
    }
}

/// Salle d'examen
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Classroom {
    pub id: RoomId,
    pub capacity: u32,
}

impl Classroom {
    pub fn new<S: AsRef<str>>(id: S, capacity: u32) -> Self {
        Self {
            id: RoomId::new(id),
            capacity,
        }
    }
}

/// Période d'examens : dates et créneaux inclusifs, règles par étudiant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_slot: i32,
    pub max_slot: i32,
    pub max_exams_per_day: u32,
    /// Distance minimale (en créneaux) entre deux examens d'un même étudiant le même jour.
    pub min_gap_between_exams: u32,
}

impl Period {
    pub const DEFAULT_MAX_EXAMS_PER_DAY: u32 = 2;
    pub const DEFAULT_MIN_GAP_BETWEEN_EXAMS: u32 = 1;

    pub fn new(start_date: NaiveDate, end_date: NaiveDate, min_slot: i32, max_slot: i32) -> Self {
        Self {
            start_date,
            end_date,
            min_slot,
            max_slot,
            max_exams_per_day: Self::DEFAULT_MAX_EXAMS_PER_DAY,
            min_gap_between_exams: Self::DEFAULT_MIN_GAP_BETWEEN_EXAMS,
        }
    }

    pub fn with_max_exams_per_day(mut self, max: u32) -> Self {
        self.max_exams_per_day = max;
        self
    }

    pub fn with_min_gap(mut self, gap: u32) -> Self {
        self.min_gap_between_exams = gap;
        self
    }

    /// Nombre de jours de la période (0 si les dates sont inversées).
    pub fn total_days(&self) -> i64 {
        ((self.end_date - self.start_date).num_days() + 1).max(0)
    }

    /// Nombre de créneaux par jour (0 si la plage est inversée).
    pub fn slots_per_day(&self) -> i64 {
        (i64::from(self.max_slot) - i64::from(self.min_slot) + 1).max(0)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn contains_slot(&self, slot: i32) -> bool {
        self.min_slot <= slot && slot <= self.max_slot
    }
}

/// Examen placé : (cours, salle, date, créneau).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Exam {
    pub course_code: CourseCode,
    pub classroom_id: RoomId,
    pub date: NaiveDate,
    pub slot: i32,
    pub duration_hours: u32,
    /// Capacité de la salle au moment du placement
    pub capacity: u32,
}

/// Planning complet renvoyé à l'appelant.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleResult {
    pub id: ScheduleId,
    pub name: String,
    pub period: Period,
    pub exams: Vec<Exam>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub conflicts: Vec<Conflict>,
    /// Numéro (1-based) de la tentative ayant abouti.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attempts: usize,
}

impl ScheduleResult {
    pub fn find_exam(&self, code: &CourseCode) -> Option<&Exam> {
        self.exams.iter().find(|e| &e.course_code == code)
    }

    pub fn exams_on(&self, date: NaiveDate) -> impl Iterator<Item = &Exam> + '_ {
        self.exams.iter().filter(move |e| e.date == date)
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}
