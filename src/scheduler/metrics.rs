use crate::model::{Course, CourseCode, ScheduleResult};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Indicateurs de synthèse d'un planning.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleMetrics {
    pub total_exams: usize,
    pub classrooms_used: usize,
    /// Moyenne sur les étudiants ayant au moins un examen.
    pub average_exams_per_student: f64,
}

pub fn schedule_metrics(schedule: &ScheduleResult, courses: &[Course]) -> ScheduleMetrics {
    let by_code: HashMap<&CourseCode, &Course> = courses.iter().map(|c| (&c.code, c)).collect();

    let mut rooms: Vec<&str> = schedule
        .exams
        .iter()
        .map(|e| e.classroom_id.as_str())
        .collect();
    rooms.sort_unstable();
    rooms.dedup();

    let mut per_student: HashMap<&str, usize> = HashMap::new();
    for exam in &schedule.exams {
        if let Some(course) = by_code.get(&exam.course_code) {
            for student in &course.enrolled {
                *per_student.entry(student.as_str()).or_default() += 1;
            }
        }
    }
    let average = if per_student.is_empty() {
        0.0
    } else {
        per_student.values().sum::<usize>() as f64 / per_student.len() as f64
    };

    ScheduleMetrics {
        total_exams: schedule.exams.len(),
        classrooms_used: rooms.len(),
        average_exams_per_student: average,
    }
}

/// Pistes d'amélioration lisibles (salles sous-utilisées, jours déséquilibrés).
pub fn improvement_suggestions(schedule: &ScheduleResult) -> Vec<String> {
    let mut suggestions = Vec::new();

    let mut usage: BTreeMap<&str, usize> = BTreeMap::new();
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for exam in &schedule.exams {
        *usage.entry(exam.classroom_id.as_str()).or_default() += 1;
        *per_day.entry(exam.date).or_default() += 1;
    }

    let max_usage = usage.values().copied().max().unwrap_or(0);
    for (room, &count) in &usage {
        if count < max_usage / 3 {
            suggestions.push(format!(
                "Classroom {room} is underutilized ({count} exams vs max {max_usage})"
            ));
        }
    }

    let busiest = per_day.values().copied().max().unwrap_or(0);
    let quietest = per_day.values().copied().min().unwrap_or(0);
    if busiest - quietest > 5 {
        suggestions.push(format!(
            "Exam distribution across days is uneven ({quietest} to {busiest} exams per day)"
        ));
    }

    suggestions
}
