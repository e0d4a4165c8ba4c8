use crate::model::{Classroom, Course, ScheduleResult};
use crate::scheduler::Conflict;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const STUDENT_HEADERS: &[&str] = &["student_id", "student id", "studentid", "stud_id", "stud id", "sid"];
const COURSE_HEADERS: &[&str] = &["course_code", "course code", "coursecode", "course", "code"];
const ROOM_HEADERS: &[&str] = &["classroom_id", "classroom id", "classroom", "room", "id"];
const CAPACITY_HEADERS: &[&str] = &["capacity", "cap"];

/// Charge des cours selon l'extension : `.json` ou CSV d'inscriptions.
pub fn import_courses<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Course>> {
    if has_json_extension(path.as_ref()) {
        import_courses_json(path)
    } else {
        import_enrollments_csv(path)
    }
}

/// Charge des salles selon l'extension : `.json` ou CSV.
pub fn import_classrooms<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Classroom>> {
    if has_json_extension(path.as_ref()) {
        import_classrooms_json(path)
    } else {
        import_classrooms_csv(path)
    }
}

/// Import d'inscriptions CSV: header `student_id,course_code` (alias tolérés).
///
/// Les lignes sont regroupées par cours, dans l'ordre de première apparition ;
/// un étudiant inscrit deux fois n'est compté qu'une fois.
pub fn import_enrollments_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Course>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(sniff_delimiter(path)?)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr.headers()?.clone();
    let student_col = find_column(&headers, STUDENT_HEADERS).context("missing student_id column")?;
    let course_col = find_column(&headers, COURSE_HEADERS).context("missing course_code column")?;

    let mut courses: Vec<Course> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let student = rec.get(student_col).unwrap_or("");
        let code = rec.get(course_col).unwrap_or("");
        if student.is_empty() || code.is_empty() {
            bail!("invalid enrollment row {} (empty field)", line + 2);
        }
        let pos = *index.entry(code.to_string()).or_insert_with(|| {
            courses.push(Course::new(code, std::iter::empty::<&str>()));
            courses.len() - 1
        });
        courses[pos].enroll(student);
    }
    Ok(courses)
}

/// Import de salles CSV: header `classroom_id,capacity` (`,` ou `;`).
pub fn import_classrooms_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Classroom>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(sniff_delimiter(path)?)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr.headers()?.clone();
    let id_col = find_column(&headers, ROOM_HEADERS).context("missing classroom_id column")?;
    let cap_col = find_column(&headers, CAPACITY_HEADERS).context("missing capacity column")?;

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(id_col).unwrap_or("");
        if id.is_empty() {
            bail!("invalid classroom row (empty id)");
        }
        let capacity: u32 = rec
            .get(cap_col)
            .unwrap_or("")
            .parse()
            .with_context(|| format!("invalid capacity for classroom {id}"))?;
        out.push(Classroom::new(id, capacity));
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
struct CourseRecord {
    #[serde(alias = "course_code")]
    code: String,
    #[serde(default, alias = "enrolled")]
    students: Vec<String>,
    #[serde(default)]
    student_count: Option<usize>,
}

/// Import JSON: `[{"code": "...", "students": [...], "student_count"?: n}]`
///
/// Un `student_count` fourni est conservé tel quel : une incohérence sera
/// rejetée à la validation.
pub fn import_courses_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Course>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<CourseRecord> = serde_json::from_slice(&data)
        .with_context(|| format!("parsing courses {}", path.display()))?;
    Ok(records
        .into_iter()
        .map(|r| {
            let mut course = Course::new(&r.code, &r.students);
            if let Some(count) = r.student_count {
                course.student_count = count;
            }
            course
        })
        .collect())
}

/// Import JSON: `[{"id": "...", "capacity": n}]`
pub fn import_classrooms_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Classroom>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let rooms: Vec<Classroom> = serde_json::from_slice(&data)
        .with_context(|| format!("parsing classrooms {}", path.display()))?;
    Ok(rooms)
}

/// Export CSV du planning: header `course,date,slot,classroom,capacity,duration`
pub fn export_schedule_csv<P: AsRef<Path>>(path: P, schedule: &ScheduleResult) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["course", "date", "slot", "classroom", "capacity", "duration"])?;
    let mut slot = itoa::Buffer::new();
    let mut capacity = itoa::Buffer::new();
    let mut duration = itoa::Buffer::new();
    for exam in &schedule.exams {
        let date = exam.date.to_string();
        w.write_record([
            exam.course_code.as_str(),
            date.as_str(),
            slot.format(exam.slot),
            exam.classroom_id.as_str(),
            capacity.format(exam.capacity),
            duration.format(exam.duration_hours),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export JSON du planning, écrit de manière atomique.
pub fn export_schedule_json<P: AsRef<Path>>(path: P, schedule: &ScheduleResult) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(schedule)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).with_context(|| "atomic rename")?;
    Ok(())
}

pub fn load_schedule_json<P: AsRef<Path>>(path: P) -> anyhow::Result<ScheduleResult> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let schedule: ScheduleResult = serde_json::from_slice(&data)
        .with_context(|| format!("parsing schedule {}", path.display()))?;
    Ok(schedule)
}

/// Export CSV des conflits: header `kind,student,date,courses,message`
pub fn export_conflicts_csv<P: AsRef<Path>>(path: P, conflicts: &[Conflict]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["kind", "student", "date", "courses", "message"])?;
    for c in conflicts {
        let date = c.date.to_string();
        let courses: Vec<&str> = c.exams.iter().map(|e| e.course_code.as_str()).collect();
        let courses = courses.join(" ");
        w.write_record([
            c.kind.as_str(),
            c.student.as_ref().map(|s| s.as_str()).unwrap_or(""),
            date.as_str(),
            courses.as_str(),
            c.message.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// `;` si la première ligne en contient et n'a aucune virgule, sinon `,`.
fn sniff_delimiter(path: &Path) -> anyhow::Result<u8> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let first = data.lines().next().unwrap_or("");
    Ok(if first.contains(';') && !first.contains(',') {
        b';'
    } else {
        b','
    })
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.contains(&h.trim().to_ascii_lowercase().as_str()))
}
