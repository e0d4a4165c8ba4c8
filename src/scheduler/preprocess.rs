use crate::model::{Classroom, Course};

/// Effectif décroissant puis code décroissant : les gros cours passent d'abord.
pub(super) fn order_courses(courses: &[Course]) -> Vec<&Course> {
    let mut ordered: Vec<&Course> = courses.iter().collect();
    ordered.sort_by(|a, b| {
        b.student_count
            .cmp(&a.student_count)
            .then_with(|| b.code.cmp(&a.code))
    });
    ordered
}

/// Capacité croissante puis identifiant croissant.
pub(super) fn order_rooms(rooms: &[Classroom]) -> Vec<&Classroom> {
    let mut ordered: Vec<&Classroom> = rooms.iter().collect();
    ordered.sort_by(|a, b| a.capacity.cmp(&b.capacity).then_with(|| a.id.cmp(&b.id)));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courses_largest_first_ties_by_code_desc() {
        let courses = vec![
            Course::new("MAT101", ["a"]),
            Course::new("CSE101", ["a", "b"]),
            Course::new("PHY101", ["a"]),
            Course::new("ART101", ["a", "b"]),
        ];
        let codes: Vec<&str> = order_courses(&courses)
            .iter()
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(codes, ["CSE101", "ART101", "PHY101", "MAT101"]);
        // l'entrée n'est pas modifiée
        assert_eq!(courses[0].code.as_str(), "MAT101");
    }

    #[test]
    fn rooms_smallest_first_ties_by_id_asc() {
        let rooms = vec![
            Classroom::new("B2", 50),
            Classroom::new("B1", 50),
            Classroom::new("A9", 20),
        ];
        let ids: Vec<&str> = order_rooms(&rooms).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["A9", "B1", "B2"]);
    }
}
