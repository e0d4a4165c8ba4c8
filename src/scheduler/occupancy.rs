//! État d'occupation d'une tentative, indexé densément.
//!
//! Jours, créneaux, salles et étudiants sont adressés par des indices
//! `0..n` ; chaque table est un tableau plat de taille fixe. Les créneaux
//! interdits sont des compteurs de références : `commit` puis `release` d'un
//! même placement ramène exactement à l'état antérieur, quel que soit
//! l'ordre des autres placements.

#[derive(Debug, Clone)]
pub(super) struct Occupancy {
    days: usize,
    slots: usize,
    rooms: usize,
    /// `(day * slots + slot) * rooms + room`
    room_busy: Vec<bool>,
    /// `(student * days + day) * slots + slot`
    student_slot: Vec<bool>,
    /// `student * days + day`
    student_load: Vec<u32>,
    /// même forme que `student_slot`
    forbidden: Vec<u32>,
}

impl Occupancy {
    pub(super) fn new(days: usize, slots: usize, rooms: usize, students: usize) -> Self {
        Self {
            days,
            slots,
            rooms,
            room_busy: vec![false; days * slots * rooms],
            student_slot: vec![false; students * days * slots],
            student_load: vec![0; students * days],
            forbidden: vec![0; students * days * slots],
        }
    }

    pub(super) fn reset(&mut self) {
        self.room_busy.fill(false);
        self.student_slot.fill(false);
        self.student_load.fill(0);
        self.forbidden.fill(0);
    }

    fn room_cell(&self, day: usize, slot: usize, room: usize) -> usize {
        (day * self.slots + slot) * self.rooms + room
    }

    fn day_base(&self, student: usize, day: usize) -> usize {
        (student * self.days + day) * self.slots
    }

    pub(super) fn room_free(&self, day: usize, slot: usize, room: usize) -> bool {
        !self.room_busy[self.room_cell(day, slot, room)]
    }

    /// L'étudiant peut-il passer un examen à `(day, slot)` ?
    pub(super) fn student_available(
        &self,
        student: usize,
        day: usize,
        slot: usize,
        max_per_day: u32,
        min_gap: usize,
    ) -> bool {
        let base = self.day_base(student, day);
        if self.forbidden[base + slot] > 0 {
            return false;
        }
        if self.student_load[student * self.days + day] >= max_per_day {
            return false;
        }
        let lo = slot.saturating_sub(min_gap);
        let hi = (slot + min_gap).min(self.slots - 1);
        !self.student_slot[base + lo..=base + hi].iter().any(|&b| b)
    }

    pub(super) fn commit(
        &mut self,
        students: &[usize],
        day: usize,
        slot: usize,
        room: usize,
        max_per_day: u32,
    ) {
        let cell = self.room_cell(day, slot, room);
        self.room_busy[cell] = true;

        for &student in students {
            let base = self.day_base(student, day);
            let load_idx = student * self.days + day;
            self.student_slot[base + slot] = true;
            self.student_load[load_idx] += 1;
            self.adjust_neighbourhood(base, slot, true);
            if self.student_load[load_idx] == max_per_day {
                self.adjust_whole_day(base, true);
            }
        }
    }

    pub(super) fn release(
        &mut self,
        students: &[usize],
        day: usize,
        slot: usize,
        room: usize,
        max_per_day: u32,
    ) {
        let cell = self.room_cell(day, slot, room);
        self.room_busy[cell] = false;

        for &student in students {
            let base = self.day_base(student, day);
            let load_idx = student * self.days + day;
            if self.student_load[load_idx] == max_per_day {
                self.adjust_whole_day(base, false);
            }
            self.adjust_neighbourhood(base, slot, false);
            self.student_load[load_idx] -= 1;
            self.student_slot[base + slot] = false;
        }
    }

    /// Le créneau lui-même et ses deux voisins immédiats.
    fn adjust_neighbourhood(&mut self, base: usize, slot: usize, add: bool) {
        let lo = slot.saturating_sub(1);
        let hi = (slot + 1).min(self.slots - 1);
        for cell in &mut self.forbidden[base + lo..=base + hi] {
            bump(cell, add);
        }
    }

    fn adjust_whole_day(&mut self, base: usize, add: bool) {
        for cell in &mut self.forbidden[base..base + self.slots] {
            bump(cell, add);
        }
    }

    #[cfg(test)]
    fn is_pristine(&self) -> bool {
        !self.room_busy.iter().any(|&b| b)
            && !self.student_slot.iter().any(|&b| b)
            && self.student_load.iter().all(|&n| n == 0)
            && self.forbidden.iter().all(|&n| n == 0)
    }
}

fn bump(cell: &mut u32, add: bool) {
    if add {
        *cell += 1;
    } else {
        *cell -= 1;
    }
}
