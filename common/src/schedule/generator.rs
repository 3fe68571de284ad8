// Deterministic placeholder timetable for a single subject

use crate::models::{Day, SessionKind, SessionSlot};
use crate::schedule::window::hm;

/// Fixed length of every synthetic session
pub const SYNTHETIC_SESSION_MINUTES: u32 = 90;

/// Days used in rotation order
const ROTATION_DAYS: [Day; 3] = [Day::Monday, Day::Wednesday, Day::Friday];

/// Candidate (start, end) slots as (hour, minute) pairs, all clear of lunch
const TIME_SLOTS: [((u32, u32), (u32, u32)); 3] = [
    ((8, 0), (9, 30)),
    ((10, 0), (11, 30)),
    ((14, 0), (15, 30)),
];

/// Number of weekly sessions for a subject with the given weekly minutes.
pub fn sessions_per_week(duration_minutes: u32) -> usize {
    // 180..270 and 90..180 both map to two sessions
    match duration_minutes {
        270.. => 3,
        90..=269 => 2,
        _ => 1,
    }
}

/// Generate a synthetic schedule for one subject.
///
/// Pure: the same arguments always produce the same sessions. Session `i`
/// lands on the i-th rotation day at the i-th candidate slot, so sessions
/// never collide with each other or with lunch. Every session is `Forced`
/// and carries a zero rating; callers stamp the real rating.
pub fn generate(subject: &str, professor: &str, duration_minutes: u32) -> Vec<SessionSlot> {
    let count = sessions_per_week(duration_minutes).min(ROTATION_DAYS.len());

    (0..count)
        .map(|i| {
            let ((start_h, start_m), (end_h, end_m)) = TIME_SLOTS[i % TIME_SLOTS.len()];
            SessionSlot {
                subject: subject.to_string(),
                professor: professor.to_string(),
                day: ROTATION_DAYS[i].clone(),
                start_time: hm(start_h, start_m),
                end_time: hm(end_h, end_m),
                rating: 0.0,
                duration_minutes: SYNTHETIC_SESSION_MINUTES,
                kind: SessionKind::Forced,
                group: None,
                room: None,
            }
        })
        .collect()
}
