// Canonical day/time ordering for session lists

use crate::models::SessionSlot;

/// Ordering key: weekday rank, then start time in minutes since midnight.
fn sequence_key(slot: &SessionSlot) -> (u8, u32) {
    (slot.day.rank(), slot.start_minutes())
}

/// Sort sessions into canonical order.
///
/// Unknown days go last. The sort is stable, so sessions sharing a day
/// and start time keep their input order.
pub fn sort(mut sessions: Vec<SessionSlot>) -> Vec<SessionSlot> {
    sessions.sort_by_key(sequence_key);
    sessions
}

/// Whether `sessions` is already in canonical order.
pub fn is_sorted(sessions: &[SessionSlot]) -> bool {
    sessions
        .windows(2)
        .all(|pair| sequence_key(&pair[0]) <= sequence_key(&pair[1]))
}
