/// Level used when the caller does not send a `mood`
pub const DEFAULT_MOOD_LEVEL: i64 = 3;

const MOOD_STATES: [(i64, &str); 5] = [
    (1, "Bad mental state"),
    (2, "Struggling"),
    (3, "Balanced"),
    (4, "Positive"),
    (5, "Cheerful"),
];

/// Human-readable state for a mood level; anything outside 1-5 is "Unknown".
pub fn mood_state(level: i64) -> &'static str {
    MOOD_STATES
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, state)| *state)
        .unwrap_or("Unknown")
}
