use chrono::{DateTime, Utc};
use rand::Rng;

const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_LEN: usize = 10;

/// Build a session id of the form `session_<epoch millis>_<random base36>`.
///
/// Ten base36 characters carry a little over 51 bits of randomness, so ids
/// issued in the same millisecond still do not collide in practice and cannot
/// be guessed from a neighbouring id.
pub fn generate_session_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();
    format!("session_{}_{}", now.timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn id_is_url_safe() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let id = generate_session_id(now);

        assert!(id.starts_with(&format!("session_{}_", now.timestamp_millis())));
        assert!(id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        assert_eq!(id.rsplit('_').next().map(str::len), Some(RANDOM_LEN));
    }

    #[test]
    fn ids_in_same_millisecond_differ() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let ids: HashSet<String> = (0..10_000).map(|_| generate_session_id(now)).collect();
        assert_eq!(ids.len(), 10_000);
    }
}
