use chrono::Utc;
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;

const PREFIX: &str = "TKT";
const SUFFIX_LEN: usize = 9;
const SUFFIX_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// New ticket identifier: `TKT-<unix millis>-<9 chars [0-9A-Z]>`.
///
/// Uniqueness is probabilistic; the store's unique index is what enforces it.
pub fn generate_ticket_id() -> String {
    build_ticket_id(Utc::now().timestamp_millis(), &mut rand::thread_rng())
}

pub fn build_ticket_id<R: Rng + ?Sized>(millis: i64, rng: &mut R) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();
    format!("{PREFIX}-{millis}-{suffix}")
}

pub fn is_ticket_id(candidate: &str) -> bool {
    lazy_static! {
        static ref TICKET_ID_RE: Regex = Regex::new(r"^TKT-\d{13,}-[0-9A-Z]{9}$").unwrap();
    }
    TICKET_ID_RE.is_match(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn generated_ids_match_the_format() {
        for _ in 0..50 {
            let id = generate_ticket_id();
            assert!(is_ticket_id(&id), "unexpected id {id}");
        }
    }

    #[test]
    fn time_component_orders_ids() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = build_ticket_id(1_767_225_600_000, &mut rng);
        assert!(id.starts_with("TKT-1767225600000-"));
        assert_eq!(id.len(), "TKT-1767225600000-".len() + 9);
    }

    #[test]
    fn rejects_foreign_identifiers() {
        assert!(!is_ticket_id("does-not-exist"));
        assert!(!is_ticket_id("TKT-1767225600000-abcdefghi"));
        assert!(!is_ticket_id("TKT-1767225600000-ABC"));
    }
}
