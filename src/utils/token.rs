use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Length of the access token handed to a candidate. 32 alphanumeric
/// characters carry ~190 bits of entropy, far past the 16-byte floor
/// required for unguessable links.
pub const ACCESS_TOKEN_LENGTH: usize = 32;

pub fn generate_access_token(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

pub fn generate_unique_link() -> String {
    generate_access_token(ACCESS_TOKEN_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tokens_are_url_safe_and_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let link = generate_unique_link();
            assert_eq!(link.len(), ACCESS_TOKEN_LENGTH);
            assert!(link.chars().all(|c| c.is_ascii_alphanumeric()));
            assert!(seen.insert(link));
        }
    }
}
