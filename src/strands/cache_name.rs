//! Unique point-cache naming.
//!
//! The host does not disambiguate cache names shared by several particle
//! systems on one object, and colliding caches overwrite each other on disk.

/// Return `base` if unused, otherwise the first `base.NNN` (NNN from 001) not in `existing`.
pub fn resolve_cache_name<S: AsRef<str>>(base: &str, existing: &[S]) -> String {
    let taken = |candidate: &str| existing.iter().any(|name| name.as_ref() == candidate);

    let mut candidate = base.to_string();
    let mut counter: u64 = 0;
    while taken(&candidate) {
        counter += 1;
        candidate = format!("{base}.{counter:03}");
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unused_base_is_kept() {
        assert_eq!(resolve_cache_name::<&str>("Body", &[]), "Body");
        assert_eq!(resolve_cache_name("Body", &["Head", "Body.001"]), "Body");
    }

    #[test]
    fn appends_first_free_counter() {
        assert_eq!(resolve_cache_name("Body", &["Body", "Body.001"]), "Body.002");
        assert_eq!(resolve_cache_name("Body", &["Body", "Body.002"]), "Body.001");
    }

    #[test]
    fn counter_grows_past_three_digits() {
        let mut existing = vec!["Body".to_string()];
        existing.extend((1..=999).map(|n| format!("Body.{n:03}")));
        assert_eq!(resolve_cache_name("Body", &existing), "Body.1000");
    }

    #[test]
    fn repeated_resolution_never_collides() {
        let mut existing: Vec<String> = Vec::new();
        for _ in 0..20 {
            let name = resolve_cache_name("Head scalp", &existing);
            assert!(!existing.contains(&name));
            existing.push(name);
        }
        assert_eq!(existing[0], "Head scalp");
        assert_eq!(existing[19], "Head scalp.019");
    }
}
