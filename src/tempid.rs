//! Fresh identifiers for the reserved `$tmp0` … `$tmp9` placeholders.
//!
//! Every data row gets its own ten identifiers so that structurally identical
//! test bodies can share one C function without symbol clashes.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Number of reserved temporary placeholders per row.
pub const TEMP_COUNT: usize = 10;

const TEMP_PREFIX: &str = "tmp";

/// `tmp0`, `tmp1`, … `tmp9`.
pub fn reserved_names() -> impl Iterator<Item = String> {
    (0..TEMP_COUNT).map(|i| format!("{TEMP_PREFIX}{i}"))
}

pub fn is_reserved_name(name: &str) -> bool {
    match name.strip_prefix(TEMP_PREFIX) {
        Some(digit) => digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit(),
        None => false,
    }
}

/// Source of identifiers that never repeat within one generation run.
pub trait TempIdSource {
    fn next_id(&mut self) -> String;
}

/// `tmp_` followed by the 32 hex digits of a random UUIDv4.
#[derive(Debug, Default)]
pub struct RandomIds;

impl RandomIds {
    pub fn new() -> Self {
        Self
    }
}

impl TempIdSource for RandomIds {
    fn next_id(&mut self) -> String {
        format!("tmp_{}", Uuid::new_v4().simple())
    }
}

/// `tmp_<salt>_<n>` with a per-run counter.
#[derive(Debug)]
pub struct SequentialIds {
    salt: String,
    counter: u64,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl SequentialIds {
    /// Salt derived from the process id and the current time.
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Self::with_salt(format!("{:x}{:x}", std::process::id(), nanos & 0xffff_ffff))
    }

    /// Fixed salt, for reproducible output.
    pub fn with_salt(salt: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            counter: 0,
        }
    }
}

impl TempIdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("tmp_{}_{}", self.salt, self.counter);
        self.counter += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_reserved_names() {
        let names: Vec<_> = reserved_names().collect();
        assert_eq!(names.len(), TEMP_COUNT);
        assert_eq!(names[0], "tmp0");
        assert_eq!(names[9], "tmp9");
    }

    #[test]
    fn test_is_reserved_name() {
        assert!(is_reserved_name("tmp0"));
        assert!(is_reserved_name("tmp9"));
        assert!(!is_reserved_name("tmp10"));
        assert!(!is_reserved_name("tmp"));
        assert!(!is_reserved_name("tmpx"));
        assert!(!is_reserved_name("tmp+1"));
        assert!(!is_reserved_name("temp0"));
    }

    #[test]
    fn test_random_ids_shape() {
        let id = RandomIds::new().next_id();
        assert_eq!(id.len(), "tmp_".len() + 32);
        assert!(id["tmp_".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_random_ids_do_not_collide() {
        let mut source = RandomIds::new();
        let ids: HashSet<_> = (0..10_000 * TEMP_COUNT).map(|_| source.next_id()).collect();
        assert_eq!(ids.len(), 10_000 * TEMP_COUNT);
    }

    #[test]
    fn test_sequential_ids_with_fixed_salt() {
        let mut source = SequentialIds::with_salt("ab");
        assert_eq!(source.next_id(), "tmp_ab_0");
        assert_eq!(source.next_id(), "tmp_ab_1");
    }

    #[test]
    fn test_sequential_ids_are_identifiers() {
        let mut source = SequentialIds::new();
        assert!(crate::utils::is_identifier(&source.next_id()));
    }
}
