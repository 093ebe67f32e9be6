use std::fmt;

const DJB2_SEED: u64 = 5381;

/// DJB2 digest of one diskstats line. Cheap to compare, not collision-proof.
///
/// Zero is reserved for "could not read the record". Real content hashing to
/// zero is possible in theory and is accepted: such a reading is simply
/// treated like an unreadable tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub const UNREADABLE: Fingerprint = Fingerprint(0);

    pub fn of(bytes: &[u8]) -> Self {
        let hash = bytes.iter().fold(DJB2_SEED, |acc, &b| {
            acc.wrapping_shl(5).wrapping_add(acc).wrapping_add(b as u64)
        });
        Fingerprint(hash)
    }

    pub fn is_unreadable(self) -> bool {
        self == Self::UNREADABLE
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for Fingerprint {
    fn from(v: u64) -> Self {
        Fingerprint(v)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

pub fn fingerprint(line: &str) -> Fingerprint {
    Fingerprint::of(line.as_bytes())
}

/// A change is any new reading that differs from the baseline, except the
/// unreadable sentinel, which never counts.
pub fn has_changed(previous: Fingerprint, current: Fingerprint) -> bool {
    current != previous && !current.is_unreadable()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "   8       0 sda 1500 20 98000 700 800 30 64000 900 0 1200 1600";

    #[test]
    fn empty_input_is_the_seed() {
        assert_eq!(fingerprint("").value(), 5381);
        assert!(!fingerprint("").is_unreadable());
    }

    #[test]
    fn matches_reference_djb2() {
        // 5381 * 33 + 'a'
        assert_eq!(fingerprint("a").value(), 177_670);
        // (5381 * 33 + 'a') * 33 + 'b'
        assert_eq!(fingerprint("ab").value(), 5_863_208);
    }

    #[test]
    fn repeatable() {
        assert_eq!(fingerprint(LINE), fingerprint(LINE));
        assert_eq!(Fingerprint::of(LINE.as_bytes()), fingerprint(LINE));
    }

    #[test]
    fn counter_bump_changes_the_fingerprint() {
        let bumped = LINE.replace("1500", "1501");
        assert_ne!(fingerprint(LINE), fingerprint(&bumped));
    }

    #[test]
    fn long_lines_wrap_instead_of_overflowing() {
        let long = "9".repeat(4096);
        assert_eq!(fingerprint(&long), fingerprint(&long));
    }

    #[test]
    fn same_value_is_not_a_change() {
        for v in [1u64, 5381, u64::MAX] {
            let fp = Fingerprint::from(v);
            assert!(!has_changed(fp, fp));
        }
    }

    #[test]
    fn unreadable_never_triggers() {
        assert!(!has_changed(fingerprint(LINE), Fingerprint::UNREADABLE));
        assert!(!has_changed(Fingerprint::UNREADABLE, Fingerprint::UNREADABLE));
    }

    #[test]
    fn differing_readable_value_triggers() {
        assert!(has_changed(Fingerprint::from(1), Fingerprint::from(2)));
        // A zero baseline (source was unreadable at startup) still lets the
        // first real reading register.
        assert!(has_changed(Fingerprint::UNREADABLE, fingerprint(LINE)));
    }

    #[test]
    fn display_is_fixed_width_hex() {
        assert_eq!(Fingerprint::from(0xabc).to_string(), "0000000000000abc");
    }
}
