//! Query flags for filtering which objects a query may return
//!
//! Every registered object carries a set of flags and every query carries a
//! mask. An object takes part in a query when the two share at least one bit.
//! Bits 0-7 have conventional meanings; the rest are free for applications.

bitflags::bitflags! {
    /// Per-object flags and per-query masks
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct QueryFlags: u32 {
        /// Static scenery
        const STATIC = 1 << 0;
        /// Moving objects
        const DYNAMIC = 1 << 1;
        /// Objects the user may pick with rays
        const PICKABLE = 1 << 2;
        /// Trigger volumes
        const TRIGGER = 1 << 3;
        /// Debug helpers
        const DEBUG = 1 << 7;

        // Any other bit is an application-defined layer
        const _ = !0;
    }
}

impl QueryFlags {
    /// Check whether an object with these flags passes a query `mask`
    pub fn matches(self, mask: QueryFlags) -> bool {
        self.intersects(mask)
    }

    /// Flags for an application-defined layer bit (0-31)
    pub fn layer(bit: u32) -> Self {
        Self::from_bits_retain(1u32.checked_shl(bit).unwrap_or(0))
    }
}

impl Default for QueryFlags {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_everything() {
        assert!(QueryFlags::default().matches(QueryFlags::PICKABLE));
        assert!(QueryFlags::STATIC.matches(QueryFlags::all()));
    }

    #[test]
    fn test_disjoint_flags_do_not_match() {
        assert!(!QueryFlags::STATIC.matches(QueryFlags::DYNAMIC));
        assert!(!QueryFlags::all().matches(QueryFlags::empty()));
    }

    #[test]
    fn test_custom_layers() {
        let layer = QueryFlags::layer(20);
        assert_eq!(layer.bits(), 1 << 20);
        assert!(layer.matches(QueryFlags::from_bits_retain(1 << 20 | 1)));
        assert!(QueryFlags::layer(40).is_empty());
    }
}
