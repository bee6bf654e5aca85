use crate::types::Distance;

/// A component was substituted for another.
pub const COST_RADICAL: Distance = 1.0;
/// A shared component sits on the opposite side.
pub const COST_SIDE: Distance = 0.5;
/// The composition type differs.
pub const COST_COMPOSITION: Distance = 0.25;
/// Per stroke of difference, only when stroke costs are enabled.
pub const COST_STROKE: Distance = 0.01;

/// Leading bytes of every snapshot file.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"RADG";
/// Bumped whenever the snapshot body layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;
/// Magic followed by a little-endian `u32` version.
pub const SNAPSHOT_HEADER_SIZE: usize = 8;

/// Raw composition table used when no path is configured.
pub const DEFAULT_RAW_FILE: &str = "rads.json";
/// Snapshot file used when no path is configured.
pub const DEFAULT_SNAPSHOT_FILE: &str = "radicals.snapshot";

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    #[test]
    fn test_SNAPSHOT_HEADER_SIZE() {
        use std::mem;

        let c = SNAPSHOT_MAGIC.len() + mem::size_of_val(&SNAPSHOT_VERSION);

        assert!(SNAPSHOT_HEADER_SIZE == c);
    }

    #[test]
    fn test_cost_ordering() {
        assert!(COST_STROKE < COST_COMPOSITION);
        assert!(COST_COMPOSITION < COST_SIDE);
        assert!(COST_SIDE < COST_RADICAL);
    }
}
