use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Accumulated similarity cost between two characters.
pub type Distance = f32;

/// Number of strokes in a character. Zero means unknown.
pub type StrokeCount = u32;

/// Opaque tag describing how two components combine (e.g. left-right).
pub type CompositionType = SmolStr;

/// Slot of a node in the graph arena.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[serde(transparent)]
pub struct NodeIndex(pub(crate) u32);

impl NodeIndex {
    #[inline(always)]
    pub(crate) fn new(index: usize) -> Self {
        NodeIndex(index as u32)
    }

    #[inline(always)]
    pub(crate) fn get(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of a composition a component sits on.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Side {
    /// First component of the pair
    Left,
    /// Second component of the pair
    Right,
}

impl Side {
    /// The other side.
    #[inline(always)]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}
