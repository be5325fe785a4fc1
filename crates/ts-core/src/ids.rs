//! Typed identifiers.
//!
//! Ids are plain `u32` newtypes: `Copy + Ord + Hash`, printable, and cheap to
//! store in snapshots and CSV rows.  Graph ids double as indices into the
//! planning graph's arrays.

use std::fmt;

/// Generate a `u32` id newtype with index conversions.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Id for array position `i`.
            #[inline]
            pub fn from_index(i: usize) -> Self {
                debug_assert!(i <= u32::MAX as usize, "{} index overflows u32", stringify!($name));
                Self(i as u32)
            }

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The id after this one.
            #[inline]
            pub fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Identifier of a simulated model instance (an agent).
    ///
    /// Assigned sequentially by the simulation driver and never reused, so a
    /// retired agent's id stays unambiguous in output files.
    pub struct ModelId;
}

typed_id! {
    /// Index of a node in a building's planning graph.
    pub struct NodeId;
}

typed_id! {
    /// Index of a directed planning-graph edge.
    pub struct EdgeId;
}
