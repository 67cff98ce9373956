//! Compass-named attachment points on a track node.
//!
//! Map files encode ports as single characters (`"n"`, `"w"`, `"s"`, `"e"`).
//! Anything else is rejected with [`CoreError::Config`] before any node is
//! touched.

use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// One of the four directional ports of a node.
///
/// The declaration order is the fixed resolution order used wherever a
/// lookup must pick "the first" matching port: north, west, south, east.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Port {
    North,
    West,
    South,
    East,
}

impl Port {
    /// All ports in resolution order.
    pub const ALL: [Port; 4] = [Port::North, Port::West, Port::South, Port::East];

    /// Slot of this port in a `[T; 4]` port table.
    #[inline]
    pub fn slot(self) -> usize {
        match self {
            Port::North => 0,
            Port::West  => 1,
            Port::South => 2,
            Port::East  => 3,
        }
    }

    /// Map-file character for this port.
    pub fn as_char(self) -> char {
        match self {
            Port::North => 'n',
            Port::West  => 'w',
            Port::South => 's',
            Port::East  => 'e',
        }
    }

    /// Parse a map-file port string.
    pub fn parse(s: &str) -> CoreResult<Port> {
        match s {
            "n" => Ok(Port::North),
            "w" => Ok(Port::West),
            "s" => Ok(Port::South),
            "e" => Ok(Port::East),
            other => Err(CoreError::Config(format!(
                "no port with character {other:?}: expected one of \"n\", \"w\", \"s\", \"e\""
            ))),
        }
    }
}

impl FromStr for Port {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Port> {
        Port::parse(s)
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
