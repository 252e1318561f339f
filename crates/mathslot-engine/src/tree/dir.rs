use serde::{Deserialize, Serialize};

/// Horizontal direction, also used to name the two sides of a node or range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    Left,
    Right,
}

impl Dir {
    pub const fn opposite(self) -> Self {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    /// Index into two-element `[left, right]` arrays.
    pub(crate) const fn index(self) -> usize {
        match self {
            Dir::Left => 0,
            Dir::Right => 1,
        }
    }
}

/// Vertical direction for two-dimensional navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VDir {
    Up,
    Down,
}

impl VDir {
    pub const fn opposite(self) -> Self {
        match self {
            VDir::Up => VDir::Down,
            VDir::Down => VDir::Up,
        }
    }
}
