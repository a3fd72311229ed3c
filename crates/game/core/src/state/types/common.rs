use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a participant (as issued by the lobby layer).
    PlayerId
);
string_id!(
    /// Battle-unique identifier of a piece instance (`red-1`, `blue-3`, ...).
    PieceId
);
string_id!(
    /// Identifier of a skill definition.
    SkillId
);
string_id!(
    /// Battle-unique identifier of a trigger rule.
    RuleId
);
string_id!(
    /// Battle-unique identifier of an attached status effect.
    StatusId
);

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// True when both positions share a row or a column.
    pub fn is_orthogonal_to(self, other: Position) -> bool {
        self.x == other.x || self.y == other.y
    }

    /// Tiles strictly between `self` and `other` along a shared row or column.
    ///
    /// Returns an empty list when the positions are not orthogonal or adjacent.
    pub fn path_between(self, other: Position) -> Vec<Position> {
        if !self.is_orthogonal_to(other) {
            return Vec::new();
        }
        let dx = (other.x - self.x).signum();
        let dy = (other.y - self.y).signum();
        let mut path = Vec::new();
        let mut cursor = Position::new(self.x + dx, self.y + dy);
        while cursor != other {
            path.push(cursor);
            cursor = Position::new(cursor.x + dx, cursor.y + dy);
        }
        path
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Duration or use counter where `-1` means "never runs out".
pub const INFINITE: i32 = -1;

/// Decrements a counter that may be [`INFINITE`], flooring at zero.
pub(crate) fn tick_down(value: i32) -> i32 {
    if value == INFINITE { value } else { (value - 1).max(0) }
}
