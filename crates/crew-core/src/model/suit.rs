use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Suit {
    Blue = 0,
    Green = 1,
    Pink = 2,
    Yellow = 3,
    Trump = 4,
}

impl Suit {
    /// Display order used when sorting hands.
    pub const ALL: [Suit; 5] = [
        Suit::Blue,
        Suit::Green,
        Suit::Pink,
        Suit::Yellow,
        Suit::Trump,
    ];

    pub const ORDINARY: [Suit; 4] = [Suit::Blue, Suit::Green, Suit::Pink, Suit::Yellow];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Blue),
            1 => Some(Suit::Green),
            2 => Some(Suit::Pink),
            3 => Some(Suit::Yellow),
            4 => Some(Suit::Trump),
            _ => None,
        }
    }

    pub const fn is_trump(self) -> bool {
        matches!(self, Suit::Trump)
    }

    pub const fn max_rank(self) -> u8 {
        if self.is_trump() { 4 } else { 9 }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Suit::Blue => "blue",
            Suit::Green => "green",
            Suit::Pink => "pink",
            Suit::Yellow => "yellow",
            Suit::Trump => "trump",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Blue => "B",
            Suit::Green => "G",
            Suit::Pink => "P",
            Suit::Yellow => "Y",
            Suit::Trump => "T",
        };
        f.write_str(symbol)
    }
}
