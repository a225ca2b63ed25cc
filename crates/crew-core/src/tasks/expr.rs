//! Task conditions as data.
//!
//! Every catalog task is a [`TaskExpr`] tree: primitive tests on the trick
//! history joined by [`TaskExpr::All`] and [`TaskExpr::Any`]. The tree is
//! interpreted by [`crate::tasks::eval::evaluate`].

use crate::model::card::Card;
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use serde::{Deserialize, Serialize};

/// Which cards a count or a lead restriction is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardFilter {
    Suit(Suit),
    /// Ordinary cards of this rank. Trump cards never match a rank.
    Rank(u8),
    AnyOf(Vec<CardFilter>),
}

impl CardFilter {
    pub fn matches(&self, card: &Card) -> bool {
        match self {
            CardFilter::Suit(suit) => card.suit == *suit,
            CardFilter::Rank(rank) => !card.is_trump() && card.rank == *rank,
            CardFilter::AnyOf(filters) => filters.iter().any(|f| f.matches(card)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Equal,
    Greater,
    Less,
}

impl Comparison {
    pub fn holds(self, mine: usize, theirs: usize) -> bool {
        match self {
            Comparison::Equal => mine == theirs,
            Comparison::Greater => mine > theirs,
            Comparison::Less => mine < theirs,
        }
    }
}

/// Whose tally a comparative task is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rival {
    /// The player holding the leader role.
    Leader,
    /// Every other player individually.
    EachOther,
}

/// A trick count fixed by the catalog or declared by the claiming player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Count {
    Fixed(u8),
    Declared,
}

impl Count {
    pub fn resolve(self, data: Option<u8>) -> Option<u8> {
        match self {
            Count::Fixed(n) => Some(n),
            Count::Declared => data,
        }
    }
}

/// 1-based trick number, or the final trick of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrickNo {
    Nth(usize),
    Last,
}

impl TrickNo {
    pub fn resolve(self, last: usize) -> usize {
        match self {
            TrickNo::Nth(n) => n,
            TrickNo::Last => last,
        }
    }
}

/// A condition on the cards of a single completed trick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrickTest {
    SumAtLeast(u32),
    SumAtMost(u32),
    AllAbove(u8),
    AllBelow(u8),
    AllOdd,
    AllEven,
    /// The winning card is an ordinary card of this rank.
    WinningRank(u8),
    WinningTrump,
    Contains(Card),
    ContainsRank(u8),
    NoTrump,
    All(Vec<TrickTest>),
}

impl TrickTest {
    pub fn check(&self, trick: &Trick, player_count: usize) -> bool {
        match self {
            TrickTest::SumAtLeast(n) => trick.rank_sum() >= *n,
            TrickTest::SumAtMost(n) => trick.rank_sum() <= *n,
            TrickTest::AllAbove(n) => trick.cards.iter().all(|c| c.rank > *n),
            TrickTest::AllBelow(n) => trick.cards.iter().all(|c| c.rank < *n),
            TrickTest::AllOdd => trick.cards.iter().all(|c| c.rank % 2 == 1),
            TrickTest::AllEven => trick.cards.iter().all(|c| c.rank % 2 == 0),
            TrickTest::WinningRank(rank) => trick
                .winning_card(player_count)
                .is_some_and(|c| !c.is_trump() && c.rank == *rank),
            TrickTest::WinningTrump => trick
                .winning_card(player_count)
                .is_some_and(|c| c.is_trump()),
            TrickTest::Contains(card) => trick.contains(*card),
            TrickTest::ContainsRank(rank) => trick
                .cards
                .iter()
                .any(|c| CardFilter::Rank(*rank).matches(c)),
            TrickTest::NoTrump => !trick.cards.iter().any(|c| c.is_trump()),
            TrickTest::All(tests) => tests.iter().all(|t| t.check(trick, player_count)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskExpr {
    /// Win the trick that contains this card.
    WinCard(Card),
    /// Win exactly this many tricks over the whole game.
    ExactTricks(Count),
    CompareTricks {
        rival: Rival,
        cmp: Comparison,
    },
    CompareCards {
        filter: CardFilter,
        rival: Rival,
        cmp: Comparison,
    },
    /// Compare two of the owner's own won-card tallies.
    CompareOwnCards {
        left: CardFilter,
        right: CardFilter,
        cmp: Comparison,
    },
    /// Win this many tricks in a row.
    Streak(usize),
    CardCount {
        count: usize,
        filter: CardFilter,
        exact: bool,
    },
    /// Win some trick that passes the test.
    WonTrickWith(TrickTest),
    NthTrick {
        trick: TrickNo,
        won: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        test: Option<TrickTest>,
    },
    /// Never lead a trick with a matching card.
    NoLeadWith(CardFilter),
    All(Vec<TaskExpr>),
    Any(Vec<TaskExpr>),
}

impl TaskExpr {
    /// Lead restrictions can fail before a trick completes.
    pub fn needs_per_play(&self) -> bool {
        match self {
            TaskExpr::NoLeadWith(_) => true,
            TaskExpr::All(children) | TaskExpr::Any(children) => {
                children.iter().any(TaskExpr::needs_per_play)
            }
            _ => false,
        }
    }
}

pub fn win(card: Card) -> TaskExpr {
    TaskExpr::WinCard(card)
}

pub fn win_all(cards: &[Card]) -> TaskExpr {
    TaskExpr::All(cards.iter().copied().map(win).collect())
}

pub fn exact_tricks(n: u8) -> TaskExpr {
    TaskExpr::ExactTricks(Count::Fixed(n))
}

pub fn won_cards(count: usize, filter: CardFilter) -> TaskExpr {
    TaskExpr::CardCount {
        count,
        filter,
        exact: false,
    }
}

pub fn exact_cards(count: usize, filter: CardFilter) -> TaskExpr {
    TaskExpr::CardCount {
        count,
        filter,
        exact: true,
    }
}

pub fn nth(n: usize) -> TaskExpr {
    TaskExpr::NthTrick {
        trick: TrickNo::Nth(n),
        won: true,
        test: None,
    }
}

pub fn not_nth(n: usize) -> TaskExpr {
    TaskExpr::NthTrick {
        trick: TrickNo::Nth(n),
        won: false,
        test: None,
    }
}

pub fn last() -> TaskExpr {
    TaskExpr::NthTrick {
        trick: TrickNo::Last,
        won: true,
        test: None,
    }
}

pub fn trick_with(test: TrickTest) -> TaskExpr {
    TaskExpr::WonTrickWith(test)
}
