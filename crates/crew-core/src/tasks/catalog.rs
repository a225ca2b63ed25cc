//! The fixed set of tasks that can be dealt at the start of a game.

use crate::model::card::Card;
use crate::model::suit::Suit;
use crate::tasks::TaskId;
use crate::tasks::expr::{
    CardFilter, Comparison, Count, Rival, TaskExpr, TrickNo, TrickTest, exact_cards, exact_tricks,
    last, not_nth, nth, trick_with, win, win_all, won_cards,
};
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDescriptor {
    pub id: TaskId,
    pub text: &'static str,
    pub subtext: &'static str,
    /// Weight for 3, 4 and 5 players. `None` keeps the task out of that table size.
    pub difficulty: [Option<u8>; 3],
    pub expr: TaskExpr,
    /// The claiming player must attach a number (see `attach_data`).
    pub requires_input: bool,
}

impl TaskDescriptor {
    pub fn difficulty_at(&self, index: usize) -> Option<u8> {
        self.difficulty.get(index).copied().flatten()
    }

    fn subtext(mut self, subtext: &'static str) -> Self {
        self.subtext = subtext;
        self
    }

    fn with_input(mut self) -> Self {
        self.requires_input = true;
        self
    }

    fn not_for(mut self, index: usize) -> Self {
        self.difficulty[index] = None;
        self
    }
}

static CATALOG: Lazy<Vec<TaskDescriptor>> = Lazy::new(build);

pub fn catalog() -> &'static [TaskDescriptor] {
    &CATALOG
}

pub fn descriptor(id: TaskId) -> Option<&'static TaskDescriptor> {
    let index = usize::from(id.0).checked_sub(1)?;
    CATALOG.get(index).filter(|d| d.id == id)
}

pub fn all_ids() -> impl Iterator<Item = TaskId> {
    CATALOG.iter().map(|d| d.id)
}

fn blue(rank: u8) -> Card {
    Card::new(rank, Suit::Blue)
}

fn green(rank: u8) -> Card {
    Card::new(rank, Suit::Green)
}

fn pink(rank: u8) -> Card {
    Card::new(rank, Suit::Pink)
}

fn yellow(rank: u8) -> Card {
    Card::new(rank, Suit::Yellow)
}

fn suit(suit: Suit) -> CardFilter {
    CardFilter::Suit(suit)
}

fn rank(rank: u8) -> CardFilter {
    CardFilter::Rank(rank)
}

fn no_lead(filters: Vec<CardFilter>) -> TaskExpr {
    TaskExpr::NoLeadWith(CardFilter::AnyOf(filters))
}

fn nth_with(trick: TrickNo, test: TrickTest) -> TaskExpr {
    TaskExpr::NthTrick {
        trick,
        won: true,
        test: Some(test),
    }
}

fn tricks_vs(rival: Rival, cmp: Comparison) -> TaskExpr {
    TaskExpr::CompareTricks { rival, cmp }
}

fn cards_vs(filter: CardFilter, rival: Rival, cmp: Comparison) -> TaskExpr {
    TaskExpr::CompareCards { filter, rival, cmp }
}

fn own(left: CardFilter, right: CardFilter, cmp: Comparison) -> TaskExpr {
    TaskExpr::CompareOwnCards { left, right, cmp }
}

fn build() -> Vec<TaskDescriptor> {
    use Comparison::{Equal, Greater, Less};
    use Suit::{Blue, Green, Pink, Trump, Yellow};

    let entries: Vec<(&'static str, [u8; 3], TaskExpr)> = vec![
        // single cards
        ("I will win the pink 3", [1, 1, 1], win(pink(3))),
        ("I will win the green 6", [1, 1, 1], win(green(6))),
        ("I will win the blue 9", [1, 1, 1], win(blue(9))),
        ("I will win the yellow 1", [2, 2, 2], win(yellow(1))),
        ("I will win the blue 4", [1, 1, 1], win(blue(4))),
        ("I will win the yellow 7", [1, 1, 1], win(yellow(7))),
        ("I will win the green 2", [2, 2, 2], win(green(2))),
        ("I will win the trump 3", [3, 3, 3], win(Card::trump(3))),
        ("I will win the trump 1", [3, 3, 4], win(Card::trump(1))),
        // card combinations
        ("I will win the pink 1 and the green 7", [2, 3, 3], win_all(&[pink(1), green(7)])),
        ("I will win the yellow 9 and the blue 7", [3, 3, 3], win_all(&[yellow(9), blue(7)])),
        ("I will win the green 5 and the blue 6", [2, 2, 3], win_all(&[green(5), blue(6)])),
        ("I will win the pink 8 and the yellow 5", [2, 2, 3], win_all(&[pink(8), yellow(5)])),
        ("I will win the pink 9 and the yellow 8", [2, 3, 3], win_all(&[pink(9), yellow(8)])),
        ("I will win the blue 1, the blue 2 and the blue 3", [2, 3, 3], win_all(&[blue(1), blue(2), blue(3)])),
        ("I will win the green 9, the yellow 9 and the pink 9", [3, 4, 5], win_all(&[green(9), yellow(9), pink(9)])),
        ("I will win all four 3s", [3, 4, 5], win_all(&[blue(3), green(3), pink(3), yellow(3)])),
        ("I will win the pink 5 or the yellow 6", [1, 1, 1], TaskExpr::Any(vec![win(pink(5)), win(yellow(6))])),
        ("I will win the blue 8 or the green 8", [1, 1, 1], TaskExpr::Any(vec![win(blue(8)), win(green(8))])),
        ("I will win the green 3 and the last trick", [3, 4, 4], TaskExpr::All(vec![win(green(3)), last()])),
        ("I will win the yellow 2 and the first trick", [3, 3, 4], TaskExpr::All(vec![win(yellow(2)), nth(1)])),
        // trick counts
        ("I will win no tricks", [3, 3, 3], exact_tricks(0)),
        ("I will win exactly 1 trick", [3, 2, 2], exact_tricks(1)),
        ("I will win exactly 2 tricks", [2, 2, 3], exact_tricks(2)),
        ("I will win exactly 4 tricks", [3, 3, 4], exact_tricks(4)),
        ("I will win exactly 5 tricks", [3, 4, 4], exact_tricks(5)),
        ("I will win more tricks than the leader", [2, 2, 3], tricks_vs(Rival::Leader, Greater)),
        ("I will win fewer tricks than the leader", [2, 2, 2], tricks_vs(Rival::Leader, Less)),
        ("I will win as many tricks as the leader", [3, 3, 4], tricks_vs(Rival::Leader, Equal)),
        ("I will win more tricks than everyone else", [3, 3, 4], tricks_vs(Rival::EachOther, Greater)),
        ("I will win fewer tricks than everyone else", [2, 2, 3], tricks_vs(Rival::EachOther, Less)),
        ("I will win exactly 1 trick and it will be the last", [3, 3, 4], TaskExpr::All(vec![exact_tricks(1), last()])),
        ("I will win exactly 2 tricks and they will be in a row", [3, 3, 3], TaskExpr::All(vec![exact_tricks(2), TaskExpr::Streak(2)])),
        ("I will win either 0 or 1 tricks", [2, 2, 2], TaskExpr::Any(vec![exact_tricks(0), exact_tricks(1)])),
        // trick positions
        ("I will win the first trick", [1, 1, 2], nth(1)),
        ("I will win the last trick", [2, 2, 3], last()),
        ("I will win the first and the last trick", [3, 4, 4], TaskExpr::All(vec![nth(1), last()])),
        ("I will win the first two tricks", [1, 1, 2], TaskExpr::All(vec![nth(1), nth(2)])),
        ("I will win the first three tricks", [2, 3, 4], TaskExpr::All(vec![nth(1), nth(2), nth(3)])),
        ("I will win none of the first four tricks", [1, 2, 2], TaskExpr::All(vec![not_nth(1), not_nth(2), not_nth(3), not_nth(4)])),
        ("I will not win the last trick", [1, 1, 1], TaskExpr::NthTrick { trick: TrickNo::Last, won: false, test: None }),
        ("I will win the second trick", [1, 2, 2], nth(2)),
        ("I will win the first trick with a 1", [4, 3, 3], nth_with(TrickNo::Nth(1), TrickTest::WinningRank(1))),
        ("I will win the last trick with a trump", [3, 3, 3], nth_with(TrickNo::Last, TrickTest::WinningTrump)),
        ("I will win the last trick with a 5", [3, 4, 4], nth_with(TrickNo::Last, TrickTest::WinningRank(5))),
        // runs
        ("I will win 2 tricks in a row", [1, 1, 1], TaskExpr::Streak(2)),
        ("I will win 3 tricks in a row", [2, 3, 3], TaskExpr::Streak(3)),
        ("I will win 4 tricks in a row", [3, 4, 4], TaskExpr::Streak(4)),
        // won cards
        ("I will win no pink cards", [2, 2, 2], exact_cards(0, suit(Pink))),
        ("I will win no yellow cards", [2, 2, 2], exact_cards(0, suit(Yellow))),
        ("I will win no green cards", [2, 2, 2], exact_cards(0, suit(Green))),
        ("I will win no 9s", [2, 2, 3], exact_cards(0, rank(9))),
        ("I will win no 1s", [2, 2, 2], exact_cards(0, rank(1))),
        ("I will win no 5s", [1, 2, 2], exact_cards(0, rank(5))),
        ("I will win no trump cards", [1, 1, 1], exact_cards(0, suit(Trump))),
        ("I will win exactly 1 trump card", [3, 3, 3], exact_cards(1, suit(Trump))),
        ("I will win exactly 2 trump cards", [3, 3, 4], exact_cards(2, suit(Trump))),
        ("I will win exactly 1 pink card", [2, 2, 3], exact_cards(1, suit(Pink))),
        ("I will win exactly 2 blue cards", [2, 3, 3], exact_cards(2, suit(Blue))),
        ("I will win exactly 3 6s", [3, 4, 4], exact_cards(3, rank(6))),
        ("I will win at least 5 pink cards", [2, 3, 3], won_cards(5, suit(Pink))),
        ("I will win at least 7 yellow cards", [3, 3, 4], won_cards(7, suit(Yellow))),
        ("I will win at least 3 9s", [2, 3, 4], won_cards(3, rank(9))),
        ("I will win all four 1s", [3, 4, 4], won_cards(4, rank(1))),
        ("I will win no green and no yellow cards", [3, 3, 4], TaskExpr::All(vec![exact_cards(0, suit(Green)), exact_cards(0, suit(Yellow))])),
        ("I will win no 8s and no 9s", [3, 3, 3], TaskExpr::All(vec![exact_cards(0, rank(8)), exact_cards(0, rank(9))])),
        // own comparisons
        ("I will win more pink cards than green cards", [1, 1, 1], own(suit(Pink), suit(Green), Greater)),
        ("I will win more yellow cards than blue cards", [1, 1, 1], own(suit(Yellow), suit(Blue), Greater)),
        ("I will win as many pink cards as yellow cards", [2, 2, 2], TaskExpr::All(vec![own(suit(Pink), suit(Yellow), Equal), won_cards(1, suit(Pink))])),
        ("I will win more 9s than 1s", [1, 1, 1], own(rank(9), rank(1), Greater)),
        ("I will win fewer blue cards than green cards", [1, 1, 1], own(suit(Blue), suit(Green), Less)),
        // card comparisons against others
        ("I will win more trump cards than anyone else", [3, 3, 3], cards_vs(suit(Trump), Rival::EachOther, Greater)),
        ("I will win more pink cards than the leader", [2, 2, 2], cards_vs(suit(Pink), Rival::Leader, Greater)),
        ("I will win fewer 9s than everyone else", [2, 2, 3], cards_vs(rank(9), Rival::EachOther, Less)),
        ("I will win more green cards than everyone else", [3, 3, 4], cards_vs(suit(Green), Rival::EachOther, Greater)),
        // single-trick conditions
        ("I will win a trick whose cards total more than 23", [3, 2, 2], trick_with(TrickTest::SumAtLeast(24))),
        ("I will win a trick whose cards total less than 8", [3, 3, 4], trick_with(TrickTest::SumAtMost(7))),
        ("I will win a trick whose cards total 22 or 23", [3, 3, 4], trick_with(TrickTest::All(vec![TrickTest::SumAtLeast(22), TrickTest::SumAtMost(23)]))),
        ("I will win a trick in which every card is above 5", [2, 3, 4], trick_with(TrickTest::AllAbove(5))),
        ("I will win a trick in which every card is below 7", [2, 3, 3], trick_with(TrickTest::AllBelow(7))),
        ("I will win a trick of only odd cards", [2, 3, 4], trick_with(TrickTest::AllOdd)),
        ("I will win a trick of only even cards", [2, 3, 4], trick_with(TrickTest::AllEven)),
        ("I will win a trick with a 6", [2, 3, 3], trick_with(TrickTest::WinningRank(6))),
        ("I will win a trick with a 3", [3, 4, 4], trick_with(TrickTest::WinningRank(3))),
        ("I will win a trick with a 5", [2, 3, 4], trick_with(TrickTest::WinningRank(5))),
        ("I will capture a 7 with a 5", [3, 3, 4], trick_with(TrickTest::All(vec![TrickTest::WinningRank(5), TrickTest::ContainsRank(7)]))),
        ("I will capture a 9 with a trump", [2, 3, 3], trick_with(TrickTest::All(vec![TrickTest::WinningTrump, TrickTest::ContainsRank(9)]))),
        ("I will win a trick without trump that holds the green 1", [2, 2, 3], trick_with(TrickTest::All(vec![TrickTest::NoTrump, TrickTest::Contains(green(1))]))),
        // leads
        ("I will not lead a trick with pink or green", [3, 3, 3], no_lead(vec![suit(Pink), suit(Green)])),
        ("I will not lead a trick with pink, yellow or blue", [4, 4, 4], no_lead(vec![suit(Pink), suit(Yellow), suit(Blue)])),
        ("I will not lead a trick with a trump", [1, 1, 1], no_lead(vec![suit(Trump)])),
        ("I will not lead a trick with a 9", [1, 1, 1], no_lead(vec![rank(9)])),
    ];

    let mut tasks: Vec<TaskDescriptor> = entries
        .into_iter()
        .enumerate()
        .map(|(index, (text, weights, expr))| TaskDescriptor {
            id: TaskId(index as u16 + 1),
            text,
            subtext: "",
            difficulty: weights.map(Some),
            expr,
            requires_input: false,
        })
        .collect();

    let next = |tasks: &Vec<TaskDescriptor>| TaskId(tasks.len() as u16 + 1);

    let announced = TaskDescriptor {
        id: next(&tasks),
        text: "I will win exactly X tricks",
        subtext: "",
        difficulty: [Some(3), Some(3), Some(3)],
        expr: TaskExpr::ExactTricks(Count::Declared),
        requires_input: false,
    }
    .subtext("Choose X before the first trick and tell everyone")
    .with_input();
    tasks.push(announced);

    let secret = TaskDescriptor {
        id: next(&tasks),
        text: "I will win exactly X tricks, X kept secret",
        subtext: "",
        difficulty: [Some(4), Some(3), Some(3)],
        expr: TaskExpr::ExactTricks(Count::Declared),
        requires_input: false,
    }
    .subtext("Choose X before the first trick and keep it hidden")
    .with_input();
    tasks.push(secret);

    // Five players only play eight tricks.
    let long_run = TaskDescriptor {
        id: next(&tasks),
        text: "I will win 5 tricks in a row",
        subtext: "",
        difficulty: [Some(4), Some(4), Some(4)],
        expr: TaskExpr::Streak(5),
        requires_input: false,
    }
    .not_for(2);
    tasks.push(long_run);

    let six_tricks = TaskDescriptor {
        id: next(&tasks),
        text: "I will win exactly 6 tricks",
        subtext: "",
        difficulty: [Some(4), Some(4), Some(4)],
        expr: exact_tricks(6),
        requires_input: false,
    }
    .not_for(1)
    .not_for(2);
    tasks.push(six_tricks);

    tasks
}
