use super::{BotContext, beats, leading_play, strength};
use crew_core::model::card::Card;

pub struct PlayPlanner;

/// Why a card was picked; reported with every play decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayReason {
    TakeWantedCard,
    FeedTeammate,
    Duck,
    LeadForTeammate,
    LowLead,
    Conserve,
}

impl PlayReason {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayReason::TakeWantedCard => "take_wanted_card",
            PlayReason::FeedTeammate => "feed_teammate",
            PlayReason::Duck => "duck",
            PlayReason::LeadForTeammate => "lead_for_teammate",
            PlayReason::LowLead => "low_lead",
            PlayReason::Conserve => "conserve",
        }
    }
}

impl PlayPlanner {
    /// Picks a hand index out of `legal`.
    pub fn choose(legal: &[usize], ctx: &BotContext<'_>) -> Option<(usize, PlayReason)> {
        let hand = ctx.hand();
        let options: Vec<(usize, Card)> = legal
            .iter()
            .filter_map(|&index| hand.get(index).map(|card| (index, card)))
            .collect();
        if options.is_empty() {
            return None;
        }
        let view = ctx.tasks();
        let count = ctx.state.player_count();

        let Some((trick, (best, holder))) = ctx
            .open_trick()
            .and_then(|t| leading_play(t, count).map(|lead| (t, lead)))
        else {
            return Some(choose_lead(&options, ctx));
        };
        let lead = trick.lead_suit()?;
        let winners: Vec<(usize, Card)> = options
            .iter()
            .copied()
            .filter(|(_, card)| beats(*card, best, lead))
            .collect();
        let losers: Vec<(usize, Card)> = options
            .iter()
            .copied()
            .filter(|(_, card)| !beats(*card, best, lead))
            .collect();

        let wanted_here = trick.cards.iter().any(|c| view.wants(*c))
            || options.iter().any(|(_, c)| view.wants(*c));
        if wanted_here && !view.avoid_tricks {
            if let Some(pick) = weakest(&winners) {
                return Some((pick, PlayReason::TakeWantedCard));
            }
        }

        // A teammate's card is on the table or in hand: let the owner take it.
        let teammate = trick
            .cards
            .iter()
            .chain(options.iter().map(|(_, c)| c))
            .find_map(|c| view.owner_of(*c));
        if let Some(owner) = teammate {
            if holder == owner {
                let gift = options
                    .iter()
                    .copied()
                    .filter(|(_, c)| view.owner_of(*c) == Some(owner) && !beats(*c, best, lead))
                    .max_by_key(|(_, c)| strength(*c));
                if let Some((index, _)) = gift {
                    return Some((index, PlayReason::FeedTeammate));
                }
                if let Some(pick) = weakest(&losers) {
                    return Some((pick, PlayReason::Duck));
                }
            }
        }

        if view.avoid_tricks {
            if let Some(pick) = strongest(&losers) {
                return Some((pick, PlayReason::Duck));
            }
        }
        weakest(&options).map(|pick| (pick, PlayReason::Conserve))
    }
}

fn choose_lead(options: &[(usize, Card)], ctx: &BotContext<'_>) -> (usize, PlayReason) {
    let view = ctx.tasks();
    // Lead low into a suit where a teammate is waiting for a higher card.
    let feed = options
        .iter()
        .copied()
        .filter(|(_, card)| !card.is_trump())
        .filter(|(_, card)| {
            view.team_wanted
                .iter()
                .any(|(want, _)| want.suit == card.suit && want.rank > card.rank)
        })
        .min_by_key(|(_, card)| strength(*card));
    if let Some((index, _)) = feed {
        return (index, PlayReason::LeadForTeammate);
    }
    let ordinary: Vec<(usize, Card)> = options
        .iter()
        .copied()
        .filter(|(_, card)| !card.is_trump() && !view.wants(*card))
        .collect();
    let pick = weakest(&ordinary)
        .or_else(|| weakest(options))
        .unwrap_or(options[0].0);
    (pick, PlayReason::LowLead)
}

fn weakest(options: &[(usize, Card)]) -> Option<usize> {
    options
        .iter()
        .min_by_key(|(_, card)| strength(*card))
        .map(|(index, _)| *index)
}

fn strongest(options: &[(usize, Card)]) -> Option<usize> {
    options
        .iter()
        .max_by_key(|(_, card)| strength(*card))
        .map(|(index, _)| *index)
}
