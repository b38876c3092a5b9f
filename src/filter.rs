//! Category filtering for the gallery grid.

use std::time::{Duration, Instant};

use url::form_urlencoded;

use crate::easing::{CubicBezier, lerp};
use crate::{ALL_CATEGORIES, Artwork};

/// Length of the fade shown when a card becomes visible.
pub const CARD_FADE: Duration = Duration::from_millis(400);

/// Vertical offset a card slides up from while fading in.
pub const CARD_SLIDE: f32 = 10.0;

/// How a visible card is drawn at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardStyle {
    pub opacity: f32,
    pub offset_y: f32,
}

impl CardStyle {
    pub const SETTLED: Self = Self {
        opacity: 1.0,
        offset_y: 0.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CardState {
    Hidden,
    /// Visible; fading in from the given instant when set.
    Shown(Option<Instant>),
}

/// Active filter tab and per-card visibility.
#[derive(Debug, Clone)]
pub struct GalleryFilter {
    active: Option<String>,
    cards: Vec<CardState>,
}

impl GalleryFilter {
    /// All cards visible, no tab selected.
    pub fn new(card_count: usize) -> Self {
        Self {
            active: None,
            cards: vec![CardState::Shown(None); card_count],
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, slug: &str) -> bool {
        self.active.as_deref() == Some(slug)
    }

    /// Selects `category` and shows only the matching cards.
    ///
    /// `known` lists the tab slugs; selecting an unknown slug leaves no tab
    /// highlighted, and since no card matches it every card is hidden.
    pub fn select(&mut self, category: &str, known: &[&str], cards: &[Artwork], now: Instant) {
        self.active = known
            .contains(&category)
            .then(|| category.to_owned());
        if self.active.is_none() {
            log::warn!("Unknown gallery category '{category}'");
        }

        self.cards = cards
            .iter()
            .map(|card| {
                if category == ALL_CATEGORIES || card.category == category {
                    CardState::Shown(Some(now))
                } else {
                    CardState::Hidden
                }
            })
            .collect();
    }

    /// Style for card `index`, or `None` if it is filtered out.
    pub fn card_style(&self, index: usize, now: Instant) -> Option<CardStyle> {
        match self.cards.get(index)? {
            CardState::Hidden => None,
            CardState::Shown(None) => Some(CardStyle::SETTLED),
            CardState::Shown(Some(started)) => {
                let t = now.duration_since(*started).as_secs_f32() / CARD_FADE.as_secs_f32();
                let eased = CubicBezier::EASE.apply(t.min(1.0));
                Some(CardStyle {
                    opacity: eased,
                    offset_y: lerp(CARD_SLIDE, 0.0, eased),
                })
            }
        }
    }

    pub fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, state)| matches!(state, CardState::Shown(_)))
            .map(|(index, _)| index)
    }

    /// Whether any card is still fading at `now`.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.cards.iter().any(|state| match state {
            CardState::Shown(Some(started)) => now.duration_since(*started) < CARD_FADE,
            _ => false,
        })
    }
}

/// Extracts the `category` parameter from a query string or link.
///
/// Accepts `?category=prints`, `category=prints&x=1` or a full link such as
/// `gallery://art?category=prints`. An empty value counts as absent.
pub fn initial_category(link: &str) -> Option<String> {
    let query = link.split_once('?').map_or(link, |(_, query)| query);
    let query = query.split_once('#').map_or(query, |(query, _)| query);

    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "category")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
