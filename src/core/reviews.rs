use crate::domain::model::Review;
use crate::domain::ports::Storage;
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::validate_non_empty;
use serde::Deserialize;

pub const REVIEWS_KEY: &str = "johanstyle-reviews";
pub const JUST_NOW: &str = "Hace unos momentos";
pub const STAR_COUNT: u8 = 5;

const EMBEDDED_SEEDS: &str = include_str!("../../data/seed_reviews.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReviewSettings {
    pub max_stored: usize,
    pub page_size: usize,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            max_stored: 50,
            page_size: 6,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    reviews: Vec<Review>,
}

/// The reviews shipped with the page.
pub fn seed_reviews() -> Result<Vec<Review>> {
    let file: SeedFile = toml::from_str(EMBEDDED_SEEDS)?;
    Ok(file.reviews)
}

/// Five-star picker with hover preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StarRating {
    selected: u8,
    preview: Option<u8>,
}

impl StarRating {
    pub fn select(&mut self, rating: u8) -> Result<()> {
        if !(1..=STAR_COUNT).contains(&rating) {
            return Err(SiteError::validation(
                "rating",
                format!("rating must be between 1 and {}", STAR_COUNT),
            ));
        }
        self.selected = rating;
        Ok(())
    }

    pub fn hover(&mut self, rating: u8) {
        self.preview = Some(rating.min(STAR_COUNT));
    }

    pub fn leave(&mut self) {
        self.preview = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn selected(&self) -> u8 {
        self.selected
    }

    /// Star i (0-based) is lit when i < rating.
    pub fn highlighted(&self) -> [bool; STAR_COUNT as usize] {
        let rating = self.preview.unwrap_or(self.selected);
        std::array::from_fn(|i| i < rating as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCard {
    pub review: Review,
    pub initials: String,
}

impl ReviewCard {
    pub fn new(review: Review) -> Self {
        let initials = initials(&review.name);
        Self { review, initials }
    }

    pub fn stars(&self) -> [bool; STAR_COUNT as usize] {
        std::array::from_fn(|i| i < self.review.rating as usize)
    }

    pub fn to_html(&self) -> String {
        let stars: String = self
            .stars()
            .iter()
            .map(|filled| {
                if *filled {
                    r#"<span class="star filled">★</span>"#
                } else {
                    r#"<span class="star ">★</span>"#
                }
            })
            .collect();

        format!(
            r#"<article class="review-card" role="article">
    <div class="review-header">
        <div class="review-author">
            <div class="review-avatar">{initials}</div>
            <div class="review-author-info">
                <h3 class="review-name">{name}</h3>
                <p class="review-date">{date}</p>
            </div>
        </div>
        <div class="review-stars" aria-label="Calificación: {rating} estrellas">{stars}</div>
    </div>
    <p class="review-text">{comment}</p>
</article>"#,
            initials = escape_html(&self.initials),
            name = escape_html(&self.review.name),
            date = escape_html(&self.review.date),
            rating = self.review.rating,
            stars = stars,
            comment = escape_html(&self.review.comment),
        )
    }
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadControls {
    pub container_visible: bool,
    pub more_visible: bool,
    pub less_visible: bool,
}

/// Review list: seed cards first, then stored reviews (newest first) as far
/// as they have been revealed.
pub struct ReviewBoard<S: Storage> {
    storage: S,
    settings: ReviewSettings,
    seeds: Vec<ReviewCard>,
    stored: Vec<Review>,
    shown: usize,
}

impl<S: Storage> ReviewBoard<S> {
    pub async fn load(storage: S, seeds: Vec<Review>, settings: ReviewSettings) -> Self {
        let stored = match storage.read(REVIEWS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Review>>(&raw) {
                Ok(mut reviews) => {
                    reviews.truncate(settings.max_stored);
                    reviews
                }
                Err(e) => {
                    tracing::error!("Stored reviews are corrupt, ignoring them: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!("Error loading reviews: {}", e);
                Vec::new()
            }
        };
        tracing::debug!("Loaded {} stored reviews", stored.len());

        Self {
            storage,
            settings,
            seeds: seeds.into_iter().map(ReviewCard::new).collect(),
            stored,
            shown: 0,
        }
    }

    pub fn seed_count(&self) -> usize {
        self.seeds.len()
    }

    pub fn stored(&self) -> &[Review] {
        &self.stored
    }

    pub fn visible_cards(&self) -> Vec<ReviewCard> {
        self.seeds
            .iter()
            .cloned()
            .chain(self.stored[..self.shown].iter().cloned().map(ReviewCard::new))
            .collect()
    }

    /// Add a visitor review. The card lands right after the seed cards and
    /// the record is prepended to storage.
    pub async fn submit(&mut self, name: &str, rating: u8, comment: &str) -> Result<ReviewCard> {
        let name = name.trim();
        let comment = comment.trim();
        validate_non_empty("name", name)?;
        validate_non_empty("comment", comment)?;
        if rating == 0 || rating > STAR_COUNT {
            return Err(SiteError::validation("rating", "select a rating"));
        }

        let review = Review {
            name: name.to_string(),
            rating,
            comment: comment.to_string(),
            date: JUST_NOW.to_string(),
        };

        self.stored.insert(0, review.clone());
        self.stored.truncate(self.settings.max_stored);
        self.shown = (self.shown + 1).min(self.stored.len());

        if let Err(e) = self.persist().await {
            tracing::error!("Error saving review: {}", e);
        }

        Ok(ReviewCard::new(review))
    }

    async fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.stored)?;
        self.storage.write(REVIEWS_KEY, &json).await
    }

    /// Reveal the next page of stored reviews; returns how many appeared.
    pub fn load_more(&mut self) -> usize {
        let revealed = self
            .settings
            .page_size
            .min(self.stored.len().saturating_sub(self.shown));
        self.shown += revealed;
        revealed
    }

    pub fn load_less(&mut self) {
        self.shown = 0;
    }

    pub fn controls(&self) -> LoadControls {
        let remaining = self.stored.len().saturating_sub(self.shown);
        LoadControls {
            container_visible: remaining > 0 || self.shown > 0,
            more_visible: remaining > 0,
            less_visible: self.shown > 0,
        }
    }
}
