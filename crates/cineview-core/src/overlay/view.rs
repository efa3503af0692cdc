//! Presentation model for the detail overlay.

use crate::content::ContentKind;

/// Shown when neither detail nor summary carries an overview.
pub const OVERVIEW_FALLBACK: &str = "No synopsis is available for this title.";

/// Shown in place of a missing image.
pub const NO_IMAGE: &str = "no image";

/// Backdrop slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageView {
    /// Resolved image URL.
    Image(String),
    /// Placeholder text.
    Placeholder(&'static str),
}

/// Profile image slot for one person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    /// Lookup in flight.
    Loading,
    /// Resolved image URL.
    Image(String),
    /// No image, or the lookup failed.
    Placeholder(&'static str),
}

/// One cast or crew row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonView {
    /// TMDB person ID.
    pub person_id: u64,
    /// Name.
    pub name: String,
    /// Character or department.
    pub role: String,
    /// Profile image slot.
    pub avatar: Avatar,
}

/// Cast and crew section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditsView {
    /// Credits pending or failed.
    Loading,
    /// Credits loaded.
    Ready {
        /// Cast rows.
        cast: Vec<PersonView>,
        /// Crew rows.
        crew: Vec<PersonView>,
    },
}

/// Rating block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingView {
    /// Average with one decimal place.
    pub average: String,
    /// Number of votes.
    pub votes: u32,
}

/// Everything the renderer needs to draw the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct OverlayView {
    /// Catalog of the target.
    pub kind: ContentKind,
    /// Title or name, empty until something is known.
    pub title: String,
    /// Backdrop slot.
    pub image: ImageView,
    /// Tagline, if the detail has one.
    pub tagline: Option<String>,
    /// Genre names.
    pub genres: Vec<String>,
    /// Year, runtime, season count.
    pub facts: Vec<String>,
    /// Present only when at least one vote was cast.
    pub rating: Option<RatingView>,
    /// Trimmed overview or the fallback.
    pub overview: String,
    /// Cast and crew.
    pub credits: CreditsView,
    /// Shared transition id of the card that opened the overlay.
    pub transition_id: Option<String>,
    /// Public TMDB page.
    pub web_url: String,
}

/// Formats an average rating with one decimal place.
///
/// Halves round away from zero, so `7.25` reads `7.3`.
#[must_use]
pub fn format_rating(average: f64) -> String {
    let rounded = (average * 10.0).round() / 10.0;
    format!("{rounded:.1}")
}

/// Rating block, or `None` when nobody has voted.
#[must_use]
pub fn rating_view(average: f64, votes: u32) -> Option<RatingView> {
    (votes > 0).then(|| RatingView {
        average: format_rating(average),
        votes,
    })
}

/// Trims the overview, substituting the fallback when nothing is left.
#[must_use]
pub fn overview_text(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_owned(),
        _ => OVERVIEW_FALLBACK.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_hidden_without_votes() {
        assert_eq!(rating_view(8.0, 0), None);
    }

    #[test]
    fn test_rating_one_decimal_place() {
        // Arrange & Act
        let rating = rating_view(7.666, 5);

        // Assert
        assert_eq!(
            rating,
            Some(RatingView {
                average: String::from("7.7"),
                votes: 5
            })
        );
        assert_eq!(format_rating(8.0), "8.0");
    }

    #[test]
    fn test_rating_halves_round_up() {
        assert_eq!(format_rating(7.25), "7.3");
        assert_eq!(format_rating(8.75), "8.8");
    }

    #[test]
    fn test_overview_fallback() {
        assert_eq!(overview_text(Some("   \n\t")), OVERVIEW_FALLBACK);
        assert_eq!(overview_text(None), OVERVIEW_FALLBACK);
        assert_eq!(overview_text(Some("  Neo wakes up. ")), "Neo wakes up.");
    }
}
