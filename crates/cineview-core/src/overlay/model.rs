//! Overlay data: full detail and bounded credits.

use cineview_api::tmdb::{TmdbCastMember, TmdbCredits, TmdbCrewMember, TmdbMovieDetails, TmdbShowDetails};

use crate::content::parse_year;

/// Detail record for a movie or show.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailFull {
    /// Title or name.
    pub title: String,
    /// Tagline (absent when TMDB sends an empty one).
    pub tagline: Option<String>,
    /// Genre names in API order.
    pub genres: Vec<String>,
    /// Overview, as delivered.
    pub overview: String,
    /// Backdrop image id.
    pub backdrop_path: Option<String>,
    /// Poster image id.
    pub poster_path: Option<String>,
    /// Average rating.
    pub vote_average: f64,
    /// Number of votes.
    pub vote_count: u32,
    /// Short facts such as year, runtime, or season count.
    pub facts: Vec<String>,
}

impl DetailFull {
    /// Backdrop, falling back to the poster.
    #[must_use]
    pub fn image_id(&self) -> Option<&str> {
        self.backdrop_path
            .as_deref()
            .or(self.poster_path.as_deref())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<TmdbMovieDetails> for DetailFull {
    fn from(d: TmdbMovieDetails) -> Self {
        let mut facts = Vec::new();
        if let Some(year) = d.release_date.as_deref().and_then(parse_year) {
            facts.push(year.to_string());
        }
        if let Some(runtime) = d.runtime.filter(|m| *m > 0) {
            facts.push(format!("{runtime} min"));
        }
        Self {
            title: d.title,
            tagline: non_blank(d.tagline),
            genres: d.genres.into_iter().map(|g| g.name).collect(),
            overview: d.overview.unwrap_or_default(),
            backdrop_path: non_blank(d.backdrop_path),
            poster_path: non_blank(d.poster_path),
            vote_average: d.vote_average,
            vote_count: d.vote_count,
            facts,
        }
    }
}

impl From<TmdbShowDetails> for DetailFull {
    fn from(d: TmdbShowDetails) -> Self {
        let mut facts = Vec::new();
        if let Some(year) = d.first_air_date.as_deref().and_then(parse_year) {
            facts.push(year.to_string());
        }
        match d.number_of_seasons {
            Some(1) => facts.push(String::from("1 season")),
            Some(n) if n > 1 => facts.push(format!("{n} seasons")),
            _ => {}
        }
        Self {
            title: d.name,
            tagline: non_blank(d.tagline),
            genres: d.genres.into_iter().map(|g| g.name).collect(),
            overview: d.overview.unwrap_or_default(),
            backdrop_path: non_blank(d.backdrop_path),
            poster_path: non_blank(d.poster_path),
            vote_average: d.vote_average,
            vote_count: d.vote_count,
            facts,
        }
    }
}

/// One cast or crew entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credit {
    /// TMDB person ID.
    pub person_id: u64,
    /// Person's name.
    pub display_name: String,
    /// Character for cast, department for crew.
    pub role_label: String,
}

impl From<TmdbCastMember> for Credit {
    fn from(member: TmdbCastMember) -> Self {
        Self {
            person_id: member.id,
            display_name: member.name,
            role_label: member.character.unwrap_or_default(),
        }
    }
}

impl From<TmdbCrewMember> for Credit {
    fn from(member: TmdbCrewMember) -> Self {
        Self {
            person_id: member.id,
            display_name: member.name,
            role_label: non_blank(member.known_for_department)
                .or(member.job)
                .unwrap_or_default(),
        }
    }
}

/// Cast and crew, each cut to the display limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreditsList {
    /// Cast in billing order.
    pub cast: Vec<Credit>,
    /// Crew in API order.
    pub crew: Vec<Credit>,
}

impl CreditsList {
    /// Truncates each list independently to `limit` entries.
    #[must_use]
    pub fn from_tmdb(credits: TmdbCredits, limit: usize) -> Self {
        Self {
            cast: credits.cast.into_iter().take(limit).map(Credit::from).collect(),
            crew: credits.crew.into_iter().take(limit).map(Credit::from).collect(),
        }
    }

    /// Distinct person ids, cast first, in display order.
    #[must_use]
    pub fn person_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = Vec::new();
        for credit in self.cast.iter().chain(&self.crew) {
            if !ids.contains(&credit.person_id) {
                ids.push(credit.person_id);
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use cineview_api::tmdb::{TmdbCredits, TmdbMovieDetails, TmdbShowDetails};

    use super::*;

    fn movie_credits() -> TmdbCredits {
        serde_json::from_str(include_str!("../../../../fixtures/tmdb/movie_credits_603.json"))
            .unwrap()
    }

    #[test]
    fn test_movie_detail_mapping() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/movie_details_603.json");
        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();

        // Act
        let detail = DetailFull::from(details);

        // Assert
        assert_eq!(detail.title, "The Matrix");
        assert_eq!(detail.tagline.as_deref(), Some("Welcome to the Real World."));
        assert_eq!(detail.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(detail.facts, vec!["1999", "136 min"]);
    }

    #[test]
    fn test_show_detail_mapping() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/tv_details_1399.json");
        let details: TmdbShowDetails = serde_json::from_str(json).unwrap();

        // Act
        let detail = DetailFull::from(details);

        // Assert
        assert_eq!(detail.title, "Game of Thrones");
        assert_eq!(detail.facts, vec!["2011", "8 seasons"]);
    }

    #[test]
    fn test_cast_role_is_character_and_crew_role_is_department() {
        // Arrange & Act
        let credits = CreditsList::from_tmdb(movie_credits(), 15);

        // Assert
        assert_eq!(credits.cast[0].display_name, "Keanu Reeves");
        assert_eq!(credits.cast[0].role_label, "Neo");
        assert_eq!(credits.crew[0].role_label, "Directing");
        // Joel Silver has no known-for department.
        assert_eq!(credits.crew[2].role_label, "Producer");
    }

    #[test]
    fn test_lists_are_truncated_independently() {
        // Arrange & Act
        let credits = CreditsList::from_tmdb(movie_credits(), 2);

        // Assert
        assert_eq!(credits.cast.len(), 2);
        assert_eq!(credits.crew.len(), 2);
        assert_eq!(credits.cast[1].display_name, "Laurence Fishburne");
    }

    #[test]
    fn test_person_ids_are_distinct() {
        // Arrange
        let credit = |id| Credit {
            person_id: id,
            display_name: String::new(),
            role_label: String::new(),
        };
        let credits = CreditsList {
            cast: vec![credit(1), credit(2)],
            crew: vec![credit(2), credit(3)],
        };

        // Act & Assert
        assert_eq!(credits.person_ids(), vec![1, 2, 3]);
    }
}
