use serde::{Deserialize, Serialize};

use super::DbId;

/// A catalog movie as returned to the client
///
/// `genre` is the free-text label from the catalog and is display-only;
/// scoring reads the normalized attribute links instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
}

/// Fields for inserting a movie into a store
#[derive(Debug, Clone, Default)]
pub struct NewMovie {
    pub title: String,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
}

impl NewMovie {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub(crate) fn into_movie(self, id: DbId) -> Movie {
        Movie {
            id,
            title: self.title,
            year: self.year,
            genre: self.genre,
            rating: self.rating,
            poster_url: self.poster_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_serializes_with_poster_url() {
        let movie = NewMovie::new("The Godfather")
            .with_genre("Crime, Drama")
            .with_year(1972)
            .with_rating(9.2)
            .into_movie(7);

        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "The Godfather");
        assert_eq!(json["genre"], "Crime, Drama");
        assert_eq!(json["year"], 1972);
        assert!(json["poster_url"].is_null());
    }
}
