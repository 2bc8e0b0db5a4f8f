use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use crate::error::AppError;

pub mod movie;
pub mod watchlist;

pub use movie::Movie;
pub use watchlist::WatchlistItem;

/// Primary key type shared by every table
pub type DbId = i64;

/// Set of row ids, ordered so query parameters and logs are stable
pub type IdSet = BTreeSet<DbId>;

/// Independent classification axis linking movies to content attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeDomain {
    Genre,
    Actor,
    Director,
}

impl AttributeDomain {
    pub const ALL: [AttributeDomain; 3] = [
        AttributeDomain::Genre,
        AttributeDomain::Actor,
        AttributeDomain::Director,
    ];

    /// Many-to-many table between movies and this domain
    pub fn link_table(self) -> &'static str {
        match self {
            AttributeDomain::Genre => "movie_genres",
            AttributeDomain::Actor => "movie_actors",
            AttributeDomain::Director => "movie_directors",
        }
    }

    /// Attribute column of the link table
    pub fn link_column(self) -> &'static str {
        match self {
            AttributeDomain::Genre => "genre_id",
            AttributeDomain::Actor => "actor_id",
            AttributeDomain::Director => "director_id",
        }
    }
}

impl Display for AttributeDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeDomain::Genre => write!(f, "genre"),
            AttributeDomain::Actor => write!(f, "actor"),
            AttributeDomain::Director => write!(f, "director"),
        }
    }
}

/// A user decision recorded against a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Dislike,
    Watchlist,
}

impl FromStr for SwipeAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(SwipeAction::Like),
            "dislike" => Ok(SwipeAction::Dislike),
            "watchlist" => Ok(SwipeAction::Watchlist),
            _ => Err(AppError::InvalidInput("Invalid action".to_string())),
        }
    }
}

impl Display for SwipeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwipeAction::Like => write!(f, "like"),
            SwipeAction::Dislike => write!(f, "dislike"),
            SwipeAction::Watchlist => write!(f, "watchlist"),
        }
    }
}

/// Outcome of an insert-if-absent on the users table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCreation {
    Created,
    AlreadyExists,
}
