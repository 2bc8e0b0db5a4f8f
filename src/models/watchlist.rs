use serde::{Deserialize, Serialize};

use super::DbId;

/// A watchlisted movie joined with its watched flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchlistItem {
    pub id: DbId,
    pub title: String,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
    pub watched: bool,
}
