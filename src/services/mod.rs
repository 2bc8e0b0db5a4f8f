pub mod recommendations;
pub mod swipes;
pub mod users;
pub mod watchlist;

pub use recommendations::{Recommendation, Recommender, Strategy};
