use std::collections::BTreeMap;

use crate::{
    db::MovieStore,
    error::AppResult,
    models::{AttributeDomain, DbId, IdSet},
};

use super::attributes::PreferredAttributes;

/// Highest-scoring candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub movie_id: DbId,
    /// Number of link rows tying the movie to the preferred attributes
    pub score: u32,
}

/// Finds the unseen movie sharing the most attribute links with `preferred`
///
/// Each domain contributes one row per matching link, so a movie with two
/// preferred genres scores 2 from genres alone. Ties on the top score go to
/// the lowest movie id. Returns `None` when no movie outside `exclusion`
/// shares any attribute.
pub async fn score(
    store: &dyn MovieStore,
    preferred: &PreferredAttributes,
    exclusion: &IdSet,
) -> AppResult<Option<ScoredCandidate>> {
    let (genre_rows, actor_rows, director_rows) = tokio::try_join!(
        matching_rows(store, AttributeDomain::Genre, preferred),
        matching_rows(store, AttributeDomain::Actor, preferred),
        matching_rows(store, AttributeDomain::Director, preferred),
    )?;

    let scores = tally(
        genre_rows
            .into_iter()
            .chain(actor_rows)
            .chain(director_rows),
        exclusion,
    );

    tracing::debug!(candidates = scores.len(), "Scored candidates");

    Ok(best(&scores))
}

/// Skips the lookup for an empty domain instead of asking for `IN ()`
async fn matching_rows(
    store: &dyn MovieStore,
    domain: AttributeDomain,
    preferred: &PreferredAttributes,
) -> AppResult<Vec<DbId>> {
    let attribute_ids = preferred.get(domain);
    if attribute_ids.is_empty() {
        return Ok(Vec::new());
    }
    store.matching_movie_rows(domain, attribute_ids).await
}

/// Counts rows per movie, dropping excluded movies
fn tally(rows: impl IntoIterator<Item = DbId>, exclusion: &IdSet) -> BTreeMap<DbId, u32> {
    let mut scores = BTreeMap::new();
    for movie_id in rows {
        if exclusion.contains(&movie_id) {
            continue;
        }
        *scores.entry(movie_id).or_insert(0) += 1;
    }
    scores
}

fn best(scores: &BTreeMap<DbId, u32>) -> Option<ScoredCandidate> {
    scores
        .iter()
        // max_by_key keeps the last maximum; reverse so the lowest id wins
        .rev()
        .max_by_key(|(_, score)| **score)
        .map(|(movie_id, score)| ScoredCandidate {
            movie_id: *movie_id,
            score: *score,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryStore, MockMovieStore};
    use crate::models::movie::NewMovie;

    fn ids(values: &[DbId]) -> IdSet {
        values.iter().copied().collect()
    }

    #[test]
    fn test_tally_counts_rows_not_domains() {
        // movie 10: two genre rows; movie 20: one row in each of three domains
        let rows = vec![10, 10, 20, 20, 20, 30];
        let scores = tally(rows, &ids(&[30]));
        assert_eq!(scores.get(&10), Some(&2));
        assert_eq!(scores.get(&20), Some(&3));
        assert_eq!(scores.get(&30), None);
    }

    #[test]
    fn test_best_prefers_highest_score() {
        let scores: BTreeMap<DbId, u32> = [(1, 1), (2, 4), (3, 2)].into_iter().collect();
        assert_eq!(
            best(&scores),
            Some(ScoredCandidate {
                movie_id: 2,
                score: 4
            })
        );
    }

    #[test]
    fn test_best_of_nothing() {
        assert_eq!(best(&BTreeMap::new()), None);
    }

    #[test]
    fn test_best_on_tie_returns_a_top_score() {
        let scores: BTreeMap<DbId, u32> = [(4, 3), (9, 3), (2, 1)].into_iter().collect();
        let winner = best(&scores).unwrap();
        assert_eq!(winner.score, 3);
        assert!([4, 9].contains(&winner.movie_id));
    }

    #[tokio::test]
    async fn test_score_equals_sum_of_link_rows() {
        let store = InMemoryStore::new();
        let target = store.insert_movie(NewMovie::new("Target")).await;

        let mut preferred = PreferredAttributes::default();
        // g = 2, a = 3, d = 1
        for (domain, names) in [
            (AttributeDomain::Genre, vec!["Drama", "Crime"]),
            (AttributeDomain::Actor, vec!["A1", "A2", "A3"]),
            (AttributeDomain::Director, vec!["D1"]),
        ] {
            for name in names {
                let id = store.insert_attribute(domain, name).await;
                store.link_attribute(domain, target, id).await;
                match domain {
                    AttributeDomain::Genre => preferred.genres.insert(id),
                    AttributeDomain::Actor => preferred.actors.insert(id),
                    AttributeDomain::Director => preferred.directors.insert(id),
                };
            }
        }

        let candidate = score(&store, &preferred, &IdSet::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(candidate.movie_id, target);
        assert_eq!(candidate.score, 2 + 3 + 1);
    }

    #[tokio::test]
    async fn test_many_genres_outscore_one_link_per_domain() {
        let store = InMemoryStore::new();
        let genre_heavy = store.insert_movie(NewMovie::new("Genre heavy")).await;
        let balanced = store.insert_movie(NewMovie::new("Balanced")).await;

        let mut preferred = PreferredAttributes::default();
        for name in ["G1", "G2", "G3", "G4"] {
            let id = store.insert_attribute(AttributeDomain::Genre, name).await;
            store.link_attribute(AttributeDomain::Genre, genre_heavy, id).await;
            preferred.genres.insert(id);
        }
        let g = *preferred.genres.iter().next().unwrap();
        let a = store.insert_attribute(AttributeDomain::Actor, "A").await;
        let d = store.insert_attribute(AttributeDomain::Director, "D").await;
        store.link_attribute(AttributeDomain::Genre, balanced, g).await;
        store.link_attribute(AttributeDomain::Actor, balanced, a).await;
        store.link_attribute(AttributeDomain::Director, balanced, d).await;
        preferred.actors.insert(a);
        preferred.directors.insert(d);

        let candidate = score(&store, &preferred, &IdSet::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(candidate.movie_id, genre_heavy);
        assert_eq!(candidate.score, 4);
    }

    #[tokio::test]
    async fn test_excluded_movies_never_score() {
        let store = InMemoryStore::new();
        let seen = store.insert_movie(NewMovie::new("Seen")).await;
        let drama = store.insert_attribute(AttributeDomain::Genre, "Drama").await;
        store.link_attribute(AttributeDomain::Genre, seen, drama).await;

        let preferred = PreferredAttributes {
            genres: ids(&[drama]),
            ..Default::default()
        };
        let result = score(&store, &preferred, &ids(&[seen])).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_empty_preferences_skip_storage() {
        // No expectations: any call on the mock would panic
        let store = MockMovieStore::new();
        let result = score(&store, &PreferredAttributes::default(), &IdSet::new())
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_only_non_empty_domains_are_queried() {
        let mut store = MockMovieStore::new();
        store
            .expect_matching_movie_rows()
            .withf(|domain, ids| *domain == AttributeDomain::Director && ids.len() == 1)
            .times(1)
            .returning(|_, _| Ok(vec![42]));

        let preferred = PreferredAttributes {
            directors: ids(&[5]),
            ..Default::default()
        };
        let result = score(&store, &preferred, &IdSet::new()).await.unwrap();
        assert_eq!(
            result,
            Some(ScoredCandidate {
                movie_id: 42,
                score: 1
            })
        );
    }
}
