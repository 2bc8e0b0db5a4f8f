use crate::{
    db::MovieStore,
    error::AppResult,
    models::{AttributeDomain, IdSet},
};

/// Attribute ids linked to the user's positive movies, per domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferredAttributes {
    pub genres: IdSet,
    pub actors: IdSet,
    pub directors: IdSet,
}

impl PreferredAttributes {
    pub fn get(&self, domain: AttributeDomain) -> &IdSet {
        match domain {
            AttributeDomain::Genre => &self.genres,
            AttributeDomain::Actor => &self.actors,
            AttributeDomain::Director => &self.directors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.actors.is_empty() && self.directors.is_empty()
    }
}

/// Expands the positive set into per-domain attribute sets
///
/// An empty domain is a valid outcome, e.g. a catalog entry imported without
/// cast or director data.
pub async fn aggregate(store: &dyn MovieStore, positive: &IdSet) -> AppResult<PreferredAttributes> {
    let (genres, actors, directors) = tokio::try_join!(
        store.attribute_ids_for_movies(AttributeDomain::Genre, positive),
        store.attribute_ids_for_movies(AttributeDomain::Actor, positive),
        store.attribute_ids_for_movies(AttributeDomain::Director, positive),
    )?;

    tracing::debug!(
        genres = genres.len(),
        actors = actors.len(),
        directors = directors.len(),
        "Aggregated preferred attributes"
    );

    Ok(PreferredAttributes {
        genres,
        actors,
        directors,
    })
}
