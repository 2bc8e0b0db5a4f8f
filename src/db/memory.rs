use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    db::{IdFilter, MovieStore},
    error::AppResult,
    models::{
        movie::NewMovie, AttributeDomain, DbId, IdSet, Movie, UserCreation, WatchlistItem,
    },
};

/// In-process [`MovieStore`] with the same keyed-row semantics as the SQL schema
///
/// Tables sit behind one `RwLock`, so every write is atomic with respect to
/// concurrent readers.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    next_id: DbId,
    users: HashMap<String, DbId>,
    movies: BTreeMap<DbId, Movie>,
    /// Attribute name -> id, per domain
    attributes: HashMap<AttributeDomain, HashMap<String, DbId>>,
    /// (movie_id, attribute_id) rows, per domain, in insertion order
    links: HashMap<AttributeDomain, Vec<(DbId, DbId)>>,
    /// (user_id, movie_id) -> liked
    likes: BTreeMap<(DbId, DbId), bool>,
    /// (user_id, movie_id) -> watched
    watchlist: BTreeMap<(DbId, DbId), bool>,
}

impl Tables {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn interaction_ids(&self, user_id: DbId, liked: bool) -> IdSet {
        self.likes
            .iter()
            .filter(|((user, _), flag)| *user == user_id && **flag == liked)
            .map(|((_, movie), _)| *movie)
            .collect()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user and returns its id, reusing the row for a known identity
    pub async fn insert_user(&self, uid: &str) -> DbId {
        let mut tables = self.inner.write().await;
        if let Some(id) = tables.users.get(uid) {
            return *id;
        }
        let id = tables.allocate_id();
        tables.users.insert(uid.to_string(), id);
        id
    }

    pub async fn insert_movie(&self, movie: NewMovie) -> DbId {
        let mut tables = self.inner.write().await;
        let id = tables.allocate_id();
        tables.movies.insert(id, movie.into_movie(id));
        id
    }

    /// Returns the id of the named attribute, creating it if needed
    pub async fn insert_attribute(&self, domain: AttributeDomain, name: &str) -> DbId {
        let mut tables = self.inner.write().await;
        if let Some(id) = tables
            .attributes
            .get(&domain)
            .and_then(|names| names.get(name))
        {
            return *id;
        }
        let id = tables.allocate_id();
        tables
            .attributes
            .entry(domain)
            .or_default()
            .insert(name.to_string(), id);
        id
    }

    /// Links a movie to an attribute; relinking the same pair is a no-op
    pub async fn link_attribute(&self, domain: AttributeDomain, movie_id: DbId, attribute_id: DbId) {
        let mut tables = self.inner.write().await;
        let rows = tables.links.entry(domain).or_default();
        if !rows.contains(&(movie_id, attribute_id)) {
            rows.push((movie_id, attribute_id));
        }
    }

    /// Number of interaction rows stored for a (user, movie) pair
    pub async fn interaction_rows(&self, user_id: DbId, movie_id: DbId) -> usize {
        let tables = self.inner.read().await;
        usize::from(tables.likes.contains_key(&(user_id, movie_id)))
    }

    /// Number of watchlist rows stored for a (user, movie) pair
    pub async fn watchlist_rows(&self, user_id: DbId, movie_id: DbId) -> usize {
        let tables = self.inner.read().await;
        usize::from(tables.watchlist.contains_key(&(user_id, movie_id)))
    }
}

#[async_trait::async_trait]
impl MovieStore for InMemoryStore {
    async fn find_user_id(&self, uid: &str) -> AppResult<Option<DbId>> {
        Ok(self.inner.read().await.users.get(uid).copied())
    }

    async fn create_user(
        &self,
        uid: &str,
        _email: &str,
        _name: Option<String>,
    ) -> AppResult<UserCreation> {
        let mut tables = self.inner.write().await;
        if tables.users.contains_key(uid) {
            return Ok(UserCreation::AlreadyExists);
        }
        let id = tables.allocate_id();
        tables.users.insert(uid.to_string(), id);
        Ok(UserCreation::Created)
    }

    async fn liked_movie_ids(&self, user_id: DbId) -> AppResult<IdSet> {
        Ok(self.inner.read().await.interaction_ids(user_id, true))
    }

    async fn disliked_movie_ids(&self, user_id: DbId) -> AppResult<IdSet> {
        Ok(self.inner.read().await.interaction_ids(user_id, false))
    }

    async fn watchlisted_movie_ids(&self, user_id: DbId) -> AppResult<IdSet> {
        let tables = self.inner.read().await;
        Ok(tables
            .watchlist
            .keys()
            .filter(|(user, _)| *user == user_id)
            .map(|(_, movie)| *movie)
            .collect())
    }

    async fn attribute_ids_for_movies(
        &self,
        domain: AttributeDomain,
        movie_ids: &IdSet,
    ) -> AppResult<IdSet> {
        let filter = IdFilter::In("movie_id", movie_ids);
        let tables = self.inner.read().await;
        Ok(tables
            .links
            .get(&domain)
            .into_iter()
            .flatten()
            .filter(|(movie, _)| filter.matches(*movie))
            .map(|(_, attribute)| *attribute)
            .collect())
    }

    async fn matching_movie_rows(
        &self,
        domain: AttributeDomain,
        attribute_ids: &IdSet,
    ) -> AppResult<Vec<DbId>> {
        let filter = IdFilter::In(domain.link_column(), attribute_ids);
        if filter.is_unsatisfiable() {
            return Ok(Vec::new());
        }
        let tables = self.inner.read().await;
        Ok(tables
            .links
            .get(&domain)
            .into_iter()
            .flatten()
            .filter(|(_, attribute)| filter.matches(*attribute))
            .map(|(movie, _)| *movie)
            .collect())
    }

    async fn movie_ids_excluding(&self, excluded: &IdSet) -> AppResult<Vec<DbId>> {
        let filter = IdFilter::NotIn("id", excluded);
        let tables = self.inner.read().await;
        Ok(tables
            .movies
            .keys()
            .copied()
            .filter(|id| filter.matches(*id))
            .collect())
    }

    async fn movie_by_id(&self, movie_id: DbId) -> AppResult<Option<Movie>> {
        Ok(self.inner.read().await.movies.get(&movie_id).cloned())
    }

    async fn upsert_interaction(
        &self,
        user_id: DbId,
        movie_id: DbId,
        liked: bool,
    ) -> AppResult<()> {
        self.inner
            .write()
            .await
            .likes
            .insert((user_id, movie_id), liked);
        Ok(())
    }

    async fn insert_watchlist_if_absent(&self, user_id: DbId, movie_id: DbId) -> AppResult<()> {
        self.inner
            .write()
            .await
            .watchlist
            .entry((user_id, movie_id))
            .or_insert(false);
        Ok(())
    }

    async fn set_watched(&self, user_id: DbId, movie_id: DbId, watched: bool) -> AppResult<()> {
        if let Some(flag) = self
            .inner
            .write()
            .await
            .watchlist
            .get_mut(&(user_id, movie_id))
        {
            *flag = watched;
        }
        Ok(())
    }

    async fn remove_watchlist_entry(&self, user_id: DbId, movie_id: DbId) -> AppResult<()> {
        self.inner
            .write()
            .await
            .watchlist
            .remove(&(user_id, movie_id));
        Ok(())
    }

    async fn watchlist(&self, user_id: DbId) -> AppResult<Vec<WatchlistItem>> {
        let tables = self.inner.read().await;
        Ok(tables
            .watchlist
            .iter()
            .filter(|((user, _), _)| *user == user_id)
            .filter_map(|((_, movie_id), watched)| {
                tables.movies.get(movie_id).map(|movie| WatchlistItem {
                    id: movie.id,
                    title: movie.title.clone(),
                    genre: movie.genre.clone(),
                    rating: movie.rating,
                    poster_url: movie.poster_url.clone(),
                    watched: *watched,
                })
            })
            .collect())
    }
}
