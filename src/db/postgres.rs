use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};

use crate::{
    cached_lookup,
    db::{Cache, CacheKey, IdFilter, MovieStore},
    error::AppResult,
    models::{AttributeDomain, DbId, IdSet, Movie, UserCreation, WatchlistItem},
};

/// Creates a PostgreSQL connection pool
///
/// Connections are checked out per query and returned on drop, so request
/// handlers never hold one across the whole request.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Column list for `movies` queries.
const MOVIE_COLUMNS: &str = "id, title, year, genre, rating, poster_url";

/// Atomic upsert keyed by the (user_id, movie_id) primary key.
const UPSERT_INTERACTION_SQL: &str = "\
    INSERT INTO user_likes (user_id, movie_id, liked) \
    VALUES ($1, $2, $3) \
    ON CONFLICT (user_id, movie_id) DO UPDATE SET liked = EXCLUDED.liked";

const INSERT_WATCHLIST_SQL: &str = "\
    INSERT INTO watchlist (user_id, movie_id) \
    VALUES ($1, $2) \
    ON CONFLICT (user_id, movie_id) DO NOTHING";

/// PostgreSQL-backed [`MovieStore`], optionally caching movie records in Redis
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    cache: Option<Cache>,
    movie_cache_ttl: u64,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cache: None,
            movie_cache_ttl: 0,
        }
    }

    /// Serves `movie_by_id` through the cache; movies are immutable once imported
    pub fn with_cache(mut self, cache: Cache, ttl: u64) -> Self {
        self.cache = Some(cache);
        self.movie_cache_ttl = ttl;
        self
    }

    async fn interaction_ids(&self, user_id: DbId, liked: bool) -> AppResult<IdSet> {
        let ids: Vec<DbId> =
            sqlx::query_scalar("SELECT movie_id FROM user_likes WHERE user_id = $1 AND liked = $2")
                .bind(user_id)
                .bind(liked)
                .fetch_all(&self.pool)
                .await?;
        Ok(ids.into_iter().collect())
    }

    async fn fetch_movie(&self, movie_id: DbId) -> AppResult<Option<Movie>> {
        let query = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1");
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }
}

/// `SELECT DISTINCT <attr> FROM <link> WHERE movie_id = ANY($1)`
fn attribute_ids_query(domain: AttributeDomain, movie_ids: &IdSet) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT DISTINCT {} FROM {} WHERE ",
        domain.link_column(),
        domain.link_table()
    ));
    IdFilter::In("movie_id", movie_ids).push_to(&mut builder);
    builder
}

/// `SELECT movie_id FROM <link> WHERE <attr> = ANY($1)`, one row per link
fn matching_rows_query(
    domain: AttributeDomain,
    attribute_ids: &IdSet,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT movie_id FROM {} WHERE ",
        domain.link_table()
    ));
    IdFilter::In(domain.link_column(), attribute_ids).push_to(&mut builder);
    builder
}

fn movie_ids_excluding_query(excluded: &IdSet) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT id FROM movies WHERE ");
    IdFilter::NotIn("id", excluded).push_to(&mut builder);
    builder.push(" ORDER BY id");
    builder
}

#[async_trait::async_trait]
impl MovieStore for PgStore {
    async fn find_user_id(&self, uid: &str) -> AppResult<Option<DbId>> {
        let id = sqlx::query_scalar("SELECT id FROM users WHERE firebase_uid = $1")
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    async fn create_user(
        &self,
        uid: &str,
        email: &str,
        name: Option<String>,
    ) -> AppResult<UserCreation> {
        let inserted: Option<DbId> = sqlx::query_scalar(
            "INSERT INTO users (firebase_uid, email, name) VALUES ($1, $2, $3) \
             ON CONFLICT (firebase_uid) DO NOTHING RETURNING id",
        )
        .bind(uid)
        .bind(email)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match inserted {
            Some(_) => UserCreation::Created,
            None => UserCreation::AlreadyExists,
        })
    }

    async fn liked_movie_ids(&self, user_id: DbId) -> AppResult<IdSet> {
        self.interaction_ids(user_id, true).await
    }

    async fn disliked_movie_ids(&self, user_id: DbId) -> AppResult<IdSet> {
        self.interaction_ids(user_id, false).await
    }

    async fn watchlisted_movie_ids(&self, user_id: DbId) -> AppResult<IdSet> {
        let ids: Vec<DbId> = sqlx::query_scalar("SELECT movie_id FROM watchlist WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn attribute_ids_for_movies(
        &self,
        domain: AttributeDomain,
        movie_ids: &IdSet,
    ) -> AppResult<IdSet> {
        if movie_ids.is_empty() {
            return Ok(IdSet::new());
        }
        let ids: Vec<DbId> = attribute_ids_query(domain, movie_ids)
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn matching_movie_rows(
        &self,
        domain: AttributeDomain,
        attribute_ids: &IdSet,
    ) -> AppResult<Vec<DbId>> {
        if attribute_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = matching_rows_query(domain, attribute_ids)
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn movie_ids_excluding(&self, excluded: &IdSet) -> AppResult<Vec<DbId>> {
        let ids = movie_ids_excluding_query(excluded)
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn movie_by_id(&self, movie_id: DbId) -> AppResult<Option<Movie>> {
        match &self.cache {
            Some(cache) => cached_lookup!(
                cache,
                CacheKey::Movie(movie_id),
                self.movie_cache_ttl,
                self.fetch_movie(movie_id)
            ),
            None => self.fetch_movie(movie_id).await,
        }
    }

    async fn upsert_interaction(
        &self,
        user_id: DbId,
        movie_id: DbId,
        liked: bool,
    ) -> AppResult<()> {
        sqlx::query(UPSERT_INTERACTION_SQL)
            .bind(user_id)
            .bind(movie_id)
            .bind(liked)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_watchlist_if_absent(&self, user_id: DbId, movie_id: DbId) -> AppResult<()> {
        sqlx::query(INSERT_WATCHLIST_SQL)
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_watched(&self, user_id: DbId, movie_id: DbId, watched: bool) -> AppResult<()> {
        sqlx::query("UPDATE watchlist SET watched = $1 WHERE user_id = $2 AND movie_id = $3")
            .bind(watched)
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_watchlist_entry(&self, user_id: DbId, movie_id: DbId) -> AppResult<()> {
        sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND movie_id = $2")
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn watchlist(&self, user_id: DbId) -> AppResult<Vec<WatchlistItem>> {
        let items = sqlx::query_as::<_, WatchlistItem>(
            "SELECT m.id, m.title, m.genre, m.rating, m.poster_url, w.watched \
             FROM watchlist w \
             JOIN movies m ON w.movie_id = m.id \
             WHERE w.user_id = $1 \
             ORDER BY m.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}
