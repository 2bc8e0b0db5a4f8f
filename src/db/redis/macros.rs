/// Read-through caching for lookups that may find nothing.
///
/// `$block` must resolve to `AppResult<Option<T>>`. A cache hit for `$key`
/// is returned as `Some` without awaiting `$block`. On a miss the block runs
/// and a found value is queued for a background write with `$ttl` seconds to
/// live; `None` is never cached, so rows inserted later are still seen.
///
/// # Example
/// ```rust,ignore
/// let movie: Option<Movie> =
///     cached_lookup!(cache, CacheKey::Movie(id), ttl, fetch_movie(id))?;
/// ```
#[macro_export]
macro_rules! cached_lookup {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await? {
            Some(hit) => Ok(Some(hit)),
            None => {
                let found = $block.await?;
                if let Some(value) = &found {
                    $cache.set_in_background(&key, value, $ttl);
                }
                Ok(found)
            }
        }
    }};
}
