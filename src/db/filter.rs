use sqlx::{Postgres, QueryBuilder};

use crate::models::{DbId, IdSet};

/// Set-membership predicate over an id column
///
/// The set is bound as a single array parameter (`column = ANY($n)`), so an
/// empty set renders as valid SQL: `In` matches nothing and `NotIn`
/// matches everything.
#[derive(Debug, Clone, Copy)]
pub enum IdFilter<'a> {
    In(&'a str, &'a IdSet),
    NotIn(&'a str, &'a IdSet),
}

impl<'a> IdFilter<'a> {
    /// Appends the predicate, without a leading `WHERE`/`AND`
    pub fn push_to<'q>(&self, builder: &mut QueryBuilder<'q, Postgres>) {
        match *self {
            IdFilter::In(column, ids) => {
                builder
                    .push(column)
                    .push(" = ANY(")
                    .push_bind(to_array(ids))
                    .push(")");
            }
            IdFilter::NotIn(column, ids) => {
                builder
                    .push("NOT (")
                    .push(column)
                    .push(" = ANY(")
                    .push_bind(to_array(ids))
                    .push("))");
            }
        }
    }

    /// Evaluates the predicate in memory
    pub fn matches(&self, id: DbId) -> bool {
        match *self {
            IdFilter::In(_, ids) => ids.contains(&id),
            IdFilter::NotIn(_, ids) => !ids.contains(&id),
        }
    }

    /// True when the predicate can never match a row
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, IdFilter::In(_, ids) if ids.is_empty())
    }
}

fn to_array(ids: &IdSet) -> Vec<DbId> {
    ids.iter().copied().collect()
}
