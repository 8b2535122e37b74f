//! Postgres-backed document store.
//!
//! Documents live in a single JSONB table keyed by `(collection, key)`:
//!
//! ```sql
//! CREATE TABLE larder_documents (
//!     seq        BIGSERIAL,
//!     collection TEXT  NOT NULL,
//!     key        TEXT  NOT NULL,
//!     body       JSONB NOT NULL,
//!     PRIMARY KEY (collection, key)
//! )
//! ```
//!
//! `seq` preserves insertion order for reads.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / Io / Tls / other | N/A | `Backend` |

use std::str::FromStr;

use serde_json::Value as JsonValue;
use sqlx::postgres::{PgConnectOptions, PgDatabaseError, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use super::filter::{Filter, Predicate};
use crate::config::DEFAULT_DATABASE_NAME;
use super::r#trait::{DocumentStore, InsertAck, StoreError, StoredDocument};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS larder_documents (
    seq        BIGSERIAL,
    collection TEXT  NOT NULL,
    key        TEXT  NOT NULL,
    body       JSONB NOT NULL,
    PRIMARY KEY (collection, key)
)
"#;

/// Postgres-backed document store.
///
/// Uses the SQLx connection pool, which is safe to share across requests.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `url` and make sure the documents table exists.
    ///
    /// `database` overrides the database named in `url`; with neither,
    /// [`DEFAULT_DATABASE_NAME`] is used.
    pub async fn connect(url: &str, database: Option<&str>) -> Result<Self, StoreError> {
        let options = PgConnectOptions::from_str(url).map_err(|e| map_sqlx_error("connect", e))?;
        let database = resolve_database(database, options.get_database()).to_string();
        let options = options.database(&database);

        let pool = PgPoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        info!(%database, "connected to postgres document store");
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

fn resolve_database<'a>(explicit: Option<&'a str>, from_url: Option<&'a str>) -> &'a str {
    explicit.or(from_url).unwrap_or(DEFAULT_DATABASE_NAME)
}

/// Start a `SELECT body` over one collection with `filter` applied.
fn select_documents<'a>(collection: &'a str, filter: &'a Filter) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("SELECT body FROM larder_documents WHERE collection = ");
    qb.push_bind(collection);
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY seq");
    qb
}

fn push_filter<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a Filter) {
    for predicate in filter.predicates() {
        match predicate {
            Predicate::Eq { field, value } => {
                qb.push(" AND body -> ");
                qb.push_bind(field.as_str());
                qb.push(" = ");
                qb.push_bind(Json(value));
            }
            Predicate::Lt { field, bound } => {
                // CASE keeps the cast from running on non-numeric values.
                qb.push(" AND CASE WHEN jsonb_typeof(body -> ");
                qb.push_bind(field.as_str());
                qb.push(") = 'number' THEN (body ->> ");
                qb.push_bind(field.as_str());
                qb.push(")::double precision < ");
                qb.push_bind(*bound);
                qb.push(" ELSE false END");
            }
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self, filter), err)]
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<JsonValue>, StoreError> {
        let rows = select_documents(collection, filter)
            .build_query_scalar::<Json<JsonValue>>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find", e))?;

        Ok(rows.into_iter().map(|Json(body)| body).collect())
    }

    #[instrument(skip(self, filter), err)]
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<JsonValue>, StoreError> {
        let mut qb = select_documents(collection, filter);
        qb.push(" LIMIT 1");

        let row = qb
            .build_query_scalar::<Json<JsonValue>>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_one", e))?;

        Ok(row.map(|Json(body)| body))
    }

    #[instrument(skip(self, documents), fields(batch = documents.len()), err)]
    async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<StoredDocument>,
    ) -> Result<InsertAck, StoreError> {
        if documents.is_empty() {
            return Ok(InsertAck { inserted: 0 });
        }

        // One statement, so the batch is atomic.
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO larder_documents (collection, key, body) ");
        qb.push_values(documents.iter(), |mut row, doc| {
            row.push_bind(collection)
                .push_bind(doc.key.as_str())
                .push_bind(Json(&doc.body));
        });

        let result = qb.build().execute(&self.pool).await.map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                let key = db_err
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(PgDatabaseError::detail)
                    .unwrap_or_else(|| db_err.message())
                    .to_string();
                StoreError::Duplicate {
                    collection: collection.to_string(),
                    key,
                }
            }
            other => map_sqlx_error("insert_many", other),
        })?;

        Ok(InsertAck {
            inserted: result.rows_affected(),
        })
    }

    #[instrument(skip(self), err)]
    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM larder_documents WHERE collection = $1")
                .bind(collection)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("count", e))?;

        Ok(u64::try_from(total).unwrap_or(0))
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Backend(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
