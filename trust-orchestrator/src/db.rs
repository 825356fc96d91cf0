use anyhow::Result;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::error::StoreError;
use crate::models::{Document, DocumentRow};
use crate::store::VerificationStore;
use crate::trust::TrustTier;

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const SELECT_COLUMNS: &str =
    "SELECT id, trust_tier, query_count, verification_priority, content, last_analysis FROM verification_records";

/// `VerificationStore` backed by the `verification_records` table.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationStore for PgStore {
    async fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Document::try_from).transpose()
    }

    async fn put(&self, document: &Document) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO verification_records
             (id, trust_tier, query_count, verification_priority, content, last_analysis)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO UPDATE SET
                trust_tier = EXCLUDED.trust_tier,
                query_count = EXCLUDED.query_count,
                verification_priority = EXCLUDED.verification_priority,
                content = EXCLUDED.content,
                last_analysis = EXCLUDED.last_analysis",
        )
        .bind(&document.id)
        .bind(document.trust_tier.level())
        .bind(document.query_count)
        .bind(document.verification_priority)
        .bind(&document.content)
        .bind(&document.last_analysis)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_by_min_tier(&self, tier: TrustTier) -> Result<Vec<(String, TrustTier)>, StoreError> {
        let rows = sqlx::query_as::<_, (String, i32)>(
            "SELECT id, trust_tier FROM verification_records WHERE trust_tier >= $1 ORDER BY id",
        )
        .bind(tier.level())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, level)| match TrustTier::from_level(level) {
                Some(tier) => Ok((id, tier)),
                None => Err(StoreError::InvalidTier { id, level }),
            })
            .collect()
    }

    async fn list_all(&self) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!("{} ORDER BY id", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Document::try_from).collect()
    }
}
