//! AI usage log implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::warn;

use gnotes_core::{AiFeature, AiUsageEvent, AiUsageLog, Error, Result};

/// PostgreSQL implementation of AiUsageLog, backed by the `ai_usage` table.
pub struct PgAiUsageLog {
    pool: Pool<Postgres>,
}

impl PgAiUsageLog {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AiUsageLog for PgAiUsageLog {
    async fn record(&self, feature: AiFeature) -> Result<()> {
        sqlx::query("INSERT INTO ai_usage (feature) VALUES ($1)")
            .bind(feature.as_str())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AiUsageEvent>> {
        let rows = sqlx::query("SELECT feature, created_at FROM ai_usage ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.get("feature");
            match name.parse::<AiFeature>() {
                Ok(feature) => events.push(AiUsageEvent {
                    feature,
                    created_at: row.get("created_at"),
                }),
                Err(_) => warn!(
                    subsystem = "db",
                    component = "ai_usage",
                    feature = %name,
                    "Skipping usage row with unknown feature"
                ),
            }
        }
        Ok(events)
    }
}
