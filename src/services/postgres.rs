use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::models::{
    domain::{or_general, parse_availability},
    taxonomy::parse_tags,
    Provider,
};
use super::SourceError;

/// Aggregates each nurse with its service, expertise and availability rows
const LOAD_PROVIDERS_SQL: &str = r#"
    SELECT n.id::text AS id, n.name, n.city,
           n.lat::float8 AS lat, n.lng::float8 AS lng,
           n.rating::float8 AS rating, n.reviews_count::int8 AS reviews_count,
           s.services, e.expertise, a.availability
    FROM nurses n
    LEFT JOIN (
        SELECT nurse_id, array_agg(service ORDER BY service) AS services
        FROM nurse_services GROUP BY nurse_id
    ) s ON s.nurse_id = n.id
    LEFT JOIN (
        SELECT nurse_id, array_agg(tag ORDER BY tag) AS expertise
        FROM nurse_expertise GROUP BY nurse_id
    ) e ON e.nurse_id = n.id
    LEFT JOIN (
        SELECT nurse_id,
               json_agg(json_build_object('day', day, 'slots', slots) ORDER BY day_order) AS availability
        FROM nurse_availability GROUP BY nurse_id
    ) a ON a.nurse_id = n.id
    ORDER BY n.id
"#;

/// PostgreSQL-backed provider source
pub struct PostgresSource {
    pool: PgPool,
}

impl PostgresSource {
    /// Create a new PostgreSQL source from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        run_migrations: bool,
    ) -> Result<Self, SourceError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        if run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database migrations applied");
        }

        Ok(Self { pool })
    }

    pub async fn load(&self) -> Result<Vec<Provider>, SourceError> {
        let rows = sqlx::query(LOAD_PROVIDERS_SQL).fetch_all(&self.pool).await?;

        let providers = rows
            .iter()
            .map(provider_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} providers from PostgreSQL", providers.len());

        Ok(providers)
    }
}

fn provider_from_row(row: &PgRow) -> Result<Provider, SourceError> {
    let services: Option<Vec<String>> = row.try_get("services")?;
    let expertise: Option<Vec<String>> = row.try_get("expertise")?;
    let availability: Option<Json<Vec<Value>>> = row.try_get("availability")?;
    let reviews_count: Option<i64> = row.try_get("reviews_count")?;

    Ok(Provider {
        id: row.try_get("id")?,
        name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
        city: row.try_get::<Option<String>, _>("city")?.unwrap_or_default(),
        lat: row.try_get("lat")?,
        lng: row.try_get("lng")?,
        rating: row.try_get::<Option<f64>, _>("rating")?.unwrap_or(0.0),
        reviews_count: reviews_count
            .map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
            .unwrap_or(0),
        services: or_general(parse_tags(services.unwrap_or_default())),
        expertise: parse_tags(expertise.unwrap_or_default()),
        availability: availability
            .map(|Json(entries)| parse_availability(entries))
            .unwrap_or_default(),
    })
}
