use std::time::Instant;

use bigdecimal::{BigDecimal, Zero};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::config::{SECONDS_PER_DAY, TOP_ASKS_LIMIT, VOLUME_WINDOW_DAYS};
use crate::db::models::{AskRow, VolumeRow};
use crate::error::{AppError, Result};
use crate::numeric;
use crate::timeseries;
use crate::types::{Ask, MarketStats, TimeseriesDatapoint};

// Prices are decimal text, so the SQL ordering is only a pre-sort; the exact
// top-N is taken on the decoded values.
const ASKS_SQL: &str = r#"
    SELECT a.id AS id,
           CAST(a.price AS TEXT) AS price,
           a.expires_at AS expires_at,
           m.to_address AS address
    FROM asks a
    JOIN messages m ON a.message_id = m.id
    ORDER BY CAST(a.price AS REAL) DESC, a.id ASC
"#;

// ?1: clock override (NULL = store clock), ?2: window length in seconds.
// The clock CTE always yields one row, so the store time comes back even when
// no block falls in the window.
const VOLUME_SQL: &str = r#"
    WITH clock AS (
        SELECT COALESCE(?1, CAST(strftime('%s', 'now') AS INTEGER)) AS now
    )
    SELECT c.now AS now,
           CAST(m.value AS TEXT) AS value,
           b.ingested_at AS ingested_at
    FROM clock c
    LEFT JOIN blocks b
           ON b.ingested_at >= ((c.now - ?2) / 86400) * 86400
          AND b.ingested_at < ((c.now / 86400) + 1) * 86400
    LEFT JOIN messages m
           ON m.height = b.height
          AND m.value IS NOT NULL
    ORDER BY b.ingested_at ASC, m.id ASC
"#;

/// Builds [`MarketStats`] snapshots from the asks/messages/blocks tables.
/// Read-only; every call is a fresh build.
///
/// Prices are stored as decimal text, which SQLite cannot order exactly, so
/// every joined ask row is read and the top `TOP_ASKS_LIMIT` are picked after
/// decoding. The asks read is O(open asks) per build.
#[derive(Clone)]
pub struct MarketStatsDao {
    pool: SqlitePool,
}

impl MarketStatsDao {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Snapshot with the volume window anchored at the store's clock.
    pub async fn get_stats(&self) -> Result<MarketStats> {
        self.build(None).await
    }

    /// Snapshot with the volume window anchored at `now` (unix seconds).
    pub async fn get_stats_at(&self, now: i64) -> Result<MarketStats> {
        self.build(Some(now)).await
    }

    async fn build(&self, now: Option<i64>) -> Result<MarketStats> {
        let started = Instant::now();

        // Both reads share one transaction so they see the same committed state.
        // Dropping `tx` on any error path rolls back and returns the connection.
        let mut tx = self.pool.begin().await?;
        let asks = fetch_asks(&mut *tx).await?;
        let volume = fetch_daily_volume(&mut *tx, now).await?;
        tx.commit().await?;

        info!(
            asks = asks.len(),
            volume_points = volume.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Market stats snapshot built"
        );

        Ok(MarketStats {
            asks,
            bids: Vec::new(),
            volume,
        })
    }
}

/// Top asks by price, highest first.
pub async fn fetch_asks(conn: &mut SqliteConnection) -> Result<Vec<Ask>> {
    let rows: Vec<AskRow> = sqlx::query_as(ASKS_SQL).fetch_all(&mut *conn).await?;
    debug!("Fetched {} ask rows", rows.len());
    inflate_asks(rows)
}

/// Daily volume over the trailing window, one point per day.
pub async fn fetch_daily_volume(
    conn: &mut SqliteConnection,
    now: Option<i64>,
) -> Result<Vec<TimeseriesDatapoint>> {
    let rows: Vec<VolumeRow> = sqlx::query_as(VOLUME_SQL)
        .bind(now)
        .bind(VOLUME_WINDOW_DAYS * SECONDS_PER_DAY)
        .fetch_all(&mut *conn)
        .await?;

    let now = rows
        .first()
        .map(|r| r.now)
        .ok_or_else(|| AppError::StoreUnavailable(sqlx::Error::RowNotFound))?;
    debug!("Fetched {} volume rows at store time {now}", rows.len());
    inflate_volume(now, rows)
}

/// Decode prices and keep the `TOP_ASKS_LIMIT` highest. The sort is stable, so
/// equal prices keep the row order.
pub fn inflate_asks(rows: Vec<AskRow>) -> Result<Vec<Ask>> {
    let mut asks = rows
        .into_iter()
        .map(|r| {
            Ok(Ask {
                id: r.id,
                price: numeric::decode(&r.price)?,
                expires_at: r.expires_at,
                address: r.address,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    asks.sort_by(|a, b| b.price.cmp(&a.price));
    asks.truncate(TOP_ASKS_LIMIT);
    Ok(asks)
}

/// Decode values, drop non-positive ones and zero-fill the window around `now`.
pub fn inflate_volume(now: i64, rows: Vec<VolumeRow>) -> Result<Vec<TimeseriesDatapoint>> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let (Some(value), Some(ingested_at)) = (row.value, row.ingested_at) else {
            continue;
        };
        let amount = numeric::decode(&value)?;
        if amount > BigDecimal::zero() {
            records.push((ingested_at, amount));
        }
    }

    let spine = timeseries::day_spine(now, VOLUME_WINDOW_DAYS);
    Ok(timeseries::fill_buckets(&spine, records))
}
