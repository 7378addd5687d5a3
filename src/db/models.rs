//! Raw rows read by the market stats queries.
//! Decimal columns are read as text and decoded with `numeric::decode`.

#[derive(Debug, sqlx::FromRow)]
pub struct AskRow {
    pub id: i64,
    pub price: String,
    pub expires_at: i64,
    /// `messages.to_address` of the ask's originating message.
    pub address: String,
}

/// One row per (block, message) pair in the volume window. The store clock is
/// repeated on every row; `value`/`ingested_at` are NULL when the window holds
/// no blocks at all.
#[derive(Debug, sqlx::FromRow)]
pub struct VolumeRow {
    pub now: i64,
    pub value: Option<String>,
    pub ingested_at: Option<i64>,
}
