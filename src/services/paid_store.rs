use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};

use crate::{constants::PAID_KEY_PREFIX, error::Result};

const PAID_VALUE: &str = "true";

/// Per-fid record that the frame entry fee has been paid.
#[async_trait]
pub trait PaidStore: Send + Sync {
    async fn has_paid(&self, fid: u64) -> Result<bool>;

    async fn mark_paid(&self, fid: u64) -> Result<()>;

    /// Round-trip to the backing store, used by the health check.
    async fn ping(&self) -> Result<()>;
}

pub fn paid_key(fid: u64) -> String {
    format!("{}:{}", PAID_KEY_PREFIX, fid)
}

#[derive(Clone)]
pub struct RedisPaidStore {
    conn: ConnectionManager,
    ttl_secs: Option<u64>,
}

impl RedisPaidStore {
    pub fn new(conn: ConnectionManager, ttl_secs: Option<u64>) -> Self {
        Self { conn, ttl_secs }
    }
}

#[async_trait]
impl PaidStore for RedisPaidStore {
    async fn has_paid(&self, fid: u64) -> Result<bool> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(paid_key(fid)).await?;
        Ok(value.as_deref() == Some(PAID_VALUE))
    }

    async fn mark_paid(&self, fid: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        let key = paid_key(fid);
        let () = match self.ttl_secs {
            Some(ttl) => conn.set_ex(&key, PAID_VALUE, ttl).await?,
            None => conn.set(&key, PAID_VALUE).await?,
        };
        tracing::info!("Marked fid {} as paid", fid);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
