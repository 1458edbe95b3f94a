use redis::{aio::ConnectionManager, Client, IntoConnectionInfo};
use crate::errors::Result;

#[derive(Clone)]
pub struct RedisService {
    connection_manager: ConnectionManager,
}

impl RedisService {
    /// Connects to Redis. A token, when given, is sent as the connection
    /// password and overrides any password in the URL.
    pub async fn new(redis_url: &str, token: Option<&str>) -> Result<Self> {
        let mut info = redis_url.into_connection_info()?;
        if let Some(token) = token {
            info.redis.password = Some(token.to_string());
        }

        let client = Client::open(info)?;
        let connection_manager = ConnectionManager::new(client).await?;

        Ok(Self { connection_manager })
    }

    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }
}
