use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

/// JSON documents under plain keys plus one Redis set per index.
#[derive(Clone)]
pub struct RedisService {
    conn: ConnectionManager,
}

impl RedisService {
    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        let client = Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<(), RedisError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }

    pub async fn get_doc(&self, key: &str) -> Result<Option<String>, RedisError> {
        let mut conn = self.conn.clone();
        conn.get(key).await
    }

    // Document write and index membership go out in one MULTI block
    pub async fn put_doc(
        &self,
        key: &str,
        index: &str,
        member: &str,
        doc: String,
    ) -> Result<(), RedisError> {
        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .set(key, doc).ignore()
            .sadd(index, member).ignore()
            .query_async::<_, ()>(&mut conn)
            .await
    }

    pub async fn members(&self, index: &str) -> Result<Vec<String>, RedisError> {
        let mut conn = self.conn.clone();
        conn.smembers(index).await
    }

    pub async fn get_docs(&self, keys: &[String]) -> Result<Vec<Option<String>>, RedisError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        redis::cmd("MGET")
            .arg(keys)
            .query_async::<_, Vec<Option<String>>>(&mut conn)
            .await
    }
}
