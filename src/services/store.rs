use serde::{de::DeserializeOwned, Serialize};
use crate::config::{StorageBackend, StorageConfig};
use crate::errors::AppResult;
use crate::models::{Comment, Project, User};
use super::{MemoryStore, RedisService};

const USERS: &str = "users";
const PROJECTS: &str = "projects";

fn user_key(username: &str) -> String {
    format!("user:{}", username)
}

fn project_key(project_id: &str) -> String {
    format!("project:{}", project_id)
}

fn comment_key(comment_id: &str) -> String {
    format!("comment:{}", comment_id)
}

fn project_comments(project_id: &str) -> String {
    format!("project_comments:{}", project_id)
}

/// Document store holding the three collections (users, projects, comments).
#[derive(Clone)]
pub enum Store {
    Redis(RedisService),
    Memory(MemoryStore),
}

impl Store {
    pub async fn connect(config: &StorageConfig) -> AppResult<Self> {
        match config.backend {
            StorageBackend::Redis => Ok(Store::Redis(RedisService::connect(&config.redis_url).await?)),
            StorageBackend::Memory => Ok(Store::memory()),
        }
    }

    pub fn memory() -> Self {
        Store::Memory(MemoryStore::new())
    }

    pub async fn ping(&self) -> AppResult<()> {
        match self {
            Store::Redis(redis) => Ok(redis.ping().await?),
            Store::Memory(_) => Ok(()),
        }
    }

    pub async fn get_user(&self, username: &str) -> AppResult<Option<User>> {
        self.load(&user_key(username)).await
    }

    pub async fn save_user(&self, user: &User) -> AppResult<()> {
        self.save(&user_key(&user.username), USERS, &user.username, user).await
    }

    /// Every stored user, deactivated ones included, in no particular order.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.load_indexed(USERS, user_key).await
    }

    pub async fn get_project(&self, project_id: &str) -> AppResult<Option<Project>> {
        self.load(&project_key(project_id)).await
    }

    pub async fn save_project(&self, project: &Project) -> AppResult<()> {
        self.save(&project_key(&project.id), PROJECTS, &project.id, project).await
    }

    pub async fn list_projects(&self) -> AppResult<Vec<Project>> {
        self.load_indexed(PROJECTS, project_key).await
    }

    pub async fn save_comment(&self, comment: &Comment) -> AppResult<()> {
        let index = project_comments(&comment.project_id);
        self.save(&comment_key(&comment.id), &index, &comment.id, comment).await
    }

    pub async fn list_comments(&self, project_id: &str) -> AppResult<Vec<Comment>> {
        self.load_indexed(&project_comments(project_id), comment_key).await
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let raw = match self {
            Store::Redis(redis) => redis.get_doc(key).await?,
            Store::Memory(memory) => memory.get_doc(key).await,
        };
        match raw {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn save<T: Serialize>(&self, key: &str, index: &str, member: &str, value: &T) -> AppResult<()> {
        let doc = serde_json::to_string(value)?;
        match self {
            Store::Redis(redis) => redis.put_doc(key, index, member, doc).await?,
            Store::Memory(memory) => memory.put_doc(key, index, member, doc).await,
        }
        Ok(())
    }

    async fn load_indexed<T: DeserializeOwned>(
        &self,
        index: &str,
        key_of: fn(&str) -> String,
    ) -> AppResult<Vec<T>> {
        let members = match self {
            Store::Redis(redis) => redis.members(index).await?,
            Store::Memory(memory) => memory.members(index).await,
        };
        let keys: Vec<String> = members.iter().map(|m| key_of(m)).collect();
        let docs = match self {
            Store::Redis(redis) => redis.get_docs(&keys).await?,
            Store::Memory(memory) => memory.get_docs(&keys).await,
        };

        let mut records = Vec::with_capacity(docs.len());
        for (key, doc) in keys.iter().zip(docs) {
            match doc {
                Some(data) => records.push(serde_json::from_str(&data)?),
                None => tracing::warn!("Index {} references missing document {}", index, key),
            }
        }
        Ok(records)
    }
}
