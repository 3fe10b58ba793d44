use lockbox_common::UserId;
use lockbox_errors::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Group membership lookup failed for user {user_id}: {source}")]
    GroupLookup {
        user_id: UserId,
        #[source]
        source: AppError,
    },
    #[error("Decision cache store error: {0}")]
    CacheStore(#[source] AppError),
    #[error("Decision cache payload error: {0}")]
    CacheCodec(#[from] serde_json::Error),
    #[error("Cached decision {0} is incomplete")]
    IncompleteDecision(String),
}

impl AccessError {
    /// 缓存层错误在 DecisionCache 内部吞掉，其余错误必须中止请求
    pub fn is_cache_error(&self) -> bool {
        !matches!(self, AccessError::GroupLookup { .. })
    }
}

impl From<AccessError> for AppError {
    fn from(error: AccessError) -> Self {
        let message = error.to_string();
        match error {
            AccessError::GroupLookup {
                source: AppError::Database(msg),
                ..
            } => AppError::Database(msg),
            AccessError::GroupLookup { .. } => AppError::database(message),
            _ => AppError::cache(message),
        }
    }
}
