//! 通用类型定义
//!
//! 用户、用户组、条目均沿用存储层的整型主键

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// 用户 ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct UserId(pub i64);

/// 用户组 ID
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct GroupId(pub i64);

/// 条目 ID（受保护的凭据记录）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct ItemId(pub i64);

/// 请求的操作 ID
///
/// `0` 保留给缓存预热，不对应任何具体界面操作
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct ActionId(pub u32);

impl ActionId {
    /// 缓存预热使用的操作 ID
    pub const PRIME: ActionId = ActionId(0);

    pub fn is_prime(&self) -> bool {
        self.0 == 0
    }
}
