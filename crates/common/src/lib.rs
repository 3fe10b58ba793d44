//! lockbox-common - 通用类型

pub mod types;

pub use types::*;
