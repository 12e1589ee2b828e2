// crates/bs_foundation/src/lib.rs

//! BoogieScape Foundation Layer
//!
//! 零领域知识基础层，提供整个项目的统一错误类型。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 `BsError` / `BsResult`
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 thiserror
//! 2. **致命错误**: 所有错误都中止整个运行，不做部分恢复
//! 3. **向上传播**: 上层通过 `?` 直接传播，不在中途吞掉错误

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

pub use error::{BsError, BsResult};
