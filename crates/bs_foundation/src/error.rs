// crates/bs_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `BsError` 枚举和 `BsResult` 类型别名，用于整个项目的错误处理。
//!
//! # 设计原则
//!
//! 1. **致命性**: 所有错误都是致命的，管线不做部分恢复，也不产生部分输出
//! 2. **可读性**: 每个错误信息都点明失败的检查项
//! 3. **层次化**: 基础层只定义核心错误，IO 细节通过 `source` 链携带
//!
//! # 示例
//!
//! ```
//! use bs_foundation::error::{BsError, BsResult};
//!
//! fn check_layer() -> BsResult<()> {
//!     Err(BsError::missing_identifier("SU", 3))
//! }
//!
//! let err = check_layer().unwrap_err();
//! assert!(err.to_string().contains("SU"));
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// 统一结果类型
pub type BsResult<T> = Result<T, BsError>;

/// BoogieScape 错误类型
///
/// 核心错误类型，覆盖输入检查、模式校验、拓扑解析和输出冲突。
/// 所有错误一经产生即中止整个运行。
#[derive(Error, Debug)]
pub enum BsError {
    // ========================================================================
    // 输入相关错误
    // ========================================================================

    /// 输入目录或必需图层缺失、无法打开
    #[error("输入不存在: {path}")]
    InputNotFound {
        /// 缺失的路径
        path: PathBuf,
    },

    /// 期望属性缺失或声明类型不符
    #[error("模式不匹配: 图层 {layer}, 属性 {attribute}: {reason}")]
    SchemaMismatch {
        /// 单元类名
        layer: String,
        /// 属性名
        attribute: String,
        /// 不匹配原因
        reason: String,
    },

    /// 要素缺少标识符字段
    #[error("缺少标识符: 图层 {layer} 第 {feature} 个要素没有有效的 OFLD_ID")]
    MissingIdentifier {
        /// 单元类名
        layer: String,
        /// 要素序号（从 0 开始）
        feature: usize,
    },

    // ========================================================================
    // 输出相关错误
    // ========================================================================

    /// 输出目录已存在且未请求覆盖
    #[error("输出冲突: {path} 已存在 (使用 overwrite 以覆盖)")]
    OutputConflict {
        /// 冲突的路径
        path: PathBuf,
    },

    // ========================================================================
    // 拓扑相关错误
    // ========================================================================

    /// 后继/子级引用指向目录中不存在的单元
    #[error("悬垂引用: {from} 引用了不存在的单元 {to}")]
    DanglingReference {
        /// 引用来源单元 (Class#Id)
        from: String,
        /// 被引用的缺失单元 (Class#Id)
        to: String,
    },

    // ========================================================================
    // 通用错误
    // ========================================================================

    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 文件格式错误（解析失败、结构不符）
    #[error("格式错误: {file}: {message}")]
    Format {
        /// 文件路径
        file: PathBuf,
        /// 错误信息
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl BsError {
    /// 从IO错误创建
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// 从IO错误创建（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 输入不存在
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    /// 模式不匹配
    pub fn schema_mismatch(
        layer: impl Into<String>,
        attribute: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::SchemaMismatch {
            layer: layer.into(),
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// 缺少标识符
    pub fn missing_identifier(layer: impl Into<String>, feature: usize) -> Self {
        Self::MissingIdentifier {
            layer: layer.into(),
            feature,
        }
    }

    /// 输出冲突
    pub fn output_conflict(path: impl Into<PathBuf>) -> Self {
        Self::OutputConflict { path: path.into() }
    }

    /// 悬垂引用
    pub fn dangling_reference(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::DanglingReference {
            from: from.into(),
            to: to.into(),
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 格式错误
    pub fn format(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Format {
            file: file.into(),
            message: message.into(),
        }
    }
}
