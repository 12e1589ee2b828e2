// crates/bs_io/src/workspace.rs

//! 运行工作区
//!
//! 输入/输出目录的存在性检查与覆盖门控。所有目录处理在
//! 管线运行之前完成，核心引擎不接触文件系统。

use bs_foundation::{BsError, BsResult};
use std::path::Path;
use tracing::info;

/// 检查输入目录存在
///
/// # 错误
///
/// 目录缺失或不是目录时返回 [`BsError::InputNotFound`]。
pub fn check_input_dir(path: &Path) -> BsResult<()> {
    if !path.is_dir() {
        return Err(BsError::input_not_found(path));
    }
    Ok(())
}

/// 准备输出目录
///
/// 目录已存在且未请求覆盖时返回 [`BsError::OutputConflict`]；
/// 请求覆盖时清空重建；不存在时创建。
pub fn prepare_output_dir(path: &Path, overwrite: bool) -> BsResult<()> {
    if path.exists() {
        if !overwrite {
            return Err(BsError::output_conflict(path));
        }
        info!(path = %path.display(), "覆盖已有输出目录");
        std::fs::remove_dir_all(path).map_err(|e| {
            BsError::io_with_source(format!("清空输出目录失败: {}", path.display()), e)
        })?;
    }
    std::fs::create_dir_all(path).map_err(|e| {
        BsError::io_with_source(format!("创建输出目录失败: {}", path.display()), e)
    })
}
