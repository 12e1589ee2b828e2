// crates/bs_io/src/lib.rs

//! BoogieScape IO 模块
//!
//! 核心引擎的边界协作者：矢量图层加载、结果写出、图可视化
//! 与运行目录处理。核心只消费和产出内存结构，所有文件格式
//! 细节收在本层。
//!
//! # 模块
//!
//! - [`tokens`]: `Class#Id` 链接记号的解析与序列化
//! - [`loader`]: GeoJSON 图层加载器（带模式校验）
//! - [`exporters`]: GeoJSON / FluidX / DOT 写出
//! - [`workspace`]: 输入检查与输出目录覆盖门控

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod exporters;
pub mod loader;
pub mod tokens;
pub mod workspace;

pub use exporters::{DomainWriter, DotRenderer, FluidXWriter, GeoJsonWriter};
pub use loader::GeoJsonLoader;
