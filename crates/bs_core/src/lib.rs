// crates/bs_core/src/lib.rs

//! BoogieScape 核心引擎
//!
//! 空间单元网络与汇水聚合引擎：内存实体模型、流向图构建、
//! 聚合点派生、汇水聚合与属性后处理。
//!
//! # 模块
//!
//! - [`unit`]: 单元类、单元引用、属性值与空间单元实体
//! - [`catalog`]: 按类组织、保序的单元目录
//! - [`graph`]: 基础单元之上的有向流向图与祖先查询
//! - [`derive_ap`]: 聚合点 (AP) 派生
//! - [`aggregate`]: 汇水聚合单元 (GU) 派生与改接
//! - [`postprocess`]: 坡度等属性的单位归一化
//! - [`pipeline`]: 协作者接口与单向管线驱动
//!
//! # 处理流程
//!
//! ```text
//! 加载 → 建图 → 派生 AP → 派生 GU → 属性后处理 → 写出
//! ```
//!
//! 单线程单趟批处理：两个派生算法都需要全局可达性，
//! 目录必须全量驻留后才能进入任何派生阶段。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod catalog;
pub mod derive_ap;
pub mod graph;
pub mod pipeline;
pub mod postprocess;
pub mod unit;

pub use catalog::{UnitCatalog, UnitLayer};
pub use graph::FlowGraph;
pub use pipeline::{GraphRenderer, Pipeline, PipelineReport, UnitLoader, UnitWriter};
pub use unit::{AttrKind, AttrValue, SpatialUnit, UnitClass, UnitRef};
