// crates/bs_core/src/catalog.rs

//! 单元目录
//!
//! 按单元类组织的 Id → 空间单元映射，是引擎的核心工作状态。
//!
//! # 设计说明
//!
//! 派生算法的确定性依赖目录的迭代顺序，因此每个类的存储
//! 在哈希索引之外额外维护插入顺序。替换已有 Id 时保留
//! 首次插入的位置，使重复派生 AP 时的迭代顺序保持稳定。
//!
//! # 示例
//!
//! ```
//! use bs_core::catalog::UnitCatalog;
//! use bs_core::unit::{SpatialUnit, UnitClass, UnitRef};
//! use bs_geo::{Geometry, Point2D};
//!
//! let mut catalog = UnitCatalog::new();
//! catalog.insert(UnitClass::Re, SpatialUnit::new(4, Geometry::Point(Point2D::new(0.0, 0.0))));
//! assert!(catalog.contains(&UnitRef::new(UnitClass::Re, 4)));
//! assert_eq!(catalog.layer(UnitClass::Re).len(), 1);
//! ```

use crate::unit::{SpatialUnit, UnitClass, UnitRef};
use std::collections::HashMap;

// ============================================================================
// UnitLayer - 单类存储
// ============================================================================

/// 单个单元类的 Id → 单元存储，保留插入顺序
#[derive(Clone, Debug, Default)]
pub struct UnitLayer {
    /// 插入顺序中的 Id 序列
    order: Vec<i64>,
    /// Id 索引
    units: HashMap<i64, SpatialUnit>,
}

impl UnitLayer {
    /// 创建空存储
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 单元数量
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// 是否为空
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 是否包含指定 Id
    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.units.contains_key(&id)
    }

    /// 插入单元
    ///
    /// 已存在同 Id 单元时替换其值并返回旧值，插入位置保持不变。
    pub fn insert(&mut self, unit: SpatialUnit) -> Option<SpatialUnit> {
        let id = unit.id;
        let old = self.units.insert(id, unit);
        if old.is_none() {
            self.order.push(id);
        }
        old
    }

    /// 按 Id 读取
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&SpatialUnit> {
        self.units.get(&id)
    }

    /// 按 Id 可变读取
    pub fn get_mut(&mut self, id: i64) -> Option<&mut SpatialUnit> {
        self.units.get_mut(&id)
    }

    /// 按插入顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = &SpatialUnit> {
        self.order.iter().map(|id| &self.units[id])
    }

    /// 按插入顺序迭代 Id
    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.order.iter().copied()
    }
}

// ============================================================================
// UnitCatalog - 全类目录
// ============================================================================

/// 单元目录：每个单元类一个 [`UnitLayer`]
#[derive(Clone, Debug, Default)]
pub struct UnitCatalog {
    layers: [UnitLayer; 5],
}

impl UnitCatalog {
    /// 创建空目录
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定类的只读存储
    #[must_use]
    pub fn layer(&self, class: UnitClass) -> &UnitLayer {
        &self.layers[class.index()]
    }

    /// 指定类的可变存储
    pub fn layer_mut(&mut self, class: UnitClass) -> &mut UnitLayer {
        &mut self.layers[class.index()]
    }

    /// 插入单元到指定类
    pub fn insert(&mut self, class: UnitClass, unit: SpatialUnit) -> Option<SpatialUnit> {
        self.layer_mut(class).insert(unit)
    }

    /// 是否包含引用指向的单元
    #[must_use]
    pub fn contains(&self, unit_ref: &UnitRef) -> bool {
        self.layer(unit_ref.class).contains(unit_ref.id)
    }

    /// 按引用读取
    #[must_use]
    pub fn get(&self, unit_ref: &UnitRef) -> Option<&SpatialUnit> {
        self.layer(unit_ref.class).get(unit_ref.id)
    }

    /// 按引用可变读取
    pub fn get_mut(&mut self, unit_ref: &UnitRef) -> Option<&mut SpatialUnit> {
        self.layer_mut(unit_ref.class).get_mut(unit_ref.id)
    }

    /// 全目录单元总数
    #[must_use]
    pub fn total_units(&self) -> usize {
        self.layers.iter().map(UnitLayer::len).sum()
    }
}
