// crates/bs_core/src/derive_ap.rs

//! 聚合点 (AP) 派生
//!
//! 扫描 RS/RE 单元上声明的子级注记，合成新的 AP 点单元，
//! 并把声明了 `FROM_AP` 的 SU 单元反向链接到这些 AP 上。
//!
//! # 设计说明
//!
//! - 确定性扫描顺序：先处理全部 RS 单元（派生 AP 的
//!   `process_order = 1`），再处理全部 RE 单元（`= 2`），
//!   每一类内部按目录迭代顺序。
//! - 新单元几何是来源单元几何的质心，质心坐标另存入
//!   `xposition` / `yposition` 属性，供无法读取几何的下游消费。
//! - 同一 `(AP, childId)` 被多个来源单元声明时为后写覆盖
//!   (last-writer-wins)，覆盖发生时记一条 warn 日志。

use crate::catalog::UnitCatalog;
use crate::unit::{
    AttrValue, SpatialUnit, UnitClass, UnitRef, ATTR_FROM_AP, ATTR_XPOSITION, ATTR_YPOSITION,
};
use bs_foundation::BsResult;
use bs_geo::Geometry;
use tracing::{debug, warn};

/// 派生全部 AP 单元，返回最终创建的 AP 数量
///
/// 扫描顺序与派生规则见模块文档。来源单元上非 AP 类的子级
/// 注记与派生无关，跳过并记 debug 日志。
pub fn derive_aggregation_points(catalog: &mut UnitCatalog) -> BsResult<usize> {
    // SU 的 FROM_AP 反向索引，按 SU 目录迭代顺序
    let su_by_from_ap: Vec<(i64, i64)> = catalog
        .layer(UnitClass::Su)
        .iter()
        .filter_map(|su| su.attr_i64(ATTR_FROM_AP).map(|from_ap| (su.id, from_ap)))
        .collect();

    for (class, process_order) in [(UnitClass::Rs, 1), (UnitClass::Re, 2)] {
        // 先收集来源快照，再逐个插入，避免迭代期间修改目录
        let sources: Vec<(i64, Vec<UnitRef>, Geometry)> = catalog
            .layer(class)
            .iter()
            .filter(|unit| !unit.child.is_empty())
            .map(|unit| (unit.id, unit.child.clone(), unit.geometry.clone()))
            .collect();

        for (source_id, children, geometry) in sources {
            for child in children {
                if child.class != UnitClass::Ap {
                    debug!(
                        source = %UnitRef::new(class, source_id),
                        child = %child,
                        "跳过非 AP 子级注记"
                    );
                    continue;
                }

                let centroid = geometry.centroid();
                let mut ap = SpatialUnit::new(child.id, Geometry::Point(centroid));
                ap.process_order = process_order;
                ap.set_attr(ATTR_XPOSITION, AttrValue::Float(centroid.x));
                ap.set_attr(ATTR_YPOSITION, AttrValue::Float(centroid.y));
                for (su_id, from_ap) in &su_by_from_ap {
                    if *from_ap == child.id {
                        ap.push_to(UnitRef::new(UnitClass::Su, *su_id));
                    }
                }

                if catalog.insert(UnitClass::Ap, ap).is_some() {
                    warn!(
                        ap = %child,
                        source = %UnitRef::new(class, source_id),
                        "重复的 AP 标识，后写覆盖先前派生的单元"
                    );
                }
            }
        }
    }

    Ok(catalog.layer(UnitClass::Ap).len())
}
