// crates/bs_core/src/aggregate.rs

//! 汇水聚合 (GU) 派生
//!
//! 对每个声明的聚合根（`GUconnect > 0` 的 RS 单元）合成一个 GU 单元，
//! 代表合并后的上游汇水范围，并把上游单元改接到新单元上。
//!
//! # 设计说明
//!
//! - 根按 RS 目录迭代顺序访问；GU 标识计数器从 1 开始，
//!   仅在成功创建后推进，被忽略的根不消耗标识。
//! - 祖先集合在任何修改发生前先物化为不可变序列，
//!   改写后继列表的循环只在快照上迭代。
//! - 面积求和使用 f64 按祖先集合的固定发现顺序累加，
//!   保证跨运行可复现；几何合并使用同一顺序。
//! - 汇水范围面积不为正的根被忽略（记日志，不是错误）。

use crate::catalog::UnitCatalog;
use crate::graph::FlowGraph;
use crate::unit::{
    AttrValue, SpatialUnit, UnitClass, UnitRef, ATTR_AREA, ATTR_XPOSITION, ATTR_YPOSITION,
};
use bs_foundation::BsResult;
use bs_geo::Geometry;
use tracing::{debug, info};

/// 派生全部 GU 单元，返回创建数量
///
/// `graph` 必须是在派生任何单元之前、由同一目录构建的流向图。
/// 最终的 GU 标识空间是稠密序列 `1..=k`。
pub fn aggregate_catchments(catalog: &mut UnitCatalog, graph: &FlowGraph) -> BsResult<usize> {
    // 根集合快照：目录在循环体内会被修改
    let roots: Vec<i64> = catalog
        .layer(UnitClass::Rs)
        .iter()
        .filter(|unit| unit.is_outlet())
        .map(|unit| unit.id)
        .collect();

    let mut next_id: i64 = 1;
    let mut created = 0usize;

    for root_id in roots {
        let root = UnitRef::new(UnitClass::Rs, root_id);
        // 物化的祖先快照，改写循环只在它上面迭代
        let ancestors = graph.ancestors(root);

        // 携带面积属性的成员（按构造只有 SU 单元）参与求和与几何合并
        let mut total_area = 0.0f64;
        let mut parts: Vec<Geometry> = Vec::new();
        for member in &ancestors {
            let unit = catalog.get(member).and_then(|u| {
                u.attr_f64(ATTR_AREA).map(|area| (area, u.geometry.clone()))
            });
            if let Some((area, geometry)) = unit {
                total_area += area;
                parts.push(geometry);
            }
        }

        if total_area <= 0.0 {
            info!(root = %root, "汇水范围无有效面积，忽略该聚合根");
            continue;
        }

        let geometry = Geometry::Collection(parts);
        let centroid = geometry.centroid();

        let mut gu = SpatialUnit::new(next_id, geometry);
        gu.process_order = 1;
        gu.push_to(root);
        gu.set_attr(ATTR_AREA, AttrValue::Float(total_area));
        gu.set_attr(ATTR_XPOSITION, AttrValue::Float(centroid.x));
        gu.set_attr(ATTR_YPOSITION, AttrValue::Float(centroid.y));
        catalog.insert(UnitClass::Gu, gu);

        // 改接：全量（未过滤）祖先集合中的 SU/RE 成员追加指向新 GU 的链接
        let gu_ref = UnitRef::new(UnitClass::Gu, next_id);
        let mut rewired = 0usize;
        for member in &ancestors {
            if matches!(member.class, UnitClass::Su | UnitClass::Re) {
                if let Some(unit) = catalog.get_mut(member) {
                    unit.push_to(gu_ref);
                    rewired += 1;
                }
            }
        }

        debug!(
            gu = %gu_ref,
            root = %root,
            area = total_area,
            rewired,
            "创建汇水聚合单元"
        );

        next_id += 1;
        created += 1;
    }

    Ok(created)
}
