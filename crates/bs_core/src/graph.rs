// crates/bs_core/src/graph.rs

//! 流向图构建
//!
//! 在全部基础单元 (RS/SU/RE) 之上构建有向图，并提供祖先查询。
//!
//! # 设计说明
//!
//! - 每个基础单元一个节点，节点权重是稳定键 [`UnitRef`]（派生单元
//!   尚不存在，不入图）。
//! - 每条声明的后继链接一条边。只保留末尾一条后继边的变体会悄悄
//!   丢掉多后继拓扑，属于缺陷；测试中有对应的回归用例。
//! - 出口抑制：`GUconnect > 0` 的 RS 单元是汇水出口，不贡献任何
//!   出边。这样"出口的祖先"恰好是它自己的汇水范围，不会沿下游
//!   泄漏进其它出口的汇水范围。
//! - 悬垂的后继引用立即失败（fail-fast），见 DESIGN.md。
//!
//! # 示例
//!
//! ```
//! use bs_core::catalog::UnitCatalog;
//! use bs_core::graph::FlowGraph;
//! use bs_core::unit::{SpatialUnit, UnitClass, UnitRef};
//! use bs_geo::{Geometry, Point2D};
//!
//! let mut catalog = UnitCatalog::new();
//! let mut re = SpatialUnit::new(1, Geometry::Point(Point2D::new(0.0, 0.0)));
//! re.push_to(UnitRef::new(UnitClass::Re, 2));
//! catalog.insert(UnitClass::Re, re);
//! catalog.insert(UnitClass::Re, SpatialUnit::new(2, Geometry::Point(Point2D::new(1.0, 0.0))));
//!
//! let graph = FlowGraph::build(&catalog).unwrap();
//! let up = graph.ancestors(UnitRef::new(UnitClass::Re, 2));
//! assert_eq!(up, vec![UnitRef::new(UnitClass::Re, 1)]);
//! ```

use crate::catalog::UnitCatalog;
use crate::unit::{UnitClass, UnitRef};
use bs_foundation::{BsError, BsResult};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};

/// 基础单元之上的有向流向图
#[derive(Debug, Default)]
pub struct FlowGraph {
    graph: DiGraph<UnitRef, ()>,
    nodes: HashMap<UnitRef, NodeIndex>,
}

impl FlowGraph {
    /// 从目录构建流向图
    ///
    /// 节点按目录迭代顺序加入；每条后继链接一条边，
    /// 出口 RS 单元不贡献出边。
    ///
    /// # 错误
    ///
    /// 后继引用指向目录中不存在的单元时返回
    /// [`BsError::DanglingReference`]。
    pub fn build(catalog: &UnitCatalog) -> BsResult<Self> {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();

        for class in UnitClass::BASE {
            for unit in catalog.layer(class).iter() {
                let key = UnitRef::new(class, unit.id);
                let idx = graph.add_node(key);
                nodes.insert(key, idx);
            }
        }

        for class in UnitClass::BASE {
            for unit in catalog.layer(class).iter() {
                // 出口抑制：汇水出口不贡献任何出边
                if class == UnitClass::Rs && unit.is_outlet() {
                    continue;
                }
                let from = UnitRef::new(class, unit.id);
                let from_idx = nodes[&from];
                for target in &unit.to {
                    let to_idx = *nodes.get(target).ok_or_else(|| {
                        BsError::dangling_reference(from.to_string(), target.to_string())
                    })?;
                    graph.add_edge(from_idx, to_idx, ());
                }
            }
        }

        Ok(Self { graph, nodes })
    }

    /// 节点数
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// 边数
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// 指定节点的出边目标，按后继声明顺序
    #[must_use]
    pub fn successors(&self, key: UnitRef) -> Vec<UnitRef> {
        let Some(&idx) = self.nodes.get(&key) else {
            return Vec::new();
        };
        // petgraph 的邻居迭代是逆插入序，翻转回声明顺序
        let mut targets: Vec<UnitRef> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n])
            .collect();
        targets.reverse();
        targets
    }

    /// 节点的全部祖先：所有存在指向该节点有向路径的节点，不含自身
    ///
    /// 自入边（逆向 BFS）收集，返回顺序为确定性的发现顺序，
    /// 供面积求和与几何合并按同一顺序消费。
    #[must_use]
    pub fn ancestors(&self, key: UnitRef) -> Vec<UnitRef> {
        let Some(&start) = self.nodes.get(&key) else {
            return Vec::new();
        };

        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        let mut result = Vec::new();

        seen.insert(start);
        queue.push_back(start);

        while let Some(idx) = queue.pop_front() {
            for pred in self.graph.neighbors_directed(idx, Direction::Incoming) {
                if seen.insert(pred) {
                    result.push(self.graph[pred]);
                    queue.push_back(pred);
                }
            }
        }

        result
    }

    /// 底层 petgraph 图（供可视化渲染器使用）
    #[must_use]
    pub fn inner(&self) -> &DiGraph<UnitRef, ()> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{AttrValue, SpatialUnit, ATTR_GU_CONNECT};
    use bs_geo::{Geometry, LineString, Point2D, Polygon};

    fn rs_unit(id: i64, outlet: bool) -> SpatialUnit {
        let mut unit = SpatialUnit::new(
            id,
            Geometry::Line(LineString::new(vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(1.0, 0.0),
            ])),
        );
        unit.set_attr(ATTR_GU_CONNECT, AttrValue::Int(i64::from(outlet)));
        unit
    }

    fn su_unit(id: i64) -> SpatialUnit {
        SpatialUnit::new(
            id,
            Geometry::Polygon(Polygon::new(vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(1.0, 0.0),
                Point2D::new(1.0, 1.0),
            ])),
        )
    }

    fn rs(id: i64) -> UnitRef {
        UnitRef::new(UnitClass::Rs, id)
    }

    fn su(id: i64) -> UnitRef {
        UnitRef::new(UnitClass::Su, id)
    }

    #[test]
    fn test_one_edge_per_declared_successor() {
        // 回归用例：多后继单元必须贡献每条后继边，
        // 只保留末尾一条的变体是缺陷
        let mut catalog = UnitCatalog::new();
        let mut source = su_unit(1);
        source.push_to(rs(1));
        source.push_to(rs(2));
        catalog.insert(UnitClass::Su, source);
        catalog.insert(UnitClass::Rs, rs_unit(1, false));
        catalog.insert(UnitClass::Rs, rs_unit(2, false));

        let graph = FlowGraph::build(&catalog).unwrap();
        assert_eq!(graph.edge_count(), 2);
        let mut succ = graph.successors(su(1));
        succ.sort();
        assert_eq!(succ, vec![rs(1), rs(2)]);
    }

    #[test]
    fn test_successors_follow_declared_order() {
        let mut catalog = UnitCatalog::new();
        let mut source = su_unit(1);
        source.push_to(rs(3));
        source.push_to(rs(1));
        source.push_to(rs(2));
        catalog.insert(UnitClass::Su, source);
        for id in [1, 2, 3] {
            catalog.insert(UnitClass::Rs, rs_unit(id, false));
        }

        let graph = FlowGraph::build(&catalog).unwrap();
        assert_eq!(graph.successors(su(1)), vec![rs(3), rs(1), rs(2)]);
    }

    #[test]
    fn test_outlet_suppresses_all_outgoing_edges() {
        let mut catalog = UnitCatalog::new();
        let mut outlet = rs_unit(1, true);
        outlet.push_to(rs(2));
        catalog.insert(UnitClass::Rs, outlet);
        catalog.insert(UnitClass::Rs, rs_unit(2, false));

        let graph = FlowGraph::build(&catalog).unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.successors(rs(1)).is_empty());
    }

    #[test]
    fn test_ancestors_of_outlet() {
        // SU1 -> RS1, SU2 -> RS1, RS1 为出口
        let mut catalog = UnitCatalog::new();
        catalog.insert(UnitClass::Rs, {
            let mut u = rs_unit(1, true);
            u.push_to(rs(2));
            u
        });
        catalog.insert(UnitClass::Rs, rs_unit(2, false));
        for id in [1, 2] {
            let mut u = su_unit(id);
            u.push_to(rs(1));
            catalog.insert(UnitClass::Su, u);
        }

        let graph = FlowGraph::build(&catalog).unwrap();
        let mut up = graph.ancestors(rs(1));
        up.sort();
        assert_eq!(up, vec![su(1), su(2)]);

        // 出口下游的 RS2 不应把出口的上游算进自己的祖先
        assert!(graph.ancestors(rs(2)).is_empty());
    }

    #[test]
    fn test_ancestors_transitive_and_exclude_self() {
        // SU1 -> SU2 -> RS1
        let mut catalog = UnitCatalog::new();
        catalog.insert(UnitClass::Rs, rs_unit(1, false));
        let mut su1 = su_unit(1);
        su1.push_to(su(2));
        let mut su2 = su_unit(2);
        su2.push_to(rs(1));
        catalog.insert(UnitClass::Su, su1);
        catalog.insert(UnitClass::Su, su2);

        let graph = FlowGraph::build(&catalog).unwrap();
        let mut up = graph.ancestors(rs(1));
        up.sort();
        assert_eq!(up, vec![su(1), su(2)]);
        assert!(!graph.ancestors(rs(1)).contains(&rs(1)));
    }

    #[test]
    fn test_dangling_successor_fails_fast() {
        let mut catalog = UnitCatalog::new();
        let mut u = su_unit(1);
        u.push_to(rs(99));
        catalog.insert(UnitClass::Su, u);

        let err = FlowGraph::build(&catalog).unwrap_err();
        assert!(matches!(err, BsError::DanglingReference { .. }));
        assert!(err.to_string().contains("RS#99"));
    }

    #[test]
    fn test_derived_classes_not_in_graph() {
        let mut catalog = UnitCatalog::new();
        catalog.insert(UnitClass::Su, su_unit(1));
        catalog.insert(
            UnitClass::Ap,
            SpatialUnit::new(1, Geometry::Point(Point2D::new(0.0, 0.0))),
        );

        let graph = FlowGraph::build(&catalog).unwrap();
        assert_eq!(graph.node_count(), 1);
    }
}
