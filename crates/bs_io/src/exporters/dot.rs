// crates/bs_io/src/exporters/dot.rs

//! 流向图 DOT 渲染器
//!
//! 把流向图写成 Graphviz DOT 文档，纯诊断用途，
//! 从不影响派生结果的正确性。

use bs_core::{FlowGraph, GraphRenderer};
use bs_foundation::{BsError, BsResult};
use petgraph::visit::EdgeRef;
use std::fmt::Write as _;
use std::path::PathBuf;

/// DOT 文档文件名
pub const DOT_FILE: &str = "flowgraph.dot";

/// DOT 渲染器
#[derive(Debug, Clone)]
pub struct DotRenderer {
    output_dir: PathBuf,
}

impl DotRenderer {
    /// 创建指向输出目录的渲染器
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 渲染为 DOT 文本
    #[must_use]
    pub fn render_to_string(graph: &FlowGraph) -> String {
        let inner = graph.inner();
        let mut out = String::from("digraph flow {\n");
        for idx in inner.node_indices() {
            let _ = writeln!(out, "    \"{}\";", inner[idx]);
        }
        for edge in inner.edge_references() {
            let _ = writeln!(
                out,
                "    \"{}\" -> \"{}\";",
                inner[edge.source()],
                inner[edge.target()]
            );
        }
        out.push_str("}\n");
        out
    }
}

impl GraphRenderer for DotRenderer {
    fn render(&self, graph: &FlowGraph) -> BsResult<()> {
        let path = self.output_dir.join(DOT_FILE);
        std::fs::write(&path, Self::render_to_string(graph)).map_err(|e| {
            BsError::io_with_source(format!("写出 DOT 文档失败: {}", path.display()), e)
        })
    }
}
