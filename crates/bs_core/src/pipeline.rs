// crates/bs_core/src/pipeline.rs

//! 管线驱动
//!
//! 单向、无分支的批处理流程：
//! `加载 → 建图 → (渲染图) → 派生 AP → 派生 GU → 属性后处理 → 写出`。
//!
//! # 设计说明
//!
//! - 协作者（加载器、写出器、可视化渲染器）按引用传入，
//!   每次运行构造一次，没有进程级单例状态。
//! - 目录在运行期间由驱动独占持有；任一阶段出错即中止整个运行，
//!   不产生部分输出。
//! - 图可视化是纯诊断输出，渲染器缺席不影响正确性。
//!
//! # 示例
//!
//! ```ignore
//! use bs_core::pipeline::{Pipeline, PipelineReport};
//!
//! let pipeline = Pipeline::new(&loader, &writer).with_renderer(&dot);
//! let report: PipelineReport = pipeline.run()?;
//! println!("创建 GU: {}", report.gu_created);
//! ```

use crate::aggregate::aggregate_catchments;
use crate::catalog::UnitCatalog;
use crate::derive_ap::derive_aggregation_points;
use crate::graph::FlowGraph;
use crate::postprocess::normalize_slopes;
use crate::unit::{
    AttrKind, SpatialUnit, UnitClass, ATTR_AREA, ATTR_FROM_AP, ATTR_GU_CONNECT, ATTR_SLOPE,
};
use bs_foundation::BsResult;
use tracing::{info, warn};

// ============================================================================
// 加载模式
// ============================================================================

/// 一个基础图层的期望属性模式
#[derive(Clone, Debug)]
pub struct LayerSchema {
    /// 图层单元类
    pub class: UnitClass,
    /// 期望属性：名称 → 声明标量类型
    pub attributes: Vec<(&'static str, AttrKind)>,
}

/// 三个基础图层的期望模式，按加载顺序 RS、SU、RE
#[must_use]
pub fn base_layer_schemas() -> [LayerSchema; 3] {
    [
        LayerSchema {
            class: UnitClass::Rs,
            attributes: vec![(ATTR_GU_CONNECT, AttrKind::Int), (ATTR_SLOPE, AttrKind::Float)],
        },
        LayerSchema {
            class: UnitClass::Su,
            attributes: vec![
                (ATTR_AREA, AttrKind::Float),
                (ATTR_FROM_AP, AttrKind::Int),
                (ATTR_SLOPE, AttrKind::Float),
            ],
        },
        LayerSchema {
            class: UnitClass::Re,
            attributes: vec![(ATTR_SLOPE, AttrKind::Float)],
        },
    ]
}

// ============================================================================
// 协作者接口
// ============================================================================

/// 单元加载器：按模式加载一个基础图层
pub trait UnitLoader {
    /// 加载指定模式描述的图层，返回目录顺序的单元序列
    fn load(&self, schema: &LayerSchema) -> BsResult<Vec<SpatialUnit>>;
}

/// 单元写出器：序列化最终目录
pub trait UnitWriter {
    /// 写出最终目录
    fn write(&self, catalog: &UnitCatalog) -> BsResult<()>;
}

/// 流向图渲染器（可选的诊断协作者）
pub trait GraphRenderer {
    /// 渲染流向图
    fn render(&self, graph: &FlowGraph) -> BsResult<()>;
}

// ============================================================================
// 运行报告
// ============================================================================

/// 一次运行的汇总报告
#[derive(Clone, Copy, Debug, Default)]
pub struct PipelineReport {
    /// 加载的 RS 单元数
    pub rs_loaded: usize,
    /// 加载的 SU 单元数
    pub su_loaded: usize,
    /// 加载的 RE 单元数
    pub re_loaded: usize,
    /// 派生的 AP 单元数
    pub ap_created: usize,
    /// 派生的 GU 单元数
    pub gu_created: usize,
    /// 归一化的坡度属性数
    pub slopes_normalized: usize,
}

// ============================================================================
// Pipeline - 管线驱动
// ============================================================================

/// 管线驱动，持有本次运行的协作者引用
pub struct Pipeline<'a> {
    loader: &'a dyn UnitLoader,
    writer: &'a dyn UnitWriter,
    renderer: Option<&'a dyn GraphRenderer>,
}

impl<'a> Pipeline<'a> {
    /// 创建管线
    pub fn new(loader: &'a dyn UnitLoader, writer: &'a dyn UnitWriter) -> Self {
        Self {
            loader,
            writer,
            renderer: None,
        }
    }

    /// 挂接可选的图渲染器
    #[must_use]
    pub fn with_renderer(mut self, renderer: &'a dyn GraphRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// 执行完整管线
    ///
    /// # 错误
    ///
    /// 任一阶段的错误原样向上传播，运行中止且不产生输出。
    pub fn run(&self) -> BsResult<PipelineReport> {
        let mut report = PipelineReport::default();
        let mut catalog = UnitCatalog::new();

        info!("###### 加载基础图层");
        for schema in base_layer_schemas() {
            let units = self.loader.load(&schema)?;
            let count = units.len();
            for unit in units {
                let id = unit.id;
                // 同图层重复标识：后者生效，留痕供排查输入
                if catalog.insert(schema.class, unit).is_some() {
                    warn!(class = %schema.class, id, "重复标识, 覆盖先前加载的单元");
                }
            }
            info!(class = %schema.class, count, "图层加载完成");
            match schema.class {
                UnitClass::Rs => report.rs_loaded = count,
                UnitClass::Su => report.su_loaded = count,
                UnitClass::Re => report.re_loaded = count,
                UnitClass::Ap | UnitClass::Gu => {}
            }
        }

        info!("###### 构建流向图");
        let graph = FlowGraph::build(&catalog)?;
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "流向图构建完成"
        );

        if let Some(renderer) = self.renderer {
            info!("###### 渲染流向图");
            renderer.render(&graph)?;
        }

        info!("###### 派生聚合点 (AP)");
        report.ap_created = derive_aggregation_points(&mut catalog)?;
        info!(count = report.ap_created, "AP 派生完成");

        info!("###### 派生汇水聚合单元 (GU)");
        report.gu_created = aggregate_catchments(&mut catalog, &graph)?;
        info!(count = report.gu_created, "GU 派生完成");

        info!("###### 属性后处理");
        report.slopes_normalized = normalize_slopes(&mut catalog);

        info!("###### 写出结果");
        self.writer.write(&catalog)?;

        Ok(report)
    }
}
