// crates/bs_io/src/exporters/mod.rs

//! 数据导出模块
//!
//! 提供最终目录的各种边界格式写出：
//!
//! - [`geojson`]: 每类一个 GeoJSON 图层文件
//! - [`fluidx`]: 平台单元/属性 XML 方言
//! - [`dot`]: 流向图 DOT 可视化（纯诊断）

pub mod dot;
pub mod fluidx;
pub mod geojson;

use bs_core::unit::{
    UnitClass, ATTR_AREA, ATTR_FROM_AP, ATTR_GU_CONNECT, ATTR_SLOPE, ATTR_XPOSITION,
    ATTR_YPOSITION,
};
use bs_core::{UnitCatalog, UnitWriter};
use bs_foundation::BsResult;

pub use self::dot::DotRenderer;
pub use self::fluidx::FluidXWriter;
pub use self::geojson::GeoJsonWriter;

/// 每个单元类的缺省属性列顺序
#[must_use]
pub fn default_columns(class: UnitClass) -> &'static [&'static str] {
    match class {
        UnitClass::Rs => &[ATTR_GU_CONNECT, ATTR_SLOPE],
        UnitClass::Su => &[ATTR_AREA, ATTR_FROM_AP, ATTR_SLOPE],
        UnitClass::Re => &[ATTR_SLOPE],
        UnitClass::Ap => &[ATTR_XPOSITION, ATTR_YPOSITION],
        UnitClass::Gu => &[ATTR_AREA, ATTR_XPOSITION, ATTR_YPOSITION],
    }
}

/// 组合写出器：依次写出 GeoJSON 图层与 FluidX 文档
pub struct DomainWriter {
    geojson: GeoJsonWriter,
    fluidx: FluidXWriter,
}

impl DomainWriter {
    /// 创建指向输出目录的组合写出器
    #[must_use]
    pub fn new(output_dir: impl Into<std::path::PathBuf>) -> Self {
        let dir = output_dir.into();
        Self {
            geojson: GeoJsonWriter::new(dir.clone()),
            fluidx: FluidXWriter::new(dir),
        }
    }
}

impl UnitWriter for DomainWriter {
    fn write(&self, catalog: &UnitCatalog) -> BsResult<()> {
        self.geojson.write(catalog)?;
        self.fluidx.write(catalog)
    }
}
