// crates/bs_io/src/exporters/fluidx.rs

//! FluidX 文档写出器
//!
//! 把最终目录写成平台的单元/属性 XML 方言：一个 `domain.fluidx`
//! 文档，包含域定义（单元、调度序号、后继与子级链接）和每类
//! 一个带显式 `colorder` 的属性块。
//!
//! 标记手工拼写并通过 `BufWriter` 输出。

use crate::exporters::default_columns;
use bs_core::{SpatialUnit, UnitCatalog, UnitClass, UnitWriter};
use bs_foundation::{BsError, BsResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// FluidX 文档文件名
pub const FLUIDX_FILE: &str = "domain.fluidx";

/// FluidX 文档写出器
#[derive(Debug, Clone)]
pub struct FluidXWriter {
    output_dir: PathBuf,
}

impl FluidXWriter {
    /// 创建指向输出目录的写出器
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl UnitWriter for FluidXWriter {
    fn write(&self, catalog: &UnitCatalog) -> BsResult<()> {
        let path = self.output_dir.join(FLUIDX_FILE);
        let file = File::create(&path).map_err(|e| {
            BsError::io_with_source(format!("创建 FluidX 文档失败: {}", path.display()), e)
        })?;
        let mut writer = BufWriter::new(file);
        write_domain(&mut writer, catalog)
            .map_err(|e| BsError::io_with_source("写出 FluidX 文档失败", e))
    }
}

/// 写出整个域文档
pub fn write_domain<W: Write>(w: &mut W, catalog: &UnitCatalog) -> std::io::Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(w, "<openfluid>")?;
    writeln!(w, "  <domain>")?;

    writeln!(w, "    <definition>")?;
    for class in UnitClass::ALL {
        for unit in catalog.layer(class).iter() {
            write_unit(w, class, unit)?;
        }
    }
    writeln!(w, "    </definition>")?;

    for class in UnitClass::ALL {
        let layer = catalog.layer(class);
        let columns = default_columns(class);
        if layer.is_empty() || columns.is_empty() {
            continue;
        }
        writeln!(
            w,
            r#"    <attributes unitsclass="{}" colorder="{}">"#,
            class,
            columns.join(";")
        )?;
        for unit in layer.iter() {
            write!(w, "      {}", unit.id)?;
            for name in columns {
                match unit.attr(name) {
                    Some(value) => write!(w, "\t{}", escape(&value.to_string()))?,
                    None => write!(w, "\t-")?,
                }
            }
            writeln!(w)?;
        }
        writeln!(w, "    </attributes>")?;
    }

    writeln!(w, "  </domain>")?;
    writeln!(w, "</openfluid>")
}

fn write_unit<W: Write>(w: &mut W, class: UnitClass, unit: &SpatialUnit) -> std::io::Result<()> {
    if unit.to.is_empty() && unit.child.is_empty() {
        return writeln!(
            w,
            r#"      <unit class="{}" ID="{}" pcsorder="{}"/>"#,
            class, unit.id, unit.process_order
        );
    }

    writeln!(
        w,
        r#"      <unit class="{}" ID="{}" pcsorder="{}">"#,
        class, unit.id, unit.process_order
    )?;
    for target in &unit.to {
        writeln!(
            w,
            r#"        <to class="{}" ID="{}"/>"#,
            target.class, target.id
        )?;
    }
    for child in &unit.child {
        writeln!(
            w,
            r#"        <child class="{}" ID="{}"/>"#,
            child.class, child.id
        )?;
    }
    writeln!(w, "      </unit>")
}

/// 文本属性值的最小 XML 转义
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
