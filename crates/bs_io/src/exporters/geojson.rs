// crates/bs_io/src/exporters/geojson.rs

//! GeoJSON 图层写出器
//!
//! 把最终目录的每个非空单元类写成一个 `<CLASS>.geojson` 文件。
//! 要素属性为 `OFLD_ID` / `OFLD_PSORD` / `OFLD_TO` / `OFLD_CHILD`
//! 加上按调用方指定列顺序排列的单元属性；链接序列以
//! `Class#Id;...` 记号串序列化。

use crate::exporters::default_columns;
use crate::loader::{FIELD_CHILD, FIELD_ID, FIELD_PSORD, FIELD_TO};
use crate::tokens::format_unit_refs;
use bs_core::{AttrValue, SpatialUnit, UnitCatalog, UnitClass, UnitWriter};
use bs_foundation::{BsError, BsResult};
use bs_geo::Geometry;
use geojson::{Feature, FeatureCollection, GeoJson};
use std::collections::HashMap;
use std::path::PathBuf;

/// GeoJSON 图层写出器
#[derive(Debug, Clone)]
pub struct GeoJsonWriter {
    output_dir: PathBuf,
    columns: HashMap<UnitClass, Vec<String>>,
}

impl GeoJsonWriter {
    /// 创建指向输出目录的写出器，列顺序取各类缺省值
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let columns = UnitClass::ALL
            .into_iter()
            .map(|class| {
                let cols = default_columns(class).iter().map(|s| (*s).to_owned()).collect();
                (class, cols)
            })
            .collect();
        Self {
            output_dir: output_dir.into(),
            columns,
        }
    }

    /// 覆盖指定类的属性列顺序
    #[must_use]
    pub fn with_columns(mut self, class: UnitClass, columns: Vec<String>) -> Self {
        self.columns.insert(class, columns);
        self
    }

    /// 组装一个类的 FeatureCollection
    #[must_use]
    pub fn build_collection(&self, class: UnitClass, catalog: &UnitCatalog) -> FeatureCollection {
        let columns = self.columns.get(&class).map_or(&[][..], Vec::as_slice);
        let features = catalog
            .layer(class)
            .iter()
            .map(|unit| build_feature(unit, columns))
            .collect();
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

impl UnitWriter for GeoJsonWriter {
    fn write(&self, catalog: &UnitCatalog) -> BsResult<()> {
        for class in UnitClass::ALL {
            if catalog.layer(class).is_empty() {
                continue;
            }
            let collection = self.build_collection(class, catalog);
            let path = self.output_dir.join(format!("{class}.geojson"));
            let text = serde_json::to_string_pretty(&GeoJson::FeatureCollection(collection))
                .map_err(|e| BsError::format(&path, e.to_string()))?;
            std::fs::write(&path, text).map_err(|e| {
                BsError::io_with_source(format!("写出图层失败: {}", path.display()), e)
            })?;
        }
        Ok(())
    }
}

/// 单个单元到 GeoJSON 要素
fn build_feature(unit: &SpatialUnit, columns: &[String]) -> Feature {
    let mut props = geojson::JsonObject::new();
    props.insert(FIELD_ID.into(), serde_json::Value::from(unit.id));
    props.insert(FIELD_PSORD.into(), serde_json::Value::from(unit.process_order));
    props.insert(
        FIELD_TO.into(),
        serde_json::Value::from(format_unit_refs(&unit.to)),
    );
    props.insert(
        FIELD_CHILD.into(),
        serde_json::Value::from(format_unit_refs(&unit.child)),
    );
    for name in columns {
        if let Some(value) = unit.attr(name) {
            props.insert(name.clone(), attr_to_json(value));
        }
    }

    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geometry_value(&unit.geometry))),
        id: Some(geojson::feature::Id::Number(unit.id.into())),
        properties: Some(props),
        foreign_members: None,
    }
}

fn attr_to_json(value: &AttrValue) -> serde_json::Value {
    match value {
        AttrValue::Int(v) => serde_json::Value::from(*v),
        AttrValue::Float(v) => serde_json::Number::from_f64(*v)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        AttrValue::Text(s) => serde_json::Value::from(s.clone()),
    }
}

/// 内部几何到 GeoJSON 几何值，环在写出时显式闭合
fn geometry_value(geometry: &Geometry) -> geojson::Value {
    match geometry {
        Geometry::Point(p) => geojson::Value::Point(vec![p.x, p.y]),
        Geometry::Line(line) => {
            geojson::Value::LineString(line.points.iter().map(|p| vec![p.x, p.y]).collect())
        }
        Geometry::Polygon(poly) => {
            let mut rings = Vec::with_capacity(1 + poly.holes.len());
            rings.push(closed_ring(&poly.exterior));
            for hole in &poly.holes {
                rings.push(closed_ring(hole));
            }
            geojson::Value::Polygon(rings)
        }
        Geometry::Collection(parts) => geojson::Value::GeometryCollection(
            parts
                .iter()
                .map(|g| geojson::Geometry::new(geometry_value(g)))
                .collect(),
        ),
    }
}

fn closed_ring(ring: &[bs_geo::Point2D]) -> Vec<Vec<f64>> {
    let mut coords: Vec<Vec<f64>> = ring.iter().map(|p| vec![p.x, p.y]).collect();
    if let (Some(first), Some(last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(first.clone());
        }
    }
    coords
}
