// crates/bs_io/src/loader.rs

//! GeoJSON 图层加载器
//!
//! 从输入目录加载三个基础图层（`RS.geojson` / `SU.geojson` /
//! `RE.geojson`），按声明模式校验属性，组装空间单元。
//!
//! # 要素约定
//!
//! - `OFLD_ID`: 必需整数标识，缺失或无效即 `MissingIdentifier`
//! - `OFLD_PSORD`: 可选整数调度序号，缺省为 0
//! - `OFLD_TO` / `OFLD_CHILD`: 可选记号串（`Class#Id` 以 `;` 连接），
//!   存在但不是文本即 `SchemaMismatch`
//! - 模式声明的属性必须存在且类型相符，否则 `SchemaMismatch`
//! - 几何必须存在且与单元类声明的几何种类一致
//!
//! 字符串级解析与文件 IO 分离：[`parse_layer`] 只消费文本，
//! 便于单独测试。

use crate::tokens::parse_unit_refs;
use bs_core::pipeline::{LayerSchema, UnitLoader};
use bs_core::unit::GeometryKind;
use bs_core::{AttrKind, AttrValue, SpatialUnit};
use bs_foundation::{BsError, BsResult};
use bs_geo::{Geometry, LineString, Point2D, Polygon};
use geojson::{FeatureCollection, GeoJson};
use std::path::{Path, PathBuf};

/// 标识属性字段名
pub const FIELD_ID: &str = "OFLD_ID";
/// 调度序号字段名
pub const FIELD_PSORD: &str = "OFLD_PSORD";
/// 后继链接字段名
pub const FIELD_TO: &str = "OFLD_TO";
/// 子级链接字段名
pub const FIELD_CHILD: &str = "OFLD_CHILD";

/// GeoJSON 图层加载器
#[derive(Debug, Clone)]
pub struct GeoJsonLoader {
    input_dir: PathBuf,
}

impl GeoJsonLoader {
    /// 创建指向输入目录的加载器
    #[must_use]
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
        }
    }

    /// 图层文件路径：`<输入目录>/<CLASS>.geojson`
    #[must_use]
    pub fn layer_path(&self, schema: &LayerSchema) -> PathBuf {
        self.input_dir.join(format!("{}.geojson", schema.class))
    }
}

impl UnitLoader for GeoJsonLoader {
    fn load(&self, schema: &LayerSchema) -> BsResult<Vec<SpatialUnit>> {
        let path = self.layer_path(schema);
        if !path.is_file() {
            return Err(BsError::input_not_found(path));
        }
        let text = std::fs::read_to_string(&path)
            .map_err(|e| BsError::io_with_source(format!("读取图层失败: {}", path.display()), e))?;
        parse_layer(&text, schema, &path)
    }
}

/// 解析一个 GeoJSON FeatureCollection 文本为单元序列
///
/// `file` 仅用于诊断信息。单元顺序与要素顺序一致。
pub fn parse_layer(text: &str, schema: &LayerSchema, file: &Path) -> BsResult<Vec<SpatialUnit>> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| BsError::format(file, e.to_string()))?;
    let collection: FeatureCollection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        other => {
            return Err(BsError::format(
                file,
                format!("期望 FeatureCollection, 实际为 {other:?}"),
            ))
        }
    };

    let layer = schema.class.as_str();
    let mut units = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.iter().enumerate() {
        let props = feature
            .properties
            .as_ref()
            .ok_or_else(|| BsError::missing_identifier(layer, index))?;

        let id = props
            .get(FIELD_ID)
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| BsError::missing_identifier(layer, index))?;

        let geometry = feature
            .geometry
            .as_ref()
            .and_then(|g| convert_geometry(schema.class.geometry_kind(), &g.value))
            .ok_or_else(|| {
                BsError::schema_mismatch(
                    layer,
                    "geometry",
                    format!("要素 {id} 缺少几何或几何种类不符"),
                )
            })?;

        let mut unit = SpatialUnit::new(id, geometry);
        unit.process_order = props
            .get(FIELD_PSORD)
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(0);

        if let Some(tokens) = optional_text(props, layer, id, FIELD_TO)? {
            unit.to = parse_unit_refs(&tokens)?;
        }
        if let Some(tokens) = optional_text(props, layer, id, FIELD_CHILD)? {
            unit.child = parse_unit_refs(&tokens)?;
        }

        for (name, kind) in &schema.attributes {
            let value = props.get(*name).ok_or_else(|| {
                BsError::schema_mismatch(layer, *name, format!("要素 {id} 缺少该属性"))
            })?;
            let value = convert_attr(value, *kind).ok_or_else(|| {
                BsError::schema_mismatch(
                    layer,
                    *name,
                    format!("要素 {id} 的值 {value} 不是 {}", kind.as_str()),
                )
            })?;
            unit.set_attr(*name, value);
        }

        units.push(unit);
    }

    Ok(units)
}

/// 读取可选文本字段
///
/// null 与缺失同义；存在但不是文本的值是 `SchemaMismatch`，
/// 静默忽略会丢掉该要素的全部链接。
fn optional_text(
    props: &geojson::JsonObject,
    layer: &str,
    id: i64,
    name: &str,
) -> BsResult<Option<String>> {
    match props.get(name) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(BsError::schema_mismatch(
            layer,
            name,
            format!("要素 {id} 的值 {other} 不是文本"),
        )),
    }
}

/// JSON 值按声明类型转换为属性值
fn convert_attr(value: &serde_json::Value, kind: AttrKind) -> Option<AttrValue> {
    match kind {
        AttrKind::Int => value.as_i64().map(AttrValue::Int),
        // 整数输入在 Float 声明下照常接受
        AttrKind::Float => value.as_f64().map(AttrValue::Float),
        AttrKind::Text => value.as_str().map(|s| AttrValue::Text(s.to_owned())),
    }
}

/// GeoJSON 几何转换为内部几何，种类不符时返回 None
fn convert_geometry(kind: GeometryKind, value: &geojson::Value) -> Option<Geometry> {
    match (kind, value) {
        (GeometryKind::Point, geojson::Value::Point(pos)) => {
            Some(Geometry::Point(position(pos)?))
        }
        (GeometryKind::Line, geojson::Value::LineString(coords)) => {
            let points = coords.iter().map(|p| position(p)).collect::<Option<_>>()?;
            Some(Geometry::Line(LineString::new(points)))
        }
        (GeometryKind::Polygon, geojson::Value::Polygon(rings)) => polygon(rings),
        (GeometryKind::Collection, geojson::Value::GeometryCollection(parts)) => {
            let converted = parts
                .iter()
                .map(|g| any_geometry(&g.value))
                .collect::<Option<_>>()?;
            Some(Geometry::Collection(converted))
        }
        _ => None,
    }
}

/// 不检查种类的几何转换（集合分量使用）
fn any_geometry(value: &geojson::Value) -> Option<Geometry> {
    match value {
        geojson::Value::Point(pos) => Some(Geometry::Point(position(pos)?)),
        geojson::Value::LineString(coords) => {
            let points = coords.iter().map(|p| position(p)).collect::<Option<_>>()?;
            Some(Geometry::Line(LineString::new(points)))
        }
        geojson::Value::Polygon(rings) => polygon(rings),
        _ => None,
    }
}

fn polygon(rings: &[Vec<Vec<f64>>]) -> Option<Geometry> {
    let mut iter = rings.iter();
    let exterior = ring(iter.next()?)?;
    let holes = iter.map(|r| ring(r)).collect::<Option<_>>()?;
    Some(Geometry::Polygon(Polygon::with_holes(exterior, holes)))
}

fn ring(coords: &[Vec<f64>]) -> Option<Vec<Point2D>> {
    coords.iter().map(|p| position(p)).collect()
}

fn position(coords: &[f64]) -> Option<Point2D> {
    match coords {
        [x, y, ..] => Some(Point2D::new(*x, *y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bs_core::pipeline::base_layer_schemas;
    use bs_core::unit::{ATTR_AREA, ATTR_FROM_AP, ATTR_GU_CONNECT, ATTR_SLOPE};
    use bs_core::{UnitClass, UnitRef};

    fn schema_for(class: UnitClass) -> LayerSchema {
        base_layer_schemas()
            .into_iter()
            .find(|s| s.class == class)
            .unwrap()
    }

    fn parse(text: &str, class: UnitClass) -> BsResult<Vec<SpatialUnit>> {
        parse_layer(text, &schema_for(class), Path::new("test.geojson"))
    }

    const RS_LAYER: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [4.0, 0.0]] },
                "properties": {
                    "OFLD_ID": 1,
                    "OFLD_PSORD": 3,
                    "OFLD_TO": "RS#2",
                    "OFLD_CHILD": "AP#7",
                    "GUconnect": 1,
                    "slope": 40.0
                }
            },
            {
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[4.0, 0.0], [8.0, 0.0]] },
                "properties": { "OFLD_ID": 2, "GUconnect": 0, "slope": 12.5 }
            }
        ]
    }"#;

    #[test]
    fn test_load_rs_layer() {
        let units = parse(RS_LAYER, UnitClass::Rs).unwrap();
        assert_eq!(units.len(), 2);

        let first = &units[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.process_order, 3);
        assert_eq!(first.to, vec![UnitRef::new(UnitClass::Rs, 2)]);
        assert_eq!(first.child, vec![UnitRef::new(UnitClass::Ap, 7)]);
        assert_eq!(first.attr_f64(ATTR_GU_CONNECT), Some(1.0));
        assert_eq!(first.attr_f64(ATTR_SLOPE), Some(40.0));

        // 可选字段缺省
        let second = &units[1];
        assert_eq!(second.process_order, 0);
        assert!(second.to.is_empty());
        assert!(second.child.is_empty());
    }

    #[test]
    fn test_missing_identifier_is_fatal() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
                "properties": { "slope": 1.0 }
            }]
        }"#;
        let err = parse(text, UnitClass::Re).unwrap_err();
        assert!(matches!(err, BsError::MissingIdentifier { .. }));
    }

    #[test]
    fn test_missing_schema_attribute_is_schema_mismatch() {
        // SU 图层缺少 area
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] },
                "properties": { "OFLD_ID": 1, "FROM_AP": 0, "slope": 1.0 }
            }]
        }"#;
        let err = parse(text, UnitClass::Su).unwrap_err();
        match err {
            BsError::SchemaMismatch { attribute, .. } => assert_eq!(attribute, ATTR_AREA),
            other => panic!("期望 SchemaMismatch, 实际为 {other}"),
        }
    }

    #[test]
    fn test_wrong_attribute_type_is_schema_mismatch() {
        // FROM_AP 声明为整数，给出文本
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] },
                "properties": { "OFLD_ID": 1, "area": 2.0, "FROM_AP": "seven", "slope": 1.0 }
            }]
        }"#;
        let err = parse(text, UnitClass::Su).unwrap_err();
        match err {
            BsError::SchemaMismatch { attribute, .. } => assert_eq!(attribute, ATTR_FROM_AP),
            other => panic!("期望 SchemaMismatch, 实际为 {other}"),
        }
    }

    #[test]
    fn test_geometry_kind_must_match_class() {
        // RE 声明点几何，给出面
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] },
                "properties": { "OFLD_ID": 1, "slope": 1.0 }
            }]
        }"#;
        let err = parse(text, UnitClass::Re).unwrap_err();
        match err {
            BsError::SchemaMismatch { attribute, .. } => assert_eq!(attribute, "geometry"),
            other => panic!("期望 SchemaMismatch, 实际为 {other}"),
        }
    }

    #[test]
    fn test_non_text_link_field_is_schema_mismatch() {
        // OFLD_TO 给出数字：静默忽略会丢掉该要素的全部后继链接
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [4.0, 0.0]] },
                "properties": { "OFLD_ID": 1, "OFLD_TO": 5, "GUconnect": 0, "slope": 1.0 }
            }]
        }"#;
        let err = parse(text, UnitClass::Rs).unwrap_err();
        match err {
            BsError::SchemaMismatch { attribute, .. } => assert_eq!(attribute, FIELD_TO),
            other => panic!("期望 SchemaMismatch, 实际为 {other}"),
        }
    }

    #[test]
    fn test_null_link_field_means_absent() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [4.0, 0.0]] },
                "properties": { "OFLD_ID": 1, "OFLD_TO": null, "GUconnect": 0, "slope": 1.0 }
            }]
        }"#;
        let units = parse(text, UnitClass::Rs).unwrap();
        assert!(units[0].to.is_empty());
    }

    #[test]
    fn test_polygon_with_hole_parsed() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[0,0],[4,0],[4,4],[0,4]],
                        [[1,1],[2,1],[2,2],[1,2]]
                    ]
                },
                "properties": { "OFLD_ID": 9, "area": 15.0, "FROM_AP": 0, "slope": 0.0 }
            }]
        }"#;
        let units = parse(text, UnitClass::Su).unwrap();
        match &units[0].geometry {
            Geometry::Polygon(p) => {
                assert_eq!(p.exterior.len(), 4);
                assert_eq!(p.holes.len(), 1);
            }
            other => panic!("期望面几何, 实际为 {}", other.kind_name()),
        }
    }
}
