// crates/bs_core/src/postprocess.rs

//! 属性后处理
//!
//! 派生完成后对单位敏感属性做归一化：RS/SU/RE 单元上以百分数
//! 存储的 `slope` 属性除以 100，得到无量纲比值。
//!
//! 此步骤必须严格在 AP/GU 派生之后执行；派生单元不携带
//! `slope` 属性，天然不受影响。

use crate::catalog::UnitCatalog;
use crate::unit::{AttrValue, UnitClass, ATTR_SLOPE};
use tracing::debug;

/// 归一化全部基础单元的坡度属性，返回被修改的单元数
///
/// 缺少 `slope` 属性或属性非数值的单元保持不变，不报错。
pub fn normalize_slopes(catalog: &mut UnitCatalog) -> usize {
    let mut changed = 0usize;

    for class in [UnitClass::Re, UnitClass::Rs, UnitClass::Su] {
        let ids: Vec<i64> = catalog.layer(class).ids().collect();
        for id in ids {
            let Some(unit) = catalog.layer_mut(class).get_mut(id) else {
                continue;
            };
            if let Some(value) = unit.attr_f64(ATTR_SLOPE) {
                unit.set_attr(ATTR_SLOPE, AttrValue::Float(value / 100.0));
                changed += 1;
            }
        }
    }

    debug!(changed, "坡度属性归一化完成");
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::{SpatialUnit, ATTR_AREA};
    use bs_geo::{Geometry, Point2D};

    fn unit_with_slope(id: i64, slope: AttrValue) -> SpatialUnit {
        let mut unit = SpatialUnit::new(id, Geometry::Point(Point2D::new(0.0, 0.0)));
        unit.set_attr(ATTR_SLOPE, slope);
        unit
    }

    #[test]
    fn test_slope_percentage_to_ratio() {
        let mut catalog = UnitCatalog::new();
        catalog.insert(UnitClass::Re, unit_with_slope(1, AttrValue::Int(40)));
        catalog.insert(UnitClass::Su, unit_with_slope(2, AttrValue::Float(12.5)));

        let changed = normalize_slopes(&mut catalog);
        assert_eq!(changed, 2);

        let re = catalog.layer(UnitClass::Re).get(1).unwrap();
        assert_eq!(re.attr_f64(ATTR_SLOPE), Some(0.4));
        let su = catalog.layer(UnitClass::Su).get(2).unwrap();
        assert_eq!(su.attr_f64(ATTR_SLOPE), Some(0.125));
    }

    #[test]
    fn test_units_without_slope_untouched() {
        let mut catalog = UnitCatalog::new();
        let mut su = SpatialUnit::new(1, Geometry::Point(Point2D::new(0.0, 0.0)));
        su.set_attr(ATTR_AREA, AttrValue::Float(3.0));
        catalog.insert(UnitClass::Su, su);
        // 派生单元从不携带 slope，归一化对它们无影响也不报错
        catalog.insert(
            UnitClass::Gu,
            SpatialUnit::new(1, Geometry::Collection(Vec::new())),
        );

        let changed = normalize_slopes(&mut catalog);
        assert_eq!(changed, 0);
        assert_eq!(
            catalog.layer(UnitClass::Su).get(1).unwrap().attr_f64(ATTR_AREA),
            Some(3.0)
        );
    }

    #[test]
    fn test_normalization_applied_once_per_run() {
        let mut catalog = UnitCatalog::new();
        catalog.insert(UnitClass::Rs, unit_with_slope(1, AttrValue::Int(100)));

        normalize_slopes(&mut catalog);
        let rs = catalog.layer(UnitClass::Rs).get(1).unwrap();
        assert_eq!(rs.attr_f64(ATTR_SLOPE), Some(1.0));
    }
}
