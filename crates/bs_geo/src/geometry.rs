// crates/bs_geo/src/geometry.rs

//! 几何类型定义
//!
//! 提供项目统一的平面几何类型：点、折线、多边形与几何集合，
//! 以及质心和面积计算。
//!
//! # 设计说明
//!
//! 所有计算假定输入已处于同一平面坐标系且各自有效：
//! 本模块不做重投影、不做拓扑修复。
//!
//! - 折线质心：按线段长度加权的中点平均
//! - 多边形质心：鞋带公式的面积加权质心，外环减去孔洞
//! - 集合质心：按分量面积加权；全部退化时回退为分量质心的算术平均
//!
//! # 示例
//!
//! ```
//! use bs_geo::geometry::{Geometry, Point2D, Polygon};
//!
//! let square = Polygon::new(vec![
//!     Point2D::new(0.0, 0.0),
//!     Point2D::new(2.0, 0.0),
//!     Point2D::new(2.0, 2.0),
//!     Point2D::new(0.0, 2.0),
//! ]);
//! assert!((square.area() - 4.0).abs() < 1e-12);
//!
//! let c = Geometry::Polygon(square).centroid();
//! assert!((c.x - 1.0).abs() < 1e-12);
//! assert!((c.y - 1.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// 退化面积阈值：面积绝对值低于该值时视为零面积
const AREA_EPSILON: f64 = 1e-12;

// ============================================================================
// Point2D - 2D 平面点
// ============================================================================

/// 2D 平面点
///
/// 用于投影坐标系下的位置表示和质心输出。
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X坐标
    pub x: f64,
    /// Y坐标
    pub y: f64,
}

impl Point2D {
    /// 创建新的 2D 点
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 计算到另一个点的欧几里得距离
    #[inline]
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (*other - *self).length()
    }

    /// 向量长度（模）
    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// 标量乘法
    #[inline]
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// 两点中点
    #[inline]
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            x: (self.x + other.x) * 0.5,
            y: (self.y + other.y) * 0.5,
        }
    }

    /// 判断是否为有限数（非NaN、非Inf）
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

// ============================================================================
// LineString - 折线
// ============================================================================

/// 折线（至少两个顶点）
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    /// 顶点序列
    pub points: Vec<Point2D>,
}

impl LineString {
    /// 创建新的折线
    #[must_use]
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    /// 折线总长度
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }

    /// 按线段长度加权的质心
    ///
    /// 零长度折线（所有顶点重合或单顶点）回退为顶点算术平均。
    #[must_use]
    pub fn centroid(&self) -> Point2D {
        let total = self.length();
        if total <= AREA_EPSILON {
            return vertex_mean(&self.points);
        }

        let mut cx = 0.0;
        let mut cy = 0.0;
        for w in self.points.windows(2) {
            let len = w[0].distance_to(&w[1]);
            let mid = w[0].midpoint(&w[1]);
            cx += mid.x * len;
            cy += mid.y * len;
        }
        Point2D::new(cx / total, cy / total)
    }
}

// ============================================================================
// Polygon - 多边形（外环 + 孔洞）
// ============================================================================

/// 多边形，由外环和可选孔洞组成
///
/// 环不要求显式闭合：首尾顶点视为隐式相连。
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// 外环顶点
    pub exterior: Vec<Point2D>,
    /// 孔洞环（每个孔洞一个顶点序列）
    pub holes: Vec<Vec<Point2D>>,
}

impl Polygon {
    /// 创建无孔洞的多边形
    #[must_use]
    pub fn new(exterior: Vec<Point2D>) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
        }
    }

    /// 创建带孔洞的多边形
    #[must_use]
    pub fn with_holes(exterior: Vec<Point2D>, holes: Vec<Vec<Point2D>>) -> Self {
        Self { exterior, holes }
    }

    /// 多边形面积（外环面积减去孔洞面积，恒为非负）
    #[must_use]
    pub fn area(&self) -> f64 {
        let outer = ring_signed_area(&self.exterior).abs();
        let holes: f64 = self.holes.iter().map(|h| ring_signed_area(h).abs()).sum();
        (outer - holes).max(0.0)
    }

    /// 面积加权质心
    ///
    /// 退化多边形（面积为零）回退为外环顶点的算术平均。
    #[must_use]
    pub fn centroid(&self) -> Point2D {
        let outer_area = ring_signed_area(&self.exterior);
        if outer_area.abs() <= AREA_EPSILON {
            return vertex_mean(&self.exterior);
        }

        let (mut wx, mut wy) = ring_weighted_centroid(&self.exterior);
        let mut total = outer_area;
        // 孔洞以负权重参与，符号与外环对齐
        let sign = outer_area.signum();
        for hole in &self.holes {
            let hole_area = ring_signed_area(hole);
            if hole_area.abs() <= AREA_EPSILON {
                continue;
            }
            let (hx, hy) = ring_weighted_centroid(hole);
            // 归一化到孔洞自身质心后按负面积加权
            let a = hole_area.abs() * sign;
            wx -= (hx / hole_area) * a;
            wy -= (hy / hole_area) * a;
            total -= a;
        }

        if total.abs() <= AREA_EPSILON {
            return vertex_mean(&self.exterior);
        }
        Point2D::new(wx / total, wy / total)
    }
}

/// 环的有符号面积（鞋带公式，逆时针为正）
fn ring_signed_area(ring: &[Point2D]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let p = ring[i];
        let q = ring[(i + 1) % n];
        sum += p.x * q.y - q.x * p.y;
    }
    sum * 0.5
}

/// 环的面积加权质心分子（未除以面积）
fn ring_weighted_centroid(ring: &[Point2D]) -> (f64, f64) {
    let n = ring.len();
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let p = ring[i];
        let q = ring[(i + 1) % n];
        let cross = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    (cx / 6.0, cy / 6.0)
}

/// 顶点算术平均（退化几何的回退质心）
fn vertex_mean(points: &[Point2D]) -> Point2D {
    if points.is_empty() {
        return Point2D::default();
    }
    let n = points.len() as f64;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for p in points {
        cx += p.x;
        cy += p.y;
    }
    Point2D::new(cx / n, cy / n)
}

// ============================================================================
// Geometry - 统一几何枚举
// ============================================================================

/// 统一几何类型
///
/// 每个空间单元持有一个与其单元类声明几何种类相符的值。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// 点几何
    Point(Point2D),
    /// 线几何
    Line(LineString),
    /// 面几何
    Polygon(Polygon),
    /// 几何集合（聚合单元使用）
    Collection(Vec<Geometry>),
}

impl Geometry {
    /// 几何面积（点与线为零，集合为分量之和）
    #[must_use]
    pub fn area(&self) -> f64 {
        match self {
            Geometry::Point(_) | Geometry::Line(_) => 0.0,
            Geometry::Polygon(p) => p.area(),
            Geometry::Collection(parts) => parts.iter().map(Geometry::area).sum(),
        }
    }

    /// 几何质心
    ///
    /// 集合质心按分量面积加权；若所有分量面积退化，
    /// 回退为分量质心的算术平均。
    #[must_use]
    pub fn centroid(&self) -> Point2D {
        match self {
            Geometry::Point(p) => *p,
            Geometry::Line(l) => l.centroid(),
            Geometry::Polygon(p) => p.centroid(),
            Geometry::Collection(parts) => {
                if parts.is_empty() {
                    return Point2D::default();
                }
                let total: f64 = parts.iter().map(Geometry::area).sum();
                if total <= AREA_EPSILON {
                    let pts: Vec<Point2D> = parts.iter().map(Geometry::centroid).collect();
                    return vertex_mean(&pts);
                }
                let mut cx = 0.0;
                let mut cy = 0.0;
                for part in parts {
                    let a = part.area();
                    let c = part.centroid();
                    cx += c.x * a;
                    cy += c.y * a;
                }
                Point2D::new(cx / total, cy / total)
            }
        }
    }

    /// 几何种类名（用于诊断信息）
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::Collection(_) => "GeometryCollection",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square_at(x0: f64, y0: f64) -> Polygon {
        Polygon::new(vec![
            Point2D::new(x0, y0),
            Point2D::new(x0 + 1.0, y0),
            Point2D::new(x0 + 1.0, y0 + 1.0),
            Point2D::new(x0, y0 + 1.0),
        ])
    }

    #[test]
    fn test_point_ops() {
        let p = Point2D::new(1.0, 2.0) + Point2D::new(3.0, 4.0);
        assert_eq!(p, Point2D::new(4.0, 6.0));
        assert!((Point2D::new(0.0, 0.0).distance_to(&Point2D::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_linestring_centroid_weighted_by_length() {
        // 两段：长段 (0,0)-(4,0)，短段 (4,0)-(4,2)
        let line = LineString::new(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(4.0, 0.0),
            Point2D::new(4.0, 2.0),
        ]);
        assert!((line.length() - 6.0).abs() < 1e-12);
        let c = line.centroid();
        // (2,0)*4 + (4,1)*2 => (16/6, 2/6)
        assert!((c.x - 16.0 / 6.0).abs() < 1e-12);
        assert!((c.y - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_linestring_falls_back_to_vertex_mean() {
        let line = LineString::new(vec![Point2D::new(3.0, 7.0), Point2D::new(3.0, 7.0)]);
        assert_eq!(line.centroid(), Point2D::new(3.0, 7.0));
    }

    #[test]
    fn test_polygon_area_and_centroid() {
        let square = unit_square_at(2.0, 3.0);
        assert!((square.area() - 1.0).abs() < 1e-12);
        let c = square.centroid();
        assert!((c.x - 2.5).abs() < 1e-12);
        assert!((c.y - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_polygon_with_hole() {
        // 外环 4x4，中心 1x1 孔洞
        let outer = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(4.0, 0.0),
            Point2D::new(4.0, 4.0),
            Point2D::new(0.0, 4.0),
        ];
        let hole = vec![
            Point2D::new(1.5, 1.5),
            Point2D::new(2.5, 1.5),
            Point2D::new(2.5, 2.5),
            Point2D::new(1.5, 2.5),
        ];
        let poly = Polygon::with_holes(outer, vec![hole]);
        assert!((poly.area() - 15.0).abs() < 1e-12);
        // 孔洞居中，质心仍在中心
        let c = poly.centroid();
        assert!((c.x - 2.0).abs() < 1e-12);
        assert!((c.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_clockwise_ring_same_area() {
        let ccw = unit_square_at(0.0, 0.0);
        let cw = Polygon::new(vec![
            Point2D::new(0.0, 1.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(0.0, 0.0),
        ]);
        assert!((ccw.area() - cw.area()).abs() < 1e-12);
        assert_eq!(cw.centroid(), Point2D::new(0.5, 0.5));
    }

    #[test]
    fn test_collection_centroid_area_weighted() {
        // 单位正方形 @(0,0) 与 @(2,0)，等权 => 质心 x = 1.5
        let coll = Geometry::Collection(vec![
            Geometry::Polygon(unit_square_at(0.0, 0.0)),
            Geometry::Polygon(unit_square_at(2.0, 0.0)),
        ]);
        assert!((coll.area() - 2.0).abs() < 1e-12);
        let c = coll.centroid();
        assert!((c.x - 1.5).abs() < 1e-12);
        assert!((c.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_collection_of_points_falls_back_to_mean() {
        let coll = Geometry::Collection(vec![
            Geometry::Point(Point2D::new(0.0, 0.0)),
            Geometry::Point(Point2D::new(2.0, 4.0)),
        ]);
        assert_eq!(coll.centroid(), Point2D::new(1.0, 2.0));
    }
}
