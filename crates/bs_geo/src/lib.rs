// crates/bs_geo/src/lib.rs

//! BoogieScape 几何模块
//!
//! 提供平面几何类型与质心/面积计算。
//!
//! # 模块
//!
//! - `geometry`: 几何类型 (Point2D, LineString, Polygon, Geometry)
//!
//! # 示例
//!
//! ```
//! use bs_geo::prelude::*;
//!
//! let p = Point2D::new(10.0, 20.0);
//! let g = Geometry::Point(p);
//! assert_eq!(g.centroid(), p);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod geometry;

/// 预导入模块
pub mod prelude {
    pub use crate::geometry::{Geometry, LineString, Point2D, Polygon};
}

pub use geometry::{Geometry, LineString, Point2D, Polygon};
