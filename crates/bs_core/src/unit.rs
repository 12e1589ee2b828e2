// crates/bs_core/src/unit.rs

//! 空间单元数据模型
//!
//! 定义单元类、单元引用、标量属性值和空间单元实体。
//!
//! # 设计说明
//!
//! 单元标识是 `(单元类, Id)` 二元组：Id 仅在所属单元类内唯一。
//! 单元间的引用全部通过 [`UnitRef`] 这种稳定键表达，而不是对象引用，
//! 避免相互引用的单元之间出现所有权环。
//!
//! # 示例
//!
//! ```
//! use bs_core::unit::{UnitClass, UnitRef};
//!
//! let r: UnitRef = "SU#12".parse().unwrap();
//! assert_eq!(r.class, UnitClass::Su);
//! assert_eq!(r.id, 12);
//! assert_eq!(r.to_string(), "SU#12");
//! ```

use bs_foundation::{BsError, BsResult};
use bs_geo::Geometry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// 属性名常量
// ============================================================================

/// RS 单元的汇流出口标志属性
pub const ATTR_GU_CONNECT: &str = "GUconnect";
/// SU 单元的面积属性
pub const ATTR_AREA: &str = "area";
/// SU 单元的聚合点交叉引用属性
pub const ATTR_FROM_AP: &str = "FROM_AP";
/// 坡度属性（输入为百分数，后处理为比值）
pub const ATTR_SLOPE: &str = "slope";
/// 派生单元质心 X 坐标属性
pub const ATTR_XPOSITION: &str = "xposition";
/// 派生单元质心 Y 坐标属性
pub const ATTR_YPOSITION: &str = "yposition";

// ============================================================================
// UnitClass - 单元类
// ============================================================================

/// 单元类（固定的封闭集合）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitClass {
    /// 河道/河段单元（线几何）
    Rs,
    /// 地表响应单元（面几何）
    Su,
    /// 蓄水/水库单元（点几何）
    Re,
    /// 聚合点单元（点几何，派生）
    Ap,
    /// 汇水聚合单元（面几何集合，派生）
    Gu,
}

/// 单元类声明的几何种类
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    /// 点
    Point,
    /// 线
    Line,
    /// 面
    Polygon,
    /// 几何集合
    Collection,
}

impl UnitClass {
    /// 全部单元类，按约定顺序
    pub const ALL: [UnitClass; 5] = [
        UnitClass::Rs,
        UnitClass::Su,
        UnitClass::Re,
        UnitClass::Ap,
        UnitClass::Gu,
    ];

    /// 参与流向图的基础单元类（加载得到，非派生）
    pub const BASE: [UnitClass; 3] = [UnitClass::Rs, UnitClass::Su, UnitClass::Re];

    /// 类名字符串
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            UnitClass::Rs => "RS",
            UnitClass::Su => "SU",
            UnitClass::Re => "RE",
            UnitClass::Ap => "AP",
            UnitClass::Gu => "GU",
        }
    }

    /// 该单元类声明的几何种类
    #[must_use]
    pub const fn geometry_kind(&self) -> GeometryKind {
        match self {
            UnitClass::Rs => GeometryKind::Line,
            UnitClass::Su => GeometryKind::Polygon,
            UnitClass::Re | UnitClass::Ap => GeometryKind::Point,
            UnitClass::Gu => GeometryKind::Collection,
        }
    }

    /// 目录数组索引
    #[must_use]
    pub(crate) const fn index(&self) -> usize {
        match self {
            UnitClass::Rs => 0,
            UnitClass::Su => 1,
            UnitClass::Re => 2,
            UnitClass::Ap => 3,
            UnitClass::Gu => 4,
        }
    }
}

impl fmt::Display for UnitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitClass {
    type Err = BsError;

    fn from_str(s: &str) -> BsResult<Self> {
        match s {
            "RS" => Ok(UnitClass::Rs),
            "SU" => Ok(UnitClass::Su),
            "RE" => Ok(UnitClass::Re),
            "AP" => Ok(UnitClass::Ap),
            "GU" => Ok(UnitClass::Gu),
            other => Err(BsError::invalid_input(format!("未知单元类: {other}"))),
        }
    }
}

// ============================================================================
// UnitRef - 单元引用
// ============================================================================

/// 单元引用：`(单元类, Id)` 稳定键
///
/// 文本形式为 `Class#Id`，例如 `RS#5`。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitRef {
    /// 单元类
    pub class: UnitClass,
    /// 类内唯一标识
    pub id: i64,
}

impl UnitRef {
    /// 创建新的单元引用
    #[inline]
    #[must_use]
    pub const fn new(class: UnitClass, id: i64) -> Self {
        Self { class, id }
    }
}

impl fmt::Display for UnitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.class, self.id)
    }
}

impl FromStr for UnitRef {
    type Err = BsError;

    fn from_str(s: &str) -> BsResult<Self> {
        let (class, id) = s
            .split_once('#')
            .ok_or_else(|| BsError::invalid_input(format!("无效的单元引用: {s}")))?;
        let class: UnitClass = class.parse()?;
        let id: i64 = id
            .parse()
            .map_err(|_| BsError::invalid_input(format!("无效的单元标识: {s}")))?;
        Ok(UnitRef::new(class, id))
    }
}

// ============================================================================
// AttrValue - 标量属性值
// ============================================================================

/// 标量属性值
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 文本
    Text(String),
}

/// 属性值的声明类型（加载模式使用）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrKind {
    /// 整数
    Int,
    /// 浮点数
    Float,
    /// 文本
    Text,
}

impl AttrKind {
    /// 类型名（诊断用）
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            AttrKind::Int => "Int",
            AttrKind::Float => "Float",
            AttrKind::Text => "Text",
        }
    }
}

impl AttrValue {
    /// 数值视图：Int 和 Float 直接转换，数值形式的文本尝试解析
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(v) => Some(*v as f64),
            AttrValue::Float(v) => Some(*v),
            AttrValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// 整数视图：Float 仅在无小数部分时转换
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            AttrValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            AttrValue::Float(_) => None,
            AttrValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// 实际值的声明类型
    #[must_use]
    pub const fn kind(&self) -> AttrKind {
        match self {
            AttrValue::Int(_) => AttrKind::Int,
            AttrValue::Float(_) => AttrKind::Float,
            AttrValue::Text(_) => AttrKind::Text,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(v) => write!(f, "{v}"),
            AttrValue::Float(v) => write!(f, "{v}"),
            AttrValue::Text(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// SpatialUnit - 空间单元实体
// ============================================================================

/// 空间单元
///
/// 一个要素的内存表示。基础单元由加载器创建且从不删除，
/// 其属性和后继链接只允许追加；派生单元 (AP/GU) 由引擎创建，
/// 插入目录后不再修改。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialUnit {
    /// 类内唯一标识
    pub id: i64,
    /// 调度序号，仅供下游处理消费
    pub process_order: i64,
    /// 后继链接（“流向”），有序
    pub to: Vec<UnitRef>,
    /// 子级链接（“是……的父级”），仅用于派生 AP 单元
    pub child: Vec<UnitRef>,
    /// 属性表
    pub attributes: BTreeMap<String, AttrValue>,
    /// 几何，加载或派生后不为空
    pub geometry: Geometry,
}

impl SpatialUnit {
    /// 创建新的空间单元
    #[must_use]
    pub fn new(id: i64, geometry: Geometry) -> Self {
        Self {
            id,
            process_order: 0,
            to: Vec::new(),
            child: Vec::new(),
            attributes: BTreeMap::new(),
            geometry,
        }
    }

    /// 读取属性
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// 读取属性的数值视图
    #[must_use]
    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(AttrValue::as_f64)
    }

    /// 读取属性的整数视图
    #[must_use]
    pub fn attr_i64(&self, name: &str) -> Option<i64> {
        self.attributes.get(name).and_then(AttrValue::as_i64)
    }

    /// 写入属性（追加或替换同名值）
    pub fn set_attr(&mut self, name: impl Into<String>, value: AttrValue) {
        self.attributes.insert(name.into(), value);
    }

    /// 追加后继链接
    pub fn push_to(&mut self, target: UnitRef) {
        self.to.push(target);
    }

    /// RS 单元的汇流出口标志是否生效（`GUconnect > 0`）
    #[must_use]
    pub fn is_outlet(&self) -> bool {
        self.attr_f64(ATTR_GU_CONNECT).is_some_and(|v| v > 0.0)
    }
}
