//! 元数据定义
//!
//! 提供 Bean 类型标记与限定标签

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型标记
///
/// 只按 `TypeId` 比较，名称仅用于日志和错误信息。
#[derive(Debug, Clone, Copy)]
pub struct TypeTag {
    /// 类型ID
    id: TypeId,
    /// 完整类型名称
    name: &'static str,
}

impl TypeTag {
    /// 从类型获取类型标记，支持 `dyn Trait` 等非定长类型
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 类型ID
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// 完整类型名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 获取简短的类型名称
    ///
    /// 逐段去掉模块路径，保留 `dyn`、泛型参数与元组结构。
    pub fn short_name(&self) -> String {
        let mut short = String::with_capacity(self.name.len());
        let mut start = 0;
        for (idx, ch) in self.name.char_indices() {
            if !(ch.is_alphanumeric() || ch == '_' || ch == ':') {
                short.push_str(last_segment(&self.name[start..idx]));
                short.push(ch);
                start = idx + ch.len_utf8();
            }
        }
        short.push_str(last_segment(&self.name[start..]));
        short
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// 限定标签
///
/// 种类与取值都相同才相等：匿名限定、具名限定和分组标记互不冲突。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QualifierTag {
    /// 无取值的限定标签，用于逻辑分组
    Anonymous,
    /// 带取值的限定标签
    Named(String),
    /// 自定义分组标记，例如 `UserGroup`
    Marker(String),
}

impl QualifierTag {
    /// 创建具名限定标签
    pub fn named(value: impl Into<String>) -> Self {
        Self::Named(value.into())
    }

    /// 创建分组标记
    pub fn marker(kind: impl Into<String>) -> Self {
        Self::Marker(kind.into())
    }
}

impl fmt::Display for QualifierTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("@Qualifier"),
            Self::Named(value) => write!(f, "@Qualifier(\"{value}\")"),
            Self::Marker(kind) => write!(f, "@{kind}"),
        }
    }
}

/// 把标签集合格式化为日志友好的字符串
pub fn format_tags<'a>(tags: impl IntoIterator<Item = &'a QualifierTag>) -> String {
    let parts: Vec<String> = tags.into_iter().map(ToString::to_string).collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}
