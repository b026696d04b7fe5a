//! 配色表解析模块
//!
//! # 设计思路
//!
//! 将用户输入的 `name:RRGGBB`（或 `name:#RRGGBB`）规格解析为有序配色表。
//! 未提供任何规格时使用内置默认配色；一旦提供，则完全替换默认配色，不做合并。
//!
//! # 实现思路
//!
//! - 任一规格非法即整体失败（fail-fast），错误信息包含出错的原始条目。
//! - 同名条目“后写覆盖”，但保留首次出现的位置。
//! - 十六进制按大端字节对依次解析为 R、G、B。

use image::Rgb;

use crate::error::AppError;

/// 内置默认配色（顺序固定）。
const DEFAULT_PALETTE: [(&str, [u8; 3]); 4] = [
    ("green", [0, 128, 0]),
    ("yellow", [255, 255, 0]),
    ("red", [255, 0, 0]),
    ("blue", [0, 0, 255]),
];

/// 单个配色条目：名称同时作为输出子目录名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub name: String,
    pub color: Rgb<u8>,
}

/// 有序配色表，名称唯一。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            entries: DEFAULT_PALETTE
                .iter()
                .map(|(name, rgb)| PaletteEntry {
                    name: (*name).to_string(),
                    color: Rgb(*rgb),
                })
                .collect(),
        }
    }
}

impl Palette {
    /// 解析配色规格列表。
    ///
    /// # 返回
    /// - 空列表 → 默认配色
    /// - 任一条目非法 → `AppError::Config`
    pub fn resolve<S: AsRef<str>>(specs: &[S]) -> Result<Self, AppError> {
        if specs.is_empty() {
            return Ok(Self::default());
        }

        let mut palette = Self {
            entries: Vec::with_capacity(specs.len()),
        };
        for spec in specs {
            let entry = parse_color_spec(spec.as_ref())?;
            palette.insert(entry);
        }

        Ok(palette)
    }

    fn insert(&mut self, entry: PaletteEntry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => existing.color = entry.color,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<Rgb<u8>> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.color)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PaletteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a PaletteEntry;
    type IntoIter = std::slice::Iter<'a, PaletteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 解析单条 `name:RRGGBB` 规格。
pub fn parse_color_spec(spec: &str) -> Result<PaletteEntry, AppError> {
    let invalid = |reason: &str| {
        AppError::Config(format!(
            "颜色规格无法解析 '{}'：{}（格式：name:RRGGBB 或 name:#RRGGBB）",
            spec, reason
        ))
    };

    let (name, hex) = spec.split_once(':').ok_or_else(|| invalid("缺少 ':'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("名称为空"));
    }

    let hex = hex.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("颜色必须是 6 位十六进制"));
    }

    let channel = |idx: usize| {
        u8::from_str_radix(&hex[idx..idx + 2], 16).map_err(|_| invalid("十六进制解析失败"))
    };

    Ok(PaletteEntry {
        name: name.to_string(),
        color: Rgb([channel(0)?, channel(2)?, channel(4)?]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_specs_yield_default_palette() {
        let palette = Palette::resolve::<String>(&[]).expect("default palette");

        assert_eq!(palette.names(), vec!["green", "yellow", "red", "blue"]);
        assert_eq!(palette.get("green"), Some(Rgb([0, 128, 0])));
        assert_eq!(palette.get("yellow"), Some(Rgb([255, 255, 0])));
        assert_eq!(palette.get("red"), Some(Rgb([255, 0, 0])));
        assert_eq!(palette.get("blue"), Some(Rgb([0, 0, 255])));
    }

    #[test]
    fn user_specs_replace_default_palette() {
        let palette = Palette::resolve(&["acc:336699"]).expect("valid spec");

        assert_eq!(palette.len(), 1);
        assert_eq!(palette.get("acc"), Some(Rgb([51, 102, 153])));
        assert_eq!(palette.get("green"), None);
    }

    #[test]
    fn hash_prefix_is_optional() {
        let palette = Palette::resolve(&["a:#336699", "b:336699"]).expect("valid specs");
        assert_eq!(palette.get("a"), palette.get("b"));
    }

    #[test]
    fn duplicate_name_last_write_wins_keeping_position() {
        let palette =
            Palette::resolve(&["red:110000", "blue:0000ff", "red:ff0000"]).expect("valid specs");

        assert_eq!(palette.names(), vec!["red", "blue"]);
        assert_eq!(palette.get("red"), Some(Rgb([255, 0, 0])));
    }

    #[test]
    fn malformed_specs_are_config_errors() {
        for bad in ["foo:zz0000", "bar:12345", ":112233", "nocolon", "x:#1234567", "y:"] {
            let result = Palette::resolve(&[bad]);
            assert!(
                matches!(result, Err(AppError::Config(ref msg)) if msg.contains(bad)),
                "spec {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn one_bad_spec_fails_whole_palette() {
        let result = Palette::resolve(&["ok:00ff00", "bad:xyz"]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn color_after_first_colon_is_used() {
        // 名称中不允许出现 ':'，第二个冒号属于颜色部分 → 非法
        assert!(parse_color_spec("a:b:112233").is_err());
    }

    proptest! {
        #[test]
        fn hex_pairs_parse_big_endian(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), hash in any::<bool>()) {
            let spec = format!("c:{}{:02x}{:02X}{:02x}", if hash { "#" } else { "" }, r, g, b);
            let entry = parse_color_spec(&spec).expect("generated spec is valid");

            prop_assert_eq!(entry.name, "c");
            prop_assert_eq!(entry.color, Rgb([r, g, b]));
        }
    }
}
