//! 引用排除规则
//!
//! 使用 `globset` 将若干 glob 模式编译为一个 `GlobSet`，对提取出的引用字符串做一次性匹配。
//! `*` 可跨越 `/`，与 shell 风格的 fnmatch 一致。

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::AppError;

/// 编译后的排除规则集合。
#[derive(Debug, Clone)]
pub struct PathFilter {
    patterns: Vec<String>,
    set: GlobSet,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

impl PathFilter {
    /// 编译排除模式；任一模式非法即返回配置错误。
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, AppError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|err| {
                AppError::Config(format!("排除模式无效 '{}'：{}", pattern, err))
            })?;
            builder.add(glob);
        }

        let set = builder
            .build()
            .map_err(|err| AppError::Config(format!("构建排除规则失败：{}", err)))?;

        Ok(Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            set,
        })
    }

    pub fn is_excluded(&self, reference: &str) -> bool {
        self.set.is_match(reference)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// 保留未命中任何排除模式的引用，顺序不变。
    pub fn apply(&self, references: Vec<String>) -> Vec<String> {
        if self.is_empty() {
            return references;
        }

        references
            .into_iter()
            .filter(|reference| {
                let excluded = self.is_excluded(reference);
                if excluded {
                    log::info!("⏭️ 按排除规则跳过：{}", reference);
                }
                !excluded
            })
            .collect()
    }
}
