//! 运行设置加载与合并
//!
//! # 设计思路
//!
//! 配置来源按优先级从低到高：内置默认值 → JSON 设置文件（`--config`）→ 命令行参数。
//! 两个来源都先表示为同一个 `Settings`，合并后统一转换为已校验的 `RunConfig`。
//!
//! # 实现思路
//!
//! - 设置文件使用 `serde_json` 反序列化，缺失字段取默认值。
//! - 列表字段（配色、排除规则）以“非空即替换”的方式合并，不做拼接。
//! - 所有校验都在 `into_run_config` 中完成，失败即返回 `AppError`。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::image_handler::{RecolorConfig, RunConfig};

/// 可由设置文件或命令行提供的原始设置。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: Option<String>,
    pub output_dir: Option<String>,
    pub colors: Vec<String>,
    pub exclude: Vec<String>,
    pub timeout_secs: Option<u64>,
    pub max_file_size: Option<u64>,
}

/// 读取 JSON 设置文件。
///
/// 显式指定的设置文件无法读取或解析时视为致命错误。
pub fn load_settings_from_path(path: &Path) -> Result<Settings, AppError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("解析设置文件 '{}' 失败: {}", path.display(), e)))
}

impl Settings {
    /// 用 `overrides` 覆盖当前设置，返回合并结果。
    pub fn merge(self, overrides: Settings) -> Settings {
        Settings {
            base_url: overrides.base_url.or(self.base_url),
            output_dir: overrides.output_dir.or(self.output_dir),
            colors: if overrides.colors.is_empty() {
                self.colors
            } else {
                overrides.colors
            },
            exclude: if overrides.exclude.is_empty() {
                self.exclude
            } else {
                overrides.exclude
            },
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
            max_file_size: overrides.max_file_size.or(self.max_file_size),
        }
    }

    /// 转换为已校验的运行配置。
    pub fn into_run_config(self, dry_run: bool) -> Result<RunConfig, AppError> {
        let mut recolor = RecolorConfig::default();

        if let Some(dir) = self.output_dir.filter(|d| !d.trim().is_empty()) {
            recolor.output_root = PathBuf::from(dir);
        }
        if let Some(base) = self.base_url.filter(|b| !b.trim().is_empty()) {
            recolor.set_base_url(&base)?;
        }
        if let Some(timeout) = self.timeout_secs {
            if timeout == 0 {
                return Err(AppError::Config("timeout_secs 必须大于 0".to_string()));
            }
            recolor.download_timeout = timeout;
        }
        if let Some(max) = self.max_file_size {
            if max == 0 {
                return Err(AppError::Config("max_file_size 必须大于 0".to_string()));
            }
            recolor.max_file_size = max;
        }

        let mut config = RunConfig::new(recolor, &self.colors, &self.exclude)?;
        config.dry_run = dry_run;
        Ok(config)
    }
}
