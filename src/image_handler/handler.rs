//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `RecolorHandler` 只负责流程编排，处理链路固定为：
//! 1. 读取样式表（失败即终止）
//! 2. 提取 PNG 引用并按排除规则过滤
//! 3. 逐个引用：解析 URL → 下载一次 → 解码
//! 4. 逐个配色：从同一位图生成独立副本 → 编码 → 写入
//!
//! ## 实现思路
//!
//! - 配色表与排除规则在 `RunConfig` 构建时已校验，因此这里不会再出现配置错误。
//! - 失败在“能独立继续的最小范围”内捕获：引用级（解析 / 下载 / 解码）与配色级（编码 / 写入）。
//! - 所有结果计入 `RunReport`，并记录 `fetch/decode/write/total` 阶段耗时，便于诊断。

use std::path::PathBuf;
use std::time::Instant;

use super::loader::{Fetch, load_stylesheet, redact_url_for_log, resolve_reference};
use super::pipeline::{decode_asset, encode_bitmap, output_target, recolor, write_variant};
use super::source::{DecodedAsset, RawImageData, StylesheetSource};
use super::{ImageError, RunConfig};
use crate::error::AppError;
use crate::palette::PaletteEntry;
use crate::stylesheet::extract_references;

/// 单次运行的统计结果。
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// 提取到的去重引用数量。
    pub references_found: usize,
    /// 被排除规则过滤掉的引用数量。
    pub references_excluded: usize,
    /// 成功下载并解码的引用数量。
    pub references_processed: usize,
    /// 因缺少 base URL 而跳过的引用数量。
    pub references_skipped: usize,
    /// 下载或解码失败的引用数量。
    pub references_failed: usize,
    /// 成功写入的变体文件。
    pub written: Vec<PathBuf>,
    /// 编码或写入失败的变体数量。
    pub variants_failed: usize,
    /// dry-run 模式下计划生成的文件。
    pub planned: Vec<PathBuf>,
}

/// 图片变色编排器。
pub struct RecolorHandler<F> {
    fetcher: F,
    config: RunConfig,
}

impl<F: Fetch> RecolorHandler<F> {
    /// 使用已校验的运行配置创建编排器。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use css_recolor::image_handler::{HttpFetcher, RecolorConfig, RecolorHandler, RunConfig};
    ///
    /// let config = RunConfig::new(RecolorConfig::default(), &[], &[])?;
    /// let fetcher = HttpFetcher::new(&config.recolor)?;
    /// let handler = RecolorHandler::new(fetcher, config);
    /// ```
    pub fn new(fetcher: F, config: RunConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// 处理主入口：读取样式表并生成所有变体。
    ///
    /// 只有样式表读取失败会返回错误；单个引用或变体失败只体现在 `RunReport` 中。
    pub async fn run(&self, source: &StylesheetSource) -> Result<RunReport, AppError> {
        let css = load_stylesheet(source, &self.fetcher).await?;
        Ok(self.process_stylesheet(&css).await)
    }

    /// 对已读取的样式表文本执行完整流程。
    pub async fn process_stylesheet(&self, css: &str) -> RunReport {
        let total_start = Instant::now();
        let mut report = RunReport::default();

        let extracted = extract_references(css);
        report.references_found = extracted.len();

        let references = self.config.filter.apply(extracted);
        report.references_excluded = report.references_found - references.len();

        log::info!(
            "📋 引用 {} 个（排除 {} 个），配色 {:?}",
            report.references_found,
            report.references_excluded,
            self.config.palette.names()
        );

        if references.is_empty() {
            log::info!("✅ 没有需要处理的图片引用");
            return report;
        }

        for reference in &references {
            if self.config.dry_run {
                self.plan_reference(reference, &mut report);
            } else {
                self.process_reference(reference, &mut report).await;
            }
        }

        log::info!(
            "✅ 处理完成 - 成功 {} 个 跳过 {} 个 失败 {} 个 写入 {} 个 写入失败 {} 个 total={}ms",
            report.references_processed,
            report.references_skipped,
            report.references_failed,
            report.written.len(),
            report.variants_failed,
            total_start.elapsed().as_millis()
        );

        report
    }

    /// 单个引用：解析 → 下载一次 → 解码 → 逐配色输出。
    async fn process_reference(&self, reference: &str, report: &mut RunReport) {
        let total_start = Instant::now();

        let url = match resolve_reference(reference, self.config.recolor.base_url.as_ref()) {
            Ok(url) => url,
            Err(ImageError::Unresolvable(msg)) => {
                log::warn!("⚠️ 跳过 {}：{}", reference, msg);
                report.references_skipped += 1;
                return;
            }
            Err(err) => {
                log::error!("❌ {}：{}", reference, err);
                report.references_failed += 1;
                return;
            }
        };

        let fetch_start = Instant::now();
        let raw = match self.fetcher.fetch(&url).await {
            Ok(bytes) => RawImageData { bytes, url },
            Err(err) => {
                log::error!("❌ 下载失败 {}：{}", redact_url_for_log(&url), err);
                report.references_failed += 1;
                return;
            }
        };
        let fetch_elapsed = fetch_start.elapsed();

        let decode_start = Instant::now();
        let asset = match decode_asset(&raw, self.config.recolor.max_decoded_pixels) {
            Ok(asset) => asset,
            Err(err) => {
                log::error!("❌ 解码失败 {}：{}", redact_url_for_log(&raw.url), err);
                report.references_failed += 1;
                return;
            }
        };
        let decode_elapsed = decode_start.elapsed();
        report.references_processed += 1;

        let write_start = Instant::now();
        for entry in &self.config.palette {
            match self.render_variant(&asset, entry, reference) {
                Ok(path) => {
                    log::debug!("💾 已写入 {}", path.display());
                    report.written.push(path);
                }
                Err(err) => {
                    log::error!("❌ 生成 {} 的 {} 变体失败：{}", reference, entry.name, err);
                    report.variants_failed += 1;
                }
            }
        }
        let write_elapsed = write_start.elapsed();

        log::info!(
            "✅ {} 处理完成 - fetch={}ms decode={}ms write={}ms total={}ms",
            reference,
            fetch_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            write_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );
    }

    /// 单个变体：克隆 → 变色 → 编码 → 写入。
    fn render_variant(
        &self,
        asset: &DecodedAsset,
        entry: &PaletteEntry,
        reference: &str,
    ) -> Result<PathBuf, ImageError> {
        let tinted = recolor(&asset.bitmap, entry.color);
        let bytes = encode_bitmap(tinted, asset.format)?;
        let target = output_target(&self.config.recolor.output_root, &entry.name, reference);
        write_variant(&target, &bytes)?;
        Ok(target)
    }

    /// dry-run：只解析 URL 并列出输出路径，不访问网络也不写文件。
    fn plan_reference(&self, reference: &str, report: &mut RunReport) {
        match resolve_reference(reference, self.config.recolor.base_url.as_ref()) {
            Ok(url) => {
                log::info!("🧭 {} → {}", reference, redact_url_for_log(&url));
                for entry in &self.config.palette {
                    let target =
                        output_target(&self.config.recolor.output_root, &entry.name, reference);
                    log::info!("   {} → {}", entry.name, target.display());
                    report.planned.push(target);
                }
            }
            Err(ImageError::Unresolvable(msg)) => {
                log::warn!("⚠️ 跳过 {}：{}", reference, msg);
                report.references_skipped += 1;
            }
            Err(err) => {
                log::error!("❌ {}：{}", reference, err);
                report.references_failed += 1;
            }
        }
    }
}
