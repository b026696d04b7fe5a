//! # 加载模块
//!
//! ## 设计思路
//!
//! 统一处理“引用 → URL → 原始字节”的过程。下载能力抽象为 `Fetch` trait，
//! 生产环境使用基于 `reqwest` 的 `HttpFetcher`，测试可以注入内存实现。
//!
//! ## 实现思路
//!
//! - 引用解析：绝对 `http(s)` 地址原样使用；否则基于 base URL 做标准相对解析；
//!   两者都不满足时返回 `ImageError::Unresolvable`，由编排层降级为警告。
//! - 下载：状态码校验 + Content-Length 预检 + 流式读取时的体积上限。
//! - 网络错误统一映射到 `ImageError`，便于上层按引用隔离失败。
//! - 样式表加载失败属于致命错误，映射为 `AppError::Stylesheet`。

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;

use super::source::StylesheetSource;
use super::{ImageError, RecolorConfig};
use crate::error::AppError;

const BUFFER_INITIAL_CAPACITY: usize = 16 * 1024;

/// 二进制安全的“按 URL 取字节”能力。
pub trait Fetch {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Vec<u8>, ImageError>> + Send;
}

/// 基于 `reqwest` 的 HTTP 下载器。
///
/// 复用同一个 `reqwest::Client`，整个运行期只创建一次。
pub struct HttpFetcher {
    client: reqwest::Client,
    max_file_size: u64,
    download_timeout: u64,
}

impl HttpFetcher {
    /// 根据配置创建下载器。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use css_recolor::image_handler::{HttpFetcher, RecolorConfig};
    ///
    /// let fetcher = HttpFetcher::new(&RecolorConfig::default())?;
    /// # Ok::<(), css_recolor::image_handler::ImageError>(())
    /// ```
    pub fn new(config: &RecolorConfig) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.download_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()
            .map_err(|e| ImageError::Network(format!("无法创建 HTTP 客户端：{}", e)))?;

        Ok(Self {
            client,
            max_file_size: config.max_file_size,
            download_timeout: config.download_timeout,
        })
    }

    async fn download_with_validation(&self, url: &Url) -> Result<Vec<u8>, ImageError> {
        log::debug!("📡 发送 HTTP 请求 - URL: {}", redact_url_for_log(url));

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Network(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status_message(status.as_u16())
            )));
        }

        let total_len = response.content_length();
        if let Some(size) = total_len {
            if size > self.max_file_size {
                return Err(ImageError::ResourceLimit(format!(
                    "文件过大：{:.2} MB（限制：{:.2} MB）",
                    size as f64 / 1024.0 / 1024.0,
                    self.max_file_size as f64 / 1024.0 / 1024.0
                )));
            }
        }

        let initial_capacity = total_len
            .map(|len| len.min(self.max_file_size).min(usize::MAX as u64) as usize)
            .filter(|len| *len > 0)
            .unwrap_or(BUFFER_INITIAL_CAPACITY);
        let mut buffer = Vec::with_capacity(initial_capacity);
        let mut total: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.map_reqwest_error(e, url))?
        {
            total = total.saturating_add(chunk.len() as u64);
            if total > self.max_file_size {
                return Err(ImageError::ResourceLimit("下载后文件超过大小限制".to_string()));
            }
            buffer.extend_from_slice(&chunk);
        }

        log::debug!("✅ 下载完成 - {} bytes", total);
        Ok(buffer)
    }

    /// 统一映射 reqwest 错误到业务错误。
    fn map_reqwest_error(&self, e: reqwest::Error, url: &Url) -> ImageError {
        let err_msg = e
            .to_string()
            .replace(url.as_str(), &redact_url_for_log(url));

        if e.is_timeout() {
            ImageError::Timeout(format!("下载超时（{}秒）", self.download_timeout))
        } else if e.is_connect() {
            ImageError::Network(format!("无法连接：{}", err_msg))
        } else {
            ImageError::Network(format!("请求失败：{}", err_msg))
        }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, ImageError> {
        self.download_with_validation(url).await
    }
}

/// 将样式表中的引用解析为可下载的绝对 URL。
///
/// # 返回
/// - 绝对 `http(s)` 引用 → 原样返回
/// - 相对引用 + base URL → 标准相对解析结果
/// - 相对引用且无 base URL → `ImageError::Unresolvable`
pub fn resolve_reference(reference: &str, base_url: Option<&Url>) -> Result<Url, ImageError> {
    if let Ok(absolute) = Url::parse(reference) {
        if is_http(&absolute) {
            return Ok(absolute);
        }
    }

    let Some(base) = base_url else {
        return Err(ImageError::Unresolvable(format!(
            "相对路径 '{}' 需要配置 base URL",
            reference
        )));
    };

    let joined = base
        .join(reference)
        .map_err(|e| ImageError::InvalidFormat(format!("URL 解析失败 '{}'：{}", reference, e)))?;

    if !is_http(&joined) {
        return Err(ImageError::InvalidFormat(format!(
            "仅支持 HTTP/HTTPS：{}",
            redact_url_for_log(&joined)
        )));
    }

    Ok(joined)
}

/// 读取样式表文本：URL 走 `Fetch`，本地路径直接读文件。
///
/// 任何失败都是致命错误。
pub async fn load_stylesheet<F: Fetch>(
    source: &StylesheetSource,
    fetcher: &F,
) -> Result<String, AppError> {
    let bytes = match source {
        StylesheetSource::Url(raw) => {
            let url = Url::parse(raw)
                .map_err(|e| AppError::Stylesheet(format!("样式表 URL 格式错误 '{}'：{}", raw, e)))?;
            log::info!("🌐 下载样式表 - URL: {}", redact_url_for_log(&url));
            fetcher
                .fetch(&url)
                .await
                .map_err(|e| AppError::Stylesheet(format!("无法下载样式表：{}", e)))?
        }
        StylesheetSource::FilePath(path) => {
            log::info!("📁 读取本地样式表 - 路径: {}", path);
            std::fs::read(Path::new(path))
                .map_err(|e| AppError::Stylesheet(format!("无法读取样式表 '{}'：{}", path, e)))?
        }
    };

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn is_http(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}

/// 去掉 query / fragment，避免把签名参数写进日志。
pub(crate) fn redact_url_for_log(url: &Url) -> String {
    let host = url.host_str().unwrap_or("<unknown-host>");
    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();

    format!("{}://{}{}{}", url.scheme(), host, port, url.path())
}

/// 常见 HTTP 状态码文案。
fn status_message(code: u16) -> &'static str {
    match code {
        404 => "未找到",
        403 => "访问被拒绝",
        500..=599 => "服务器错误",
        _ => "请求失败",
    }
}
