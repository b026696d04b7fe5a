//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载“单个图片资源”链路中的所有错误来源（解析 / 下载 / 解码 / 写入）。
//! 这些错误都属于可恢复错误：编排层只记录并跳过当前引用或当前配色，不会中断整批任务。

/// 单个图片资源处理错误。
///
/// 该类型可被上转为 `AppError`，但在编排层通常被就地捕获并计入 `RunReport`。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("网络错误：{0}")]
    Network(String),

    #[error("超时错误：{0}")]
    Timeout(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    /// 相对路径引用且未配置 base URL。
    #[error("无法解析引用：{0}")]
    Unresolvable(String),
}
