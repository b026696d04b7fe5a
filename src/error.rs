//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义运行级统一的 `AppError` 枚举。只有两类错误会终止整个运行：
//! 配置错误（非法配色 / 非法排除规则 / 非法 base URL / 设置文件不可读）与样式表读取失败。
//! 单个图片的错误（`ImageError`）在编排层被就地消化，不会上升到这里。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageError` 与 `std::io::Error` 提供 `From` 转换，无需手动 map。

use crate::image_handler::ImageError;

/// 应用级统一错误类型。
///
/// `main` 收到该错误后记录日志并以非 0 退出码结束进程。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 配置错误，在任何网络访问之前触发
    #[error("配置错误: {0}")]
    Config(String),

    /// 样式表无法读取或下载
    #[error("样式表读取失败: {0}")]
    Stylesheet(String),

    /// 图片处理链路错误（仅在初始化阶段会上升，例如 HTTP 客户端创建失败）
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),
}
