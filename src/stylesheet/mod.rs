//! 样式表处理：图片引用提取与排除过滤。
//!
//! 两者都是纯函数式步骤，在任何网络访问之前完成。

mod extract;
mod filter;

pub use extract::extract_references;
pub use filter::PathFilter;
