//! 业务模型定义
//!
//! 与 entity 模块的数据库模型分离，HTTP 层和服务层只使用这里的类型。

pub mod auth;
pub mod common;
pub mod curriculum;
pub mod dashboard;
pub mod enrollments;
pub mod media;
pub mod messenger;
pub mod results;
pub mod submissions;
pub mod users;

pub use common::app::AppStartTime;
pub use common::error_code::ErrorCode;
pub use common::response::ApiResponse;
