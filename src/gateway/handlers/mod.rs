//! HTTP 请求处理器

pub mod health;
pub mod landing;
pub mod story;

pub use health::handle_health;
pub use landing::handle_landing;
pub use story::handle_generate_story;
