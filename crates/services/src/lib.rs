pub mod attendance;
pub mod auth;
pub mod chat_cipher;
pub mod dao;
pub mod file_preview;
pub mod project_access;
pub mod rbac;
pub mod sanitize;

pub use auth::AuthService;
pub use chat_cipher::ChatCipher;
pub use file_preview::FilePreviewService;
pub use dao::*;
