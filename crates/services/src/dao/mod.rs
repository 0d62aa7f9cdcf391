pub mod attendance;
pub mod base;
pub mod class;
pub mod community;
pub mod kiosk;
pub mod notification;
pub mod project;
pub mod user;

pub use base::{BaseDao, DaoError, DaoResult};
