pub mod attendance;
pub mod class;
pub mod community;
pub mod kiosk;
pub mod notification;
pub mod project;
pub mod project_file;
pub mod project_message;
pub mod project_task;
pub mod role;
pub mod user;

pub use attendance::{AttendanceLog, AttendanceStatus};
pub use class::{Class, CurriculumFile, CurriculumWeek, Enrollment};
pub use community::{CommunityComment, CommunityPost};
pub use kiosk::KioskAccount;
pub use notification::{Notification, NotificationCategory};
pub use project::{Project, ProjectMember, ProjectRole, ProjectStatus};
pub use project_file::ProjectFile;
pub use project_message::ProjectMessage;
pub use project_task::{ProjectColumn, ProjectLog, ProjectTask};
pub use role::{Audience, UserRole};
pub use user::{ParentLink, User};
