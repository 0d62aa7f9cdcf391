use chrono::FixedOffset;
use mongodb::Database;
use academy_config::Settings;
use academy_services::{
    AuthService, ChatCipher, FilePreviewService,
    attendance::fixed_offset,
    dao::{
        attendance::AttendanceDao, class::ClassDao, community::CommunityDao, kiosk::KioskDao,
        notification::NotificationDao, project::ProjectDao, user::UserDao,
    },
};
use std::sync::Arc;

use crate::ws::storage::WsStorage;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub cipher: Arc<ChatCipher>,
    pub users: Arc<UserDao>,
    pub classes: Arc<ClassDao>,
    pub attendance: Arc<AttendanceDao>,
    pub kiosks: Arc<KioskDao>,
    pub notifications: Arc<NotificationDao>,
    pub community: Arc<CommunityDao>,
    pub projects: Arc<ProjectDao>,
    pub previews: Arc<FilePreviewService>,
    pub ws_storage: Arc<WsStorage>,
    /// Local offset for calendar days and the kiosk's "today".
    pub offset: FixedOffset,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let cipher = Arc::new(ChatCipher::new(&settings.chat.secret));
        let offset = fixed_offset(settings.attendance.utc_offset_minutes);

        Self {
            users: Arc::new(UserDao::new(&db)),
            classes: Arc::new(ClassDao::new(&db)),
            attendance: Arc::new(AttendanceDao::new(&db)),
            kiosks: Arc::new(KioskDao::new(&db)),
            notifications: Arc::new(NotificationDao::new(&db)),
            community: Arc::new(CommunityDao::new(&db)),
            projects: Arc::new(ProjectDao::new(&db)),
            previews: Arc::new(FilePreviewService::new()),
            ws_storage: Arc::new(WsStorage::new()),
            db,
            settings,
            auth,
            cipher,
            offset,
        }
    }
}
