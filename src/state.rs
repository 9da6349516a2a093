use crate::{auth::TokenKeys, chatbot::ChatbotService, config::Config, db::Database};

/// Everything the handlers share, registered once as `web::Data<AppState>`.
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub tokens: TokenKeys,
    pub chatbot: ChatbotService,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        let tokens = TokenKeys::new(&config.jwt_secret, config.jwt_expires_minutes);
        let chatbot = ChatbotService::new(&config);
        Self {
            db,
            config,
            tokens,
            chatbot,
        }
    }
}
