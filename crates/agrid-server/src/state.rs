use std::sync::Arc;

use agrid_application::AssistantService;

use crate::upload::UploadStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub assistant: AssistantService,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(assistant: AssistantService, uploads: UploadStore) -> SharedState {
        Arc::new(Self { assistant, uploads })
    }
}
