use std::sync::Arc;
use std::time::Duration;

use crate::services::catalog::InstanceCatalog;
use crate::services::debounce::EditorRegistry;

#[derive(Clone)]
pub struct AppState {
    pub public_base_url: String,
    pub catalog: Arc<InstanceCatalog>,
    /// One debouncer per open JSON editor, keyed by the editor id the page picks.
    pub editors: EditorRegistry,
    pub custom_css: Option<String>,
}

impl AppState {
    pub fn new(public_base_url: String, catalog: InstanceCatalog, editor_quiet_interval: Duration) -> Self {
        Self {
            public_base_url,
            catalog: Arc::new(catalog),
            editors: EditorRegistry::new(editor_quiet_interval),
            custom_css: None,
        }
    }
}
