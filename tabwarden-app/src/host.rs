//! In-process stand-ins for the browser-side collaborators, used by the
//! demo binary and the integration tests.

use async_trait::async_trait;
use std::collections::HashMap;
use tabwarden_core::{ContentReader, HostError, ReadError, TabDescriptor, TabHost};
use tokio::sync::Mutex;

struct HostState {
    tabs: Vec<TabDescriptor>,
    next_id: u64,
}

pub struct DemoTabHost {
    state: Mutex<HostState>,
}

impl DemoTabHost {
    pub fn new(tabs: Vec<TabDescriptor>) -> Self {
        Self {
            state: Mutex::new(HostState { tabs, next_id: 0 }),
        }
    }
}

#[async_trait]
impl TabHost for DemoTabHost {
    async fn list_open_tabs(&self) -> Result<Vec<TabDescriptor>, HostError> {
        Ok(self.state.lock().await.tabs.clone())
    }

    async fn activate(&self, id: &str) -> Result<(), HostError> {
        let state = self.state.lock().await;
        if state.tabs.iter().any(|t| t.id == id) {
            tracing::debug!("Host activated tab {}", id);
            Ok(())
        } else {
            Err(HostError::NotFound(id.to_string()))
        }
    }

    async fn close(&self, id: &str) -> Result<(), HostError> {
        let mut state = self.state.lock().await;
        let Some(index) = state.tabs.iter().position(|t| t.id == id) else {
            return Err(HostError::NotFound(id.to_string()));
        };
        state.tabs.remove(index);
        tracing::debug!("Host closed tab {}", id);
        Ok(())
    }

    async fn open_new(&self, url: &str) -> Result<String, HostError> {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let id = format!("host-{}", state.next_id);
        state.tabs.push(TabDescriptor {
            id: id.clone(),
            title: url.to_string(),
            url: url.to_string(),
            favicon: "📄".to_string(),
        });
        tracing::debug!("Host opened {} as tab {}", url, id);
        Ok(id)
    }
}

struct PageEntry {
    url: String,
    text: String,
}

pub struct DemoContentReader {
    pages: HashMap<String, PageEntry>,
}

impl DemoContentReader {
    /// Entries are (tab id, url, extracted text).
    pub fn new(entries: Vec<(String, String, String)>) -> Self {
        let pages = entries
            .into_iter()
            .map(|(id, url, text)| (id, PageEntry { url, text }))
            .collect();
        Self { pages }
    }
}

#[async_trait]
impl ContentReader for DemoContentReader {
    async fn read_visible_text(&self, tab_id: &str) -> Result<String, ReadError> {
        let Some(page) = self.pages.get(tab_id) else {
            return Err(ReadError::Unavailable(format!(
                "no extracted text for tab {}",
                tab_id
            )));
        };
        // Browser-internal pages refuse content scripts.
        if page.url.starts_with("chrome://") || page.url.starts_with("about:") {
            return Err(ReadError::Restricted);
        }
        Ok(page.text.clone())
    }
}
