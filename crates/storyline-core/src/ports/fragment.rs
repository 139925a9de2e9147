use std::sync::RwLock;

/// Port for the addressable location fragment that holds the current story id
pub trait FragmentStore: Send + Sync {
    /// Current fragment without the leading `#`, if any
    fn read(&self) -> Option<String>;

    /// Replace the fragment
    fn write(&self, value: &str);
}

/// In-memory fragment, for terminals and tests
#[derive(Debug, Default)]
pub struct MemoryFragment {
    value: RwLock<Option<String>>,
}

impl MemoryFragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a deep link already in place
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: RwLock::new(Some(value.into())),
        }
    }
}

impl FragmentStore for MemoryFragment {
    fn read(&self) -> Option<String> {
        self.value
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .filter(|v| !v.is_empty())
    }

    fn write(&self, value: &str) {
        let mut guard = self.value.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(value.trim_start_matches('#').to_string());
    }
}
