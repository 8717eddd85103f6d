use tracing::error;
use url::Url;

use super::HistoryProvider;

/// A [`HistoryProvider`] that stores all information in memory.
pub struct MemoryHistory {
    current: Url,
    past: Vec<Url>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self {
            current: Url::parse("http://localhost/").unwrap(),
            past: Vec::new(),
        }
    }
}

impl MemoryHistory {
    /// Create a [`MemoryHistory`] starting at `path`.
    ///
    /// ```rust
    /// # use signpost::prelude::*;
    /// let history = MemoryHistory::with_initial_path("/users/42?tab=likes");
    /// assert_eq!(history.current_path(), "/users/42");
    /// assert_eq!(history.current_query(), Some(String::from("tab=likes")));
    /// ```
    #[must_use]
    pub fn with_initial_path(path: &str) -> Self {
        let mut history = Self::default();
        history.navigate(path.to_string(), true);
        history
    }

    /// How many locations were pushed (not replaced) since creation.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.past.len()
    }
}

impl HistoryProvider for MemoryHistory {
    fn current_path(&self) -> String {
        self.current.path().to_string()
    }

    fn current_query(&self) -> Option<String> {
        self.current.query().map(|q| q.to_string())
    }

    fn current_origin(&self) -> String {
        self.current.origin().ascii_serialization()
    }

    fn navigate(&mut self, path: String, replace: bool) {
        if path.starts_with("//") {
            error!(r#"cannot navigate to paths starting with "//", path: {path}"#);
            return;
        }

        match self.current.join(&path) {
            Ok(url) => {
                if !replace {
                    self.past.push(self.current.clone());
                }
                self.current = url;
            }
            Err(_) => error!(r#"failed to navigate to "{path}""#),
        }
    }
}
