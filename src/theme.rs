// Theme store: light/dark preference applied to the document root

use crate::models::Theme;
use crate::slice::{self, Slice};
use crate::storage::Storage;
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

const DARK_CLASS: &str = "dark";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSlice {
    #[serde(default)]
    pub theme: Theme,
}

impl Slice for ThemeSlice {
    fn storage_key() -> &'static str {
        "theme-storage"
    }
}

/// Receives the visual side effect of a theme change
pub trait ThemeApplier {
    fn apply(&mut self, theme: Theme);
}

/// Class list of the document root element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRoot {
    classes: BTreeSet<String>,
}

impl DocumentRoot {
    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

impl ThemeApplier for DocumentRoot {
    fn apply(&mut self, theme: Theme) {
        match theme {
            Theme::Dark => {
                self.classes.insert(DARK_CLASS.to_string());
            }
            Theme::Light => {
                self.classes.remove(DARK_CLASS);
            }
        }
    }
}

pub struct ThemeStore<S: Storage, A: ThemeApplier> {
    storage: S,
    applier: A,
    state: ThemeSlice,
}

impl<S: Storage, A: ThemeApplier> ThemeStore<S, A> {
    /// Restore the saved theme and apply it to the root straight away
    pub fn rehydrate(storage: S, mut applier: A) -> Result<Self> {
        let state: ThemeSlice = slice::load_or_default(&storage)?;
        applier.apply(state.theme);
        debug!(theme = %state.theme, "Rehydrated theme store");
        Ok(Self {
            storage,
            applier,
            state,
        })
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn applier(&self) -> &A {
        &self.applier
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
        self.applier.apply(theme);
        if let Err(e) = slice::save(&mut self.storage, &self.state) {
            warn!(error = ?e, "Failed to persist theme");
        }
    }

    /// Flip between light and dark; returns the new theme
    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.state.theme.toggled();
        self.set_theme(next);
        next
    }
}
