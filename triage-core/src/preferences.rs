//! User ordering preferences.
//!
//! The engine never persists these; callers hand in anything that can produce
//! a snapshot via [`PreferenceSource`].

use serde::{Deserialize, Serialize};

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "yes")]
    pub prefer_deadline: bool,
    #[serde(default = "yes")]
    pub prefer_high_priority: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            prefer_deadline: true,
            prefer_high_priority: true,
        }
    }
}

impl Preferences {
    pub fn new(prefer_deadline: bool, prefer_high_priority: bool) -> Self {
        Self {
            prefer_deadline,
            prefer_high_priority,
        }
    }

    /// Names of the active criteria, in sort-key order.
    pub fn active_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.prefer_deadline {
            names.push("deadline");
        }
        if self.prefer_high_priority {
            names.push("priority");
        }
        names
    }
}

/// Read accessor for a preference store.
pub trait PreferenceSource {
    fn preferences(&self) -> Preferences;
}

impl PreferenceSource for Preferences {
    fn preferences(&self) -> Preferences {
        *self
    }
}

impl<T: PreferenceSource + ?Sized> PreferenceSource for &T {
    fn preferences(&self) -> Preferences {
        (**self).preferences()
    }
}
