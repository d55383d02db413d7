//! 🎬 Which titles make the cut. Movies, by default. Everything, if you ask for nothing.

use crate::common::Record;

/// 🚪 The bouncer at the index door. Checks `kind` against a guest list, exact match only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectionFilter {
    // 📋 empty list = open bar
    kinds: Vec<String>,
}

impl SelectionFilter {
    /// 🔧 Build from the configured `title_types`.
    pub(crate) fn from_title_types(title_types: &[String]) -> Self {
        Self {
            kinds: title_types.to_vec(),
        }
    }

    /// ✅ Does this record get indexed?
    pub(crate) fn keeps(&self, record: &Record) -> bool {
        self.kinds.is_empty() || self.kinds.iter().any(|kind| *kind == record.kind)
    }
}

impl Default for SelectionFilter {
    fn default() -> Self {
        Self::from_title_types(&["movie".to_string()])
    }
}
