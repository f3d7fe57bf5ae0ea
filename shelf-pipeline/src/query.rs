use serde::{Deserialize, Serialize};

/// The "no filter" label used by the dashboard selectors.
pub const ALL: &str = "All";

/// A dropdown selection: either the "All" sentinel or one exact value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// The selected value, or `None` for the sentinel.
    pub fn value(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Only(value) => Some(value),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// `true` when `candidate` satisfies this selection.
    pub fn admits(&self, candidate: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(value) => value == candidate,
        }
    }
}

impl From<&str> for Selection {
    fn from(label: &str) -> Self {
        if label.is_empty() || label == ALL {
            Selection::All
        } else {
            Selection::Only(label.to_string())
        }
    }
}

impl From<Option<String>> for Selection {
    fn from(label: Option<String>) -> Self {
        label.as_deref().map(Selection::from).unwrap_or_default()
    }
}

impl From<Selection> for Option<String> {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::All => None,
            Selection::Only(value) => Some(value),
        }
    }
}

/// The four dashboard predicates. Unset predicates impose no constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchQuery {
    /// Case-insensitive substring of the product name.
    pub search_text: Option<String>,
    pub category: Selection,
    pub retailer: Selection,
    /// Exact match on the batch status label.
    pub stock_status: Selection,
}

impl BatchQuery {
    /// Lowercased search needle, or `None` when search imposes no constraint.
    pub fn search_needle(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase)
    }

    /// `true` when no predicate is active.
    pub fn is_unfiltered(&self) -> bool {
        self.search_needle().is_none()
            && self.category.is_all()
            && self.retailer.is_all()
            && self.stock_status.is_all()
    }
}
