use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::rule::RuleId;

/// Actions surfaced by [crate::tree::RuleTree] for the embedding shell to
/// dispatch.
///
/// The navigation collaborator contract is action-shaped: `Selected(id)`
/// is the "on navigate" intent, and routing it back as the new current
/// selection (via [crate::tree::RuleTree::set_selection]) closes the loop.
/// The tree never assumes how ids map to routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeEvent {
    /// Navigation intent for the given rule (Enter or activation click).
    Selected(RuleId),
    /// The roving focus cursor moved to the given rule.
    Focused(RuleId),
    /// Expansion toggled; the bool is the new expanded state.
    Toggled(RuleId, bool),
}

impl Display for TreeEvent {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            TreeEvent::Selected(id) => write!(f, "Selected({id})"),
            TreeEvent::Focused(id) => write!(f, "Focused({id})"),
            TreeEvent::Toggled(id, open) => write!(f, "Toggled({id}, {open})"),
        }
    }
}
