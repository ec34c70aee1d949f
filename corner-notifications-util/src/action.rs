use crate::ActionId;
use serde::{Deserialize, Serialize};

/// An action button offered by a notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NotificationAction {
    /// Identifier reported back in `ActionInvoked`
    pub id: ActionId,
    /// User-visible label for the action button
    pub label: String,
}

/// Parse the D-Bus action array of alternating id/label pairs.
///
/// Parsing stops at the first empty or missing id. Pairs with an empty
/// label are skipped.
pub fn parse_actions(raw_actions: &[&str]) -> Vec<NotificationAction> {
    let mut actions = Vec::new();

    for pair in raw_actions.chunks(2) {
        let (id, label) = match pair {
            [id, label] if !id.is_empty() => (*id, *label),
            _ => break,
        };

        if label.is_empty() {
            continue;
        }

        actions.push(NotificationAction {
            id: ActionId::from(id),
            label: label.to_string(),
        });
    }

    actions
}
