use super::item::ItemDraft;

/// A staged mutation awaiting the user's confirmation. A save without
/// an id is an add; with an id it is an edit.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    Save { id: Option<i64>, draft: ItemDraft },
    Delete(i64),
}

/// Two-phase commit gate in front of every add/edit/delete:
/// idle → proposed → (confirmed | cancelled) → idle. At most one
/// intent is ever pending; re-proposing replaces it.
#[derive(Debug, Default)]
pub struct ConfirmationFlow {
    pending: Option<Intent>,
}

impl ConfirmationFlow {
    pub fn new() -> ConfirmationFlow {
        ConfirmationFlow::default()
    }

    /// Stages an intent, displacing any earlier one (last proposal
    /// wins).
    pub fn propose(&mut self, intent: Intent) {
        self.pending = Some(intent);
    }

    pub fn pending(&self) -> Option<&Intent> {
        self.pending.as_ref()
    }

    /// Prompt text for the confirmation dialog; depends only on the
    /// intent tag.
    pub fn prompt(&self) -> Option<&'static str> {
        self.pending.as_ref().map(|intent| match intent {
            Intent::Delete(_) => "Are you sure you want to delete this item?",
            Intent::Save { .. } => "Are you sure you want to save changes?",
        })
    }

    /// Hands the staged intent to the caller and returns to idle. The
    /// caller runs exactly one store mutation sequence with it.
    pub fn confirm(&mut self) -> Option<Intent> {
        self.pending.take()
    }

    /// Discards the staged intent with no side effect.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            ..ItemDraft::default()
        }
    }

    #[test]
    fn starts_idle() {
        let flow = ConfirmationFlow::new();
        assert!(flow.pending().is_none());
        assert!(flow.prompt().is_none());
    }

    #[test]
    fn confirm_hands_over_the_intent_and_returns_to_idle() {
        let mut flow = ConfirmationFlow::new();
        flow.propose(Intent::Delete(7));

        assert_eq!(flow.confirm(), Some(Intent::Delete(7)));
        assert!(flow.pending().is_none());
        assert_eq!(flow.confirm(), None);
    }

    #[test]
    fn cancel_discards_the_intent() {
        let mut flow = ConfirmationFlow::new();
        flow.propose(Intent::Save {
            id: None,
            draft: draft("Widget"),
        });
        flow.cancel();

        assert!(flow.pending().is_none());
        assert_eq!(flow.confirm(), None);
    }

    #[test]
    fn last_proposal_wins() {
        let mut flow = ConfirmationFlow::new();
        flow.propose(Intent::Save {
            id: Some(3),
            draft: draft("old"),
        });
        flow.propose(Intent::Delete(9));

        assert_eq!(flow.confirm(), Some(Intent::Delete(9)));
    }

    #[test]
    fn prompt_depends_only_on_the_intent_tag() {
        let mut flow = ConfirmationFlow::new();

        flow.propose(Intent::Save {
            id: None,
            draft: draft("a"),
        });
        let add_prompt = flow.prompt();

        flow.propose(Intent::Save {
            id: Some(1),
            draft: draft("b"),
        });
        assert_eq!(flow.prompt(), add_prompt);

        flow.propose(Intent::Delete(1));
        assert_eq!(flow.prompt(), Some("Are you sure you want to delete this item?"));
    }
}
