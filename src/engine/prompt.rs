//! Consent prompt (banner).
//!
//! The prompt offers the three quick choices: accept all, reject all, open
//! settings. It only becomes visible while the visitor has not decided yet;
//! the guard is checked against the consent store on every `show()`.

use crate::engine::config::ConsentText;
use crate::engine::consent_store::ConsentStore;
use crate::engine::dialog::{Transition, Visibility};

/// Element ids of the prompt buttons.
pub const PROMPT_ACCEPT_ID: &str = "c-p-bn";
pub const PROMPT_REJECT_ID: &str = "c-s-bn";

#[derive(Debug)]
pub struct ConsentPrompt {
    text: ConsentText,
    visibility: Visibility,
}

impl ConsentPrompt {
    pub fn new(text: ConsentText) -> Self {
        Self {
            text,
            visibility: Visibility::Hidden,
        }
    }

    pub fn text(&self) -> &ConsentText {
        &self.text
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Shows the prompt unless the visitor already decided.
    pub fn show(&mut self, store: &ConsentStore) -> Transition {
        if store.has_prior_consent() {
            log::debug!("consent prompt not shown: visitor already decided");
            return Transition::Blocked;
        }
        Transition::to(&mut self.visibility, Visibility::Shown)
    }

    pub fn hide(&mut self) -> Transition {
        Transition::to(&mut self.visibility, Visibility::Hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::categories::CategoryId;
    use crate::engine::cookies::DefaultCookieJar;

    fn store() -> ConsentStore {
        ConsentStore::new("consent", "example.com", vec![CategoryId::from("necessary")], DefaultCookieJar::new().into_handle())
    }

    #[test]
    fn shows_on_first_visit() {
        let store = store();
        let mut prompt = ConsentPrompt::new(ConsentText::default());
        assert_eq!(prompt.visibility(), Visibility::Hidden);

        assert_eq!(prompt.show(&store), Transition::Changed(Visibility::Shown));
        assert_eq!(prompt.show(&store), Transition::Unchanged(Visibility::Shown));
        assert_eq!(prompt.hide(), Transition::Changed(Visibility::Hidden));
        assert_eq!(prompt.hide(), Transition::Unchanged(Visibility::Hidden));
    }

    #[test]
    fn guard_is_reevaluated_on_every_show() {
        let mut store = store();
        let mut prompt = ConsentPrompt::new(ConsentText::default());

        store.write_categories(&[CategoryId::from("necessary")]);
        assert_eq!(prompt.show(&store), Transition::Blocked);
        assert_eq!(prompt.visibility(), Visibility::Hidden);
        assert_eq!(prompt.show(&store), Transition::Blocked);
        assert_eq!(prompt.visibility(), Visibility::Hidden);
    }
}
