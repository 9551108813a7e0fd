//! # Command map and transform pipeline
//!
//! The external input-handling layer turns device events into abstract
//! `(event name, key combination)` pairs; this module maps those pairs to
//! ordered lists of named transforms and runs them first-match-wins: the
//! first transform to succeed produces the new state and the rest are
//! skipped. If every bound transform fails, the last attempted error is
//! surfaced (each attempt is also logged). An unbound event is a no-op,
//! not an error; the editor stays usable after any failed command.

use tracing::debug;

use crate::editing::lists;
use crate::editing::state::EditorState;
use crate::error::EditError;
use crate::schema::builtins::{ORDERED_LIST, UNORDERED_LIST};

/// A named, pure rewrite of the editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    SplitListItem,
    LiftListItem,
    LiftEmptyListItem,
    JoinListItemBackward,
    JoinListItemForward,
    WrapInUnorderedList,
    WrapInOrderedList,
    /// An externally supplied transform with its own name.
    Custom(&'static str, fn(&EditorState) -> Result<EditorState, EditError>),
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Transform::SplitListItem => "split-list-item",
            Transform::LiftListItem => "lift-list-item",
            Transform::LiftEmptyListItem => "lift-empty-list-item",
            Transform::JoinListItemBackward => "join-list-item-backward",
            Transform::JoinListItemForward => "join-list-item-forward",
            Transform::WrapInUnorderedList => "wrap-in-unordered-list",
            Transform::WrapInOrderedList => "wrap-in-ordered-list",
            Transform::Custom(name, _) => name,
        }
    }

    /// Apply to `state`, returning a wholly new state or a named failure.
    pub fn apply(&self, state: &EditorState) -> Result<EditorState, EditError> {
        match self {
            Transform::SplitListItem => lists::split_list_item(state),
            Transform::LiftListItem => lists::lift_list_item(state),
            Transform::LiftEmptyListItem => lists::lift_empty_list_item(state),
            Transform::JoinListItemBackward => lists::join_list_item_backward(state),
            Transform::JoinListItemForward => lists::join_list_item_forward(state),
            Transform::WrapInUnorderedList => lists::wrap_in_list(state, UNORDERED_LIST),
            Transform::WrapInOrderedList => lists::wrap_in_list(state, ORDERED_LIST),
            Transform::Custom(_, run) => run(state),
        }
    }
}

#[derive(Debug, Clone)]
struct Binding {
    event: String,
    keys: String,
    transforms: Vec<Transform>,
}

/// Ordered bindings from `(event name, key combination)` to transform
/// lists, checked in registration order.
#[derive(Debug, Clone, Default)]
pub struct CommandMap {
    bindings: Vec<Binding>,
}

impl CommandMap {
    pub fn new() -> Self {
        CommandMap::default()
    }

    /// Register a binding. Earlier registrations win on duplicate keys.
    pub fn bind(
        &mut self,
        event: impl Into<String>,
        keys: impl Into<String>,
        transforms: Vec<Transform>,
    ) {
        self.bindings.push(Binding {
            event: event.into(),
            keys: keys.into(),
            transforms,
        });
    }

    /// The transforms bound to an event, if any.
    pub fn lookup(&self, event: &str, keys: &str) -> Option<&[Transform]> {
        self.bindings
            .iter()
            .find(|binding| binding.event == event && binding.keys == keys)
            .map(|binding| binding.transforms.as_slice())
    }

    /// Run the transforms bound to `(event, keys)` against `state`.
    ///
    /// Returns `Ok(Some(new_state))` from the first transform to succeed,
    /// `Ok(None)` when the event is unbound, and the last attempted error
    /// when every bound transform fails.
    pub fn dispatch(
        &self,
        event: &str,
        keys: &str,
        state: &EditorState,
    ) -> Result<Option<EditorState>, EditError> {
        let Some(transforms) = self.lookup(event, keys) else {
            return Ok(None);
        };
        let mut last_error = None;
        for transform in transforms {
            match transform.apply(state) {
                Ok(next) => {
                    debug!(transform = transform.name(), event, keys, "transform applied");
                    return Ok(Some(next));
                }
                Err(error) => {
                    debug!(
                        transform = transform.name(),
                        event,
                        keys,
                        %error,
                        "transform failed"
                    );
                    last_error = Some(error);
                }
            }
        }
        match last_error {
            Some(error) => Err(error),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Inline, TextRun};
    use pretty_assertions::assert_eq;

    fn state() -> EditorState {
        EditorState::new(Block::container(
            "doc",
            vec![Block::text_block(
                "paragraph",
                vec![Inline::Text(TextRun::plain("hi"))],
            )],
        ))
    }

    fn always_fails(_: &EditorState) -> Result<EditorState, EditError> {
        Err(EditError::precondition("always fails"))
    }

    fn fails_differently(_: &EditorState) -> Result<EditorState, EditError> {
        Err(EditError::precondition("second failure"))
    }

    fn marks_doc(state: &EditorState) -> Result<EditorState, EditError> {
        let mut next = state.clone();
        next.doc.attrs.insert("touched", "yes");
        Ok(next)
    }

    #[test]
    fn unbound_event_is_a_no_op() {
        let map = CommandMap::new();
        let result = map.dispatch("insert-paragraph", "Enter", &state()).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn first_success_wins_and_skips_the_rest() {
        let mut map = CommandMap::new();
        map.bind(
            "insert-paragraph",
            "Enter",
            vec![
                Transform::Custom("fails", always_fails),
                Transform::Custom("marks", marks_doc),
                Transform::Custom("never-reached", always_fails),
            ],
        );
        let result = map
            .dispatch("insert-paragraph", "Enter", &state())
            .unwrap()
            .unwrap();
        assert_eq!(result.doc.attrs.get_str("touched"), Some("yes"));
    }

    #[test]
    fn result_equals_the_second_transform_when_the_first_fails() {
        let mut map = CommandMap::new();
        map.bind(
            "insert-paragraph",
            "Enter",
            vec![
                Transform::Custom("fails", always_fails),
                Transform::Custom("marks", marks_doc),
            ],
        );
        let direct = marks_doc(&state()).unwrap();
        let dispatched = map
            .dispatch("insert-paragraph", "Enter", &state())
            .unwrap()
            .unwrap();
        assert_eq!(dispatched, direct);
    }

    #[test]
    fn all_failures_surface_the_last_attempted_error() {
        let mut map = CommandMap::new();
        map.bind(
            "delete-backward",
            "Backspace",
            vec![
                Transform::Custom("first", always_fails),
                Transform::Custom("second", fails_differently),
            ],
        );
        let err = map
            .dispatch("delete-backward", "Backspace", &state())
            .unwrap_err();
        assert_eq!(err, EditError::precondition("second failure"));
    }

    #[test]
    fn failed_dispatch_leaves_the_callers_state_untouched() {
        let mut map = CommandMap::new();
        map.bind("x", "y", vec![Transform::Custom("fails", always_fails)]);
        let before = state();
        let _ = map.dispatch("x", "y", &before);
        assert_eq!(before, state());
    }

    #[test]
    fn lookup_respects_registration_order() {
        let mut map = CommandMap::new();
        map.bind("e", "k", vec![Transform::Custom("first", marks_doc)]);
        map.bind("e", "k", vec![Transform::Custom("shadowed", always_fails)]);
        let transforms = map.lookup("e", "k").unwrap();
        assert_eq!(transforms[0].name(), "first");
    }

    #[test]
    fn builtin_transforms_have_stable_names() {
        assert_eq!(Transform::SplitListItem.name(), "split-list-item");
        assert_eq!(Transform::LiftListItem.name(), "lift-list-item");
        assert_eq!(Transform::WrapInOrderedList.name(), "wrap-in-ordered-list");
    }
}
