//! Built-in action providers.
//!
//! These power tests, benches, and demos; anything interactive lives
//! outside the engine behind the same [`ActionProvider`] port.

use std::collections::{HashMap, VecDeque};

use enum_dispatch::enum_dispatch;

use super::betting::{Action, ActionProvider, TurnPrompt};
use super::entities::SeatIndex;

/// Plays a prepared sequence of actions per seat. Once a seat's script
/// runs out (or was never written) it plays passively: check when
/// possible, call when necessary, fold otherwise.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    scripts: HashMap<SeatIndex, VecDeque<Action>>,
}

impl ScriptedProvider {
    pub fn new<I>(scripts: I) -> Self
    where
        I: IntoIterator<Item = (SeatIndex, Vec<Action>)>,
    {
        Self {
            scripts: scripts
                .into_iter()
                .map(|(seat, actions)| (seat, actions.into()))
                .collect(),
        }
    }
}

impl ActionProvider for ScriptedProvider {
    fn act(&mut self, prompt: &TurnPrompt) -> Action {
        if let Some(script) = self.scripts.get_mut(&prompt.seat)
            && let Some(action) = script.pop_front()
        {
            return action;
        }
        passive_action(prompt)
    }
}

/// Checks when it can, calls when it must, folds when it cannot call.
#[derive(Clone, Copy, Debug, Default)]
pub struct CallingProvider;

impl ActionProvider for CallingProvider {
    fn act(&mut self, prompt: &TurnPrompt) -> Action {
        passive_action(prompt)
    }
}

/// Folds to any live stake and checks everything else down.
#[derive(Clone, Copy, Debug, Default)]
pub struct FoldingProvider;

impl ActionProvider for FoldingProvider {
    fn act(&mut self, prompt: &TurnPrompt) -> Action {
        if prompt.choices.contains(&Action::Check) {
            Action::Check
        } else {
            Action::Fold
        }
    }
}

/// The built-in providers united for zero-cost dispatch.
#[enum_dispatch(ActionProvider)]
#[derive(Debug)]
pub enum TableProvider {
    Scripted(ScriptedProvider),
    Calling(CallingProvider),
    Folding(FoldingProvider),
}

fn passive_action(prompt: &TurnPrompt) -> Action {
    if prompt.choices.contains(&Action::Check) {
        Action::Check
    } else if prompt.choices.contains(&Action::Call) {
        Action::Call
    } else {
        Action::Fold
    }
}
