//! The transition table and its lookup.
//!
//! ```text
//!  OFF      ──[Dim]────▶ BLINKING   (pulse once)
//!  OFF      ──[Bright]─▶ ON         (assert on)
//!  BLINKING ──[Bright]─▶ ON         (assert on)
//!  BLINKING ──[Dark]───▶ OFF        (assert off)
//!  ON       ──[Dim]────▶ BLINKING   (pulse once)
//!  ON       ──[Dark]───▶ OFF        (assert off)
//! ```
//!
//! Dense `[State::COUNT][Event::COUNT]` array built at compile time.
//! Indexing by the `repr(u8)` discriminants is always in bounds, so
//! [`lookup`] is total over the closed `(State, Event)` product.

use super::{Action, Event, State, Transition};

const fn cell(action: Action, target: State) -> Option<Transition> {
    Some(Transition::new(action, target))
}

/// Rows are indexed by `State as usize`, columns by `Event as usize`
/// (`None`, `Dark`, `Dim`, `Bright`).
/// The `Event::None` column and every self-transition stay empty.
pub const TRANSITION_TABLE: [[Option<Transition>; Event::COUNT]; State::COUNT] = [
    // Off
    [
        None,
        None,
        cell(Action::PulseOnce, State::Blinking),
        cell(Action::AssertOn, State::On),
    ],
    // Blinking
    [
        None,
        cell(Action::AssertOff, State::Off),
        None,
        cell(Action::AssertOn, State::On),
    ],
    // On
    [
        None,
        cell(Action::AssertOff, State::Off),
        cell(Action::PulseOnce, State::Blinking),
        None,
    ],
];

/// Look up the transition for `(state, event)`.
///
/// Returns `None` for every undefined pair: the caller holds its state
/// and runs no action.
pub fn lookup(state: State, event: Event) -> Option<Transition> {
    TRANSITION_TABLE[state as usize][event as usize]
}

/// Every defined cell as `(source, event, transition)`, row-major.
pub fn defined_transitions() -> impl Iterator<Item = (State, Event, Transition)> {
    State::ALL.into_iter().flat_map(|state| {
        Event::ALL
            .into_iter()
            .filter_map(move |event| lookup(state, event).map(|t| (state, event, t)))
    })
}
