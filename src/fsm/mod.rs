//! Table-driven finite state machine for the ambient-light indicator.
//!
//! Classic embedded FSM pattern, expressed as data rather than function
//! pointers:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  TRANSITION_TABLE  [State::COUNT][Event::COUNT]              │
//! │  ┌──────────┬──────┬──────────────┬──────────────┬─────────┐ │
//! │  │          │ None │ Dark         │ Dim          │ Bright  │ │
//! │  ├──────────┼──────┼──────────────┼──────────────┼─────────┤ │
//! │  │ Off      │  —   │  —           │ Pulse→Blink  │ On→On   │ │
//! │  │ Blinking │  —   │ Off→Off      │  —           │ On→On   │ │
//! │  │ On       │  —   │ Off→Off      │ Pulse→Blink  │  —      │ │
//! │  └──────────┴──────┴──────────────┴──────────────┴─────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each cell is an `Option<Transition>`: the [`Action`] tag the actuator
//! must execute and the target [`State`] committed afterwards.  Empty
//! cells are a defined "no change, no action" outcome, so a lookup can
//! never fault.  The sample → [`Event`] mapping lives in [`classifier`].

pub mod classifier;
pub mod table;

pub use classifier::{Classifier, Thresholds, classify};
pub use table::{defined_transitions, lookup};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Indicator control mode.  Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum State {
    Off = 0,
    Blinking = 1,
    On = 2,
}

impl State {
    /// Total number of states; sizes the table's outer dimension.
    pub const COUNT: usize = 3;

    /// Every state, in discriminant order.
    pub const ALL: [State; State::COUNT] = [State::Off, State::Blinking, State::On];

    /// Convert an index back to `State`.  Out-of-range indices fall back
    /// to `Off`, the safe indicator level.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Off,
            1 => Self::Blinking,
            2 => Self::On,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Off
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Blinking => "Blinking",
            Self::On => "On",
        }
    }

    /// The action that puts the indicator into this state from any other.
    /// Used when a state is forced from outside the table.
    pub const fn entry_action(self) -> Action {
        match self {
            Self::Off => Action::AssertOff,
            Self::Blinking => Action::PulseOnce,
            Self::On => Action::AssertOn,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Discrete light level derived from one sample.
///
/// `None` means "no classification this cycle" (failed read, NaN sample).
/// It indexes a table column that is empty by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Event {
    None = 0,
    Dark = 1,
    Dim = 2,
    Bright = 3,
}

impl Event {
    pub const COUNT: usize = 4;

    pub const ALL: [Event; Event::COUNT] = [Event::None, Event::Dark, Event::Dim, Event::Bright];

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Dark => "Dark",
            Self::Dim => "Dim",
            Self::Bright => "Bright",
        }
    }
}

// ---------------------------------------------------------------------------
// Actions and transitions
// ---------------------------------------------------------------------------

/// Side effect requested from the indicator on a defined transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Drive the indicator to its inactive level.
    AssertOff,
    /// Drive the indicator to its active level.
    AssertOn,
    /// One on/off pulse of configured duration, ending inactive.
    PulseOnce,
}

/// One defined table cell: run `action`, then commit `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub action: Action,
    pub target: State,
}

impl Transition {
    pub const fn new(action: Action, target: State) -> Self {
        Self { action, target }
    }
}
