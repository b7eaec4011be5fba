//! # Column Step Engine
//!
//! The deterministic state machine behind the walkthrough. Given an exercise
//! and a step counter it computes the column sum, the digit to write and the
//! carry pushed into the next column, in fixed order units → tens → hundreds.
//!
//! ```text
//! step:     S0 ──────────▶ S1 ──────────▶ S2 ──────────▶ S3 (terminal)
//!           units          tens           hundreds       completed
//!           sum%10 + carry sum%10 + carry full sum       advance() = no-op
//! ```
//!
//! Two step granularities exist, reproducing both historical variants of the
//! tutor: `Column` resolves one column per advance (3 steps), `Micro` splits
//! each column into an announce phase and a commit phase (6 steps). Announce
//! phases only bump the counter — the shown sum is derived on demand, never
//! stored — so both granularities produce identical digits and carries.
//!
//! No I/O here. Persistence and narration are driven by the reducer's
//! effects; the engine is plain data plus transitions.

use std::collections::HashMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::catalog::{Catalog, Exercise};
use crate::core::digits::Column;

/// How finely a walkthrough is sliced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One advance resolves one column: 3 steps per exercise.
    #[default]
    Column,
    /// Each column splits into announce + commit: 6 steps per exercise.
    Micro,
}

impl Granularity {
    pub fn total_steps(self) -> u8 {
        match self {
            Granularity::Column => 3,
            Granularity::Micro => 6,
        }
    }

    /// Steps per resolved column.
    fn steps_per_column(self) -> u8 {
        match self {
            Granularity::Column => 1,
            Granularity::Micro => 2,
        }
    }

    /// Converts a step count recorded under `self` into the equivalent count
    /// under `target`, rounding down to a commit boundary so a replay never
    /// lands mid-column.
    pub fn convert_step(self, step: u8, target: Granularity) -> u8 {
        let columns_done = step / self.steps_per_column();
        columns_done * target.steps_per_column()
    }
}

/// Per-exercise progress, owned by the engine.
///
/// `carries` and `answers` are positional (`[hundreds, tens, units]`).
/// `None` means "not yet computed"; `Some(0)` means "computed, nothing to
/// carry" — the two are deliberately distinct so the display can show a
/// small `+0` moment instead of silently showing nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExerciseState {
    pub step: u8,
    pub carries: [Option<u8>; 3],
    pub answers: [Option<u8>; 3],
    pub completed: bool,
}

impl ExerciseState {
    /// Carry feeding `column`. Units has no feeder, so it reads as 0.
    pub fn carry_into(&self, column: Column) -> u8 {
        self.carries[column.index()].unwrap_or(0)
    }

    /// The full answer once every column is resolved.
    pub fn resolved_result(&self) -> Option<u16> {
        match self.answers {
            [Some(h), Some(t), Some(u)] => Some(100 * h as u16 + 10 * t as u16 + u as u16),
            _ => None,
        }
    }
}

/// One column's addition, spelled out for presentation: both operand
/// digits, the carry that fed the column, and their total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSum {
    pub column: Column,
    pub d1: u8,
    pub d2: u8,
    pub carry_in: u8,
    pub sum: u8,
}

/// What a single `advance()` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Micro granularity only: the column sum was announced but not written.
    Announced(ColumnSum),
    /// A column was resolved: `digit` written, `carry` pushed left.
    /// For the hundreds column `digit` is the full sum and `carry` is 0.
    Resolved { sum: ColumnSum, digit: u8, carry: u8 },
    /// The exercise was already complete; nothing changed.
    AlreadyComplete,
}

/// The state machine over a catalog of exercises.
pub struct Engine {
    catalog: Catalog,
    granularity: Granularity,
    /// Lazily populated: an entry appears on first mutation, not on viewing.
    states: HashMap<usize, ExerciseState>,
    current: usize,
}

impl Engine {
    pub fn new(catalog: Catalog, granularity: Granularity) -> Self {
        Self {
            catalog,
            granularity,
            states: HashMap::new(),
            current: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_exercise(&self) -> Exercise {
        self.catalog.get(self.current)
    }

    /// Snapshot of an exercise's progress. Viewing never mutates: an
    /// untouched exercise reads as the initial state without being created.
    pub fn state(&self, index: usize) -> ExerciseState {
        self.states.get(&index).cloned().unwrap_or_default()
    }

    pub fn current_state(&self) -> ExerciseState {
        self.state(self.current)
    }

    /// Moves to exercise `index`, clamped to the catalog bounds.
    /// Returns the index actually selected. No `ExerciseState` changes.
    pub fn goto(&mut self, index: usize) -> usize {
        self.current = index.min(self.catalog.len() - 1);
        self.current
    }

    /// Installs a reconstructed state (progress replay on startup).
    pub fn restore(&mut self, index: usize, state: ExerciseState) {
        if index < self.catalog.len() {
            self.states.insert(index, state);
        }
    }

    /// Installs a whole batch of reconstructed states.
    pub fn restore_all(&mut self, states: HashMap<usize, ExerciseState>) {
        for (index, state) in states {
            self.restore(index, state);
        }
    }

    /// Every exercise state touched so far, for persistence.
    pub fn states_snapshot(&self) -> &HashMap<usize, ExerciseState> {
        &self.states
    }

    /// Executes the next step of the current exercise.
    pub fn advance(&mut self) -> StepOutcome {
        let exercise = self.catalog.get(self.current);
        let state = self.states.entry(self.current).or_default();
        advance_state(exercise, state, self.granularity)
    }

    /// Forces exercise `index` back to its initial state.
    pub fn reset(&mut self, index: usize) {
        if index < self.catalog.len() {
            self.states.insert(index, ExerciseState::default());
        }
    }

    /// Resolves every exercise in one shot (instructor shortcut). Runs the
    /// same transition as `advance()` in a loop, so the resulting states are
    /// identical to stepping through by hand.
    pub fn solve_all(&mut self) {
        for index in 0..self.catalog.len() {
            let exercise = self.catalog.get(index);
            let state = self.states.entry(index).or_default();
            while !state.completed {
                advance_state(exercise, state, self.granularity);
            }
        }
    }

    /// Pure reconstruction: a fresh state advanced `steps` times. Used by
    /// the progress adapter so every loaded state is self-consistent with
    /// what the engine itself would have produced.
    pub fn replayed(exercise: Exercise, steps: u8, granularity: Granularity) -> ExerciseState {
        let mut state = ExerciseState::default();
        for _ in 0..steps {
            if advance_state(exercise, &mut state, granularity) == StepOutcome::AlreadyComplete {
                break;
            }
        }
        state
    }
}

/// Digits of both operands at `column`. Defined for any operand pair the
/// catalog can hold; validation has already rejected anything above 999.
fn digit_pair(exercise: Exercise, column: Column) -> (u8, u8) {
    let place = match column {
        Column::Units => (exercise.num1 % 10, exercise.num2 % 10),
        Column::Tens => (exercise.num1 % 100 / 10, exercise.num2 % 100 / 10),
        Column::Hundreds => (exercise.num1 / 100, exercise.num2 / 100),
    };
    (place.0 as u8, place.1 as u8)
}

/// The single transition function, shared by `advance`, `solve_all` and
/// `replayed` so they cannot diverge.
fn advance_state(
    exercise: Exercise,
    state: &mut ExerciseState,
    granularity: Granularity,
) -> StepOutcome {
    if state.completed || state.step >= granularity.total_steps() {
        return StepOutcome::AlreadyComplete;
    }

    let column_position = state.step / granularity.steps_per_column();
    let column = match Column::nth(column_position as usize) {
        Some(c) => c,
        None => return StepOutcome::AlreadyComplete,
    };

    let (d1, d2) = digit_pair(exercise, column);
    let carry_in = state.carry_into(column);
    let column_sum = ColumnSum {
        column,
        d1,
        d2,
        carry_in,
        sum: d1 + d2 + carry_in,
    };
    let total = column_sum.sum;

    // Micro announce phase: show the sum, commit nothing.
    if granularity == Granularity::Micro && state.step % 2 == 0 {
        state.step += 1;
        return StepOutcome::Announced(column_sum);
    }

    let (digit, carry) = match column.carry_target() {
        Some(target) => {
            // Exactly one carry unit per overflowing column sum.
            let digit = total % 10;
            let carry = total / 10;
            state.answers[column.index()] = Some(digit);
            state.carries[target.index()] = Some(carry);
            (digit, carry)
        }
        None => {
            // Hundreds: the full sum is written, no modulo. The catalog
            // guarantees totals below 1000, so an overflowing hundreds sum
            // is a validation bug, not something to truncate quietly.
            debug_assert!(total < 10, "carry past the hundreds column: sum {total}");
            state.answers[column.index()] = Some(total);
            state.completed = true;
            (total, 0)
        }
    };
    state.step += 1;

    StepOutcome::Resolved {
        sum: column_sum,
        digit,
        carry,
    }
}
