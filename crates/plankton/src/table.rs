//! Dense `(state, trigger) -> transition` lookup shared by both automata.
//!
//! Tables are assembled by `const fn` into `static` items, so they are built
//! once at compile time and read concurrently without synchronization.
//! Indices are enum ordinals (`State::Key as usize`); an empty cell means the
//! trigger is not accepted in that state.

/// Where the automaton goes next and which side effect it performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transition<N, A> {
    pub(crate) next: N,
    pub(crate) action: Option<A>,
}

#[derive(Debug)]
pub(crate) struct TransitionTable<N: Copy, A: Copy, const STATES: usize, const TRIGGERS: usize> {
    cells: [[Option<Transition<N, A>>; TRIGGERS]; STATES],
}

impl<N: Copy, A: Copy, const STATES: usize, const TRIGGERS: usize>
    TransitionTable<N, A, STATES, TRIGGERS>
{
    pub(crate) const fn new() -> Self {
        Self {
            cells: [[None; TRIGGERS]; STATES],
        }
    }

    /// Adds a transition that performs `action`.
    pub(crate) const fn on(mut self, from: usize, trigger: usize, next: N, action: A) -> Self {
        self.cells[from][trigger] = Some(Transition {
            next,
            action: Some(action),
        });
        self
    }

    /// Adds a transition that only changes state.
    pub(crate) const fn to(mut self, from: usize, trigger: usize, next: N) -> Self {
        self.cells[from][trigger] = Some(Transition { next, action: None });
        self
    }

    #[inline]
    pub(crate) fn get(&self, from: usize, trigger: usize) -> Option<Transition<N, A>> {
        self.cells[from][trigger]
    }

    /// Ordinals of the triggers accepted in `from`, ascending.
    pub(crate) fn accepted(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        self.cells[from]
            .iter()
            .enumerate()
            .filter_map(|(trigger, cell)| cell.map(|_| trigger))
    }
}
