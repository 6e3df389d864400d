//! Monitor arbitrating the chopsticks around the table and the single talk permit.
//!
//! Chopsticks are never represented directly. Philosopher `i` holds both of its
//! chopsticks exactly when `states[i] == Eating`, and a philosopher only flips to
//! `Eating` while neither neighbour is eating, so a chopstick can never be granted
//! one at a time.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use log::{debug, trace};

use crate::error::{Error, Result};

/// What a philosopher is doing, as far as the chopsticks are concerned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum State {
    #[default]
    Thinking,
    Hungry,
    Eating,
}

/// How a blocking call came back.
///
/// A cancellation delivered while the caller waited does not abort the wait. The call
/// still completes its acquisition and reports the cancellation here.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resumed {
    Clean,
    Interrupted,
}

impl Resumed {
    pub fn is_interrupted(self) -> bool {
        self == Resumed::Interrupted
    }
}

// Everything below is only touched with the mutex held.
#[derive(Debug)]
struct Table {
    states: Vec<State>,
    talking: bool,
    // cancellations delivered but not yet reported to their philosopher
    interrupts: Vec<bool>,
}

impl Table {
    fn new(n: usize) -> Self {
        Table {
            states: vec![State::Thinking; n],
            talking: false,
            interrupts: vec![false; n],
        }
    }

    fn left(&self, id: usize) -> usize {
        let n = self.states.len();
        (id + n - 1) % n
    }

    fn right(&self, id: usize) -> usize {
        (id + 1) % self.states.len()
    }

    fn can_eat(&self, id: usize) -> bool {
        self.states[id] == State::Hungry
            && self.states[self.left(id)] != State::Eating
            && self.states[self.right(id)] != State::Eating
    }
}

struct Inner {
    table: Mutex<Table>,
    // shared by chopstick and talk waiters; every waiter re-tests its own condition
    cond: Condvar,
}

/// Shared handle to the monitor. Clones refer to the same table.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<Inner>,
    len: usize,
}

impl Monitor {
    pub fn new(n: usize) -> Result<Self> {
        if n < 1 {
            return Err(Error::NoActors);
        }
        Ok(Monitor {
            inner: Arc::new(Inner {
                table: Mutex::new(Table::new(n)),
                cond: Condvar::new(),
            }),
            len: n,
        })
    }

    /// Number of philosophers seated at the table.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn left_of(&self, id: usize) -> usize {
        self.check(id);
        (id + self.len - 1) % self.len
    }

    pub fn right_of(&self, id: usize) -> usize {
        self.check(id);
        (id + 1) % self.len
    }

    /// Blocks until philosopher `id` may hold both of its chopsticks, then marks it
    /// as eating.
    pub fn pick_up(&self, id: usize) -> Resumed {
        self.check(id);
        let mut table = self.lock();
        table.states[id] = State::Hungry;
        trace!("philosopher {id} is hungry");

        let (mut table, resumed) = self.wait_until(table, id, |t| t.can_eat(id));
        table.states[id] = State::Eating;
        debug!("philosopher {id} picks up chopsticks");
        resumed
    }

    /// The caller must currently be eating; this is not checked.
    pub fn put_down(&self, id: usize) {
        self.check(id);
        let mut table = self.lock();
        table.states[id] = State::Thinking;
        debug!("philosopher {id} puts down chopsticks");
        self.inner.cond.notify_all();
    }

    /// Blocks until nobody holds the talk permit, then takes it.
    ///
    /// `id` only routes cancellations to the waiting caller. The monitor does not
    /// remember who holds the permit.
    pub fn request_talk(&self, id: usize) -> Resumed {
        self.check(id);
        let table = self.lock();
        let (mut table, resumed) = self.wait_until(table, id, |t| !t.talking);
        table.talking = true;
        debug!("philosopher {id} is now talking");
        resumed
    }

    /// The caller must currently hold the talk permit; this is not checked.
    pub fn end_talk(&self) {
        let mut table = self.lock();
        table.talking = false;
        debug!("talk permit released");
        self.inner.cond.notify_all();
    }

    /// Delivers a cancellation to philosopher `id`.
    ///
    /// If it is waiting, it keeps waiting and its blocking call reports
    /// [`Resumed::Interrupted`] once it completes. Otherwise the cancellation stays
    /// pending for its next blocking call or [`Monitor::take_interrupt`].
    pub fn interrupt(&self, id: usize) {
        self.check(id);
        let mut table = self.lock();
        table.interrupts[id] = true;
        trace!("philosopher {id} interrupted");
        self.inner.cond.notify_all();
    }

    /// Clears and returns the pending cancellation for `id`.
    pub fn take_interrupt(&self, id: usize) -> bool {
        self.check(id);
        let mut table = self.lock();
        std::mem::replace(&mut table.interrupts[id], false)
    }

    pub fn state_of(&self, id: usize) -> State {
        self.check(id);
        self.lock().states[id]
    }

    /// Every philosopher's state, read under a single acquisition of the lock.
    pub fn snapshot(&self) -> Vec<State> {
        self.lock().states.clone()
    }

    pub fn is_talking(&self) -> bool {
        self.lock().talking
    }

    fn check(&self, id: usize) {
        assert!(
            id < self.len,
            "philosopher {id} is not seated at a table of {}",
            self.len
        );
    }

    // Nothing panics while the guard is held, so a poisoned table is still consistent.
    fn lock(&self) -> MutexGuard<'_, Table> {
        self.inner.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait_until<'a, F>(
        &'a self,
        mut table: MutexGuard<'a, Table>,
        id: usize,
        ready: F,
    ) -> (MutexGuard<'a, Table>, Resumed)
    where
        F: Fn(&Table) -> bool,
    {
        let mut resumed = Resumed::Clean;
        loop {
            // absorb the cancellation and keep waiting; it is reported on return
            if std::mem::replace(&mut table.interrupts[id], false) {
                resumed = Resumed::Interrupted;
            }
            if ready(&table) {
                return (table, resumed);
            }
            table = self
                .inner
                .cond
                .wait(table)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use State::{Eating, Hungry, Thinking};

    fn table(states: &[State]) -> Table {
        Table {
            states: states.to_vec(),
            talking: false,
            interrupts: vec![false; states.len()],
        }
    }

    #[test]
    fn test_can_eat() {
        let t = table(&[Eating, Hungry, Thinking, Hungry, Thinking]);
        // 1 sits next to an eater
        assert!(!t.can_eat(1));
        assert!(t.can_eat(3));
        // thinking philosophers never qualify
        assert!(!t.can_eat(2));
    }

    #[test]
    fn test_can_eat_wraps_around() {
        let t = table(&[Hungry, Thinking, Thinking, Thinking, Eating]);
        assert_eq!(t.left(0), 4);
        assert_eq!(t.right(4), 0);
        assert!(!t.can_eat(0));
    }

    #[test]
    fn test_lone_philosopher() {
        let t = table(&[Hungry]);
        assert_eq!(t.left(0), 0);
        assert_eq!(t.right(0), 0);
        assert!(t.can_eat(0));

        let m = Monitor::new(1).unwrap();
        assert_eq!(m.pick_up(0), Resumed::Clean);
        assert_eq!(m.state_of(0), Eating);
        m.put_down(0);
        assert_eq!(m.state_of(0), Thinking);
    }

    #[test]
    fn test_no_actors() {
        assert!(matches!(Monitor::new(0), Err(Error::NoActors)));
    }

    #[test]
    fn test_neighbours() {
        let m = Monitor::new(5).unwrap();
        assert_eq!(m.len(), 5);
        assert_eq!(m.left_of(0), 4);
        assert_eq!(m.right_of(0), 1);
        assert_eq!(m.left_of(3), 2);
        assert_eq!(m.right_of(4), 0);
    }

    #[test]
    #[should_panic(expected = "not seated")]
    fn test_out_of_range() {
        let m = Monitor::new(3).unwrap();
        let _ = m.pick_up(3);
    }

    #[test]
    fn test_pending_interrupt_reported_once() {
        let m = Monitor::new(3).unwrap();
        m.interrupt(1);
        assert_eq!(m.pick_up(1), Resumed::Interrupted);
        m.put_down(1);
        assert_eq!(m.pick_up(1), Resumed::Clean);
        m.put_down(1);

        m.interrupt(2);
        assert!(m.take_interrupt(2));
        assert!(!m.take_interrupt(2));
        assert_eq!(m.request_talk(2), Resumed::Clean);
        assert!(m.is_talking());
        m.end_talk();
        assert!(!m.is_talking());
    }

    #[test]
    fn test_snapshot() {
        let m = Monitor::new(4).unwrap();
        let _ = m.pick_up(0);
        let _ = m.pick_up(2);
        assert_eq!(m.snapshot(), vec![Eating, Thinking, Eating, Thinking]);
    }
}
