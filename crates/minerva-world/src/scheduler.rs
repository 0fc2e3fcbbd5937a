//! Ordered system scheduling with per-system substeps.

use crate::world::World;

/// A physics subsystem driven by the scheduler.
///
/// Implementations mutate their slice of the world state (rigid bodies or
/// MD particles) and must be re-entrant across world steps. They never
/// touch `world.time`; the world advances it after the tick.
pub trait System {
    /// Stable identifier for logging and diagnostics.
    fn name(&self) -> &str;

    /// Advance the relevant portion of world state by `dt`.
    fn step(&mut self, world: &mut World, dt: f64);
}

struct Entry {
    system: Box<dyn System>,
    substeps: usize,
}

/// Runs registered systems in insertion order.
///
/// Each entry's substep count divides the world timestep: `tick(world, dt)`
/// calls `system.step(world, dt / substeps)` exactly `substeps` times.
#[derive(Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a system with a single substep.
    pub fn add(&mut self, system: Box<dyn System>) {
        self.add_with_substeps(system, 1);
    }

    /// Append a system that runs `substeps` times per tick.
    pub fn add_with_substeps(&mut self, system: Box<dyn System>, substeps: usize) {
        debug_assert!(substeps >= 1);
        log::debug!(
            "scheduler: registered {} (substeps={})",
            system.name(),
            substeps
        );
        self.entries.push(Entry { system, substeps });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every entry once, in order.
    pub fn tick(&mut self, world: &mut World, dt: f64) {
        for entry in &mut self.entries {
            let substeps = entry.substeps.max(1);
            let local_dt = dt / substeps as f64;
            for _ in 0..substeps {
                entry.system.step(world, local_dt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every step call into a shared log.
    struct Recorder {
        label: &'static str,
        log: Rc<RefCell<Vec<(&'static str, f64)>>>,
    }

    impl System for Recorder {
        fn name(&self) -> &str {
            self.label
        }

        fn step(&mut self, _world: &mut World, dt: f64) {
            self.log.borrow_mut().push((self.label, dt));
        }
    }

    #[test]
    fn test_insertion_order_and_substep_dt() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::new();
        let mut scheduler = Scheduler::new();

        scheduler.add_with_substeps(
            Box::new(Recorder {
                label: "a",
                log: Rc::clone(&log),
            }),
            2,
        );
        scheduler.add(Box::new(Recorder {
            label: "b",
            log: Rc::clone(&log),
        }));

        scheduler.tick(&mut world, 1.0);

        let calls = log.borrow();
        assert_eq!(calls.as_slice(), &[("a", 0.5), ("a", 0.5), ("b", 1.0)]);
    }

    #[test]
    fn test_empty_scheduler_is_noop() {
        let mut world = World::new();
        let mut scheduler = Scheduler::new();
        scheduler.tick(&mut world, 0.1);
        assert!(scheduler.is_empty());
    }
}
