//! The driver's philosopher: think, eat, maybe talk, repeat.

use std::thread;
use std::time::Duration;

use log::info;
use rand::Rng;

use crate::config::Config;
use crate::monitor::Monitor;

/// What a philosopher got done before leaving the table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: usize,
    pub meals: u64,
    pub talks: u64,
    pub interrupted: bool,
}

pub struct Philosopher {
    id: usize,
    monitor: Monitor,
    config: Config,
}

impl Philosopher {
    pub fn new(id: usize, monitor: Monitor, config: Config) -> Self {
        Philosopher {
            id,
            monitor,
            config,
        }
    }

    /// Runs until the configured number of meals is eaten or a cancellation arrives.
    ///
    /// A cancellation reported by a blocking call is only acted on after the step that
    /// acquired the chopsticks or the permit has released them again.
    pub fn run(self) -> Report {
        let id = self.id;
        let mut rng = rand::thread_rng();
        let mut report = Report {
            id,
            ..Report::default()
        };
        let forever = self.config.meals == 0;

        info!("philosopher {id} sits down");
        while forever || report.meals < self.config.meals {
            if self.monitor.take_interrupt(id) {
                report.interrupted = true;
                break;
            }

            info!("philosopher {id} is thinking");
            pause(&mut rng, self.config.think());

            let resumed = self.monitor.pick_up(id);
            info!("philosopher {id} is eating");
            pause(&mut rng, self.config.eat());
            self.monitor.put_down(id);
            report.meals += 1;
            info!("philosopher {id} has eaten {} meal(s)", report.meals);
            if resumed.is_interrupted() {
                report.interrupted = true;
                break;
            }

            if rng.gen_bool(self.config.talk_chance) {
                let resumed = self.monitor.request_talk(id);
                info!("philosopher {id} is talking");
                pause(&mut rng, self.config.talk());
                self.monitor.end_talk();
                report.talks += 1;
                info!("philosopher {id} stops talking");
                if resumed.is_interrupted() {
                    report.interrupted = true;
                    break;
                }
            }
        }
        info!(
            "philosopher {id} leaves after {} meal(s) and {} talk(s)",
            report.meals, report.talks
        );
        report
    }
}

// Sleeps for a random duration in [1ms, max]; a zero bound does not sleep at all.
fn pause<R: Rng>(rng: &mut R, max: Duration) {
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return;
    }
    thread::sleep(Duration::from_millis(rng.gen_range(1..=max_ms)));
}
