// Simulation harness: builds the scenario and drives the per-tick loop

use serde::{Deserialize, Serialize};
use std::thread;

use super::boat::Boat;
use super::bottles::BottleField;
use super::config::SimConfig;
use super::controls::{Controls, SensorContext, Telemetry};
use super::pool::Pool;
use super::sensors::{Detector, Gps};
use super::SimError;
use crate::engine::physics::PhysicsWorld;
use crate::engine::TickLoop;

/// Ticks between periodic telemetry log lines
const LOG_INTERVAL: u64 = 60;

/// The per-tick control callback
///
/// Any `FnMut(&mut Controls)` closure is a control loop.
pub trait ControlLoop {
    fn tick(&mut self, controls: &mut Controls<'_>);
}

impl<F> ControlLoop for F
where
    F: FnMut(&mut Controls<'_>),
{
    fn tick(&mut self, controls: &mut Controls<'_>) {
        self(controls)
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Every bottle was collected
    Cleared { ticks: u64 },
    /// The tick limit was reached first
    TimedOut { ticks: u64 },
}

impl Outcome {
    pub fn ticks(&self) -> u64 {
        match *self {
            Outcome::Cleared { ticks } | Outcome::TimedOut { ticks } => ticks,
        }
    }
}

/// The pool, the boat and the bottles, advanced one tick at a time
pub struct Simulation {
    config: SimConfig,
    physics: PhysicsWorld,
    pool: Pool,
    boat: Boat,
    bottles: BottleField,
    detector: Detector,
    gps: Gps,
    tick: u64,
    finished: bool,
}

impl Simulation {
    /// Validate the configuration and build the scenario
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut physics = PhysicsWorld::new();
        let pool = Pool::new(&config.pool, &mut physics);
        let boat = Boat::new(config.boat.clone(), &mut physics)?;
        let bottles = BottleField::scatter(&config, &mut physics)?;

        log::info!(
            "Simulation ready: {}x{}m pool, {} bottles, {:?} propulsion",
            pool.width(),
            pool.height(),
            bottles.remaining(),
            boat.stats.propulsion
        );

        Ok(Self {
            detector: Detector::from(&config.detector),
            gps: Gps::new(config.geo_origin),
            config,
            physics,
            pool,
            boat,
            bottles,
            tick: 0,
            finished: false,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn boat(&self) -> &Boat {
        &self.boat
    }

    pub fn bottles(&self) -> &BottleField {
        &self.bottles
    }

    /// Mutable access to the bottle field and physics world, for custom scenarios
    pub fn bottles_mut(&mut self) -> (&mut BottleField, &mut PhysicsWorld) {
        (&mut self.bottles, &mut self.physics)
    }

    /// Ticks completed so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds elapsed
    pub fn time(&self) -> f32 {
        self.tick as f32 * self.physics.timestep()
    }

    /// Snapshot of what the boat senses right now
    pub fn telemetry(&self) -> Result<Telemetry, SimError> {
        let sensors = SensorContext {
            physics: &self.physics,
            bottles: &self.bottles,
            detector: &self.detector,
            gps: &self.gps,
            tick: self.tick,
            time: self.time(),
        };
        Telemetry::capture(&self.boat, &sensors)
    }

    /// The end state reached so far, if any
    pub fn outcome(&self) -> Option<Outcome> {
        if self.bottles.is_empty() {
            Some(Outcome::Cleared { ticks: self.tick })
        } else if self.tick >= self.config.max_ticks {
            Some(Outcome::TimedOut { ticks: self.tick })
        } else {
            None
        }
    }

    /// Advance one tick: run the control loop, apply thrust, step physics,
    /// pick up touched bottles
    ///
    /// Returns the outcome once the run is over; further calls don't advance.
    pub fn step<C: ControlLoop + ?Sized>(
        &mut self,
        control: &mut C,
    ) -> Result<Option<Outcome>, SimError> {
        if let Some(outcome) = self.outcome() {
            self.announce(outcome);
            return Ok(Some(outcome));
        }

        let telemetry = self.telemetry()?;
        {
            let mut controls = Controls::new(&mut self.boat, telemetry);
            control.tick(&mut controls);
        }

        self.boat.apply_forces(&mut self.physics)?;
        self.physics.step();
        self.tick += 1;

        let events = self.physics.get_collision_events();
        let consumed =
            self.bottles
                .consume_touched(&events, self.boat.collider_handle, &mut self.physics);
        for bottle in consumed {
            self.boat.collect(bottle.weight);
            log::info!(
                "Tick {}: collected bottle {} ({} kg, {} kg total, {} left)",
                self.tick,
                bottle.id,
                bottle.weight,
                self.boat.collected_weight(),
                self.bottles.remaining()
            );
        }

        if self.tick % LOG_INTERVAL == 0 {
            let position = self.boat.position(&self.physics)?;
            log::debug!(
                "Tick {}: boat at ({:.2}, {:.2}) heading {:.1}, {:.2} m/s",
                self.tick,
                position.x,
                position.y,
                self.boat.heading(&self.physics)?,
                self.boat.speed(&self.physics)?
            );
        }

        let outcome = self.outcome();
        if let Some(outcome) = outcome {
            self.announce(outcome);
        }
        Ok(outcome)
    }

    /// Step as fast as possible until the run ends
    pub fn run<C: ControlLoop + ?Sized>(&mut self, control: &mut C) -> Result<Outcome, SimError> {
        loop {
            if let Some(outcome) = self.step(control)? {
                return Ok(outcome);
            }
        }
    }

    /// Step in real time (60 ticks per wall-clock second) until the run ends
    pub fn run_realtime<C: ControlLoop + ?Sized>(
        &mut self,
        control: &mut C,
    ) -> Result<Outcome, SimError> {
        let mut tick_loop = TickLoop::new();
        loop {
            for _ in 0..tick_loop.begin_frame() {
                if let Some(outcome) = self.step(control)? {
                    return Ok(outcome);
                }
            }
            thread::sleep(tick_loop.time_to_next_tick());
        }
    }

    fn announce(&mut self, outcome: Outcome) {
        if self.finished {
            return;
        }
        self.finished = true;
        match outcome {
            Outcome::Cleared { ticks } => log::info!(
                "Pool cleared after {} ticks ({:.1}s), {} kg collected",
                ticks,
                self.time(),
                self.boat.collected_weight()
            ),
            Outcome::TimedOut { ticks } => log::warn!(
                "Tick limit {} reached with {} bottles left",
                ticks,
                self.bottles.remaining()
            ),
        }
    }
}
