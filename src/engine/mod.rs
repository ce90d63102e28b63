// Engine modules: physics binding and tick pacing

pub mod physics;
pub mod tick_loop;

pub use tick_loop::TickLoop;
