// Control module: goal bookkeeping, shared inputs and the periodic decision cycle

pub mod cycle;
pub mod goal;
pub mod output;
pub mod runner;
pub mod shared;

pub use cycle::*;
pub use goal::*;
pub use output::*;
pub use runner::*;
pub use shared::*;
