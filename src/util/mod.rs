pub mod alphabet;
pub mod logging;
