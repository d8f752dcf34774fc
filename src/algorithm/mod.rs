/// Catalog interface shared by every generation mode and the propagator table
pub mod catalog;
/// Generation driver and state machine
pub mod executor;
/// Arc-consistency propagation of pending bans
pub mod propagation;
/// Minimum-entropy cell selection and weighted collapse
pub mod selection;
/// Per-run generation state
pub mod wave;
