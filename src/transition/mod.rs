/// Transition parameters and variant identity.
pub mod descriptor;
/// Phase plan and the two-phase orchestrator.
pub mod phase;
