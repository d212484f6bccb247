// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "rename/mod.rs"]
pub mod rename;
