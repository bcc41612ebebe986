// Input plumbing
//
// The only asynchronous boundary in the system: an external transport (in the
// full demo, a BLE sword controller) pushes numeric codes at arbitrary
// real-world cadence. The debouncer stages them; the frame loop consumes at
// most one per quiet window on its own schedule.

pub mod debounce;

pub use debounce::Debouncer;
