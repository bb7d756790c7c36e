//! # Worker Pipeline
//!
//! The long-lived background loops that drive chunk streaming: one worker
//! each for population, edit application, and mesh building. Workers poll
//! their queues and yield when idle (check-and-continue); a blocking queue
//! would be an observably-equivalent substitution at chunk-update
//! granularity.
//!
//! Every loop checks the world's shutdown flag each iteration and exits
//! cooperatively; teardown joins all workers before the shared state is
//! dropped, so no worker ever dereferences a torn-down queue.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::info;

use super::WorldState;

/// Spawns the three pipeline workers against a shared world state.
///
/// # Panics
/// Panics if the underlying thread creation fails.
pub fn spawn_workers(state: &Arc<WorldState>) -> Vec<JoinHandle<()>> {
    vec![
        spawn_worker("chunk-load", state.clone(), |world| world.load_step()),
        spawn_worker("chunk-update", state.clone(), |world| {
            let applied = world.apply_modifications();
            let updated = world.update_step();
            applied || updated
        }),
        spawn_worker("chunk-mesh", state.clone(), |world| world.render_step()),
    ]
}

/// Spawns one named worker loop running `step` until shutdown.
///
/// `step` returns whether it made progress; an idle iteration yields the
/// core instead of spinning hot on the queue lock.
fn spawn_worker(
    name: &str,
    state: Arc<WorldState>,
    step: impl Fn(&WorldState) -> bool + Send + 'static,
) -> JoinHandle<()> {
    let thread_name = name.to_string();
    thread::Builder::new()
        .name(thread_name.clone())
        .spawn(move || {
            info!("{thread_name} worker started");
            while !state.is_shutdown() {
                if !step(&state) {
                    thread::yield_now();
                }
            }
            info!("{thread_name} worker stopped");
        })
        .unwrap()
}
