//! Ctrl+C handling.
//!
//! The flag is passed explicitly to whoever needs to stop early. Stage C
//! checks it before each file, watch mode between runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route Ctrl+C to this flag. Call once at program start.
    ///
    /// A second Ctrl+C exits right away.
    pub fn install_handler(&self) -> anyhow::Result<()> {
        let flag = Arc::clone(&self.0);
        ctrlc::set_handler(move || {
            if flag.swap(true, Ordering::SeqCst) {
                std::process::exit(130);
            }
            crate::log!("svgpress"; "interrupted, finishing files in progress...");
        })
        .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
