use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use crate::{Error, Result};

static INTERRUPT_FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();

/// Cooperative abort signal for long-running solves.
///
/// A token trips when its shared flag is set (from any clone, or from Ctrl-C
/// for tokens made by [`CancelToken::interruptible`]) or when its deadline
/// passes. The default token never trips.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            flag: Some(Arc::new(AtomicBool::new(false))),
            deadline: None,
        }
    }

    /// Token tied to the process-wide Ctrl-C handler, installed on first use.
    ///
    /// Each call clears an interrupt left over from an earlier solve, so only
    /// a Ctrl-C pressed after this point cancels the new token.
    pub fn interruptible() -> Self {
        let flag = interrupt_flag();
        flag.store(false, Ordering::Relaxed);
        Self {
            flag: Some(Arc::clone(flag)),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// A limit too large to represent as an `Instant` leaves the token without
    /// a deadline.
    pub fn with_time_limit(self, limit: Duration) -> Self {
        match Instant::now().checked_add(limit) {
            Some(deadline) => self.with_deadline(deadline),
            None => {
                log::warn!("cancel: time limit {limit:?} out of range, solving without deadline");
                self
            }
        }
    }

    pub fn cancel(&self) {
        if let Some(flag) = &self.flag {
            flag.store(true, Ordering::Relaxed);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled("cancel requested".to_string()));
        }
        if self.is_expired() {
            return Err(Error::Cancelled("deadline exceeded".to_string()));
        }
        Ok(())
    }
}

fn interrupt_flag() -> &'static Arc<AtomicBool> {
    INTERRUPT_FLAG.get_or_init(|| {
        let flag = Arc::new(AtomicBool::new(false));
        let handler_flag = Arc::clone(&flag);
        if let Err(err) = ctrlc::set_handler(move || {
            handler_flag.store(true, Ordering::Relaxed);
        }) {
            log::warn!("cancel: failed to install interrupt handler err={err}");
        }
        flag
    })
}
