//! Error boundary: captures the first fault raised while rendering or handling
//! an event and keeps the subtree in its fallback state from then on.

use crate::lifecycle::Component;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::error;

/// Failure raised inside a component, either returned or from a panic
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RenderFault {
    message: String,
}

impl RenderFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn message(&self) -> &str {
        &self.message
    }

    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self { message }
    }
}

/// Where the fault surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPhase {
    Render,
    Event,
}

impl fmt::Display for FaultPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultPhase::Render => f.write_str("render"),
            FaultPhase::Event => f.write_str("event"),
        }
    }
}

/// Context passed to `Component::did_catch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub component: &'static str,
    pub phase: FaultPhase,
}

#[derive(Debug, Default)]
pub struct Boundary {
    fault: Option<RenderFault>,
}

impl Boundary {
    #[cfg(test)]
    pub fn fault(&self) -> Option<&RenderFault> {
        self.fault.as_ref()
    }

    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    /// Run `f` against `component`. Returns false if a fault was captured now
    /// or earlier, in which case `f` is not run at all.
    pub fn guard<C, F>(&mut self, component: &mut C, phase: FaultPhase, f: F) -> bool
    where
        C: Component,
        F: FnOnce(&mut C) -> Result<(), RenderFault>,
    {
        if self.fault.is_some() {
            return false;
        }

        let fault = match panic::catch_unwind(AssertUnwindSafe(|| f(&mut *component))) {
            Ok(Ok(())) => return true,
            Ok(Err(fault)) => fault,
            Err(payload) => RenderFault::from_panic(payload),
        };

        let info = ErrorInfo {
            component: std::any::type_name::<C>(),
            phase,
        };
        error!(error = %fault, component = info.component, phase = %phase, "Fault captured by boundary");

        component.derive_state_from_error(&fault);
        component.did_catch(&fault, &info);
        self.fault = Some(fault);
        false
    }
}
