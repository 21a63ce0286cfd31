use crate::PipelineError;

type OnLoaded<C> = Box<dyn FnOnce(&mut C) -> Result<(), PipelineError>>;

/// Defers activation until the host runtime reports it has loaded.
///
/// If the host is already loaded when a callback is registered it runs
/// immediately; otherwise it is queued and runs on
/// [`Readiness::signal_loaded`] in registration order. Each callback runs at
/// most once.
pub struct Readiness<C> {
    loaded: bool,
    pending: Vec<OnLoaded<C>>,
}

impl<C> Readiness<C> {
    pub fn new(already_loaded: bool) -> Self {
        Self {
            loaded: already_loaded,
            pending: Vec::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_waiting(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn when_loaded<F>(&mut self, context: &mut C, on_loaded: F) -> Result<(), PipelineError>
    where
        F: FnOnce(&mut C) -> Result<(), PipelineError> + 'static,
    {
        if self.loaded {
            tracing::debug!("host already loaded; activating immediately");
            return on_loaded(context);
        }
        self.pending.push(Box::new(on_loaded));
        tracing::debug!(
            queued = self.pending.len(),
            "host still loading; waiting for loaded signal"
        );
        Ok(())
    }

    /// Marks the host loaded and runs queued callbacks.
    ///
    /// Stops at the first failing callback; callbacks queued after it are
    /// dropped.
    pub fn signal_loaded(&mut self, context: &mut C) -> Result<(), PipelineError> {
        self.loaded = true;
        let pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            tracing::debug!(callbacks = pending.len(), "host loaded; activating");
        }
        for on_loaded in pending {
            on_loaded(context)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_immediately_when_loaded() {
        let mut readiness = Readiness::new(true);
        let mut calls = 0u32;
        readiness
            .when_loaded(&mut calls, |calls| {
                *calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, 1);
        readiness.signal_loaded(&mut calls).unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn waits_for_signal_and_fires_once() {
        let mut readiness = Readiness::new(false);
        let mut calls = 0u32;
        readiness
            .when_loaded(&mut calls, |calls| {
                *calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, 0);
        assert!(readiness.is_waiting());

        readiness.signal_loaded(&mut calls).unwrap();
        readiness.signal_loaded(&mut calls).unwrap();
        assert_eq!(calls, 1);
        assert!(readiness.is_loaded());
    }

    #[test]
    fn queues_every_callback_registered_before_load() {
        let mut readiness = Readiness::new(false);
        let mut order: Vec<&str> = Vec::new();
        readiness
            .when_loaded(&mut order, |order| {
                order.push("canvas");
                Ok(())
            })
            .unwrap();
        readiness
            .when_loaded(&mut order, |order| {
                order.push("button");
                Ok(())
            })
            .unwrap();
        assert!(order.is_empty());

        readiness.signal_loaded(&mut order).unwrap();
        assert_eq!(order, vec!["canvas", "button"]);
        assert!(!readiness.is_waiting());

        readiness.signal_loaded(&mut order).unwrap();
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn propagates_activation_errors() {
        let mut readiness = Readiness::new(false);
        let mut unit = ();
        readiness
            .when_loaded(&mut unit, |_| Err(PipelineError::NotRunning))
            .unwrap();
        assert_eq!(
            readiness.signal_loaded(&mut unit),
            Err(PipelineError::NotRunning)
        );
    }
}
