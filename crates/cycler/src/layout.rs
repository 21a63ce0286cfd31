use pipeline::{Host, Orientation};

/// Frames to wait for the viewport to settle before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPolicy {
    /// Deferred re-checks allowed after the first inconsistent reading.
    pub max_attempts: u32,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutOutcome {
    /// Geometry matched; the line height was written.
    Applied { line_height: f32 },
    /// Geometry still lags the orientation; a frame was requested.
    Deferred { attempt: u32 },
    /// Geometry never matched within the policy bound.
    GaveUp { attempts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    orientation: Orientation,
    attempts: u32,
}

/// Centres the button text once the viewport reflects the device orientation.
///
/// At most one retry chain is pending; a newer orientation replaces it.
#[derive(Debug, Default)]
pub struct LayoutAdjuster {
    policy: LayoutPolicy,
    pending: Option<Pending>,
}

impl LayoutAdjuster {
    pub fn new(policy: LayoutPolicy) -> Self {
        Self {
            policy,
            pending: None,
        }
    }

    pub fn policy(&self) -> LayoutPolicy {
        self.policy
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn adjust<H: Host>(&mut self, host: &mut H, orientation: Orientation) -> LayoutOutcome {
        if let Some(previous) = self.pending.take() {
            tracing::debug!(
                previous = previous.orientation.degrees(),
                next = orientation.degrees(),
                "superseding pending layout adjustment"
            );
        }
        self.check(host, orientation, 0)
    }

    /// Resumes a deferred adjustment; no-op when nothing is pending.
    pub fn on_frame<H: Host>(&mut self, host: &mut H) -> Option<LayoutOutcome> {
        let pending = self.pending.take()?;
        Some(self.check(host, pending.orientation, pending.attempts))
    }

    fn check<H: Host>(
        &mut self,
        host: &mut H,
        orientation: Orientation,
        attempts: u32,
    ) -> LayoutOutcome {
        let viewport = host.viewport();
        if !orientation.matches(viewport) {
            if attempts >= self.policy.max_attempts {
                tracing::warn!(
                    orientation = orientation.degrees(),
                    width = viewport.width,
                    height = viewport.height,
                    attempts,
                    "viewport never matched orientation; leaving button layout unchanged"
                );
                return LayoutOutcome::GaveUp { attempts };
            }
            let attempt = attempts + 1;
            tracing::trace!(
                orientation = orientation.degrees(),
                width = viewport.width,
                height = viewport.height,
                attempt,
                "viewport lags orientation; retrying next frame"
            );
            self.pending = Some(Pending {
                orientation,
                attempts: attempt,
            });
            host.request_frame();
            return LayoutOutcome::Deferred { attempt };
        }

        let line_height = host.button_height();
        host.set_button_line_height(line_height);
        tracing::debug!(
            orientation = orientation.degrees(),
            line_height,
            "button text centred"
        );
        LayoutOutcome::Applied { line_height }
    }
}
