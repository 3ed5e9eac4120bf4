//! The session state machine gating generation requests.
//!
//! ```text
//! Idle --start--> Analyzing --ok--> Complete
//!                     \--err--> Error
//! Complete | Error --select_asset--> Idle
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::asset::ImageAsset;
use crate::error::{GenerateError, SessionError};
use crate::models::GenerationResult;
use crate::orchestrator::Orchestrator;
use crate::traits::GenerativeService;

#[derive(Debug, Clone)]
pub enum SessionState {
    Idle,
    Analyzing,
    Complete(Arc<GenerationResult>),
    Error(String),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Analyzing => "analyzing",
            SessionState::Complete(_) => "complete",
            SessionState::Error(_) => "error",
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::Analyzing)
    }
}

/// One user's selected asset and the outcome of the last request on it.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    asset: Option<ImageAsset>,
}

impl Default for Session {
    fn default() -> Self {
        Session { state: SessionState::Idle, asset: None }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn asset(&self) -> Option<&ImageAsset> {
        self.asset.as_ref()
    }

    pub fn result(&self) -> Option<&Arc<GenerationResult>> {
        match &self.state {
            SessionState::Complete(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Replaces the asset and discards any previous result or error.
    pub fn select_asset(&mut self, asset: ImageAsset) -> Result<(), SessionError> {
        if self.state.is_busy() {
            return Err(SessionError::Busy);
        }
        self.asset = Some(asset);
        self.transition(SessionState::Idle);
        Ok(())
    }

    /// Idle -> Analyzing. Returns the asset to generate from.
    pub fn start(&mut self) -> Result<ImageAsset, SessionError> {
        match self.state {
            SessionState::Idle => {}
            SessionState::Analyzing => return Err(SessionError::Busy),
            _ => return Err(SessionError::InvalidTransition { action: "start", state: self.state.name() }),
        }
        let asset = self.asset.clone().ok_or(SessionError::NoAsset)?;
        self.transition(SessionState::Analyzing);
        Ok(asset)
    }

    /// Analyzing -> Complete or Error.
    pub fn finish(&mut self, outcome: Result<GenerationResult, GenerateError>) -> Result<(), SessionError> {
        if !self.state.is_busy() {
            return Err(SessionError::InvalidTransition { action: "finish", state: self.state.name() });
        }
        let next = match outcome {
            Ok(result) => SessionState::Complete(Arc::new(result)),
            Err(err) => SessionState::Error(err.to_string()),
        };
        self.transition(next);
        Ok(())
    }

    /// Re-selects the current asset after a failure and starts again.
    pub fn retry(&mut self) -> Result<ImageAsset, SessionError> {
        if !matches!(self.state, SessionState::Error(_)) {
            return Err(SessionError::InvalidTransition { action: "retry", state: self.state.name() });
        }
        let asset = self.asset.clone().ok_or(SessionError::NoAsset)?;
        self.select_asset(asset)?;
        self.start()
    }

    fn transition(&mut self, next: SessionState) {
        tracing::info!(from = self.state.name(), to = next.name(), "session transition");
        self.state = next;
    }
}

/// Shares a [`Session`] between callers and lets one request run at a time.
#[derive(Debug, Default)]
pub struct SessionController {
    session: Mutex<Session>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn select_asset(&self, asset: ImageAsset) -> Result<(), SessionError> {
        self.lock().select_asset(asset)
    }

    /// Generates from the selected asset and returns the resolved state.
    ///
    /// Fails with [`SessionError::Busy`] without issuing a request while
    /// another run is pending. Dropping the returned future mid-request
    /// leaves the session in the Error state.
    pub async fn run<S: GenerativeService>(
        &self,
        orchestrator: &Orchestrator<S>,
    ) -> Result<SessionState, SessionError> {
        let pending = PendingRun::start(self, Session::start)?;
        pending.complete(orchestrator).await
    }

    /// Like [`SessionController::run`], from the Error state.
    pub async fn retry<S: GenerativeService>(
        &self,
        orchestrator: &Orchestrator<S>,
    ) -> Result<SessionState, SessionError> {
        let pending = PendingRun::start(self, Session::retry)?;
        pending.complete(orchestrator).await
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A started request. Finishes the session as cancelled if dropped before
/// the outcome is recorded.
struct PendingRun<'a> {
    controller: &'a SessionController,
    asset: ImageAsset,
    settled: bool,
}

impl<'a> PendingRun<'a> {
    fn start(
        controller: &'a SessionController,
        begin: fn(&mut Session) -> Result<ImageAsset, SessionError>,
    ) -> Result<Self, SessionError> {
        let asset = begin(&mut controller.lock())?;
        Ok(PendingRun { controller, asset, settled: false })
    }

    async fn complete<S: GenerativeService>(
        mut self,
        orchestrator: &Orchestrator<S>,
    ) -> Result<SessionState, SessionError> {
        let outcome = orchestrator.generate(&self.asset).await;
        self.settled = true;
        let controller = self.controller;
        let mut session = controller.lock();
        session.finish(outcome)?;
        Ok(session.state.clone())
    }
}

impl Drop for PendingRun<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("generation dropped before it finished");
            let _ = self.controller.lock().finish(Err(GenerateError::Cancelled));
        }
    }
}
