use tracing::{debug, warn};

use super::controller::SessionController;
use super::courier::Courier;
use super::state::Phase;
use super::store::StateStore;
use crate::browser::Browser;
use crate::error::SessionError;
use crate::location::LocationResolve;

/// Advance after every page load until the session is idle or terminated.
///
/// A navigation error stops the loop; progress up to that week is stored.
/// The loop gives up once it has seen more page loads than the stored cursor
/// allows, which only happens when progress is not being persisted.
pub(crate) fn run<S, L, C, B>(
    controller: &mut SessionController<S, L, C>,
    browser: &mut B,
) -> Result<Phase, SessionError>
where
    S: StateStore,
    L: LocationResolve,
    C: Courier,
    B: Browser,
{
    let limit = controller
        .state()?
        .map_or(1, |state| state.total_weeks.saturating_sub(state.forward) + 1);
    for _ in 0..limit {
        let phase = controller.advance(browser)?;
        debug!(phase = phase.name(), "page processed");
        match phase {
            Phase::Scraping(_) | Phase::Finalizing(_) => continue,
            done @ (Phase::Idle | Phase::Terminated(_)) => return Ok(done),
        }
    }
    warn!(loads = limit, "session made no progress");
    Err(SessionError::Stalled { loads: limit })
}
