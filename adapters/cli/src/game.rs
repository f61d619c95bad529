//! Game loop tying the session to the renderer and the ledger.

use anyhow::{Context, Result};
use delve_core::Command;
use delve_ledger::{LedgerClient, LedgerSink};
use delve_rendering::{Palette, Presentation, RenderingBackend, Scene};
use delve_world::{self as world, query, Session};
use tracing::{debug, warn};

use crate::input::{parse_line, Input};

const WINDOW_TITLE: &str = "Delve";

/// Whether the loop should keep reading input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

pub(crate) struct Game<B, S> {
    session: Session,
    backend: B,
    ledger: LedgerClient<S>,
    palette: Palette,
}

impl<B: RenderingBackend, S: LedgerSink> Game<B, S> {
    pub(crate) fn new(session: Session, backend: B, ledger: LedgerClient<S>) -> Self {
        Self {
            session,
            backend,
            ledger,
            palette: Palette::default(),
        }
    }

    pub(crate) fn present(&mut self) -> Result<()> {
        let view = query::view(&self.session);
        let scene = Scene::new(view.level_name, &view.state, view.grid, view.total_levels)
            .context("session snapshot could not be drawn")?;
        self.backend
            .present(&Presentation::new(WINDOW_TITLE, self.palette, scene))
    }

    /// Feeds one line of keys through the session, redrawing after each intent.
    pub(crate) fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let (inputs, unknown) = parse_line(line);
        for key in unknown {
            warn!(%key, "unrecognised key ignored");
        }
        for input in inputs {
            match input {
                Input::Quit => return Ok(Flow::Quit),
                Input::Intent(command) => self.submit(command)?,
            }
        }
        Ok(Flow::Continue)
    }

    /// Applies one intent. Ledger failures are logged and never stop play.
    fn submit(&mut self, command: Command) -> Result<()> {
        let mut events = Vec::new();
        world::apply(&mut self.session, command, &mut events);
        debug!(?command, events = events.len(), "intent applied");
        if let Err(error) = self.ledger.observe(&events) {
            warn!(%error, "ledger entry not recorded");
        }
        self.present()
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut LedgerClient<S> {
        &mut self.ledger
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }
}
