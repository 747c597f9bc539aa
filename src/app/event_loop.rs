use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::DefaultTerminal;

use crate::app::{App, Model, update};
use crate::convert::PreviewWorker;
use crate::session::{PreviewState, Session};

/// Poll interval while a conversion is outstanding.
const BUSY_POLL_MS: u64 = 16;
/// Poll interval when nothing is pending.
const IDLE_POLL_MS: u64 = 250;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the preview worker cannot be started, terminal
    /// initialization fails, or the event loop encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let worker = PreviewWorker::spawn(Arc::clone(&self.converter))
            .context("Failed to start preview worker")?;

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - markpad requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let mut model = self.build_model((size.width, size.height));
        crate::perf::log_event(
            "init.model",
            format!(
                "terminal={}x{} bytes={} typography={:?}",
                size.width,
                size.height,
                model.session.content().len(),
                model.session.typography()
            ),
        );

        let result = Self::event_loop(&mut terminal, &mut model, &worker);

        ratatui::restore();
        result
    }

    /// Build the initial model from the builder settings.
    ///
    /// The save callback moves into the session, so a second call gets the
    /// no-op default.
    pub(super) fn build_model(&mut self, size: (u16, u16)) -> Model {
        let save_failure = Rc::new(RefCell::new(None));
        let mut session = Session::with_initial(self.content.clone(), self.typography);
        if let Some(mut on_save) = self.on_save.take() {
            let slot = Rc::clone(&save_failure);
            session.set_on_save(move |content| {
                if let Err(err) = on_save(content) {
                    let message = format!("{err:#}");
                    tracing::warn!(error = %message, "save failed");
                    *slot.borrow_mut() = Some(message);
                }
            });
        }
        if self.start_in_preview {
            session.toggle_view_mode();
        }
        let mut model = Model::new(session, size);
        model.save_failure = save_failure;
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        worker: &PreviewWorker,
    ) -> Result<()> {
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        // The session queued its first request during construction.
        Self::dispatch_preview_requests(model, worker);

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            if Self::drain_preview_completions(model, worker) {
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if model.session.preview_state() == PreviewState::Recomputing {
                BUSY_POLL_MS
            } else {
                IDLE_POLL_MS
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Coalesce key repeat bursts into a single render.
                let mut handled = 0_u32;
                loop {
                    if let Some(msg) = Self::handle_event(&event::read()?, model) {
                        crate::perf::log_event(
                            "event.message",
                            format!("frame={frame_idx} msg={msg:?}"),
                        );
                        handled += 1;
                        let side_msg = msg.clone();
                        *model = update(std::mem::take(model), msg);
                        Self::handle_message_side_effects(model, worker, &side_msg);
                        needs_render = true;
                    }
                    if model.should_quit || !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
                if handled > 1 {
                    crate::perf::log_event(
                        "event.drain",
                        format!("frame={frame_idx} handled={handled}"),
                    );
                }
            }

            if model.should_quit {
                break;
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| Self::view(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3} preview_state={:?}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0,
                        model.session.preview_state()
                    ),
                );
                needs_render = false;
            }
        }
        Ok(())
    }
}
