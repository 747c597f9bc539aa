use crate::app::update::editor_ensure_cursor_visible;
use crate::app::{App, Message, Model, ToastLevel, update};
use crate::convert::PreviewWorker;
use crate::session::PreviewCompletion;

impl App {
    pub(super) fn handle_message_side_effects(
        model: &mut Model,
        worker: &PreviewWorker,
        msg: &Message,
    ) {
        if matches!(msg, Message::Submit) {
            model.session.submit();
            let chars = model.session.content().chars().count();
            let failure = model.save_failure.borrow_mut().take();
            crate::perf::log_event(
                "session.submit",
                format!("chars={chars} ok={}", failure.is_none()),
            );
            match failure {
                Some(err) => model.show_toast(ToastLevel::Error, format!("Save failed: {err}")),
                None => model.show_toast(ToastLevel::Info, format!("Submitted {chars} characters")),
            }
            editor_ensure_cursor_visible(model);
        }
        Self::dispatch_preview_requests(model, worker);
    }

    /// Hand every queued preview request to the worker.
    ///
    /// A request the worker can no longer accept is resolved right away as a
    /// failure, so the pipeline leaves `Recomputing` and keeps the last good
    /// preview.
    pub(super) fn dispatch_preview_requests(model: &mut Model, worker: &PreviewWorker) {
        for request in model.session.take_requests() {
            let seq = request.seq;
            crate::perf::log_event(
                "preview.request",
                format!("seq={seq} bytes={}", request.source.len()),
            );
            if let Err(err) = worker.submit(request) {
                crate::perf::log_event("preview.request.error", format!("seq={seq} err={err}"));
                let failed = Message::PreviewResolved(PreviewCompletion::new(seq, Err(err)));
                *model = update(std::mem::take(model), failed);
            }
        }
    }

    /// Feed every finished conversion back through `update`.
    ///
    /// Returns `true` when anything arrived.
    pub(super) fn drain_preview_completions(model: &mut Model, worker: &PreviewWorker) -> bool {
        let mut any = false;
        for completion in worker.drain() {
            crate::perf::log_event(
                "preview.resolve",
                format!(
                    "seq={} latest={} ok={}",
                    completion.seq,
                    model.session.requests_issued(),
                    completion.result.is_ok()
                ),
            );
            *model = update(std::mem::take(model), Message::PreviewResolved(completion));
            any = true;
        }
        any
    }
}
