//! Bridges the pure session state machine to the page.
//!
//! [`Controller::dispatch`] runs [`session::update`] on the session signal
//! and then carries out each returned [`Effect`]: notices, the progress
//! ticker, the network request, and delayed resets.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use leptos::leptos_dom::helpers::IntervalHandle;
use leptos::*;
use rand::Rng;
use wasm_bindgen::JsCast;
use web_sys::{AbortController, File, HtmlInputElement};

use crate::config::{BACKEND_URL, NOTICE_DURATION_MS, REQUEST_TIMEOUT_MS};
use crate::services::{failure_message, submit_files, AnimationEvent, Animator, ClassAnimator};
use crate::session::{
    self, Effect, Msg, NoticeSlot, ProgressSimulation, ResultView, SessionState, MAX_JITTER,
};
use crate::types::{AppError, Notice};

/// DOM id of the hidden file input.
pub const FILE_INPUT_ID: &str = "fileInput";

/// Reactive handles shared by every component of the page.
#[derive(Clone, Copy)]
pub struct Controller {
    pub session: RwSignal<SessionState<File>>,
    /// Simulated percentage, 0 when idle
    pub progress: RwSignal<f64>,
    /// Loading panel text, `None` hides the panel
    pub loading_text: RwSignal<Option<String>>,
    pub result: RwSignal<Option<ResultView>>,
    pub notices: RwSignal<NoticeSlot>,
    ticker: StoredValue<Option<IntervalHandle>>,
    /// Abort handle of the request in flight
    in_flight: StoredValue<Option<AbortController>>,
    animator: StoredValue<Rc<dyn Animator>>,
}

impl Controller {
    pub fn new() -> Self {
        Self::with_animator(Rc::new(ClassAnimator))
    }

    pub fn with_animator(animator: Rc<dyn Animator>) -> Self {
        Self {
            session: create_rw_signal(SessionState::new()),
            progress: create_rw_signal(0.0),
            loading_text: create_rw_signal(None),
            result: create_rw_signal(None),
            notices: create_rw_signal(NoticeSlot::new()),
            ticker: store_value(None),
            in_flight: store_value(None),
            animator: store_value(animator),
        }
    }

    /// Feed a message to the session and execute the resulting effects.
    pub fn dispatch(self, msg: Msg<File>) {
        let mut effects = Vec::new();
        self.session.update(|state| {
            let (next, fx) = session::update(std::mem::take(state), msg);
            *state = next;
            effects = fx;
        });
        for effect in effects {
            self.run(effect);
        }
    }

    /// Fire a purely visual event.
    pub fn animate(self, event: AnimationEvent) {
        self.animator.with_value(|a| a.notify(event));
    }

    /// Show a notice for [`NOTICE_DURATION_MS`].
    pub fn notify(self, notice: Notice) {
        let mut ticket = 0;
        self.notices.update(|slot| ticket = slot.show(notice));
        self.animate(AnimationEvent::NoticeShown);

        let notices = self.notices;
        set_timeout(
            move || notices.update(|slot| {
                slot.dismiss(ticket);
            }),
            Duration::from_millis(NOTICE_DURATION_MS),
        );
    }

    /// Abort the request in flight, if any.
    pub fn cancel(self) {
        self.in_flight.with_value(|in_flight| {
            if let Some(controller) = in_flight {
                log::info!("🚫 Cancelling upload");
                controller.abort();
            }
        });
    }

    pub fn open_file_picker(self) {
        let input = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(FILE_INPUT_ID))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());

        match input {
            Some(input) => input.click(),
            None => log::warn!("File input #{} not found", FILE_INPUT_ID),
        }
    }

    fn run(self, effect: Effect<File>) {
        match effect {
            Effect::Notify(notice) => self.notify(notice),
            Effect::Animate(event) => self.animate(event),
            Effect::StartProgress { file_count } => self.start_progress(file_count),
            Effect::StopProgress => self.stop_progress(),
            Effect::Submit(files) => self.submit(files),
            Effect::ShowResult(view) => self.result.set(Some(view)),
            Effect::ScheduleReset { ids, delay_ms } => {
                set_timeout(
                    move || self.dispatch(Msg::ResetElapsed(ids)),
                    Duration::from_millis(delay_ms),
                );
            }
            Effect::OpenFilePicker => self.open_file_picker(),
        }
    }

    fn start_progress(self, file_count: usize) {
        self.stop_ticker();
        let simulation = Rc::new(RefCell::new(ProgressSimulation::new(file_count)));
        let tier = simulation.borrow().tier();

        self.result.set(None);
        self.progress.set(0.0);
        self.loading_text.set(Some(tier.loading_text(file_count)));

        let (progress, loading_text, ticker) = (self.progress, self.loading_text, self.ticker);
        let tick = move || {
            let mut sim = simulation.borrow_mut();
            let jitter = rand::thread_rng().gen_range(0.0..MAX_JITTER);
            if !sim.advance(jitter) {
                ticker.update_value(|handle| {
                    if let Some(handle) = handle.take() {
                        handle.clear();
                    }
                });
                return;
            }
            progress.set(sim.percent());
            if let Some(text) = sim.status_text() {
                loading_text.set(Some(text));
            }
        };

        match set_interval_with_handle(tick, Duration::from_millis(tier.tick_period_ms())) {
            Ok(handle) => self.ticker.set_value(Some(handle)),
            Err(e) => log::warn!("Progress ticker not started: {:?}", e),
        }
    }

    fn stop_ticker(self) {
        self.ticker.update_value(|handle| {
            if let Some(handle) = handle.take() {
                handle.clear();
            }
        });
    }

    fn stop_progress(self) {
        self.stop_ticker();
        self.progress.set(0.0);
        self.loading_text.set(None);
    }

    fn submit(self, files: Vec<File>) {
        let controller = match AbortController::new() {
            Ok(controller) => controller,
            Err(e) => {
                let error = AppError::Network(format!("Failed to create AbortController: {:?}", e));
                self.dispatch(Msg::ProcessFailed(error.message()));
                return;
            }
        };
        let timed_out = Rc::new(Cell::new(false));
        self.in_flight.set_value(Some(controller.clone()));

        let timeout = {
            let (controller, timed_out) = (controller.clone(), timed_out.clone());
            set_timeout_with_handle(
                move || {
                    log::warn!("⏱️ Upload exceeded {} ms, aborting", REQUEST_TIMEOUT_MS);
                    timed_out.set(true);
                    controller.abort();
                },
                Duration::from_millis(REQUEST_TIMEOUT_MS),
            )
            .ok()
        };

        spawn_local(async move {
            let signal = controller.signal();
            let outcome = submit_files(&files, BACKEND_URL, Some(&signal)).await;

            if let Some(timeout) = timeout {
                timeout.clear();
            }
            self.in_flight.set_value(None);

            match outcome {
                Ok(result) => self.dispatch(Msg::ProcessSucceeded(result)),
                Err(e) => {
                    log::error!("{}", e);
                    self.dispatch(Msg::ProcessFailed(failure_message(&e, timed_out.get())))
                }
            }
        });
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
