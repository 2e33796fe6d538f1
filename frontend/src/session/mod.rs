//! Upload session controller: pure state machine.
//!
//! [`update`] takes the current [`SessionState`] and a [`Msg`] and returns
//! the next state plus the [`Effect`]s the page must carry out (notices,
//! progress ticker, network request, timers). Nothing in here touches the
//! DOM, so the whole flow is testable natively.
//!
//! ```text
//!            ProcessRequested
//!   Idle ─────────────────────▶ Processing
//!    ▲                              │
//!    └──── ProcessSucceeded ────────┤
//!    └──── ProcessFailed ───────────┘
//! ```

pub mod notice;
pub mod progress;
pub mod results;

pub use notice::NoticeSlot;
pub use progress::{BatchTier, ProgressSimulation, MAX_JITTER, PROGRESS_CAP};
pub use results::{download_url, preview_url, success_message, ResultView};

use crate::config::{BACKEND_URL, MAX_TOTAL_SIZE, RESET_DELAY_MS};
use crate::services::animation::AnimationEvent;
use crate::types::{
    extension_of, is_accepted_extension, Candidate, FileId, Notice, PendingFile, UploadResult,
};

/// Notice for a batch without any accepted image.
pub const INVALID_FILES_MESSAGE: &str =
    "Please select valid image files (JPG, PNG, WEBP, BMP, TIFF)";

/// Notice for a batch that would push the selection over the size limit.
pub const SIZE_LIMIT_MESSAGE: &str =
    "Total file size exceeds 500MB limit. Please select smaller files or fewer images.";

/// Fallback when the endpoint gives no reason for a failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Processing failed";

// =============================================================================
// State
// =============================================================================

/// Files chosen but not yet submitted, plus the single-flight flag.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState<H> {
    files: Vec<PendingFile<H>>,
    is_processing: bool,
    /// Ids sent with the in-flight (or last successful) request
    submitted: Vec<FileId>,
    next_id: u64,
}

impl<H> Default for SessionState<H> {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            is_processing: false,
            submitted: Vec::new(),
            next_id: 0,
        }
    }
}

impl<H> SessionState<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[PendingFile<H>] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    /// Cumulative size of the selection in bytes.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Whether the process action is currently available.
    pub fn can_process(&self) -> bool {
        !self.files.is_empty() && !self.is_processing
    }

    /// Label of the process button.
    pub fn process_label(&self) -> String {
        match self.files.len() {
            n if n > 1 && !self.is_processing => format!("Process {} Images", n),
            1 if !self.is_processing => "Process Image".to_string(),
            _ => "Process Images".to_string(),
        }
    }

    fn allocate_id(&mut self) -> FileId {
        let id = FileId(self.next_id);
        self.next_id += 1;
        id
    }
}

// =============================================================================
// Messages and effects
// =============================================================================

/// A key press relevant to the page shortcuts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>, ctrl: bool, meta: bool) -> Self {
        Self { key: key.into(), ctrl, meta }
    }

    /// Ctrl+U / Cmd+U.
    pub fn opens_picker(&self) -> bool {
        (self.ctrl || self.meta) && self.key == "u"
    }

    pub fn is_escape(&self) -> bool {
        self.key == "Escape"
    }
}

/// Everything that can happen to a session.
#[derive(Clone, Debug, PartialEq)]
pub enum Msg<H> {
    /// Picker change or drop.
    FilesChosen(Vec<Candidate<H>>),
    /// Remove button of one row.
    RemoveFile(FileId),
    /// Escape, or any other explicit clear.
    ClearSelection,
    /// Process button.
    ProcessRequested,
    /// The endpoint answered `success: true`.
    ProcessSucceeded(UploadResult),
    /// The endpoint refused, or the request failed.
    ProcessFailed(String),
    /// The post-success display delay ran out.
    ResetElapsed(Vec<FileId>),
    /// Global keyboard shortcut.
    KeyPressed(KeyChord),
}

/// Side effects requested by [`update`].
#[derive(Clone, Debug, PartialEq)]
pub enum Effect<H> {
    Notify(Notice),
    Animate(AnimationEvent),
    /// Open the loading panel and start ticking.
    StartProgress { file_count: usize },
    /// Stop ticking, reset the bar to 0 and close the loading panel.
    StopProgress,
    /// Send one multipart request with these handles, in order.
    Submit(Vec<H>),
    ShowResult(ResultView),
    /// Dispatch [`Msg::ResetElapsed`] with `ids` after `delay_ms`.
    ScheduleReset { ids: Vec<FileId>, delay_ms: u64 },
    OpenFilePicker,
}

// =============================================================================
// Transitions
// =============================================================================

/// Apply `msg` to `state`.
pub fn update<H: Clone>(state: SessionState<H>, msg: Msg<H>) -> (SessionState<H>, Vec<Effect<H>>) {
    match msg {
        Msg::FilesChosen(candidates) => handle_files(state, candidates),
        Msg::RemoveFile(id) => remove_file(state, id),
        Msg::ClearSelection => clear_selection(state),
        Msg::ProcessRequested => request_processing(state),
        Msg::ProcessSucceeded(result) => process_succeeded(state, result),
        Msg::ProcessFailed(message) => process_failed(state, message),
        Msg::ResetElapsed(ids) => reset_elapsed(state, &ids),
        Msg::KeyPressed(chord) => {
            if chord.opens_picker() {
                (state, vec![Effect::OpenFilePicker])
            } else if chord.is_escape() {
                clear_selection(state)
            } else {
                (state, Vec::new())
            }
        }
    }
}

fn handle_files<H>(
    mut state: SessionState<H>,
    candidates: Vec<Candidate<H>>,
) -> (SessionState<H>, Vec<Effect<H>>) {
    let offered = candidates.len();
    let accepted: Vec<(Candidate<H>, String)> = candidates
        .into_iter()
        .filter_map(|c| {
            let extension = extension_of(&c.name);
            is_accepted_extension(&extension).then_some((c, extension))
        })
        .collect();

    if accepted.is_empty() {
        log::warn!("Rejected {} file(s): no accepted image type", offered);
        return (state, vec![Effect::Notify(Notice::error(INVALID_FILES_MESSAGE))]);
    }

    let incoming: u64 = accepted.iter().map(|(c, _)| c.size).sum();
    if state.total_size().saturating_add(incoming) > MAX_TOTAL_SIZE {
        log::warn!(
            "Rejected batch of {} file(s): {} + {} bytes over the limit",
            accepted.len(),
            state.total_size(),
            incoming
        );
        return (state, vec![Effect::Notify(Notice::error(SIZE_LIMIT_MESSAGE))]);
    }

    if accepted.len() < offered {
        log::info!("Skipped {} file(s) with unsupported type", offered - accepted.len());
    }

    for (candidate, extension) in accepted {
        let id = state.allocate_id();
        state.files.push(PendingFile {
            id,
            name: candidate.name,
            size: candidate.size,
            extension,
            handle: candidate.handle,
        });
    }
    log::debug!("Selection now holds {} file(s)", state.files.len());

    (state, vec![Effect::Animate(AnimationEvent::SelectionShown)])
}

fn remove_file<H>(mut state: SessionState<H>, id: FileId) -> (SessionState<H>, Vec<Effect<H>>) {
    match state.files.iter().position(|f| f.id == id) {
        Some(index) => {
            let removed = state.files.remove(index);
            log::debug!("Removed {} ({})", removed.name, id);
            (state, vec![Effect::Animate(AnimationEvent::FileRemoved)])
        }
        None => (state, Vec::new()),
    }
}

fn clear_selection<H>(mut state: SessionState<H>) -> (SessionState<H>, Vec<Effect<H>>) {
    if state.files.is_empty() {
        return (state, Vec::new());
    }
    state.files.clear();
    (state, vec![Effect::Notify(Notice::info("Selection cleared"))])
}

fn request_processing<H: Clone>(mut state: SessionState<H>) -> (SessionState<H>, Vec<Effect<H>>) {
    if !state.can_process() {
        log::debug!("Process request ignored (empty or already processing)");
        return (state, Vec::new());
    }

    state.is_processing = true;
    state.submitted = state.files.iter().map(|f| f.id).collect();
    let handles = state.files.iter().map(|f| f.handle.clone()).collect();
    log::info!("📤 Submitting {} file(s)", state.files.len());

    let effects = vec![
        Effect::Animate(AnimationEvent::LoadingShown),
        Effect::StartProgress { file_count: state.files.len() },
        Effect::Submit(handles),
    ];
    (state, effects)
}

fn process_succeeded<H>(
    mut state: SessionState<H>,
    result: UploadResult,
) -> (SessionState<H>, Vec<Effect<H>>) {
    state.is_processing = false;
    log::info!("✅ Processed {} image(s)", result.file_count());

    let effects = vec![
        Effect::StopProgress,
        Effect::ShowResult(ResultView::from_result(&result, BACKEND_URL)),
        Effect::Animate(AnimationEvent::ResultsShown),
        Effect::Notify(Notice::success(success_message(result.file_count()))),
        Effect::ScheduleReset {
            ids: state.submitted.clone(),
            delay_ms: RESET_DELAY_MS,
        },
    ];
    (state, effects)
}

fn process_failed<H>(
    mut state: SessionState<H>,
    message: String,
) -> (SessionState<H>, Vec<Effect<H>>) {
    state.is_processing = false;
    state.submitted.clear();
    let message = if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        message
    };
    log::error!("❌ Processing failed: {}", message);

    let effects = vec![
        Effect::StopProgress,
        Effect::Animate(AnimationEvent::ErrorShown),
        Effect::Notify(Notice::error(format!("Error: {}", message))),
    ];
    (state, effects)
}

fn reset_elapsed<H>(mut state: SessionState<H>, ids: &[FileId]) -> (SessionState<H>, Vec<Effect<H>>) {
    state.files.retain(|f| !ids.contains(&f.id));
    state.submitted.retain(|id| !ids.contains(id));
    (state, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn candidate(name: &str, size: u64) -> Candidate<&'static str> {
        Candidate::new(name, size, "handle")
    }

    fn named(name: &'static str, size: u64) -> Candidate<&'static str> {
        Candidate::new(name, size, name)
    }

    fn names<H>(state: &SessionState<H>) -> Vec<&str> {
        state.files().iter().map(|f| f.name.as_str()).collect()
    }

    fn select(state: SessionState<&'static str>, batch: Vec<Candidate<&'static str>>) -> SessionState<&'static str> {
        update(state, Msg::FilesChosen(batch)).0
    }

    #[test]
    fn test_unsupported_files_are_dropped_silently() {
        let (state, effects) = update(
            SessionState::new(),
            Msg::FilesChosen(vec![
                candidate("a.jpg", 700 * 1024),
                candidate("b.gif", 600 * 1024),
                candidate("c.png", 700 * 1024),
            ]),
        );

        assert_eq!(names(&state), vec!["a.jpg", "c.png"]);
        assert_eq!(state.files()[1].extension, "png");
        assert!(!effects.iter().any(|e| matches!(e, Effect::Notify(_))));
    }

    #[test]
    fn test_batch_without_images_is_rejected() {
        let state = select(SessionState::new(), vec![candidate("keep.webp", 10)]);
        let before = state.clone();

        let (state, effects) = update(
            state,
            Msg::FilesChosen(vec![candidate("doc.pdf", 10), candidate("clip.GIF", 10)]),
        );

        assert_eq!(state, before);
        assert_eq!(effects, vec![Effect::Notify(Notice::error(INVALID_FILES_MESSAGE))]);
    }

    #[test]
    fn test_single_oversized_file_is_rejected() {
        let (state, effects) = update(
            SessionState::new(),
            Msg::FilesChosen(vec![candidate("huge.tiff", 600 * MIB)]),
        );

        assert!(state.is_empty());
        match &effects[..] {
            [Effect::Notify(notice)] => {
                assert_eq!(notice.level, crate::types::NoticeLevel::Error);
                assert!(notice.message.contains("exceeds 500MB"));
            }
            other => panic!("unexpected effects: {:?}", other),
        }
    }

    #[test]
    fn test_limit_counts_existing_selection() {
        let state = select(SessionState::new(), vec![candidate("a.jpg", 300 * MIB)]);
        let before = state.clone();

        let (state, effects) = update(state, Msg::FilesChosen(vec![candidate("b.jpg", 201 * MIB)]));
        assert_eq!(state, before);
        assert_eq!(effects, vec![Effect::Notify(Notice::error(SIZE_LIMIT_MESSAGE))]);

        // Exactly at the limit is still fine.
        let state = select(state, vec![candidate("c.jpg", 200 * MIB)]);
        assert_eq!(state.total_size(), MAX_TOTAL_SIZE);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_batches_append_in_arrival_order_with_fresh_ids() {
        let state = select(SessionState::new(), vec![named("1.jpg", 1), named("2.png", 1)]);
        let state = select(state, vec![named("3.bmp", 1)]);

        assert_eq!(names(&state), vec!["1.jpg", "2.png", "3.bmp"]);
        let ids: Vec<FileId> = state.files().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![FileId(0), FileId(1), FileId(2)]);
    }

    #[test]
    fn test_remove_keeps_order_of_remaining_files() {
        let state = select(
            SessionState::new(),
            vec![named("a.jpg", 1), named("b.jpg", 1), named("c.jpg", 1), named("d.jpg", 1)],
        );
        let target = state.files()[1].id;

        let (state, effects) = update(state, Msg::RemoveFile(target));
        assert_eq!(names(&state), vec!["a.jpg", "c.jpg", "d.jpg"]);
        assert_eq!(effects, vec![Effect::Animate(AnimationEvent::FileRemoved)]);

        // A stale id from an outdated view is ignored.
        let (state, effects) = update(state, Msg::RemoveFile(target));
        assert_eq!(names(&state), vec!["a.jpg", "c.jpg", "d.jpg"]);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_process_submits_all_files_in_order() {
        let state = select(SessionState::new(), vec![named("x.jpg", 1), named("y.png", 1)]);
        assert_eq!(state.process_label(), "Process 2 Images");

        let (state, effects) = update(state, Msg::ProcessRequested);
        assert!(state.is_processing());
        assert!(!state.can_process());
        assert_eq!(
            effects,
            vec![
                Effect::Animate(AnimationEvent::LoadingShown),
                Effect::StartProgress { file_count: 2 },
                Effect::Submit(vec!["x.jpg", "y.png"]),
            ]
        );
    }

    #[test]
    fn test_second_process_request_is_a_no_op() {
        let state = select(SessionState::new(), vec![candidate("x.jpg", 1)]);
        let (state, _) = update(state, Msg::ProcessRequested);
        let before = state.clone();

        let (state, effects) = update(state, Msg::ProcessRequested);
        assert_eq!(state, before);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_process_on_empty_selection_is_a_no_op() {
        let (state, effects) = update(SessionState::<()>::new(), Msg::ProcessRequested);
        assert!(!state.is_processing());
        assert!(effects.is_empty());
        assert_eq!(state.process_label(), "Process Images");
    }

    #[test]
    fn test_success_shows_result_then_clears_submitted_files() {
        let state = select(SessionState::new(), vec![candidate("cat.jpg", 1)]);
        assert_eq!(state.process_label(), "Process Image");
        let submitted = state.files()[0].id;
        let (state, _) = update(state, Msg::ProcessRequested);

        // Picked while the request was in flight, must survive the reset.
        let state = select(state, vec![named("late.png", 1)]);

        let result = UploadResult::Single {
            original_file: Some("u_cat.jpg".into()),
            output_file: "processed_u.png".into(),
            file_count: 1,
        };
        let (state, effects) = update(state, Msg::ProcessSucceeded(result.clone()));

        assert!(!state.is_processing());
        assert_eq!(state.len(), 2, "selection is kept during the display delay");
        assert_eq!(effects[0], Effect::StopProgress);
        assert!(effects.contains(&Effect::ShowResult(ResultView::from_result(&result, ""))));
        assert!(effects.contains(&Effect::Notify(Notice::success(
            "Successfully processed 1 image(s)!"
        ))));
        let reset_ids = effects
            .iter()
            .find_map(|e| match e {
                Effect::ScheduleReset { ids, delay_ms } => {
                    assert_eq!(*delay_ms, 5_000);
                    Some(ids.clone())
                }
                _ => None,
            })
            .expect("reset scheduled");
        assert_eq!(reset_ids, vec![submitted]);

        let (state, effects) = update(state, Msg::ResetElapsed(reset_ids));
        assert_eq!(names(&state), vec!["late.png"]);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_failure_keeps_selection_for_retry() {
        let state = select(SessionState::new(), vec![candidate("a.jpg", 1), candidate("b.jpg", 1)]);
        let files_before = state.files().to_vec();
        let (state, _) = update(state, Msg::ProcessRequested);

        let (state, effects) = update(state, Msg::ProcessFailed("Failed to process image".into()));
        assert!(!state.is_processing());
        assert_eq!(state.files(), &files_before[..]);
        assert_eq!(
            effects,
            vec![
                Effect::StopProgress,
                Effect::Animate(AnimationEvent::ErrorShown),
                Effect::Notify(Notice::error("Error: Failed to process image")),
            ]
        );

        // Retry is allowed straight away.
        let (state, effects) = update(state, Msg::ProcessRequested);
        assert!(state.is_processing());
        assert!(effects.iter().any(|e| matches!(e, Effect::Submit(h) if h.len() == 2)));
    }

    #[test]
    fn test_failure_without_reason_uses_fallback() {
        let state = select(SessionState::new(), vec![candidate("a.jpg", 1)]);
        let (state, _) = update(state, Msg::ProcessRequested);
        let (_, effects) = update(state, Msg::ProcessFailed("  ".into()));
        assert!(effects.contains(&Effect::Notify(Notice::error("Error: Processing failed"))));
    }

    #[test]
    fn test_escape_clears_non_empty_selection() {
        let state = select(SessionState::new(), vec![candidate("a.jpg", 1)]);
        let (state, effects) = update(state, Msg::KeyPressed(KeyChord::new("Escape", false, false)));
        assert!(state.is_empty());
        assert_eq!(effects, vec![Effect::Notify(Notice::info("Selection cleared"))]);

        let (_, effects) = update(state, Msg::KeyPressed(KeyChord::new("Escape", false, false)));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_ctrl_or_meta_u_opens_picker() {
        for chord in [KeyChord::new("u", true, false), KeyChord::new("u", false, true)] {
            let (_, effects) = update(SessionState::<()>::new(), Msg::KeyPressed(chord));
            assert_eq!(effects, vec![Effect::OpenFilePicker]);
        }
        let (_, effects) = update(SessionState::<()>::new(), Msg::KeyPressed(KeyChord::new("u", false, false)));
        assert!(effects.is_empty());
    }
}
