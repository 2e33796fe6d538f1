//! Fire-and-forget visual effects.
//!
//! The session only says *what* happened; an [`Animator`] decides how it
//! looks. The shipped [`ClassAnimator`] exposes the last event as a
//! `data-animation` attribute on `<body>` so stylesheets can react to it,
//! and can be swapped for any other engine.

/// Moments the page may want to animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationEvent {
    DragOver,
    DragLeave,
    Dropped,
    SelectionShown,
    FileRemoved,
    LoadingShown,
    ResultsShown,
    ErrorShown,
    NoticeShown,
    ThemeToggled,
}

impl AnimationEvent {
    /// Kebab-case name, used as attribute value.
    pub fn name(&self) -> &'static str {
        match self {
            AnimationEvent::DragOver => "drag-over",
            AnimationEvent::DragLeave => "drag-leave",
            AnimationEvent::Dropped => "dropped",
            AnimationEvent::SelectionShown => "selection-shown",
            AnimationEvent::FileRemoved => "file-removed",
            AnimationEvent::LoadingShown => "loading-shown",
            AnimationEvent::ResultsShown => "results-shown",
            AnimationEvent::ErrorShown => "error-shown",
            AnimationEvent::NoticeShown => "notice-shown",
            AnimationEvent::ThemeToggled => "theme-toggled",
        }
    }
}

/// Side-effect-only animation capability.
pub trait Animator {
    fn notify(&self, event: AnimationEvent);
}

/// Publishes events on `<body data-animation="...">`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassAnimator;

impl Animator for ClassAnimator {
    fn notify(&self, event: AnimationEvent) {
        let body = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body());

        match body {
            Some(body) => {
                if let Err(e) = body.set_attribute("data-animation", event.name()) {
                    log::debug!("Animation {} not applied: {:?}", event.name(), e);
                }
            }
            None => log::debug!("No document body for animation {}", event.name()),
        }
    }
}
