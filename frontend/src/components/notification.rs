//! Toast for the single-slot notice surface.

use leptos::*;

use crate::controller::Controller;

#[component]
pub fn NotificationToast(controller: Controller) -> impl IntoView {
    let notices = controller.notices;

    view! {
        {move || notices.with(|slot| slot.current().cloned()).map(|notice| {
            view! {
                <div class=format!("notification {}", notice.level.css_class()) role="status">
                    <span class="notification-icon">{notice.level.emoji()}</span>
                    <span class="notification-message">{notice.message}</span>
                </div>
            }
        })}
    }
}
