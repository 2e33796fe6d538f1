use leptos::*;

use crate::controller::Controller;
use crate::services::{apply_theme, toggle_theme, AnimationEvent, LocalStorageThemeStore, Theme};
use crate::APP_NAME;

#[component]
pub fn Header(
    controller: Controller,
    theme: ReadSignal<Theme>,
    set_theme: WriteSignal<Theme>,
) -> impl IntoView {
    // Handler pour le changement de thème
    let on_theme_click = move |_| {
        let next = toggle_theme(&LocalStorageThemeStore, theme.get_untracked());
        log::info!("🎨 Theme switched to {}", next.as_str());
        apply_theme(next);
        set_theme.set(next);
        controller.animate(AnimationEvent::ThemeToggled);
    };

    view! {
        <header>
            <div class="header-left">
                <a href="#" class="logo">{APP_NAME}</a>
                <span class="badge">
                    {move || controller.session.with(|s| {
                        if s.is_processing() {
                            "⏳ Processing".to_string()
                        } else {
                            format!("{} queued", s.len())
                        }
                    })}
                </span>
            </div>
            <div class="header-right">
                <button
                    class="theme-toggle"
                    id="themeToggle"
                    title="Toggle theme"
                    on:click=on_theme_click
                >
                    {move || theme.get().toggle_icon()}
                </button>
            </div>
        </header>
    }
}
