//! Footer component

use leptos::*;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer>
            <div>"Image Batch • Powered by " <span class="rust-badge">"🦀 Rust + Leptos"</span></div>
            <div class="footer-links">
                <span class="footer-hint">"Ctrl+U: choose files"</span>
                <span class="footer-hint">"Esc: clear selection"</span>
            </div>
        </footer>
    }
}
