//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Batch Image Processing"</h1>
            <p class="subtitle">
                "Drop one image or hundreds. "
                "Single images come back as a PNG, batches as a ZIP archive."
            </p>
        </div>
    }
}
