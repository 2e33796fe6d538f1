//! Single and bulk result panels.

use leptos::*;
use web_sys::{Event, HtmlImageElement};

use crate::config::PLACEHOLDER_IMAGE;
use crate::controller::Controller;
use crate::session::ResultView;

/// Swap a broken preview for the placeholder (only once, to avoid loops).
fn use_placeholder(ev: &Event) {
    let img: HtmlImageElement = event_target(ev);
    if img.src() != PLACEHOLDER_IMAGE {
        log::debug!("Preview {} failed to load", img.src());
        img.set_src(PLACEHOLDER_IMAGE);
    }
}

#[component]
fn SingleResult(original_src: String, processed_src: String, download_href: String) -> impl IntoView {
    view! {
        <div class="single-result" id="singleResult">
            <div class="result-images">
                <figure>
                    <img id="originalPreview" src=original_src alt="Original" on:error=|ev| use_placeholder(&ev)/>
                    <figcaption>"Original"</figcaption>
                </figure>
                <figure>
                    <img id="processedPreview" src=processed_src alt="Processed" on:error=|ev| use_placeholder(&ev)/>
                    <figcaption>"Processed"</figcaption>
                </figure>
            </div>
            <a class="btn btn-primary" id="downloadBtn" href=download_href download="">
                "⬇️ Download"
            </a>
        </div>
    }
}

#[component]
fn BulkResult(summary: String, download_href: String, download_label: String) -> impl IntoView {
    view! {
        <div class="bulk-result" id="bulkResult">
            <div class="bulk-icon">"📦"</div>
            <div class="bulk-count" id="bulkFileCount">{summary}</div>
            <a class="btn btn-primary" id="bulkDownloadBtn" href=download_href download="">
                "⬇️ " {download_label}
            </a>
        </div>
    }
}

#[component]
pub fn ResultsSection(controller: Controller) -> impl IntoView {
    let result = controller.result;

    view! {
        {move || result.get().map(|shown| {
            let body = match shown {
                ResultView::Single { original_src, processed_src, download_href } => view! {
                    <SingleResult
                        original_src=original_src
                        processed_src=processed_src
                        download_href=download_href
                    />
                }.into_view(),
                ResultView::Bulk { summary, download_href, download_label, .. } => view! {
                    <BulkResult
                        summary=summary
                        download_href=download_href
                        download_label=download_label
                    />
                }.into_view(),
            };
            view! {
                <div class="results-section show" id="resultsSection">
                    <div class="results-title">"✨ Results"</div>
                    {body}
                </div>
            }
        })}
    }
}
