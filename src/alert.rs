//! Alert system for displaying success and error messages to users.
//!
//! Alerts are swapped into the page's `#alert-container` out-of-band, so any
//! HTMX response can carry one alongside its main content.

use maud::{Markup, html};

/// A message to show in the alert container.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Something completed as expected.
    Success {
        /// The headline.
        message: String,
        /// Any further explanation, may be empty.
        details: String,
    },
    /// Something went wrong.
    Error {
        /// The headline.
        message: String,
        /// Any further explanation, may be empty.
        details: String,
    },
}

impl Alert {
    /// Render the alert as an out-of-band swap for `#alert-container`.
    pub fn into_html(self) -> Markup {
        let (message, details, container_style, icon) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "text-green-800 bg-green-50 border-green-300 dark:bg-gray-800 \
                    dark:text-green-400 dark:border-green-800",
                "✓",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "text-red-800 bg-red-50 border-red-300 dark:bg-gray-800 \
                    dark:text-red-400 dark:border-red-800",
                "!",
            ),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    role="alert"
                    class={ "flex items-start gap-3 p-4 mb-4 text-sm border rounded-lg " (container_style) }
                {
                    span class="font-bold" aria-hidden="true" { (icon) }

                    div class="flex-1"
                    {
                        p class="font-medium" { (message) }

                        @if !details.is_empty() {
                            p class="mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Dismiss"
                        class="font-bold"
                        onclick="this.closest('#alert-container').classList.add('hidden')"
                    {
                        "×"
                    }
                }
            }
        }
    }
}
