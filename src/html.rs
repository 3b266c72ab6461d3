use maud::{DOCTYPE, Markup, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "px-4 py-2 bg-blue-500 \
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_SECONDARY_STYLE: &str = "py-2 px-4 text-sm font-medium \
    text-gray-900 bg-white rounded border border-gray-200 hover:bg-gray-100 \
    hover:text-blue-700 dark:bg-gray-800 dark:text-gray-400 \
    dark:border-gray-600 dark:hover:text-white dark:hover:bg-gray-700";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_RADIO_GROUP_STYLE: &str = "flex flex-row gap-2";
pub const FORM_RADIO_INPUT_STYLE: &str = "peer h-4 w-4 shrink-0 cursor-pointer \
    text-blue-600 border-gray-300 dark:border-gray-600";
pub const FORM_RADIO_LABEL_STYLE: &str = "flex items-center gap-2 rounded border \
    border-gray-300 dark:border-gray-600 bg-white dark:bg-gray-700 px-3 py-2 \
    text-sm font-medium text-gray-700 dark:text-white cursor-pointer";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
pub const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Spendview" }
                script src="https://cdn.tailwindcss.com" {}
                link href="/static/app.css" rel="stylesheet";

                script
                    src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js"
                    crossorigin="anonymous" {}

                style
                {
                    r#"
                    .htmx-indicator {
                        display: none;
                    }

                    .htmx-request .htmx-indicator,
                    .htmx-request.htmx-indicator {
                        display: inline;
                    }
                    "#
                }
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                // Alert container for out-of-band swaps
                div
                    id="alert-container"
                    class="hidden w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Transactions"
                    }
                }
            }
        }
    );

    base(title, &content)
}

/// A red banner for errors shown inline on a page.
pub fn error_banner(message: &str) -> Markup {
    html! {
        div
            role="alert"
            class="w-full p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400"
        {
            (message)
        }
    }
}

pub fn loading_spinner() -> Markup {
    // Spinner SVG adapted from https://flowbite.com/docs/components/spinner/
    html! {
        svg
            aria-hidden="true"
            role="status"
            class="inline text-blue-600 w-6 h-6 me-2 mb-1 animate-spin"
            viewBox="0 0 100 101"
            fill="none"
            xmlns="http://www.w3.org/2000/svg"
        {
            path
                d="M100 50.5908C100 78.2051 77.6142 100.591 50 100.591C22.3858 100.591 0 78.2051 0 50.5908C0 22.9766 22.3858 0.59082 50 0.59082C77.6142 0.59082 100 22.9766 100 50.5908ZM9.08144 50.5908C9.08144 73.1895 27.4013 91.5094 50 91.5094C72.5987 91.5094 90.9186 73.1895 90.9186 50.5908C90.9186 27.9921 72.5987 9.67226 50 9.67226C27.4013 9.67226 9.08144 27.9921 9.08144 50.5908Z"
                fill="#E5E7EB" {}
            path
                d="M93.9676 39.0409C96.393 38.4038 97.8624 35.9116 97.0079 33.5539C95.2932 28.8227 92.871 24.3692 89.8167 20.348C85.8452 15.1192 80.8826 10.7238 75.2124 7.41289C69.5422 4.10194 63.2754 1.94025 56.7698 1.05124C51.7666 0.367541 46.6976 0.446843 41.7345 1.27873C39.2613 1.69328 37.813 4.19778 38.4501 6.62326C39.0873 9.04874 41.5694 10.4717 44.0505 10.1071C47.8511 9.54855 51.7191 9.52689 55.5402 10.0491C60.8642 10.7766 65.9928 12.5457 70.6331 15.2552C75.2735 17.9648 79.3347 21.5619 82.5849 25.841C84.9175 28.9121 86.7997 32.2913 88.1811 35.8758C89.083 38.2158 91.5421 39.6781 93.9676 39.0409Z"
                fill="currentColor" {}
        }
    }
}

/// Format `number` as Canadian dollars with two decimal places, e.g. "-$45.50".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    if number == 0.0 {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "$0.00".to_owned();
    }

    let formatter = if number < 0.0 {
        NEGATIVE_FMT.get_or_init(|| currency_formatter("-$"))
    } else {
        POSITIVE_FMT.get_or_init(|| currency_formatter("$"))
    };

    let Some(formatter) = formatter else {
        return format_currency_plain(number);
    };

    let formatted_string = formatter.fmt_string(number.abs());

    // numfmt drops trailing zeros, so "12.30" is rendered as "12.3" and "12.00" as "12".
    match formatted_string.rfind('.') {
        Some(point) if formatted_string.len() - point == 2 => format!("{formatted_string}0"),
        Some(_) => formatted_string,
        None => format!("{formatted_string}.00"),
    }
}

fn currency_formatter(prefix: &str) -> Option<Formatter> {
    Formatter::currency(prefix)
        .inspect_err(|error| tracing::error!("could not create currency formatter: {error:?}"))
        .ok()
        .map(|formatter| formatter.precision(Precision::Decimals(2)))
}

fn format_currency_plain(number: f64) -> String {
    if number < 0.0 {
        format!("-${:.2}", number.abs())
    } else {
        format!("${number:.2}")
    }
}

const ISO_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month padding:none]-[day padding:none]");

const BANK_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month padding:none]/[day padding:none]/[year]");

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:none], [year]");

/// Format a date as sent by the backend for display, e.g., "Jan 5, 2024".
///
/// Accepts "YYYY-MM-DD" and the bank export's "M/D/YYYY". Anything else is
/// shown unchanged.
pub fn format_transaction_date(raw: &str) -> String {
    let raw = raw.trim();
    // Ignore a time component, e.g., "2024-01-05T00:00:00".
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);

    Date::parse(date_part, ISO_DATE_FORMAT)
        .or_else(|_| Date::parse(date_part, BANK_DATE_FORMAT))
        .ok()
        .and_then(|date| date.format(DISPLAY_DATE_FORMAT).ok())
        .unwrap_or_else(|| raw.to_owned())
}

/// Shorten `description` to [MAX_DESCRIPTION_GRAPHEMES], returning the full
/// text as a tooltip when it was truncated.
pub fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}
