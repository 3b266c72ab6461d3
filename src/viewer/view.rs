//! HTML rendering for the transactions page.

use maud::{Markup, html};

use crate::{
    backend::{
        ALL_CATEGORIES, CategorySummary, PageMetadata, SortBy, SortOrder, Transaction,
        TransactionType,
    },
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        error_banner, format_currency, format_description, format_transaction_date,
    },
    pagination::{create_pagination_indicators, pagination_view},
    spending::{ChartId, chart_container, spending_chart_url},
};

use super::query::ViewerOptions;

/// Everything needed to render the transactions page.
pub(super) struct ViewerPage<'a> {
    pub options: &'a ViewerOptions,
    /// The ID the spending chart on this page is requested with.
    pub chart_id: ChartId,
    pub page_size_options: &'a [u64],
    pub categories: &'a [CategorySummary],
    pub transactions: &'a [Transaction],
    /// `None` when no page of transactions was loaded.
    pub metadata: Option<PageMetadata>,
    pub error_message: Option<String>,
    /// Shown in place of the table rows when there are no transactions.
    pub empty_message: &'a str,
}

fn amount_class(amount: f64) -> &'static str {
    if amount < 0.0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

pub(super) fn transactions_page_view(page: &ViewerPage) -> Markup {
    let category_names: Vec<String> = page
        .categories
        .iter()
        .map(|category| category.name.clone())
        .collect();
    let chart_src = spending_chart_url(
        page.chart_id,
        &page.options.dates,
        page.options.category.as_deref(),
    );

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-7xl"
            {
                header class="mb-6"
                {
                    h1 class="text-2xl font-bold" { "Transaction Viewer" }
                    p class="text-gray-600 dark:text-gray-400" { "View and filter your categorized transactions" }
                }

                @if let Some(message) = &page.error_message {
                    (error_banner(message))
                }

                (filters_view(page))

                @if let Some(metadata) = page.metadata {
                    (summary_view(metadata))
                }

                div class="grid grid-cols-1 lg:grid-cols-3 gap-6"
                {
                    div class="lg:col-span-2 overflow-x-auto"
                    {
                        (transactions_table_view(page, &category_names))

                        @if let Some(metadata) = page.metadata {
                            (pagination_view(
                                &create_pagination_indicators(metadata.page, metadata.total_pages),
                                |page_number| page.options.with_page(page_number).to_url(),
                            ))
                        }
                    }

                    aside
                    {
                        h2 class="text-xl font-semibold mb-2" { "Spending by Category" }
                        (chart_container(&chart_src))
                    }
                }
            }
        }
    };

    base("Transactions", &content)
}

fn filters_view(page: &ViewerPage) -> Markup {
    let options = page.options;
    let selected_category = options.category.as_deref().unwrap_or_default();

    html! {
        form
            id="filters"
            action=(endpoints::TRANSACTIONS_VIEW)
            method="get"
            hx-get=(endpoints::TRANSACTIONS_VIEW)
            hx-trigger="change, submit"
            hx-target="body"
            hx-push-url="true"
            class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-6"
        {
            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select id="category" name="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(ALL_CATEGORIES) selected[selected_category == ALL_CATEGORIES]
                    {
                        "All categories"
                    }

                    @for category in page.categories {
                        option value=(category.name) selected[category.name == selected_category]
                        {
                            (category.name) " (" (category.transaction_count) " transactions - "
                            (format_currency(category.total)) ")"
                        }
                    }
                }
            }

            div
            {
                label for="page_size" class=(FORM_LABEL_STYLE) { "Per page" }
                select id="page_size" name="page_size" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for &size in page.page_size_options {
                        option value=(size) selected[size == options.page_size] { (size) }
                    }
                }
            }

            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "Start date" }
                input
                    id="start_date"
                    type="date"
                    name="start_date"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[options.dates.start_date.map(|date| date.to_string())];
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "End date" }
                input
                    id="end_date"
                    type="date"
                    name="end_date"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[options.dates.end_date.map(|date| date.to_string())];
            }

            fieldset class="md:col-span-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Transaction type" }
                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for transaction_type in TransactionType::ALL_TYPES {
                        label class=(FORM_RADIO_LABEL_STYLE)
                        {
                            input
                                type="radio"
                                name="transaction_type"
                                value=(transaction_type.as_query_value())
                                class=(FORM_RADIO_INPUT_STYLE)
                                checked[transaction_type == options.transaction_type];
                            (transaction_type.label())
                        }
                    }
                }
            }

            input type="hidden" name="sort_by" value=(options.sort_by.as_query_value());
            input type="hidden" name="sort_order" value=(options.sort_order.as_query_value());

            div class="flex items-end gap-4 md:col-span-2"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }

                @if !options.dates.is_empty() {
                    a href=(options.without_dates().to_url()) class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Clear Dates"
                    }
                }
            }
        }
    }
}

fn summary_view(metadata: PageMetadata) -> Markup {
    html! {
        dl id="summary" class="grid grid-cols-2 gap-4 mb-6 p-4 rounded-lg bg-white dark:bg-gray-800"
        {
            div
            {
                dt class="text-sm text-gray-500 dark:text-gray-400" { "Total Transactions" }
                dd class="text-lg font-semibold" { (metadata.total_items) }
            }

            div
            {
                dt class="text-sm text-gray-500 dark:text-gray-400" { "Category Total" }
                dd class={ "text-lg font-semibold " (amount_class(metadata.category_total)) }
                {
                    (format_currency(metadata.category_total))
                }
            }
        }
    }
}

fn sort_arrow(options: &ViewerOptions, column: SortBy) -> &'static str {
    if options.sort_by != column {
        "↕"
    } else if options.sort_order == SortOrder::Ascending {
        "↑"
    } else {
        "↓"
    }
}

fn sort_header(options: &ViewerOptions, column: SortBy, text: &str) -> Markup {
    html! {
        th scope="col" class=(TABLE_CELL_STYLE)
        {
            a href=(options.with_sort(column).to_url()) class="flex items-center gap-1 hover:underline"
            {
                (text) " " span aria-hidden="true" { (sort_arrow(options, column)) }
            }
        }
    }
}

fn transactions_table_view(page: &ViewerPage, category_names: &[String]) -> Markup {
    html! {
        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    (sort_header(page.options, SortBy::Date, "Date"))
                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    (sort_header(page.options, SortBy::Amount, "Amount"))
                }
            }

            tbody
            {
                @for transaction in page.transactions {
                    (transaction_row_view(transaction, category_names))
                }

                @if page.transactions.is_empty() {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        td colspan="5" class="px-6 py-4 text-center" { (page.empty_message) }
                    }
                }
            }
        }
    }
}

/// A table row with a category selector that saves as soon as it changes.
pub(crate) fn transaction_row_view(transaction: &Transaction, category_names: &[String]) -> Markup {
    let (description, tooltip) = format_description(&transaction.description_1);
    let current_category = transaction.category_label();
    let current_is_listed = category_names.iter().any(|name| name == current_category);
    let patch_url = format_endpoint(endpoints::TRANSACTION_CATEGORY, &transaction.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id.to_string())
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.transaction_date)
                {
                    (format_transaction_date(&transaction.transaction_date))
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                span title=[tooltip] { (description) }

                @if let Some(description_2) = transaction.description_2.as_deref().filter(|text| !text.is_empty()) {
                    br;
                    span class="text-xs text-gray-400" { (description_2) }
                }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.account_type) }
            td class=(TABLE_CELL_STYLE)
            {
                form
                    hx-patch=(patch_url)
                    hx-trigger="change"
                    hx-target="closest tr"
                    hx-swap="outerHTML"
                {
                    select name="category" aria-label="Category" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @if !current_is_listed {
                            option value=(current_category) selected { (current_category) }
                        }

                        @for name in category_names {
                            option value=(name) selected[name == current_category] { (name) }
                        }
                    }
                }
            }
            td class={ "px-6 py-4 text-right " (amount_class(transaction.cad_amount)) }
            {
                (format_currency(transaction.cad_amount))
            }
        }
    }
}
