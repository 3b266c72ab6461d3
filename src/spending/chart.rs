//! HTML rendering for the spending by category pie chart.

use maud::{Markup, html};

use crate::{
    backend::DateFilter,
    html::{format_currency, loading_spinner},
    viewer::category_url,
};

use super::geometry::{PieGeometry, PieSlice};

/// The opacity of slices that are not highlighted while another slice is.
const DIMMED_OPACITY: &str = "0.5";

/// The element the chart is loaded into.
///
/// The chart is fetched from `src` when the page loads and again whenever a
/// response triggers the `spending-changed` event.
pub fn chart_container(src: &str) -> Markup {
    html! {
        div
            id="spending-chart"
            hx-get=(src)
            hx-trigger="load, spending-changed from:body"
            hx-swap="innerHTML"
            class="p-4 rounded-lg bg-white dark:bg-gray-800"
        {
            div class="flex items-center justify-center h-64 text-gray-500"
            {
                (loading_spinner())
                "Loading chart..."
            }
        }
    }
}

/// The chart shown when the transactions could not be loaded.
pub fn chart_error_view(message: &str) -> Markup {
    html! {
        div role="alert" class="flex items-center justify-center h-64 text-red-600 dark:text-red-400"
        {
            "Error: " (message)
        }
    }
}

/// The chart shown when there are no expenses.
pub fn chart_empty_view() -> Markup {
    html! {
        div class="flex items-center justify-center h-64 text-gray-500"
        {
            "No transactions found"
        }
    }
}

/// Draw `slices` as a pie chart with a legend.
///
/// Each slice and legend entry links to the transactions for its category
/// within `dates`.
pub fn pie_chart_view(slices: &[PieSlice], geometry: PieGeometry, dates: &DateFilter) -> Markup {
    if slices.is_empty() {
        return chart_empty_view();
    }

    let grand_total: f64 = slices.iter().map(|slice| slice.total).sum();
    let has_highlight = slices.iter().any(|slice| slice.is_highlighted);
    let view_box = format!(
        "{} {} {} {}",
        geometry.cx - geometry.radius - 20.0,
        geometry.cy - geometry.radius - 20.0,
        2.0 * (geometry.radius + 20.0),
        2.0 * (geometry.radius + 20.0)
    );

    html! {
        div class="flex flex-col items-center gap-4"
        {
            svg
                width="300"
                height="300"
                viewBox=(view_box)
                role="img"
                aria-label="Spending by category"
                xmlns="http://www.w3.org/2000/svg"
            {
                @for slice in slices {
                    a href=(category_url(&slice.category, dates))
                    {
                        path
                            class="pie-slice"
                            d=(slice.path)
                            fill=(slice.color)
                            stroke="white"
                            stroke-width="1"
                            opacity=[(has_highlight && !slice.is_highlighted).then_some(DIMMED_OPACITY)]
                        {
                            title { (slice.category) ": " (format_percentage(slice.percentage)) }
                        }
                    }
                }

                circle
                    cx=(geometry.cx)
                    cy=(geometry.cy)
                    r=(geometry.radius / 2.0)
                    fill="white" {}
                text
                    x=(geometry.cx)
                    y=(geometry.cy)
                    text-anchor="middle"
                    dominant-baseline="middle"
                    font-size="12"
                    font-weight="bold"
                    fill="#111827"
                {
                    (format_currency(grand_total))
                }
            }

            ul id="spending-legend" class="w-full space-y-1 text-sm"
            {
                @for slice in slices {
                    li
                    {
                        a
                            href=(category_url(&slice.category, dates))
                            class=(legend_entry_style(slice.is_highlighted))
                        {
                            span
                                class="inline-block w-3 h-3 rounded-sm"
                                style={ "background-color: " (slice.color) } {}
                            span class="flex-1" { (slice.category) }
                            span class="text-gray-500" { (format_percentage(slice.percentage)) }
                            span { (format_currency(slice.total)) }
                        }
                    }
                }
            }
        }
    }
}

fn legend_entry_style(is_highlighted: bool) -> &'static str {
    if is_highlighted {
        "flex items-center gap-2 px-2 py-1 rounded font-bold bg-gray-100 dark:bg-gray-700"
    } else {
        "flex items-center gap-2 px-2 py-1 rounded hover:bg-gray-100 dark:hover:bg-gray-700"
    }
}

fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.1}%")
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        backend::{DateFilter, test_transaction},
        spending::{
            aggregation::{Palette, aggregate},
            geometry::{PieGeometry, build_slices},
        },
    };

    use super::{chart_container, chart_error_view, pie_chart_view};

    fn render_chart(highlight: Option<&str>) -> Html {
        let transactions = [
            test_transaction(1, "Food", -75.0),
            test_transaction(2, "Gas", -25.0),
            test_transaction(3, "Pay", 500.0),
        ];
        let totals = aggregate(&transactions, &Palette::default()).unwrap();
        let slices = build_slices(&totals, PieGeometry::default(), highlight);

        let markup = pie_chart_view(&slices, PieGeometry::default(), &DateFilter::default());

        Html::parse_fragment(&markup.into_string())
    }

    #[test]
    fn container_loads_on_page_load_and_on_change() {
        let markup = chart_container("/spending?highlight=Food").into_string();
        let html = Html::parse_fragment(&markup);

        let container = html
            .select(&Selector::parse("#spending-chart").unwrap())
            .next()
            .unwrap();
        assert_eq!(
            container.value().attr("hx-get"),
            Some("/spending?highlight=Food")
        );
        assert_eq!(
            container.value().attr("hx-trigger"),
            Some("load, spending-changed from:body")
        );
        assert!(container.text().collect::<String>().contains("Loading chart..."));
    }

    #[test]
    fn draws_one_slice_per_category() {
        let html = render_chart(None);

        let paths: Vec<_> = html
            .select(&Selector::parse("path.pie-slice").unwrap())
            .collect();
        assert_eq!(paths.len(), 2);
        assert!(
            paths
                .iter()
                .all(|path| path.value().attr("opacity").is_none())
        );
    }

    #[test]
    fn legend_shows_percentage_and_total() {
        let html = render_chart(None);

        let entries: Vec<_> = html
            .select(&Selector::parse("#spending-legend li").unwrap())
            .map(|entry| entry.text().collect::<String>())
            .collect();
        assert_eq!(entries, ["Food75.0%$75.00", "Gas25.0%$25.00"]);
    }

    #[test]
    fn legend_links_to_category() {
        let html = render_chart(None);

        let link = html
            .select(&Selector::parse("#spending-legend a").unwrap())
            .next()
            .unwrap();
        assert_eq!(link.value().attr("href"), Some("/transactions?category=Food"));
    }

    #[test]
    fn dims_slices_that_are_not_highlighted() {
        let html = render_chart(Some("Gas"));

        let opacities: Vec<_> = html
            .select(&Selector::parse("path.pie-slice").unwrap())
            .map(|path| path.value().attr("opacity"))
            .collect();
        assert_eq!(opacities, [Some("0.5"), None]);
    }

    #[test]
    fn shows_grand_total_in_center() {
        let html = render_chart(None);

        let text = html
            .select(&Selector::parse("svg text").unwrap())
            .next()
            .unwrap();
        assert_eq!(text.text().collect::<String>(), "$100.00");
    }

    #[test]
    fn no_slices_shows_placeholder() {
        let markup = pie_chart_view(&[], PieGeometry::default(), &DateFilter::default());

        assert!(markup.into_string().contains("No transactions found"));
    }

    #[test]
    fn error_view_shows_message() {
        let markup = chart_error_view("Could not reach the transaction server.");

        assert!(
            markup
                .into_string()
                .contains("Error: Could not reach the transaction server.")
        );
    }
}
