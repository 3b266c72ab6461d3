//! This modules defines the common functionality for paging data.

use maud::{Markup, html};

use crate::html::LINK_STYLE;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The number of transactions to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The page sizes the user may choose from.
    pub page_size_options: Vec<u64>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            page_size_options: vec![10, 25, 50, 100],
        }
    }
}

impl PaginationConfig {
    /// Use `page_size` if it is one of the options, otherwise the default.
    pub fn normalize_page_size(&self, page_size: Option<u64>) -> u64 {
        match page_size {
            Some(size) if self.page_size_options.contains(&size) => size,
            _ => self.default_page_size,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

/// Choose the page links to show for `curr_page` out of `page_count` pages.
///
/// The first and last pages are always shown along with the pages either side
/// of the current page. Each run of hidden pages becomes a single ellipsis.
/// Returns no indicators when there is at most one page.
pub fn create_pagination_indicators(curr_page: u64, page_count: u64) -> Vec<PaginationIndicator> {
    if page_count <= 1 {
        return Vec::new();
    }

    let curr_page = curr_page.clamp(1, page_count);
    let window_start = curr_page.saturating_sub(1).max(1);
    let window_end = (curr_page + 1).min(page_count);

    let mut pages = vec![1];
    pages.extend(window_start..=window_end);
    pages.push(page_count);
    pages.dedup();

    let mut indicators = Vec::with_capacity(pages.len() + 4);

    if curr_page > 1 {
        indicators.push(PaginationIndicator::BackButton(curr_page - 1));
    }

    let mut previous = 0;
    for page in pages {
        if previous != 0 && page > previous + 1 {
            indicators.push(PaginationIndicator::Ellipsis);
        }

        indicators.push(if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        });
        previous = page;
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

/// Render `indicators` as a list of links, using `page_url` to build the link for a page.
pub fn pagination_view(
    indicators: &[PaginationIndicator],
    page_url: impl Fn(u64) -> String,
) -> Markup {
    if indicators.is_empty() {
        return html! {};
    }

    html! {
        nav class="pagination flex justify-center my-4" aria-label="Pagination"
        {
            ul class="pagination flex items-center gap-3"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(*page)) class=(LINK_STYLE) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span
                                    aria-current="page"
                                    class="px-2 py-1 rounded font-bold text-white bg-blue-600"
                                {
                                    (page)
                                }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="text-gray-500" { "..." }
                            }
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(*page)) role="button" class=(LINK_STYLE) { "Back" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(*page)) role="button" class=(LINK_STYLE) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::pagination::{
        PaginationConfig, PaginationIndicator, create_pagination_indicators, pagination_view,
    };

    #[test]
    fn single_page_has_no_indicators() {
        assert!(create_pagination_indicators(1, 1).is_empty());
        assert!(create_pagination_indicators(1, 0).is_empty());
    }

    #[test]
    fn shows_all_pages_when_few() {
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(1, 3);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn collapses_trailing_gap() {
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(1, 10);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn collapses_both_gaps() {
        let want = [
            PaginationIndicator::BackButton(4),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(4),
            PaginationIndicator::CurrPage(5),
            PaginationIndicator::Page(6),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(6),
        ];

        let got = create_pagination_indicators(5, 10);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn no_ellipsis_for_adjacent_pages() {
        let want = [
            PaginationIndicator::BackButton(2),
            PaginationIndicator::Page(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::CurrPage(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(4),
        ];

        let got = create_pagination_indicators(3, 10);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn last_page_has_no_next_button() {
        let want = [
            PaginationIndicator::BackButton(9),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(9),
            PaginationIndicator::CurrPage(10),
        ];

        let got = create_pagination_indicators(10, 10);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn clamps_current_page_past_the_end() {
        let got = create_pagination_indicators(42, 3);

        assert_eq!(
            got,
            [
                PaginationIndicator::BackButton(2),
                PaginationIndicator::Page(1),
                PaginationIndicator::Page(2),
                PaginationIndicator::CurrPage(3),
            ]
        );
    }

    #[test]
    fn page_size_falls_back_to_default() {
        let config = PaginationConfig::default();

        assert_eq!(config.normalize_page_size(Some(25)), 25);
        assert_eq!(config.normalize_page_size(Some(7)), 10);
        assert_eq!(config.normalize_page_size(None), 10);
    }

    #[test]
    fn view_renders_links_for_other_pages() {
        let indicators = create_pagination_indicators(2, 3);

        let markup = pagination_view(&indicators, |page| format!("/transactions?page={page}"));
        let html = Html::parse_fragment(&markup.into_string());

        let links: Vec<_> = html
            .select(&Selector::parse("a").unwrap())
            .map(|link| link.value().attr("href").unwrap().to_owned())
            .collect();
        assert_eq!(
            links,
            [
                "/transactions?page=1",
                "/transactions?page=1",
                "/transactions?page=3",
                "/transactions?page=3",
            ]
        );
        let current = html
            .select(&Selector::parse("[aria-current=page]").unwrap())
            .next()
            .unwrap();
        assert_eq!(current.text().collect::<String>(), "2");
    }
}
