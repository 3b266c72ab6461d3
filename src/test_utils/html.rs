use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body");
    let text = String::from_utf8_lossy(&body).to_string();

    Html::parse_document(&text)
}

/// Parse `<tr>` markup, which the HTML parser drops unless it is inside a table.
pub(crate) fn parse_table_rows(rows: &str) -> Html {
    Html::parse_fragment(&format!("<table><tbody>{rows}</tbody></table>"))
}

/// The text of every element matching `selector`, concatenated.
#[track_caller]
pub(crate) fn select_text(html: &Html, selector: &str) -> String {
    html.select(&Selector::parse(selector).unwrap())
        .map(|element| element.text().collect::<String>())
        .collect()
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}
