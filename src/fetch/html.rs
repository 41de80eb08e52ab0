// src/fetch/html.rs
//
// Pure HTML extraction for the pages the session visits. Kept free of any
// network code so it can be exercised on fixture markup.

use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::process::{utils::normalize_ws, LeaderboardLink, RawTableRow};

const DOB_LABEL: &str = "Date of birth:";
const SEASON_MENU: &str = r#"select[name="menupi9"] option"#;

/// Text of a cell as it renders: text nodes in order, `<br>` as a space, trimmed.
fn cell_text(cell: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in cell.descendants() {
        match node.value() {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) if e.name() == "br" => out.push(' '),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Every `a[href]` on the page, resolved against `page`.
pub fn parse_anchor_links(html: &str, page: &Url) -> Vec<LeaderboardLink> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse("a[href]").expect("anchor selector should parse");
    doc.select(&sel)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let full = page.join(href).ok()?;
            Some(LeaderboardLink::new(full.to_string(), cell_text(a)))
        })
        .collect()
}

/// The profile's "Date of birth:" line with the label removed.
pub fn parse_date_of_birth(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse("b").expect("bold selector should parse");
    let label = doc
        .select(&sel)
        .find(|b| b.text().any(|t| t.contains(DOB_LABEL)))?;
    let line = label.parent().and_then(ElementRef::wrap)?;
    let text = normalize_ws(&line.text().collect::<String>().replace(DOB_LABEL, ""));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Season values offered by the profile's year dropdown.
pub fn parse_seasons(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(SEASON_MENU).expect("season menu selector should parse");
    doc.select(&sel)
        .filter_map(|o| o.value().attr("value"))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Rows of the results table inside `#seasonDiv`, or `None` if there is no
/// such table.
pub fn parse_season_rows(html: &str) -> Option<Vec<RawTableRow>> {
    let doc = Html::parse_document(html);
    let table_sel = Selector::parse("#seasonDiv table").expect("season table selector should parse");
    let tr = Selector::parse("tr").expect("row selector should parse");
    let td = Selector::parse("td").expect("cell selector should parse");

    let table = doc.select(&table_sel).next()?;
    Some(
        table
            .select(&tr)
            .map(|row| row.select(&td).map(cell_text).collect())
            .collect(),
    )
}

/// Whether the page still shows the login form.
pub fn has_login_form(html: &str) -> bool {
    let doc = Html::parse_document(html);
    let sel = Selector::parse(r#"input[name="user"]"#).expect("login selector should parse");
    doc.select(&sel).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r##"
        <html><body>
          <div class="info"><b>Date of birth:</b> 2 Jan 1999</div>
          <select name="menupi9">
            <option value="">Season</option>
            <option value="2024">2024</option>
            <option value="2023">2023</option>
          </select>
          <div id="seasonDiv">
            <table>
              <tr><td>Long Jump</td><td>2024</td></tr>
              <tr><td></td><td>7.45/+1.2<br>X 7.60</td><td>2024</td><td><a href="#">Jane</a> Doe</td>
                  <td></td><td>Helsinki</td><td>2024-06-01</td><td></td></tr>
              <tr></tr>
            </table>
          </div>
        </body></html>
    "##;

    #[test]
    fn reads_date_of_birth() {
        assert_eq!(parse_date_of_birth(PROFILE).as_deref(), Some("2 Jan 1999"));
        assert_eq!(parse_date_of_birth("<p>nothing here</p>"), None);
        assert_eq!(parse_date_of_birth("<div><b>Date of birth:</b>  </div>"), None);
    }

    #[test]
    fn reads_season_menu() {
        assert_eq!(parse_seasons(PROFILE), vec!["2024", "2023"]);
        assert!(parse_seasons("<p></p>").is_empty());
    }

    #[test]
    fn reads_season_rows() {
        let rows = parse_season_rows(PROFILE).expect("season table present");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["Long Jump", "2024"]);
        assert_eq!(rows[1][1], "7.45/+1.2 X 7.60");
        assert_eq!(rows[1][3], "Jane Doe");
        assert_eq!(rows[1][5], "Helsinki");
        assert!(rows[2].is_empty());

        assert!(parse_season_rows("<div id='other'><table></table></div>").is_none());
    }

    #[test]
    fn resolves_anchor_links() {
        let page = Url::parse("https://www.tilastopaja.info/db/topeventall.php?Season=2024").unwrap();
        let html = r#"
            <a href="/db/at.php?Sex=2&amp;ID=501"> Jane Doe </a>
            <a href="at.php?Sex=2&amp;ID=77">A. Smith</a>
            <a name="anchor-only">skip</a>
        "#;
        let links = parse_anchor_links(html, &page);
        assert_eq!(links.len(), 2);
        assert_eq!(
            links[0],
            LeaderboardLink::new("https://www.tilastopaja.info/db/at.php?Sex=2&ID=501", "Jane Doe")
        );
        assert_eq!(
            links[1].href,
            "https://www.tilastopaja.info/db/at.php?Sex=2&ID=77"
        );
    }

    #[test]
    fn detects_login_form() {
        assert!(has_login_form(
            r#"<form><input name="user"><input id="password" type="password"></form>"#
        ));
        assert!(!has_login_form("<p>Welcome back</p>"));
    }
}
