//! 一覧ページのHTML解析
//!
//! ページ数の検出とテーブル行の抽出。どちらもHTML文字列のみを扱い、取得は行わない。

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::types::{DebugSnapshot, ItemRecord};

/// アイテム一覧テーブルとみなすヘッダーセル数の下限
pub const MIN_HEADER_CELLS: usize = 5;
/// 有効なデータ行のセル数の下限
pub const MIN_ROW_CELLS: usize = 5;
/// デバッグ表示する先頭行数
const DEBUG_ROW_COUNT: usize = 3;

const QUANTITY_COLUMN: usize = 0;
const NAME_COLUMN: usize = 1;
const PRICE_COLUMN: usize = 3;

mod selectors {
    use super::*;

    pub static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
    pub static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
    pub static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
    pub static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
    pub static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
}

static RE_PAGE_OF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Page \d+ of (\d+)").unwrap());
static RE_PRICE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$(\d+\.\d+)").unwrap());
static RE_PAGE_PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?p=\d+$").unwrap());

/// 1ページ分の抽出結果
#[derive(Debug, Clone, Default)]
pub struct PageExtraction {
    pub records: Vec<ItemRecord>,
    /// debug指定時のみ
    pub debug: Option<DebugSnapshot>,
}

/// 末尾の `?p=<n>` を取り除いた基底URL
pub fn strip_page_param(url: &str) -> String {
    RE_PAGE_PARAM.replace(url, "").into_owned()
}

/// ページ番号付きURL（1ページ目は基底URLそのまま）
pub fn page_url(base_url: &str, page: u32) -> String {
    if page <= 1 {
        base_url.to_string()
    } else {
        format!("{}?p={}", base_url, page)
    }
}

/// 総ページ数を検出（最低1）
///
/// "Page X of N" のテキストがあればN、なければ `?p=` リンクの最大値。
pub fn discover_total_pages(html: &str) -> u32 {
    let document = Html::parse_document(html);

    let stated = document
        .root_element()
        .text()
        .find_map(|text| RE_PAGE_OF.captures(text))
        .and_then(|caps| caps[1].parse::<u32>().ok());
    if let Some(total) = stated {
        debug!("Found page indicator: {} pages", total);
        return total.max(1);
    }

    document
        .select(&selectors::LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains("?p="))
        .filter_map(|href| href.rsplit('=').next()?.parse::<u32>().ok())
        .fold(1, u32::max)
}

/// 一覧テーブルからアイテム行を抽出
///
/// ヘッダーセルが5個以上ある最初の<table>を一覧とみなす（ヒューリスティック）。
/// 見つからなければ空。
pub fn extract_rows(html: &str, with_debug: bool, preview_len: usize) -> PageExtraction {
    let document = Html::parse_document(html);
    let tables: Vec<ElementRef> = document.select(&selectors::TABLE).collect();

    let table = tables
        .iter()
        .find(|t| t.select(&selectors::HEADER_CELL).count() >= MIN_HEADER_CELLS);

    let Some(table) = table else {
        debug!("No item table among {} tables", tables.len());
        return PageExtraction {
            records: Vec::new(),
            debug: with_debug.then(|| DebugSnapshot {
                table_count: tables.len(),
                table_preview: tables.first().map(|t| truncate_chars(&t.html(), preview_len)),
                first_rows: Vec::new(),
            }),
        };
    };

    let rows: Vec<Vec<String>> = table
        .select(&selectors::ROW)
        .skip(1)
        .map(|row| row.select(&selectors::CELL).map(cell_text).collect())
        .collect();

    let snapshot = with_debug.then(|| DebugSnapshot {
        table_count: tables.len(),
        table_preview: tables.first().map(|t| truncate_chars(&t.html(), preview_len)),
        first_rows: rows.iter().take(DEBUG_ROW_COUNT).cloned().collect(),
    });

    let records: Vec<ItemRecord> = rows
        .iter()
        .filter(|cells| cells.len() >= MIN_ROW_CELLS)
        .map(|cells| {
            ItemRecord::new(
                cells[NAME_COLUMN].as_str(),
                parse_quantity(&cells[QUANTITY_COLUMN]),
                parse_price(&cells[PRICE_COLUMN]),
            )
        })
        .collect();

    debug!("Extracted {} records from {} rows", records.len(), rows.len());

    PageExtraction {
        records,
        debug: snapshot,
    }
}

/// 数量（解析不能なら1）
pub fn parse_quantity(text: &str) -> u32 {
    text.trim().parse().unwrap_or(1)
}

/// `$` 直後の小数を価格とする（なければ0）
pub fn parse_price(text: &str) -> Decimal {
    RE_PRICE
        .captures(text)
        .and_then(|caps| Decimal::from_str(&caps[1]).ok())
        .unwrap_or(Decimal::ZERO)
}

/// セル内テキストノードをtrimして連結
fn cell_text(cell: ElementRef) -> String {
    cell.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str =
        "<tr><th>Qty</th><th>Name</th><th>Edition</th><th>Price</th><th>Condition</th></tr>";

    fn page(rows: &str) -> String {
        format!(
            r#"<html><body>
            <table class="nav"><tr><td><a href="/">Home</a></td></tr></table>
            <table class="items">{HEADER}{rows}</table>
            </body></html>"#
        )
    }

    fn row(qty: &str, name: &str, price: &str) -> String {
        format!("<tr><td>{qty}</td><td>{name}</td><td>Alpha</td><td>{price}</td><td>NM</td></tr>")
    }

    #[test]
    fn test_strip_page_param() {
        assert_eq!(strip_page_param("https://x.test/sets/1?p=3"), "https://x.test/sets/1");
        assert_eq!(strip_page_param("https://x.test/sets/1"), "https://x.test/sets/1");
        assert_eq!(
            strip_page_param("https://x.test/sets/1?p=3&s=name"),
            "https://x.test/sets/1?p=3&s=name"
        );
    }

    #[test]
    fn test_page_url() {
        assert_eq!(page_url("https://x.test/sets/1", 1), "https://x.test/sets/1");
        assert_eq!(page_url("https://x.test/sets/1", 4), "https://x.test/sets/1?p=4");
    }

    #[test]
    fn test_discover_page_indicator() {
        let html = "<html><body><div class='pager'>Page 2 of 5</div></body></html>";
        assert_eq!(discover_total_pages(html), 5);
    }

    #[test]
    fn test_discover_from_links() {
        let html = r#"<html><body>
            <a href="/sets/1?p=2">2</a>
            <a href="/sets/1?p=7">7</a>
            <a href="/sets/1?p=abc">bad</a>
            <a href="/other">other</a>
        </body></html>"#;
        assert_eq!(discover_total_pages(html), 7);
    }

    #[test]
    fn test_discover_defaults_to_one() {
        assert_eq!(discover_total_pages("<html><body>nothing</body></html>"), 1);
        assert_eq!(discover_total_pages("<div>Page 1 of 0</div>"), 1);
    }

    #[test]
    fn test_extract_rows() {
        let html = page(&format!(
            "{}{}",
            row("3", "Bolt", "$2.50"),
            row("1", "Lightning Helix", "<span>$0.75</span>")
        ));
        let result = extract_rows(&html, false, 2000);

        assert_eq!(
            result.records,
            vec![
                ItemRecord::new("Bolt", 3, Decimal::new(250, 2)),
                ItemRecord::new("Lightning Helix", 1, Decimal::new(75, 2)),
            ]
        );
        assert_eq!(result.records[0].line_total, Decimal::new(750, 2));
        assert!(result.debug.is_none());
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let html = page(&format!(
            "<tr><td>2</td><td>Stub</td><td>$9.99</td></tr>{}",
            row("1", "Bolt", "$2.50")
        ));
        let result = extract_rows(&html, false, 2000);

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].name, "Bolt");
    }

    #[test]
    fn test_unparsable_fields_use_defaults() {
        let html = page(&row("x", "Mystery", "n/a"));
        let result = extract_rows(&html, false, 2000);

        assert_eq!(result.records, vec![ItemRecord::new("Mystery", 1, Decimal::ZERO)]);
    }

    #[test]
    fn test_overflowing_line_total_defaults_price() {
        let html = page(&format!(
            "{}{}",
            row("1000", "Vault", "$100000000000000000000000000.00"),
            row("2", "Bolt", "$2.50")
        ));
        let result = extract_rows(&html, false, 2000);

        assert_eq!(
            result.records,
            vec![
                ItemRecord::new("Vault", 1000, Decimal::ZERO),
                ItemRecord::new("Bolt", 2, Decimal::new(250, 2)),
            ]
        );
        assert_eq!(result.records[0].line_total, Decimal::ZERO);
    }

    #[test]
    fn test_no_item_table() {
        let html = "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>";
        let result = extract_rows(html, true, 2000);

        assert!(result.records.is_empty());
        let snapshot = result.debug.unwrap();
        assert_eq!(snapshot.table_count, 1);
        assert!(snapshot.first_rows.is_empty());
    }

    #[test]
    fn test_debug_snapshot() {
        let html = page(&format!(
            "{}{}{}{}",
            row("1", "A", "$1.00"),
            row("2", "B", "$2.00"),
            row("3", "C", "$3.00"),
            row("4", "D", "$4.00")
        ));
        let result = extract_rows(&html, true, 16);
        let snapshot = result.debug.unwrap();

        assert_eq!(snapshot.table_count, 2);
        assert_eq!(snapshot.table_preview.as_deref().map(|p| p.chars().count()), Some(16));
        assert_eq!(snapshot.first_rows.len(), 3);
        assert_eq!(snapshot.first_rows[0], vec!["1", "A", "Alpha", "$1.00", "NM"]);
        assert_eq!(result.records.len(), 4);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("USD $12.34"), Decimal::new(1234, 2));
        assert_eq!(parse_price("$5"), Decimal::ZERO);
        assert_eq!(parse_price("12.34"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("4"), 4);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("-2"), 1);
    }
}
