//! 결과 출력 형식 변환.
//!
//! - JSON: 들여쓰기된 JSON
//! - Table: `|`로 구분된 텍스트 테이블. 레코드 목록은 키가 열이 되고,
//!   단일 객체는 `field | value` 두 열로 출력합니다.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

/// 값을 선택한 형식의 문자열로 변환합니다.
pub fn render<T: Serialize + ?Sized>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_json(data),
        OutputFormat::Table => {
            let value = serde_json::to_value(data).context("Failed to serialize output")?;
            Ok(format_table(&value))
        }
    }
}

/// JSON 형식 출력.
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize to JSON")
}

/// 테이블 형식 출력.
pub fn format_table(value: &Value) -> String {
    match value {
        Value::Array(items) if items.is_empty() => String::new(),
        Value::Array(items) if items.iter().all(Value::is_object) => {
            let headers = collect_headers(items);
            let rows: Vec<Vec<String>> = items
                .iter()
                .map(|item| {
                    headers
                        .iter()
                        .map(|h| item.get(h.as_str()).map(cell).unwrap_or_default())
                        .collect()
                })
                .collect();
            render_rows(&headers, &rows)
        }
        Value::Array(items) => {
            let headers = vec!["value".to_string()];
            let rows: Vec<Vec<String>> = items.iter().map(|v| vec![cell(v)]).collect();
            render_rows(&headers, &rows)
        }
        Value::Object(fields) => {
            let headers = vec!["field".to_string(), "value".to_string()];
            let rows: Vec<Vec<String>> = fields
                .iter()
                .map(|(k, v)| vec![k.clone(), cell(v)])
                .collect();
            render_rows(&headers, &rows)
        }
        other => cell(other),
    }
}

/// 모든 레코드의 키를 처음 등장한 순서대로 모읍니다.
///
/// 선택 필드가 생략된 레코드가 섞여 있어도 열이 빠지지 않습니다.
fn collect_headers(items: &[Value]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for fields in items.iter().filter_map(Value::as_object) {
        for key in fields.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }
    headers
}

/// 셀 문자열. null은 빈 칸, 중첩 값은 한 줄 JSON.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn render_rows(headers: &[String], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| display_width(&r[i]))
                .chain(std::iter::once(display_width(h)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(join_padded(headers, &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in rows {
        lines.push(join_padded(row, &widths));
    }
    lines.join("\n")
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(c, w)| pad(c, *w))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{}{}", s, " ".repeat(fill))
}

// 문자 수 기준 (바이트가 아님)
fn display_width(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_table_from_records() {
        let data = json!([
            {"name": "AAPL", "price": 185.5},
            {"name": "GOOGL", "price": 140.0}
        ]);

        let table = format_table(&data);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "name  | price");
        assert_eq!(lines[1], "------+------");
        assert_eq!(lines[2], "AAPL  | 185.5");
        assert_eq!(lines[3], "GOOGL | 140.0");
    }

    #[test]
    fn test_table_fills_missing_fields() {
        let data = json!([
            {"symbol": "AAPL", "price": 1},
            {"symbol": "MSFT", "price": 2, "name": "Microsoft"}
        ]);

        let table = format_table(&data);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "symbol | price | name     ");
        assert_eq!(lines[2], "AAPL   | 1     |          ");
        assert_eq!(lines[3], "MSFT   | 2     | Microsoft");
    }

    #[test]
    fn test_table_from_object() {
        let data = json!({"symbol": "AAPL", "tags": ["a", "b"], "note": null});

        let table = format_table(&data);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "field  | value    ");
        assert_eq!(lines[2], "symbol | AAPL     ");
        assert_eq!(lines[3], "tags   | [\"a\",\"b\"]");
        assert_eq!(lines[4], "note   |          ");
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        assert_eq!(format_table(&json!([])), "");
    }

    #[test]
    fn test_json_is_pretty_and_round_trips() {
        let data = json!([{"a": 1, "b": 2}]);
        let output = render(&data, OutputFormat::Json).unwrap();

        assert!(output.contains('\n'));
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, data);
    }

    proptest! {
        #[test]
        fn prop_table_lines_have_equal_width(
            rows in proptest::collection::vec(("[a-zA-Z가-힣 ]{0,12}", 0i64..1_000_000), 1..20)
        ) {
            let data = Value::Array(
                rows.iter()
                    .map(|(name, volume)| json!({"name": name, "volume": volume}))
                    .collect(),
            );

            let table = format_table(&data);
            let widths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();

            prop_assert_eq!(widths.len(), rows.len() + 2);
            prop_assert!(widths.iter().all(|w| *w == widths[0]));
        }
    }
}
