use crate::utils::error::Result;
use serde::Deserialize;

/// 表格中的一格：大約的欄位位置與其文字行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub column: usize,
    pub lines: Vec<String>,
}

impl Cell {
    pub fn new<S: Into<String>>(column: usize, lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            column,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    /// 去掉空白行，保留原文
    pub fn content_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter(|line| !line.trim().is_empty())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(Row::is_blank)
    }
}

// PDF 抽取工具輸出的節點樹；只取需要的欄位
#[derive(Debug, Default, Deserialize)]
struct ExtractedNode {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    kids: Vec<ExtractedNode>,
    #[serde(default)]
    rows: Vec<ExtractedRow>,
    #[serde(default, rename = "list items")]
    list_items: Vec<ExtractedNode>,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractedRow {
    #[serde(default)]
    cells: Vec<ExtractedCell>,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractedCell {
    #[serde(default, rename = "column number")]
    column_number: Option<usize>,
    #[serde(default)]
    kids: Vec<ExtractedNode>,
}

/// 依文件順序取出所有 table 節點
pub fn tables_from_json(data: &[u8]) -> Result<Vec<Table>> {
    let root: ExtractedNode = serde_json::from_slice(data)?;
    let mut tables = Vec::new();
    collect_tables(&root, &mut tables);
    tracing::debug!("Found {} tables in extracted document", tables.len());
    Ok(tables)
}

fn collect_tables(node: &ExtractedNode, tables: &mut Vec<Table>) {
    if node.kind.as_deref() == Some("table") {
        tables.push(convert_table(node));
        return;
    }
    for kid in &node.kids {
        collect_tables(kid, tables);
    }
}

fn convert_table(node: &ExtractedNode) -> Table {
    let rows = node
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .cells
                .iter()
                .enumerate()
                .map(|(index, cell)| {
                    let mut lines = Vec::new();
                    for kid in &cell.kids {
                        collect_lines(kid, &mut lines);
                    }
                    Cell {
                        column: cell.column_number.unwrap_or(index),
                        lines,
                    }
                })
                .collect();
            Row::new(cells)
        })
        .collect();
    Table::new(rows)
}

fn collect_lines(node: &ExtractedNode, lines: &mut Vec<String>) {
    if let Some(content) = &node.content {
        lines.push(content.clone());
    }
    for item in &node.list_items {
        collect_lines(item, lines);
    }
    for kid in &node.kids {
        collect_lines(kid, lines);
    }
}
