// 📋 Table State Engine - pagination, column visibility and sorting
// Rendering is a pure projection of (TableState, data); state only changes
// through the named transitions on `Table`.

use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_PAGE_SIZE: usize = 10;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("column cannot be hidden: {0}")]
    NotHideable(String),

    #[error("column cannot be sorted: {0}")]
    NotSortable(String),

    #[error("page size must be at least 1")]
    InvalidPageSize,
}

// ============================================================================
// CELL VALUES & RENDERED CONTENT
// ============================================================================

/// Raw value read from a row by a column accessor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CellValue {
    Text(String),
    List(Vec<String>),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Plain-text rendition, lists joined with ", "
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::List(items) => items.join(", "),
        }
    }
}

/// What a cell renderer produces. Front ends (HTML, TUI) draw these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Text { text: String, emphasis: bool },
    Badge { label: String, class: String },
    Pills(Vec<String>),
}

impl CellContent {
    pub fn plain(text: impl Into<String>) -> Self {
        CellContent::Text {
            text: text.into(),
            emphasis: false,
        }
    }
}

pub type Accessor<T> = fn(&T) -> CellValue;
pub type CellRenderer = fn(&CellValue) -> CellContent;

fn default_cell(value: &CellValue) -> CellContent {
    CellContent::plain(value.display())
}

// ============================================================================
// COLUMN DEFINITION
// ============================================================================

/// Column descriptor: a data field, its header label and an optional renderer.
pub struct ColumnDef<T> {
    pub id: &'static str,
    pub header: &'static str,
    accessor: Accessor<T>,
    cell: Option<CellRenderer>,
    sort_value: Option<Accessor<T>>,
    pub enable_hiding: bool,
    pub enable_sorting: bool,
}

impl<T> ColumnDef<T> {
    pub fn accessor(id: &'static str, header: &'static str, accessor: Accessor<T>) -> Self {
        ColumnDef {
            id,
            header,
            accessor,
            cell: None,
            sort_value: None,
            enable_hiding: true,
            enable_sorting: true,
        }
    }

    pub fn cell(mut self, renderer: CellRenderer) -> Self {
        self.cell = Some(renderer);
        self
    }

    /// Sort on a derived key instead of the displayed value
    pub fn sort_by(mut self, key: Accessor<T>) -> Self {
        self.sort_value = Some(key);
        self
    }

    pub fn hiding(mut self, enabled: bool) -> Self {
        self.enable_hiding = enabled;
        self
    }

    pub fn sorting(mut self, enabled: bool) -> Self {
        self.enable_sorting = enabled;
        self
    }

    pub fn value(&self, row: &T) -> CellValue {
        (self.accessor)(row)
    }

    pub fn render(&self, row: &T) -> CellContent {
        let value = self.value(row);
        self.cell.unwrap_or(default_cell)(&value)
    }

    pub fn sort_key(&self, row: &T) -> CellValue {
        self.sort_value.unwrap_or(self.accessor)(row)
    }
}

// ============================================================================
// TABLE STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column_id: String,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(column_id: &str) -> Self {
        SortKey {
            column_id: column_id.to_string(),
            descending: false,
        }
    }

    pub fn desc(column_id: &str) -> Self {
        SortKey {
            column_id: column_id.to_string(),
            descending: true,
        }
    }

    /// Unsorted or other column -> ascending -> descending -> unsorted
    pub fn cycle(current: Option<&SortKey>, column_id: &str) -> Option<SortKey> {
        match current {
            Some(k) if k.column_id == column_id && !k.descending => Some(SortKey::desc(column_id)),
            Some(k) if k.column_id == column_id => None,
            _ => Some(SortKey::asc(column_id)),
        }
    }
}

/// Page index, page size, per-column visibility and sort key.
///
/// A column absent from `column_visibility` is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    page_index: usize,
    page_size: usize,
    column_visibility: HashMap<String, bool>,
    sorting: Option<SortKey>,
}

impl Default for TableState {
    fn default() -> Self {
        TableState {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            column_visibility: HashMap::new(),
            sorting: None,
        }
    }
}

impl TableState {
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn sorting(&self) -> Option<&SortKey> {
        self.sorting.as_ref()
    }

    pub fn is_visible(&self, column_id: &str) -> bool {
        self.column_visibility
            .get(column_id)
            .copied()
            .unwrap_or(true)
    }
}

// ============================================================================
// HEADERS & ROWS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub id: String,
    pub column_id: &'static str,
    pub label: &'static str,
    pub sorted: Option<bool>, // Some(descending) when this column is the sort key
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderGroup {
    pub id: String,
    pub headers: Vec<Header>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub id: String,
    pub column_id: &'static str,
    pub content: CellContent,
}

#[derive(Debug, Clone)]
pub struct Row<'a, T> {
    /// Index into the dataset, stable across sorting and paging
    pub id: String,
    pub original: &'a T,
    pub cells: Vec<Cell>,
}

// ============================================================================
// TABLE
// ============================================================================

pub struct Table<T> {
    data: Vec<T>,
    columns: Vec<ColumnDef<T>>,
    state: TableState,
}

impl<T> Table<T> {
    /// Initial state: page 0, all columns visible, no sorting
    pub fn new(data: Vec<T>, columns: Vec<ColumnDef<T>>) -> Self {
        Table {
            data,
            columns,
            state: TableState::default(),
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn all_columns(&self) -> &[ColumnDef<T>] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Result<&ColumnDef<T>, TableError> {
        self.columns
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| TableError::UnknownColumn(id.to_string()))
    }

    pub fn is_column_visible(&self, id: &str) -> bool {
        self.state.is_visible(id)
    }

    pub fn visible_columns(&self) -> Vec<&ColumnDef<T>> {
        self.columns
            .iter()
            .filter(|c| self.state.is_visible(c.id))
            .collect()
    }

    pub fn header_group(&self) -> HeaderGroup {
        let sorting = self.state.sorting.as_ref();

        let headers = self
            .visible_columns()
            .into_iter()
            .map(|c| Header {
                id: c.id.to_string(),
                column_id: c.id,
                label: c.header,
                sorted: sorting
                    .filter(|s| s.column_id == c.id)
                    .map(|s| s.descending),
            })
            .collect();

        HeaderGroup {
            id: "0".to_string(),
            headers,
        }
    }

    // ------------------------------------------------------------------------
    // Pagination queries
    // ------------------------------------------------------------------------

    /// Never less than 1, even for an empty dataset
    pub fn page_count(&self) -> usize {
        self.data.len().div_ceil(self.state.page_size).max(1)
    }

    pub fn can_previous_page(&self) -> bool {
        self.state.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.state.page_index + 1 < self.page_count()
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    pub fn next_page(&mut self) {
        if self.can_next_page() {
            self.state.page_index += 1;
            debug!(page = self.state.page_index, "next page");
        }
    }

    pub fn previous_page(&mut self) {
        if self.can_previous_page() {
            self.state.page_index -= 1;
            debug!(page = self.state.page_index, "previous page");
        }
    }

    /// Clamps to the last page
    pub fn set_page_index(&mut self, index: usize) {
        self.state.page_index = index.min(self.page_count() - 1);
        debug!(page = self.state.page_index, "set page index");
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<(), TableError> {
        if size == 0 {
            return Err(TableError::InvalidPageSize);
        }
        self.state.page_size = size;
        self.state.page_index = 0;
        debug!(size, "set page size");
        Ok(())
    }

    pub fn toggle_column_visibility(&mut self, id: &str, visible: bool) -> Result<(), TableError> {
        let column = self.column(id)?;
        if !visible && !column.enable_hiding {
            return Err(TableError::NotHideable(id.to_string()));
        }
        let key = column.id.to_string();

        self.state.column_visibility.insert(key, visible);
        debug!(column = id, visible, "column visibility");
        Ok(())
    }

    /// Flip one column's visibility, returning the new flag
    pub fn toggle_column(&mut self, id: &str) -> Result<bool, TableError> {
        let visible = !self.is_column_visible(id);
        self.toggle_column_visibility(id, visible)?;
        Ok(visible)
    }

    pub fn set_sorting(&mut self, key: Option<SortKey>) -> Result<(), TableError> {
        if let Some(ref k) = key {
            let column = self.column(&k.column_id)?;
            if !column.enable_sorting {
                return Err(TableError::NotSortable(k.column_id.clone()));
            }
        }
        debug!(sorting = ?key, "set sorting");
        self.state.sorting = key;
        Ok(())
    }

    /// Cycle a column through ascending, descending and unsorted
    pub fn toggle_sorting(&mut self, id: &str) -> Result<Option<SortKey>, TableError> {
        let next = SortKey::cycle(self.state.sorting.as_ref(), id);
        self.set_sorting(next.clone())?;
        Ok(next)
    }

    pub fn reset(&mut self) {
        self.state = TableState::default();
    }

    // ------------------------------------------------------------------------
    // Row models
    // ------------------------------------------------------------------------

    /// Dataset indices in display order (sorted, not paginated)
    pub fn core_rows(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.data.len()).collect();

        let column = self
            .state
            .sorting
            .as_ref()
            .and_then(|k| self.column(&k.column_id).ok().map(|c| (c, k.descending)));

        if let Some((column, descending)) = column {
            let keys: Vec<CellValue> = self.data.iter().map(|row| column.sort_key(row)).collect();
            // stable in both directions: ties keep dataset order
            if descending {
                order.sort_by(|&a, &b| keys[b].cmp(&keys[a]));
            } else {
                order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
            }
        }

        order
    }

    /// Rows on the current page, with cells for visible columns only
    pub fn row_model(&self) -> Vec<Row<'_, T>> {
        let visible = self.visible_columns();
        let start = self.state.page_index * self.state.page_size;

        self.core_rows()
            .into_iter()
            .skip(start)
            .take(self.state.page_size)
            .map(|index| {
                let original = &self.data[index];
                let id = index.to_string();
                let cells = visible
                    .iter()
                    .map(|c| Cell {
                        id: format!("{}_{}", id, c.id),
                        column_id: c.id,
                        content: c.render(original),
                    })
                    .collect();

                Row { id, original, cells }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        name: &'static str,
        rank: u32,
        tags: Vec<&'static str>,
    }

    fn items(n: u32) -> Vec<Item> {
        (0..n)
            .map(|i| Item {
                name: ["delta", "alpha", "charlie", "bravo"][(i % 4) as usize],
                rank: i,
                tags: vec!["t"],
            })
            .collect()
    }

    fn columns() -> Vec<ColumnDef<Item>> {
        vec![
            ColumnDef::accessor("name", "Name", |i: &Item| CellValue::text(i.name)),
            ColumnDef::accessor("rank", "Rank", |i: &Item| CellValue::Text(format!("{:03}", i.rank)))
                .hiding(false),
            ColumnDef::accessor("tags", "Tags", |i: &Item| {
                CellValue::List(i.tags.iter().map(|t| t.to_string()).collect())
            })
            .cell(|v| match v {
                CellValue::List(items) => CellContent::Pills(items.clone()),
                other => CellContent::plain(other.display()),
            })
            .sorting(false),
        ]
    }

    fn names(table: &Table<Item>) -> Vec<&'static str> {
        table.row_model().iter().map(|r| r.original.name).collect()
    }

    #[test]
    fn test_initial_state() {
        let table = Table::new(items(5), columns());

        assert_eq!(table.state().page_index(), 0);
        assert_eq!(table.state().page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(table.state().sorting(), None);
        assert_eq!(table.visible_columns().len(), 3);
        assert_eq!(table.row_model().len(), 5);
        assert_eq!(table.page_count(), 1);
        assert!(!table.can_previous_page());
        assert!(!table.can_next_page());
    }

    #[test]
    fn test_pagination_bounds() {
        let mut table = Table::new(items(25), columns());
        assert_eq!(table.page_count(), 3);

        table.previous_page(); // no-op on first page
        assert_eq!(table.state().page_index(), 0);

        table.next_page();
        assert!(table.can_previous_page());
        assert!(table.can_next_page());
        assert_eq!(table.row_model()[0].id, "10");

        table.next_page();
        assert!(!table.can_next_page());
        assert_eq!(table.row_model().len(), 5);

        table.next_page(); // no-op on last page
        assert_eq!(table.state().page_index(), 2);
    }

    #[test]
    fn test_buttons_track_page_for_every_index() {
        let mut table = Table::new(items(23), columns());
        table.set_page_size(4).unwrap();
        let last = table.page_count() - 1;

        for page in 0..=last {
            table.set_page_index(page);
            assert_eq!(table.can_previous_page(), page != 0);
            assert_eq!(table.can_next_page(), page != last);
        }
    }

    #[test]
    fn test_set_page_index_clamps() {
        let mut table = Table::new(items(12), columns());
        table.set_page_index(99);
        assert_eq!(table.state().page_index(), 1);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut table = Table::new(items(12), columns());
        table.next_page();
        table.set_page_size(3).unwrap();

        assert_eq!(table.state().page_index(), 0);
        assert_eq!(table.page_count(), 4);
        assert_eq!(table.set_page_size(0), Err(TableError::InvalidPageSize));
    }

    #[test]
    fn test_empty_table_has_one_page() {
        let table: Table<Item> = Table::new(vec![], columns());
        assert_eq!(table.page_count(), 1);
        assert!(table.row_model().is_empty());
        assert!(!table.can_next_page());
    }

    #[test]
    fn test_toggle_visibility_removes_exactly_one_column() {
        let mut table = Table::new(items(2), columns());

        table.toggle_column_visibility("name", false).unwrap();
        let headers: Vec<&str> = table.header_group().headers.iter().map(|h| h.column_id).collect();
        assert_eq!(headers, vec!["rank", "tags"]);
        for row in table.row_model() {
            let cols: Vec<&str> = row.cells.iter().map(|c| c.column_id).collect();
            assert_eq!(cols, vec!["rank", "tags"]);
        }

        assert!(table.toggle_column("name").unwrap());
        let headers: Vec<&str> = table.header_group().headers.iter().map(|h| h.column_id).collect();
        assert_eq!(headers, vec!["name", "rank", "tags"]);
    }

    #[test]
    fn test_visibility_errors() {
        let mut table = Table::new(items(2), columns());

        assert_eq!(
            table.toggle_column_visibility("nope", false),
            Err(TableError::UnknownColumn("nope".to_string()))
        );
        assert_eq!(
            table.toggle_column_visibility("rank", false),
            Err(TableError::NotHideable("rank".to_string()))
        );
        // showing a non-hideable column is always allowed
        assert!(table.toggle_column_visibility("rank", true).is_ok());
    }

    #[test]
    fn test_sorting_cycle() {
        let mut table = Table::new(items(4), columns());
        let original = names(&table);

        assert_eq!(table.toggle_sorting("name").unwrap(), Some(SortKey::asc("name")));
        assert_eq!(names(&table), vec!["alpha", "bravo", "charlie", "delta"]);

        assert_eq!(table.toggle_sorting("name").unwrap(), Some(SortKey::desc("name")));
        assert_eq!(names(&table), vec!["delta", "charlie", "bravo", "alpha"]);

        assert_eq!(table.toggle_sorting("name").unwrap(), None);
        assert_eq!(names(&table), original);
    }

    #[test]
    fn test_sorting_is_stable() {
        let mut table = Table::new(items(8), columns());
        table.set_sorting(Some(SortKey::asc("name"))).unwrap();

        let ranks: Vec<u32> = table.row_model().iter().map(|r| r.original.rank).collect();
        assert_eq!(ranks, vec![1, 5, 3, 7, 2, 6, 0, 4]);

        table.set_sorting(Some(SortKey::desc("name"))).unwrap();
        let ranks: Vec<u32> = table.row_model().iter().map(|r| r.original.rank).collect();
        assert_eq!(ranks, vec![0, 4, 2, 6, 3, 7, 1, 5]);
    }

    #[test]
    fn test_sorting_errors() {
        let mut table = Table::new(items(2), columns());
        assert_eq!(
            table.toggle_sorting("tags"),
            Err(TableError::NotSortable("tags".to_string()))
        );
        assert!(table.set_sorting(Some(SortKey::asc("ghost"))).is_err());
        assert_eq!(table.state().sorting(), None);
    }

    #[test]
    fn test_header_marks_sorted_column() {
        let mut table = Table::new(items(2), columns());
        table.set_sorting(Some(SortKey::desc("rank"))).unwrap();

        let group = table.header_group();
        assert_eq!(group.headers[0].sorted, None);
        assert_eq!(group.headers[1].sorted, Some(true));
    }

    #[test]
    fn test_custom_renderer_dispatch() {
        let table = Table::new(items(1), columns());
        let row = &table.row_model()[0];

        assert_eq!(row.cells[0].content, CellContent::plain("delta"));
        assert_eq!(row.cells[2].content, CellContent::Pills(vec!["t".to_string()]));
        assert_eq!(row.cells[2].id, "0_tags");
    }

    #[test]
    fn test_reset() {
        let mut table = Table::new(items(20), columns());
        table.next_page();
        table.toggle_column("name").unwrap();
        table.toggle_sorting("rank").unwrap();

        table.reset();
        assert_eq!(table.state(), &TableState::default());
    }
}
