//! Searchable, sortable, paged view over report rows

use std::cmp::Ordering;

use crate::analytics::{CategoryKpi, ProductRow, TopClient};

#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Number(f64),
    Text(String),
}

impl SortValue {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        }
    }
}

/// A row that can be searched and sorted by column name
pub trait TableRow {
    /// Text matched (case-insensitively) against the search query
    fn search_text(&self) -> String;

    /// Value of `column`, `None` for unknown columns
    fn sort_value(&self, column: &str) -> Option<SortValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableView<T> {
    rows: Vec<T>,
    search: String,
    sort: Option<(String, SortDirection)>,
    page_size: usize,
    /// Zero-based
    page: usize,
}

impl<T: TableRow> TableView<T> {
    /// `page_size` of 0 shows every row on a single page
    pub fn new(rows: Vec<T>, page_size: usize) -> Self {
        Self {
            rows,
            search: String::new(),
            sort: None,
            page_size,
            page: 0,
        }
    }

    /// Set the search query and go back to the first page
    pub fn search(&mut self, query: impl Into<String>) {
        self.search = query.into().trim().to_lowercase();
        self.page = 0;
    }

    /// Sort by `column`. Sorting again by the same column flips the direction.
    pub fn sort_by(&mut self, column: &str) {
        self.sort = match self.sort.take() {
            Some((current, direction)) if current == column => Some((current, direction.toggle())),
            _ => Some((column.to_string(), SortDirection::default())),
        };
    }

    pub fn set_sort(&mut self, column: &str, direction: SortDirection) {
        self.sort = Some((column.to_string(), direction));
    }

    pub fn sort(&self) -> Option<(&str, SortDirection)> {
        self.sort.as_ref().map(|(c, d)| (c.as_str(), *d))
    }

    /// Rows matching the search, in sort order
    pub fn filtered_rows(&self) -> Vec<&T> {
        let mut rows: Vec<&T> = self
            .rows
            .iter()
            .filter(|r| {
                self.search.is_empty() || r.search_text().to_lowercase().contains(&self.search)
            })
            .collect();

        if let Some((column, direction)) = &self.sort {
            rows.sort_by(|a, b| {
                let ordering = match (a.sort_value(column), b.sort_value(column)) {
                    (Some(x), Some(y)) => x.compare(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        rows
    }

    pub fn page_count(&self) -> usize {
        let total = self.filtered_rows().len();
        if self.page_size == 0 {
            return 1;
        }
        total.div_ceil(self.page_size).max(1)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Jump to `page`, clamped to the last page
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Rows of the current page
    pub fn visible_rows(&self) -> Vec<&T> {
        let rows = self.filtered_rows();
        if self.page_size == 0 {
            return rows;
        }
        rows.into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TableRow for ProductRow {
    fn search_text(&self) -> String {
        self.title.clone()
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        Some(match column {
            "id" => SortValue::Number(self.id as f64),
            "title" => SortValue::Text(self.title.clone()),
            "quantity" => SortValue::Number(self.quantity),
            "revenue" => SortValue::Number(self.revenue),
            "price" => SortValue::Number(self.price),
            "stock" => SortValue::Number(self.stock),
            _ => return None,
        })
    }
}

impl TableRow for CategoryKpi {
    fn search_text(&self) -> String {
        self.name.clone()
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        Some(match column {
            "name" => SortValue::Text(self.name.clone()),
            "revenue" => SortValue::Number(self.revenue),
            "quantity" => SortValue::Number(self.quantity),
            "products" | "productsCount" => SortValue::Number(self.products_count as f64),
            "avgPrice" => SortValue::Number(self.avg_price),
            "stock" | "totalStock" => SortValue::Number(self.total_stock),
            "marketShare" => SortValue::Number(self.market_share),
            _ => return None,
        })
    }
}

impl TableRow for TopClient {
    fn search_text(&self) -> String {
        self.id.clone()
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        Some(match column {
            "rank" => SortValue::Number(self.rank as f64),
            "id" => SortValue::Text(self.id.clone()),
            "revenue" => SortValue::Number(self.revenue),
            "orders" => SortValue::Number(self.orders as f64),
            "avgOrder" => SortValue::Number(self.avg_order),
            "contribution" => SortValue::Number(self.contribution),
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ProductRow> {
        ["Desk lamp", "Chair", "Desk", "Pen", "Stapler"]
            .iter()
            .enumerate()
            .map(|(i, title)| ProductRow {
                id: i as i64 + 1,
                title: title.to_string(),
                quantity: (i * 3 % 5) as f64,
                revenue: 10.0 * (i + 1) as f64,
                price: 1.0,
                stock: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut view = TableView::new(rows(), 10);
        view.search("DESK");

        let titles: Vec<&str> = view.visible_rows().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Desk lamp", "Desk"]);
    }

    #[test]
    fn test_sort_toggles_direction() {
        let mut view = TableView::new(rows(), 0);

        view.sort_by("revenue");
        assert_eq!(view.visible_rows()[0].title, "Stapler");

        view.sort_by("revenue");
        assert_eq!(view.sort(), Some(("revenue", SortDirection::Asc)));
        assert_eq!(view.visible_rows()[0].title, "Desk lamp");

        view.set_sort("title", SortDirection::Asc);
        assert_eq!(view.visible_rows()[0].title, "Chair");
    }

    #[test]
    fn test_paging() {
        let mut view = TableView::new(rows(), 2);
        assert_eq!(view.page_count(), 3);
        assert_eq!(view.visible_rows().len(), 2);

        view.go_to_page(10);
        assert_eq!(view.page(), 2);
        assert_eq!(view.visible_rows().len(), 1);

        view.search("pen");
        assert_eq!(view.page(), 0);
        assert_eq!(view.page_count(), 1);

        view.previous_page();
        assert_eq!(view.page(), 0);
    }

    #[test]
    fn test_empty_view_has_one_page() {
        let view: TableView<ProductRow> = TableView::new(Vec::new(), 5);
        assert_eq!(view.page_count(), 1);
        assert!(view.visible_rows().is_empty());
    }
}
