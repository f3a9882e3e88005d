//! Presentation helpers shared by every front end
//!
//! Formatting, badge thresholds and table view state. Rendering itself is
//! left to the caller.

pub mod badges;
pub mod format;
pub mod table;

pub use badges::{StockBadge, TrendBadge, TrendDirection};
pub use format::{format_currency, format_number, format_percentage};
pub use table::{SortDirection, SortValue, TableRow, TableView};
