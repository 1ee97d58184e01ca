use comfy_table::presets::NOTHING;
use comfy_table::{ContentArrangement, Table};

/// Borderless table creation helper
pub fn create_plain_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Disabled);
    table
}

/// Separates columns with `gutter` trailing spaces; the last column gets none.
pub fn apply_gutter(table: &mut Table, gutter: u16) {
    let columns = table.column_iter_mut().count();
    for (index, column) in table.column_iter_mut().enumerate() {
        let right = if index + 1 < columns { gutter } else { 0 };
        column.set_padding((0, right));
    }
}
