use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use docex_lib::category::{CategoryDefinition, DEFINITIONS};
use docex_lib::{Category, Result};

pub fn handle_categories_command(filter: Option<&str>) -> Result<()> {
    let selected = select_definitions(filter)?;
    println!("\n{}", style("Document Categories").bold().cyan());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Folder Layout").fg(Color::Cyan),
    ]);

    for def in selected {
        table.add_row(vec![
            Cell::new(def.category as usize + 1),
            Cell::new(def.category.as_str()),
            Cell::new(format!("{}/{}", def.root_folder, def.layout)),
        ]);
    }

    println!("{}", table);
    Ok(())
}

/// Every definition, or only the one named by `filter`.
fn select_definitions(filter: Option<&str>) -> Result<Vec<&'static CategoryDefinition>> {
    match filter {
        Some(name) => {
            let category: Category = name.parse()?;
            Ok(DEFINITIONS.iter().filter(|def| def.category == category).collect())
        }
        None => Ok(DEFINITIONS.iter().collect()),
    }
}
