//! Terminal rendering of pages and view events.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use lead_admin::pages::{DetailSection, row_cells};
use lead_admin::{Level, ListResult, Notification, ViewEvent};
use lead_form::FieldErrors;
use lead_model::LeadSummary;

/// Dashboard table: id, name, email, phone and creation date.
pub fn lead_table(result: &ListResult<LeadSummary>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Nome"),
        header_cell("Email"),
        header_cell("Telefone"),
        header_cell("Data de Cadastro"),
    ]);
    apply_list_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);

    if result.rows.is_empty() {
        table.add_row(vec![
            dim_cell("-"),
            dim_cell("Nenhum lead encontrado."),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    for row in &result.rows {
        let [nome, email, telefone, created_at] = row_cells(row);
        table.add_row(vec![
            Cell::new(row.id).fg(Color::Blue),
            Cell::new(nome).add_attribute(Attribute::Bold),
            Cell::new(email),
            Cell::new(telefone),
            Cell::new(created_at),
        ]);
    }
    table
}

/// One two-column table per section.
pub fn detail_tables(sections: &[DetailSection]) -> Vec<Table> {
    sections
        .iter()
        .map(|section| {
            let mut table = Table::new();
            table.set_header(vec![header_cell(section.title), Cell::new("")]);
            apply_detail_table_style(&mut table);
            if section.items.is_empty() {
                table.add_row(vec![dim_cell("-"), dim_cell("Sem dados")]);
            }
            for item in &section.items {
                table.add_row(vec![
                    Cell::new(item.label).fg(Color::DarkGrey),
                    Cell::new(&item.value),
                ]);
            }
            table
        })
        .collect()
}

/// Field name and message of each failed validation.
pub fn field_errors_table(errors: &FieldErrors) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Campo"), header_cell("Erro")]);
    apply_detail_table_style(&mut table);
    for (field, message) in errors {
        table.add_row(vec![
            Cell::new(field).add_attribute(Attribute::Bold),
            Cell::new(message).fg(Color::Red),
        ]);
    }
    table
}

/// Text of a notification with its severity marker.
pub fn notification_line(notification: &Notification) -> String {
    let marker = match notification.level {
        Level::Success => "✔",
        Level::Error => "✖",
        Level::Info => "ℹ",
    };
    format!("{marker} {}", notification.message)
}

/// Print notifications; errors go to stderr. Navigation is only logged.
pub fn print_events(events: Vec<ViewEvent>) {
    for event in events {
        match event {
            ViewEvent::Notify(notification) => {
                let line = notification_line(&notification);
                if notification.level == Level::Error {
                    eprintln!("{line}");
                } else {
                    println!("{line}");
                }
            }
            ViewEvent::Navigate(route) => tracing::debug!(%route, "next screen"),
            ViewEvent::GuardRendered => {}
        }
    }
}

fn apply_list_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(4)),
        ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ColumnConstraint::LowerBoundary(Width::Fixed(10)),
        ColumnConstraint::LowerBoundary(Width::Fixed(12)),
    ]);
}

fn apply_detail_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use lead_admin::pages::DetailItem;
    use lead_model::LeadId;

    use super::*;

    fn row(id: u64, nome: &str) -> LeadSummary {
        LeadSummary {
            id: LeadId(id),
            nome: nome.to_string(),
            email: format!("{}@example.com", nome.to_lowercase()),
            telefone: "(11) 98765-4321".to_string(),
            created_at: "2024-03-05T14:07:09Z".to_string(),
        }
    }

    #[test]
    fn lead_table_has_one_line_per_row() {
        let result = ListResult {
            rows: vec![row(1, "Ana"), row(2, "Bruno")],
            total_pages: 1,
        };
        let mut table = lead_table(&result);
        table.force_no_tty();
        let rendered = table.to_string();

        assert_eq!(table.row_count(), 2);
        assert!(rendered.contains("bruno@example.com"));
        assert!(rendered.contains("05/03/2024"));
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let mut table = lead_table(&ListResult::default());
        table.force_no_tty();
        assert!(table.to_string().contains("Nenhum lead encontrado."));
    }

    #[test]
    fn detail_sections_become_tables() {
        let sections = vec![DetailSection {
            title: "Informações de Contato",
            items: vec![DetailItem {
                label: "Nome Completo",
                value: "Ana Souza".to_string(),
            }],
        }];
        let tables = detail_tables(&sections);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].row_count(), 1);
    }

    #[test]
    fn notification_markers() {
        let line = notification_line(&Notification {
            level: Level::Error,
            message: "Erro ao deletar lead.".to_string(),
        });
        assert_eq!(line, "✖ Erro ao deletar lead.");
    }
}
