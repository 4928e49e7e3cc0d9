//! Terminal rendering of the roster screen

use crate::core::{Notification, Severity};
use crate::employees::form::{EmployeeForm, FieldErrors};
use crate::employees::schema::{ActiveLabel, COLUMNS, FieldKey, Section, fields_in, row_cells};
use crate::employees::ListState;
use shared::models::{Employee, EmployeeStats, Page};

fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        format!("{}{}", text, " ".repeat(width - len))
    } else if width > 3 {
        let cut: String = text.chars().take(width - 3).collect();
        format!("{}...", cut)
    } else {
        text.chars().take(width).collect()
    }
}

fn table_line(cells: &[String]) -> String {
    COLUMNS
        .iter()
        .zip(cells)
        .map(|(col, cell)| fit(cell, col.width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

/// Header, rule and one line per row
pub fn render_table(page: &Page<Employee>) -> String {
    let header: Vec<String> = COLUMNS.iter().map(|c| c.short_header.to_string()).collect();
    let rule_width = COLUMNS.iter().map(|c| c.width).sum::<usize>() + 3 * (COLUMNS.len() - 1);

    let mut out = vec![table_line(&header), "-".repeat(rule_width)];
    for employee in &page.content {
        out.push(table_line(&row_cells(employee, ActiveLabel::Status)));
    }
    out.join("\n")
}

pub fn paginator(page: &Page<Employee>) -> String {
    let pages = page.total_pages.max(1);
    format!(
        "Página {} de {} · {} empleados{}{}",
        page.number + 1,
        pages,
        page.total_elements,
        if page.has_previous() { " · [anterior]" } else { "" },
        if page.has_next() { " · [siguiente]" } else { "" },
    )
}

pub fn stats_line(stats: &EmployeeStats) -> String {
    format!(
        "En esta página: {} · Activos: {} · Inactivos: {}",
        stats.total, stats.active, stats.inactive
    )
}

/// Whole list area for the current state
pub fn render_list_state(state: &ListState) -> String {
    match state {
        ListState::Idle => String::new(),
        ListState::Loading => "Cargando empleados...".to_string(),
        ListState::Error { message } => format!("! {}", message),
        ListState::Loaded(page) if page.is_empty() => {
            crate::employees::controller::EMPTY_ROSTER.to_string()
        }
        ListState::Loaded(page) => format!(
            "{}\n\n{}\n{}",
            stats_line(&EmployeeStats::from(page)),
            render_table(page),
            paginator(page)
        ),
    }
}

/// One employee, grouped by form section; empty fields are skipped
pub fn render_detail(employee: &Employee) -> String {
    let values = EmployeeForm::edit(employee);
    let mut out = vec![format!("{} (ID {})", employee.display_label(), employee.id)];
    for section in Section::ALL {
        let lines: Vec<String> = fields_in(section)
            .filter_map(|f| {
                let value = if f.key == FieldKey::Activo {
                    ActiveLabel::Status.render(employee.activo).to_string()
                } else {
                    values.value(f.key).to_string()
                };
                (!value.is_empty()).then(|| format!("  {:<22} {}", f.label, value))
            })
            .collect();
        if !lines.is_empty() {
            out.push(format!("\n[{}]", section.title()));
            out.extend(lines);
        }
    }
    if let Some(url) = &employee.foto_url {
        out.push(format!("\nFoto: {}", url));
    }
    out.join("\n")
}

pub fn render_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(key, message)| format!("  {}: {}", key.spec().label, message))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_notification(notification: &Notification) -> String {
    let marker = match notification.severity {
        Severity::Success => "✔",
        Severity::Error => "✖",
        Severity::Info => "ℹ",
    };
    format!("{} {}", marker, notification.message)
}
