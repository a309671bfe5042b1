// 🌐 HTML Page - server-side projection of the table state
// A pure function of (table, query): same inputs, same markup.

use crate::columns::{DetaineeTable, EMPTY_PLACEHOLDER, PILL_CLASS, SEARCH_PLACEHOLDER};
use crate::query::PageQuery;
use crate::table::{CellContent, SortKey};
use std::fmt::Write;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full document: page shell around the table component
pub fn render_page(table: &DetaineeTable, query: &PageQuery) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Detentos</title>\n</head>\n<body>\n");
    html.push_str("<main class=\"container mx-auto py-10\">\n");
    html.push_str(&render_table(table, query));
    html.push_str("</main>\n</body>\n</html>\n");

    html
}

/// The table component: toolbar, table, pagination
pub fn render_table(table: &DetaineeTable, query: &PageQuery) -> String {
    let mut html = String::new();

    html.push_str("<div class=\"w-full\">\n");
    render_toolbar(&mut html, table, query);
    render_grid(&mut html, table, query);
    render_pagination(&mut html, table, query);
    html.push_str("</div>\n");

    html
}

fn render_toolbar(html: &mut String, table: &DetaineeTable, query: &PageQuery) {
    html.push_str("<div class=\"flex items-center justify-between py-4\">\n");

    // Search box is not wired to any filter
    let _ = writeln!(
        html,
        "<div class=\"relative\"><input type=\"search\" name=\"q\" class=\"pl-10 max-w-sm\" placeholder=\"{}\" value=\"{}\"></div>",
        escape(SEARCH_PLACEHOLDER),
        escape(query.search())
    );

    html.push_str("<details class=\"relative ml-auto\">\n");
    html.push_str("<summary class=\"ml-auto\">Colunas</summary>\n");
    html.push_str("<ul role=\"menu\">\n");
    for column in table.all_columns().iter().filter(|c| c.enable_hiding) {
        let visible = table.is_column_visible(column.id);
        let _ = writeln!(
            html,
            "<li><a role=\"menuitemcheckbox\" class=\"capitalize\" aria-checked=\"{}\" href=\"{}\"><input type=\"checkbox\" tabindex=\"-1\"{}> {}</a></li>",
            visible,
            escape(&toggle_link(table, query, column.id).href()),
            if visible { " checked" } else { "" },
            escape(column.id)
        );
    }
    html.push_str("</ul>\n</details>\n</div>\n");
}

/// Query with one column's visibility flipped, based on the table's state
fn toggle_link(table: &DetaineeTable, query: &PageQuery, column_id: &str) -> PageQuery {
    let hidden: Vec<&str> = table
        .all_columns()
        .iter()
        .map(|c| c.id)
        .filter(|&id| table.is_column_visible(id) == (id == column_id))
        .collect();
    query.with_hidden(&hidden)
}

fn render_grid(html: &mut String, table: &DetaineeTable, query: &PageQuery) {
    html.push_str("<div class=\"rounded-md border\">\n<table>\n<thead>\n");

    let group = table.header_group();
    let _ = writeln!(html, "<tr data-header-group=\"{}\">", group.id);
    for header in &group.headers {
        let sortable = table
            .column(header.column_id)
            .map(|c| c.enable_sorting)
            .unwrap_or(false);

        let aria = match header.sorted {
            Some(true) => " aria-sort=\"descending\"",
            Some(false) => " aria-sort=\"ascending\"",
            None => "",
        };

        if sortable {
            let link = query.with_sorting(SortKey::cycle(table.state().sorting(), header.column_id));
            let _ = writeln!(
                html,
                "<th id=\"{}\"{}><a href=\"{}\">{}</a></th>",
                escape(&header.id),
                aria,
                escape(&link.href()),
                escape(header.label)
            );
        } else {
            let _ = writeln!(html, "<th id=\"{}\"{}>{}</th>", escape(&header.id), aria, escape(header.label));
        }
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    let rows = table.row_model();
    if rows.is_empty() {
        let _ = writeln!(
            html,
            "<tr><td colspan=\"{}\" class=\"h-24 text-center\">{}</td></tr>",
            table.all_columns().len(),
            escape(EMPTY_PLACEHOLDER)
        );
    } else {
        for row in &rows {
            let _ = writeln!(html, "<tr data-row-id=\"{}\" class=\"hover:bg-gray-50\">", escape(&row.id));
            for cell in &row.cells {
                let _ = writeln!(html, "<td>{}</td>", render_cell(&cell.content));
            }
            html.push_str("</tr>\n");
        }
    }

    html.push_str("</tbody>\n</table>\n</div>\n");
}

pub fn render_cell(content: &CellContent) -> String {
    match content {
        CellContent::Text { text, emphasis: true } => {
            format!("<div class=\"font-medium\">{}</div>", escape(text))
        }
        CellContent::Text { text, emphasis: false } => escape(text),
        CellContent::Badge { label, class } => {
            format!("<span class=\"{}\">{}</span>", escape(class), escape(label))
        }
        CellContent::Pills(items) => {
            let mut out = String::from("<div class=\"flex flex-wrap gap-1 max-w-xs\">");
            for item in items {
                let _ = write!(out, "<span class=\"{}\">{}</span>", PILL_CLASS, escape(item));
            }
            out.push_str("</div>");
            out
        }
    }
}

fn pagination_button(html: &mut String, label: &str, target: Option<usize>, query: &PageQuery) {
    html.push_str("<form method=\"get\" class=\"inline\">");
    let page = target.map(|p| query.with_page(p)).unwrap_or_else(|| query.clone());
    for (key, value) in page.pairs() {
        let _ = write!(
            html,
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
            key,
            escape(&value)
        );
    }
    let _ = writeln!(
        html,
        "<button type=\"submit\" class=\"btn-outline btn-sm\"{}>{}</button></form>",
        if target.is_none() { " disabled" } else { "" },
        escape(label)
    );
}

fn render_pagination(html: &mut String, table: &DetaineeTable, query: &PageQuery) {
    let index = table.state().page_index();

    html.push_str("<div class=\"flex items-center justify-end space-x-2 py-4\">\n");
    let previous = table.can_previous_page().then(|| index - 1);
    let next = table.can_next_page().then(|| index + 1);
    pagination_button(html, "Anterior", previous, query);
    pagination_button(html, "Próxima", next, query);
    html.push_str("</div>\n");
}
