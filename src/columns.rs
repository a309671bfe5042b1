// 🏷️ Detainee Columns - schema, badge colours and cell renderers

use crate::detainee::{dataset, Detainee};
use crate::table::{CellContent, CellValue, ColumnDef, Table};
use chrono::NaiveDate;

pub type DetaineeTable = Table<Detainee>;

pub const EMPTY_PLACEHOLDER: &str = "Nenhum detento encontrado.";
pub const SEARCH_PLACEHOLDER: &str = "Buscar detento...";

pub const BADGE_BASE_CLASS: &str = "px-2 py-1 rounded-full text-xs font-medium";
pub const PILL_CLASS: &str = "bg-gray-100 px-2 py-1 rounded text-xs";

// ============================================================================
// STATUS BADGE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Green,
    Blue,
    Yellow,
}

impl BadgeTone {
    /// Plain string comparison against the three literal labels.
    /// Anything else gets no tone at all.
    pub fn for_status(label: &str) -> Option<BadgeTone> {
        match label {
            "Ativo" => Some(BadgeTone::Green),
            "Liberado" => Some(BadgeTone::Blue),
            "Transferido" => Some(BadgeTone::Yellow),
            _ => None,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            BadgeTone::Green => "bg-green-100 text-green-800",
            BadgeTone::Blue => "bg-blue-100 text-blue-800",
            BadgeTone::Yellow => "bg-yellow-100 text-yellow-800",
        }
    }
}

pub fn status_badge_class(label: &str) -> String {
    match BadgeTone::for_status(label) {
        Some(tone) => format!("{} {}", BADGE_BASE_CLASS, tone.class()),
        None => BADGE_BASE_CLASS.to_string(),
    }
}

// ============================================================================
// CELL RENDERERS
// ============================================================================

fn emphasised(value: &CellValue) -> CellContent {
    CellContent::Text {
        text: value.display(),
        emphasis: true,
    }
}

fn status_badge(value: &CellValue) -> CellContent {
    let label = value.display();
    CellContent::Badge {
        class: status_badge_class(&label),
        label,
    }
}

fn crime_pills(value: &CellValue) -> CellContent {
    match value {
        CellValue::List(items) => CellContent::Pills(items.clone()),
        CellValue::Text(s) => CellContent::Pills(vec![s.clone()]),
    }
}

/// `dd/mm/yyyy` → `yyyy-mm-dd` so lexical order is chronological.
/// Unparseable dates fall back to the raw text.
pub fn birth_date_sort_key(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn detainee_columns() -> Vec<ColumnDef<Detainee>> {
    vec![
        ColumnDef::accessor("registro", "Registro", |d: &Detainee| {
            CellValue::text(d.registration.as_str())
        })
        .cell(emphasised),
        ColumnDef::accessor("nome", "Nome", |d: &Detainee| CellValue::text(d.name.as_str())),
        ColumnDef::accessor("dataNascimento", "Data de Nascimento", |d: &Detainee| {
            CellValue::text(d.birth_date.as_str())
        })
        .sort_by(|d: &Detainee| CellValue::Text(birth_date_sort_key(&d.birth_date))),
        ColumnDef::accessor("cela", "Cela", |d: &Detainee| CellValue::text(d.cell.as_str())),
        ColumnDef::accessor("status", "Status", |d: &Detainee| CellValue::text(d.status.label()))
            .cell(status_badge),
        ColumnDef::accessor("crimes", "Crimes", |d: &Detainee| CellValue::List(d.crimes.clone()))
            .cell(crime_pills),
    ]
}

pub fn detainee_table(data: Vec<Detainee>) -> DetaineeTable {
    Table::new(data, detainee_columns())
}

/// The listing as mounted by the page: static dataset, default state
pub fn default_table() -> DetaineeTable {
    detainee_table(dataset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detainee::Status;
    use crate::table::SortKey;

    #[test]
    fn test_badge_tone_mapping() {
        assert_eq!(BadgeTone::for_status("Ativo"), Some(BadgeTone::Green));
        assert_eq!(BadgeTone::for_status("Liberado"), Some(BadgeTone::Blue));
        assert_eq!(BadgeTone::for_status("Transferido"), Some(BadgeTone::Yellow));
        assert_eq!(BadgeTone::for_status("Foragido"), None);
        assert_eq!(BadgeTone::for_status(""), None);
        assert_eq!(BadgeTone::for_status("ATIVO"), None);
    }

    #[test]
    fn test_active_badge_is_green_only() {
        let class = status_badge_class("Ativo");

        assert!(class.contains("bg-green-100"));
        assert!(class.contains("text-green-800"));
        assert!(!class.contains("blue"));
        assert!(!class.contains("yellow"));
        assert!(class.starts_with(BADGE_BASE_CLASS));
    }

    #[test]
    fn test_unknown_status_has_no_tone() {
        assert_eq!(status_badge_class("Foragido"), BADGE_BASE_CLASS);
    }

    #[test]
    fn test_every_record_badge_matches_its_status() {
        let table = default_table();
        for row in table.row_model() {
            let status = row.cells.iter().find(|c| c.column_id == "status").unwrap();
            let expected = match row.original.status {
                Status::Active => "bg-green-100",
                Status::Released => "bg-blue-100",
                Status::Transferred => "bg-yellow-100",
            };
            match &status.content {
                CellContent::Badge { label, class } => {
                    assert_eq!(label, row.original.status.label());
                    assert!(class.contains(expected));
                }
                other => panic!("expected badge, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_schema_order_and_labels() {
        let columns = detainee_columns();
        let ids: Vec<&str> = columns.iter().map(|c| c.id).collect();
        let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();

        assert_eq!(ids, vec!["registro", "nome", "dataNascimento", "cela", "status", "crimes"]);
        assert_eq!(
            headers,
            vec!["Registro", "Nome", "Data de Nascimento", "Cela", "Status", "Crimes"]
        );
        assert!(columns.iter().all(|c| c.enable_hiding));
    }

    #[test]
    fn test_default_page_shows_all_five_records() {
        let table = default_table();
        assert_eq!(table.row_model().len(), 5);
        assert_eq!(table.page_count(), 1);
        assert!(!table.can_previous_page());
        assert!(!table.can_next_page());
    }

    #[test]
    fn test_registration_is_emphasised_and_crimes_are_pills() {
        let table = default_table();
        let row = &table.row_model()[0];

        assert_eq!(
            row.cells[0].content,
            CellContent::Text {
                text: "2023-001".to_string(),
                emphasis: true
            }
        );
        assert_eq!(
            row.cells[5].content,
            CellContent::Pills(vec![
                "Roubo qualificado".to_string(),
                "Posse ilegal de arma".to_string()
            ])
        );
    }

    #[test]
    fn test_birth_date_sorts_chronologically() {
        let mut table = default_table();
        table
            .set_sorting(Some(SortKey::asc("dataNascimento")))
            .unwrap();

        let dates: Vec<&str> = table
            .row_model()
            .iter()
            .map(|r| r.original.birth_date.as_str())
            .collect();
        assert_eq!(
            dates,
            vec!["30/07/1978", "18/09/1982", "15/05/1985", "22/11/1990", "05/03/1995"]
        );
    }

    #[test]
    fn test_birth_date_sort_key_fallback() {
        assert_eq!(birth_date_sort_key("05/03/1995"), "1995-03-05");
        assert_eq!(birth_date_sort_key("desconhecida"), "desconhecida");
    }
}
