// 🗂️ Detainee Records - the static dataset behind the listing page
// Records are defined once here and never mutated at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// STATUS
// ============================================================================

/// Custody status of a detainee.
///
/// Serialised as the literal label shown on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Ativo")]
    Active,

    #[serde(rename = "Liberado")]
    Released,

    #[serde(rename = "Transferido")]
    Transferred,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Active, Status::Released, Status::Transferred];

    pub fn label(&self) -> &'static str {
        match self {
            Status::Active => "Ativo",
            Status::Released => "Liberado",
            Status::Transferred => "Transferido",
        }
    }

    /// Exact, case-sensitive match against the three literal labels
    pub fn from_label(label: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// DETAINEE RECORD
// ============================================================================

/// One row of the listing.
///
/// JSON keys keep the names the page's column ids use (`nome`, `registro`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detainee {
    pub id: String,

    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "registro")]
    pub registration: String,

    /// Display format `dd/mm/yyyy`, never parsed for display
    #[serde(rename = "dataNascimento")]
    pub birth_date: String,

    #[serde(rename = "cela")]
    pub cell: String,

    pub status: Status,

    pub crimes: Vec<String>,
}

impl Detainee {
    pub fn new(
        id: &str,
        name: &str,
        registration: &str,
        birth_date: &str,
        cell: &str,
        status: Status,
        crimes: &[&str],
    ) -> Self {
        Detainee {
            id: id.to_string(),
            name: name.to_string(),
            registration: registration.to_string(),
            birth_date: birth_date.to_string(),
            cell: cell.to_string(),
            status,
            crimes: crimes.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// The five records shown on the listing page, in display order.
pub fn dataset() -> Vec<Detainee> {
    vec![
        Detainee::new(
            "1",
            "João da Silva",
            "2023-001",
            "15/05/1985",
            "C-102",
            Status::Active,
            &["Roubo qualificado", "Posse ilegal de arma"],
        ),
        Detainee::new(
            "2",
            "Carlos Alberto",
            "2023-002",
            "22/11/1990",
            "B-205",
            Status::Active,
            &["Homicídio doloso"],
        ),
        Detainee::new(
            "3",
            "Marcos Antônio",
            "2023-003",
            "30/07/1978",
            "A-301",
            Status::Transferred,
            &["Latrocínio", "Associação criminosa"],
        ),
        Detainee::new(
            "4",
            "Fernando Costa",
            "2023-004",
            "05/03/1995",
            "D-104",
            Status::Released,
            &["Furto"],
        ),
        Detainee::new(
            "5",
            "Ricardo Oliveira",
            "2023-005",
            "18/09/1982",
            "C-201",
            Status::Active,
            &["Tráfico de drogas", "Formação de quadrilha"],
        ),
    ]
}
