// 🔗 Page Query - table state carried in the URL
// Each link on the HTML page is the current query with one transition applied.

use crate::table::{SortKey, Table};
use tracing::warn;

/// Raw query parameters. Every field is kept as text so that a bad value
/// degrades to the default instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    /// Comma-separated column ids
    pub hidden: Option<String>,
    pub sort: Option<String>,
    pub desc: Option<String>,
    /// Search box contents, echoed back but never applied
    pub q: Option<String>,
}

fn parse_number(name: &str, raw: Option<&String>) -> Option<usize> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(param = name, value = raw, "ignoring non-numeric query value");
            None
        }
    }
}

impl PageQuery {
    /// Build from raw key/value pairs. A repeated key keeps its last value;
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> PageQuery
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = PageQuery::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "size" => &mut query.size,
                "hidden" => &mut query.hidden,
                "sort" => &mut query.sort,
                "desc" => &mut query.desc,
                "q" => &mut query.q,
                _ => {
                    warn!(param = %key, "ignoring unknown query parameter");
                    continue;
                }
            };
            if let Some(previous) = slot.replace(value) {
                warn!(param = %key, value = %previous, "duplicate query parameter, keeping last");
            }
        }

        query
    }

    pub fn page_index(&self) -> Option<usize> {
        parse_number("page", self.page.as_ref())
    }

    pub fn page_size(&self) -> Option<usize> {
        parse_number("size", self.size.as_ref())
    }

    pub fn hidden_columns(&self) -> Vec<String> {
        self.hidden
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn sorting(&self) -> Option<SortKey> {
        let column = self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let descending = matches!(self.desc.as_deref(), Some("1") | Some("true"));
        Some(SortKey {
            column_id: column.to_string(),
            descending,
        })
    }

    pub fn search(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }

    /// Replay this query onto a fresh table through its transitions.
    /// Unknown columns and invalid sizes are logged and skipped.
    pub fn apply<T>(&self, table: &mut Table<T>) {
        if let Some(size) = self.page_size() {
            if let Err(e) = table.set_page_size(size) {
                warn!(error = %e, "ignoring page size");
            }
        }

        if let Some(key) = self.sorting() {
            if let Err(e) = table.set_sorting(Some(key)) {
                warn!(error = %e, "ignoring sort key");
            }
        }

        for id in self.hidden_columns() {
            if let Err(e) = table.toggle_column_visibility(&id, false) {
                warn!(error = %e, "ignoring hidden column");
            }
        }

        if let Some(page) = self.page_index() {
            table.set_page_index(page);
        }
    }

    // ------------------------------------------------------------------------
    // Link builders
    // ------------------------------------------------------------------------

    pub fn with_page(&self, page: usize) -> PageQuery {
        PageQuery {
            page: Some(page.to_string()),
            ..self.clone()
        }
    }

    pub fn with_hidden(&self, column_ids: &[&str]) -> PageQuery {
        PageQuery {
            hidden: if column_ids.is_empty() {
                None
            } else {
                Some(column_ids.join(","))
            },
            ..self.clone()
        }
    }

    pub fn with_sorting(&self, key: Option<SortKey>) -> PageQuery {
        let (sort, desc) = match key {
            Some(k) if k.descending => (Some(k.column_id), Some("1".to_string())),
            Some(k) => (Some(k.column_id), None),
            None => (None, None),
        };
        PageQuery {
            sort,
            desc,
            ..self.clone()
        }
    }

    /// Non-empty parameters in a fixed order
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("page", &self.page),
            ("size", &self.size),
            ("hidden", &self.hidden),
            ("sort", &self.sort),
            ("desc", &self.desc),
            ("q", &self.q),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.as_ref().filter(|v| !v.is_empty()).map(|v| (k, v.clone())))
        .collect()
    }

    pub fn to_query_string(&self) -> String {
        self.pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn href(&self) -> String {
        format!("?{}", self.to_query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::default_table;

    fn query(pairs: &[(&str, &str)]) -> PageQuery {
        let mut q = PageQuery::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "page" => q.page = v,
                "size" => q.size = v,
                "hidden" => q.hidden = v,
                "sort" => q.sort = v,
                "desc" => q.desc = v,
                "q" => q.q = v,
                _ => unreachable!(),
            }
        }
        q
    }

    #[test]
    fn test_apply_page_and_size() {
        let mut table = default_table();
        query(&[("page", "1"), ("size", "2")]).apply(&mut table);

        assert_eq!(table.state().page_size(), 2);
        assert_eq!(table.state().page_index(), 1);
        let ids: Vec<&str> = table.row_model().iter().map(|r| r.original.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4"]);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let mut table = default_table();
        query(&[("page", "abc"), ("size", "0"), ("hidden", "ghost,cela"), ("sort", "ghost")])
            .apply(&mut table);

        assert_eq!(table.state().page_index(), 0);
        assert_eq!(table.state().page_size(), 10);
        assert_eq!(table.state().sorting(), None);
        assert!(!table.is_column_visible("cela"));
        assert_eq!(table.visible_columns().len(), 5);
    }

    #[test]
    fn test_sorting_param() {
        let q = query(&[("sort", "nome"), ("desc", "1")]);
        assert_eq!(q.sorting(), Some(SortKey::desc("nome")));

        let q = query(&[("sort", "nome")]);
        assert_eq!(q.sorting(), Some(SortKey::asc("nome")));
        assert_eq!(q.with_sorting(None).sorting(), None);
    }

    #[test]
    fn test_with_hidden() {
        let q = query(&[("hidden", "cela"), ("page", "1")]);

        assert_eq!(q.with_hidden(&[]).hidden, None);
        let both = q.with_hidden(&["cela", "status"]);
        assert_eq!(both.hidden_columns(), vec!["cela", "status"]);
        assert_eq!(both.to_query_string(), "page=1&hidden=cela%2Cstatus");
    }

    #[test]
    fn test_query_string_encodes_values() {
        let q = query(&[("q", "João da"), ("page", "2")]).with_page(0);
        assert_eq!(q.to_query_string(), "page=0&q=Jo%C3%A3o%20da");
        assert_eq!(PageQuery::default().href(), "?");
    }

    #[test]
    fn test_from_pairs_last_value_wins() {
        let pairs = [("page", "0"), ("page", "1"), ("size", "2"), ("color", "red")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()));
        let q = PageQuery::from_pairs(pairs);

        assert_eq!(q, query(&[("page", "1"), ("size", "2")]));
    }

    #[test]
    fn test_search_is_not_applied() {
        let mut table = default_table();
        query(&[("q", "Fernando")]).apply(&mut table);
        assert_eq!(table.row_model().len(), 5);
    }
}
