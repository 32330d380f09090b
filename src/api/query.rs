//! Row Query Builder
//!
//! Builds PostgREST query parameters: column selection, `eq` / `in`
//! filters, ordering, and single-row mode.

pub const PROJECTS: &str = "projects";
pub const TASKS: &str = "tasks";

#[derive(Debug, Clone, PartialEq)]
pub struct RowQuery {
    table: &'static str,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
    single: bool,
}

impl RowQuery {
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            select: None,
            filters: Vec::new(),
            order: None,
            single: false,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    /// `column IN (values)`; values are double-quoted so commas and
    /// parentheses inside them survive
    pub fn in_list<S: AsRef<str>>(mut self, column: &str, values: &[S]) -> Self {
        let list = values
            .iter()
            .map(|v| quote(v.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push((column.to_string(), format!("in.({})", list)));
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{}.{}", column, direction));
        self
    }

    /// Expect exactly one row back
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.table
    }

    pub fn is_single(&self) -> bool {
        self.single
    }

    /// Query string pairs in request order
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 2);
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }
        params
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_list_projects_query() {
        let query = RowQuery::table(PROJECTS)
            .select("*")
            .eq("user_id", "u-1")
            .order_by("created_at", false);
        assert_eq!(
            query.params(),
            pairs(&[("select", "*"), ("user_id", "eq.u-1"), ("order", "created_at.desc")])
        );
        assert!(!query.is_single());
    }

    #[test]
    fn test_single_project_query() {
        let query = RowQuery::table(PROJECTS)
            .select("*")
            .eq("id", "p-9")
            .eq("user_id", "u-1")
            .single();
        assert!(query.is_single());
        assert_eq!(query.name(), "projects");
        assert_eq!(
            query.params(),
            pairs(&[("select", "*"), ("id", "eq.p-9"), ("user_id", "eq.u-1")])
        );
    }

    #[test]
    fn test_in_filter_quotes_values() {
        let query = RowQuery::table(TASKS)
            .select("status")
            .in_list("project_id", &["a", "b,c", "d\"e"]);
        assert_eq!(
            query.params(),
            pairs(&[("select", "status"), ("project_id", r#"in.("a","b,c","d\"e")"#)])
        );
    }

    #[test]
    fn test_bare_query_has_no_params() {
        assert!(RowQuery::table(TASKS).params().is_empty());
    }
}
