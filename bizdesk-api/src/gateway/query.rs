/// Columns requested from a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    All,
    Columns(Vec<&'static str>),
}

impl Projection {
    pub fn render(&self) -> String {
        match self {
            Projection::All => "*".to_string(),
            Projection::Columns(columns) => columns.join(","),
        }
    }
}

/// A parent record embedded under its table name, e.g. `companies(id,name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub table: &'static str,
    /// Column on the child row that points at the parent's `id`
    pub foreign_key: &'static str,
    pub columns: Vec<&'static str>,
}

impl Embed {
    pub fn new(table: &'static str, foreign_key: &'static str, columns: &[&'static str]) -> Self {
        Self {
            table,
            foreign_key,
            columns: columns.to_vec(),
        }
    }

    pub fn render(&self) -> String {
        format!("{}({})", self.table, self.columns.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: &'static str,
    pub value: String,
}

/// A read against one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: &'static str,
    pub projection: Projection,
    pub embeds: Vec<Embed>,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    pub fn from(table: &'static str) -> Self {
        Self {
            table,
            projection: Projection::All,
            embeds: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn columns(mut self, columns: &[&'static str]) -> Self {
        self.projection = Projection::Columns(columns.to_vec());
        self
    }

    pub fn embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.filters.push(Filter {
            column,
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, column: &'static str, ascending: bool) -> Self {
        self.order.push(Order { column, ascending });
        self
    }

    pub fn newest_first(self) -> Self {
        self.order_by("created_at", false)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// PostgREST `select=` value: projection followed by embedded parents.
    pub fn render_select(&self) -> String {
        let mut parts = vec![self.projection.render()];
        parts.extend(self.embeds.iter().map(Embed::render));
        parts.join(",")
    }

    /// Query-string pairs in PostgREST syntax.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.render_select())];

        for filter in &self.filters {
            params.push((filter.column.to_string(), format!("eq.{}", filter.value)));
        }

        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" }))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}
