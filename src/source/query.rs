//! Search query model and its query-string encoding

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped in query values
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A search predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[at(path, "value")]`
    At { path: String, value: String },
}

impl Predicate {
    /// Match documents whose `path` equals `value`
    pub fn at(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::At {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Match documents of a custom type
    pub fn document_type(doc_type: &str) -> Self {
        Self::at("document.type", doc_type)
    }

    /// Match a document of `doc_type` by uid
    pub fn uid(doc_type: &str, uid: &str) -> Self {
        Self::at(format!("my.{}.uid", doc_type), uid)
    }

    /// Match a document by its internal id
    pub fn id(id: &str) -> Self {
        Self::at("document.id", id)
    }

    fn encode(&self) -> String {
        match self {
            Self::At { path, value } => {
                format!("[at({}, \"{}\")]", path, value.replace('"', "\\\""))
            }
        }
    }
}

/// Date fields documents can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    FirstPublication,
    LastPublication,
}

impl DateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstPublication => "document.first_publication_date",
            Self::LastPublication => "document.last_publication_date",
        }
    }
}

/// A sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub field: DateField,
    pub descending: bool,
}

impl Ordering {
    pub fn asc(field: DateField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn desc(field: DateField) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    fn encode(&self) -> String {
        if self.descending {
            format!("{} desc", self.field.as_str())
        } else {
            self.field.as_str().to_string()
        }
    }
}

/// A search against the documents endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub predicates: Vec<Predicate>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    /// Only return documents ordered after this document id
    pub after: Option<String>,
    pub orderings: Vec<Ordering>,
    /// Restrict `data` to these `type.field` names
    pub fetch: Vec<String>,
    /// Content ref, the master ref is used when absent
    pub reference: Option<String>,
}

impl Query {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicates: vec![predicate],
            ..Self::default()
        }
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn after(mut self, id: impl Into<String>) -> Self {
        self.after = Some(id.into());
        self
    }

    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.orderings.push(ordering);
        self
    }

    pub fn fetch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fetch.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn reference(mut self, reference: Option<&str>) -> Self {
        self.reference = reference.map(str::to_string);
        self
    }

    /// Encode as `key=value` pairs for the search endpoint, `ref` excluded
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        let q: String = self.predicates.iter().map(Predicate::encode).collect();
        params.push(("q", format!("[{}]", q)));

        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size {
            params.push(("pageSize", size.to_string()));
        }
        if let Some(after) = &self.after {
            params.push(("after", after.clone()));
        }
        if !self.orderings.is_empty() {
            let orderings: Vec<String> = self.orderings.iter().map(Ordering::encode).collect();
            params.push(("orderings", format!("[{}]", orderings.join(","))));
        }
        if !self.fetch.is_empty() {
            params.push(("fetch", self.fetch.join(",")));
        }

        params
    }

    /// Encode as a percent-escaped query string
    pub fn to_query_string(&self) -> String {
        self.to_params()
            .iter()
            .map(|(k, v)| format!("{}={}", k, utf8_percent_encode(v, QUERY_VALUE)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
