// ABOUTME: Wiki.js page operations built on the GraphQL client
// ABOUTME: Title search, unified create/update mutation, and page listing

use crate::graphql::GraphQl;
use crate::model::{RemotePage, ResponseResult, SearchHit};
use crate::{Error, Result};
use serde_json::{json, Value};

/// Locale used for search and for every page written.
pub const LOCALE: &str = "zh";

const SEARCH_QUERY: &str = r#"query SearchPages($query: String!, $locale: String!) {
  pages {
    search(query: $query, locale: $locale) {
      results { id }
    }
  }
}"#;

const LIST_QUERY: &str = r#"query ListPages {
  pages {
    list(orderBy: TITLE) { id path title }
  }
}"#;

const FIXED_FIELDS: &str =
    r#"locale: "zh", description: "", isPublished: true, editor: "markdown", isPrivate: false"#;

const RESULT_FIELDS: &str = "responseResult { succeeded errorCode slug message }";

/// Where a save lands: an existing page by id, or a new page at `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
    Existing(i64),
    New { path: String },
}

#[derive(Debug, Clone)]
pub struct PageDraft<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub tags: &'a [String],
}

#[derive(Debug, Clone, Default)]
pub struct SaveResult {
    pub response: ResponseResult,
    pub page: Option<RemotePage>,
}

impl PageTarget {
    pub fn operation(&self) -> &'static str {
        match self {
            PageTarget::Existing(_) => "update",
            PageTarget::New { .. } => "create",
        }
    }

    pub fn mutation(&self) -> String {
        let (key_decl, key_arg, selection) = match self {
            PageTarget::Existing(_) => ("$id: Int!", "id: $id", RESULT_FIELDS.to_string()),
            PageTarget::New { .. } => (
                "$path: String!",
                "path: $path",
                format!("{} page {{ id path title }}", RESULT_FIELDS),
            ),
        };

        format!(
            "mutation SavePage({key_decl}, $title: String!, $content: String!, $tags: [String]!) {{\n  \
             pages {{\n    \
             {op}({key_arg}, title: $title, content: $content, tags: $tags, {fixed}) {{\n      \
             {selection}\n    \
             }}\n  \
             }}\n\
             }}",
            key_decl = key_decl,
            op = self.operation(),
            key_arg = key_arg,
            fixed = FIXED_FIELDS,
            selection = selection,
        )
    }

    pub fn variables(&self, draft: &PageDraft<'_>) -> Value {
        let mut vars = json!({
            "title": draft.title,
            "content": draft.content,
            "tags": draft.tags,
        });
        match self {
            PageTarget::Existing(id) => vars["id"] = json!(id),
            PageTarget::New { path } => vars["path"] = json!(path),
        }
        vars
    }
}

pub struct WikiApi<'a, G: GraphQl + ?Sized> {
    gql: &'a G,
}

impl<'a, G: GraphQl + ?Sized> WikiApi<'a, G> {
    pub fn new(gql: &'a G) -> Self {
        WikiApi { gql }
    }

    /// First search hit wins; the title is not checked for an exact match.
    pub fn find_id_by_title(&self, title: &str) -> Result<Option<i64>> {
        let data = self
            .gql
            .send(SEARCH_QUERY, json!({ "query": title, "locale": LOCALE }))?;

        let first = data
            .pointer("/pages/search/results")
            .and_then(Value::as_array)
            .and_then(|results| results.first().cloned());

        match first {
            Some(hit) => {
                let hit: SearchHit = serde_json::from_value(hit)?;
                Ok(Some(hit.id))
            }
            None => Ok(None),
        }
    }

    pub fn save_page(&self, target: &PageTarget, draft: &PageDraft<'_>) -> Result<SaveResult> {
        let data = self.gql.send(&target.mutation(), target.variables(draft))?;

        let node = match data.pointer(&format!("/pages/{}", target.operation())) {
            Some(node) if !node.is_null() => node,
            _ => return Ok(SaveResult::default()),
        };

        let response = match node.get("responseResult") {
            Some(rr) if !rr.is_null() => serde_json::from_value(rr.clone())?,
            _ => ResponseResult::default(),
        };
        let page = match node.get("page") {
            Some(page) if !page.is_null() => Some(serde_json::from_value(page.clone())?),
            _ => None,
        };

        Ok(SaveResult { response, page })
    }

    pub fn list_pages(&self) -> Result<Vec<RemotePage>> {
        let data = self.gql.send(LIST_QUERY, json!({}))?;

        match data.pointer("/pages/list") {
            Some(list) if list.is_array() => Ok(serde_json::from_value(list.clone())?),
            _ => Err(Error::Remote("could not read page list".into())),
        }
    }
}
