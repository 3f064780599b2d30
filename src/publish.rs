// ABOUTME: Publish flow: resolve by title, then create or update the page
// ABOUTME: Every terminal outcome produces exactly one user notice

use crate::document::load_document;
use crate::graphql::GraphQl;
use crate::model::{normalize_tags, Document, RemotePage};
use crate::report::Reporter;
use crate::wiki::{PageDraft, PageTarget, WikiApi};
use crate::{Error, Result};
use std::path::Path;

pub const UNKNOWN_ERROR: &str = "unknown error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Created(Option<RemotePage>),
    Updated { id: i64 },
}

pub struct Publisher<'a, G: GraphQl + ?Sized, R: Reporter + ?Sized> {
    wiki: WikiApi<'a, G>,
    reporter: &'a R,
}

impl<'a, G: GraphQl + ?Sized, R: Reporter + ?Sized> Publisher<'a, G, R> {
    pub fn new(gql: &'a G, reporter: &'a R) -> Self {
        Publisher {
            wiki: WikiApi::new(gql),
            reporter,
        }
    }

    pub fn publish(&self, doc: &Document) -> Result<PublishOutcome> {
        let tags = normalize_tags(&doc.tags);

        self.reporter
            .log(&format!("searching for existing page titled {:?}", doc.title));
        let target = match self.wiki.find_id_by_title(&doc.title)? {
            Some(id) => PageTarget::Existing(id),
            None => PageTarget::New {
                path: doc.path.clone(),
            },
        };
        self.reporter.log(&format!("resolved to {:?}", target));

        let draft = PageDraft {
            title: &doc.title,
            content: &doc.content,
            tags: &tags,
        };
        let result = self.wiki.save_page(&target, &draft)?;

        if !result.response.is_success() {
            let message = result
                .response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            return Err(Error::Remote(message));
        }

        match target {
            PageTarget::Existing(id) => Ok(PublishOutcome::Updated { id }),
            PageTarget::New { .. } => {
                if let Some(page) = &result.page {
                    self.reporter
                        .log(&format!("created page {} at {}", page.id, page.path));
                }
                Ok(PublishOutcome::Created(result.page))
            }
        }
    }

    /// Runs [`Publisher::publish`] and reports the outcome once.
    pub fn publish_and_notify(&self, doc: &Document) -> Result<PublishOutcome> {
        let result = self.publish(doc);
        match &result {
            Ok(PublishOutcome::Created(Some(page))) => {
                let path = page.path.trim_start_matches('/');
                self.reporter
                    .notify(&format!("Published to Wiki.js: created /{}", path));
            }
            Ok(PublishOutcome::Created(None)) => self.reporter.notify("Published to Wiki.js"),
            Ok(PublishOutcome::Updated { id }) => self
                .reporter
                .notify(&format!("Published to Wiki.js: updated page {}", id)),
            Err(e) => self.notify_publish_failure(e),
        }
        result
    }

    /// Reads `file` under `root` and publishes it; one notice either way.
    pub fn publish_file_and_notify(&self, file: &Path, root: &Path) -> Result<PublishOutcome> {
        let doc = match load_document(file, root) {
            Ok(doc) => doc,
            Err(e) => {
                self.notify_publish_failure(&e);
                return Err(e);
            }
        };
        self.reporter.log(&format!(
            "publishing {:?} as {} with tags {:?}",
            doc.title, doc.path, doc.tags
        ));
        self.publish_and_notify(&doc)
    }

    fn notify_publish_failure(&self, e: &Error) {
        self.reporter.log(&format!("publish failed: {:?}", e));
        self.reporter.notify(&format!("Publish failed: {}", e));
    }

    pub fn test_connection(&self) -> Result<usize> {
        let pages = self.wiki.list_pages()?;
        Ok(pages.len())
    }

    pub fn test_connection_and_notify(&self) -> Result<usize> {
        let result = self.test_connection();
        match &result {
            Ok(count) => self
                .reporter
                .notify(&format!("Connection OK: {} pages", count)),
            Err(e) => {
                self.reporter.log(&format!("connection test failed: {:?}", e));
                self.reporter
                    .notify(&format!("Connection test failed: {}", e));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RecordingReporter;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::fs;
    use tempfile::TempDir;

    /// Replays scripted responses and records every request.
    struct Scripted {
        responses: RefCell<VecDeque<Result<Value>>>,
        requests: RefCell<Vec<(String, Value)>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<Value>>) -> Self {
            Scripted {
                responses: RefCell::new(responses.into()),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.requests.borrow().iter().map(|(q, _)| q.clone()).collect()
        }

        fn variables(&self, index: usize) -> Value {
            self.requests.borrow()[index].1.clone()
        }
    }

    impl GraphQl for Scripted {
        fn send(&self, query: &str, variables: Value) -> Result<Value> {
            self.requests
                .borrow_mut()
                .push((query.to_string(), variables));
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Remote("no scripted response".into())))
        }
    }

    fn intro() -> Document {
        Document {
            title: "Intro".into(),
            path: "/notes/Intro".into(),
            content: "# Intro\n".into(),
            tags: vec![" guide".into(), "draft ".into()],
        }
    }

    fn not_found() -> Result<Value> {
        Ok(json!({"pages": {"search": {"results": []}}}))
    }

    fn found(id: i64) -> Result<Value> {
        Ok(json!({"pages": {"search": {"results": [{"id": id.to_string()}]}}}))
    }

    #[test]
    fn test_unresolved_title_creates() {
        let gql = Scripted::new(vec![
            not_found(),
            Ok(json!({"pages": {"create": {
                "responseResult": {"succeeded": true, "message": "created"},
                "page": {"id": 5, "path": "notes/Intro", "title": "Intro"}
            }}})),
        ]);
        let reporter = RecordingReporter::new();

        let outcome = Publisher::new(&gql, &reporter)
            .publish_and_notify(&intro())
            .unwrap();

        let queries = gql.queries();
        assert_eq!(queries.len(), 2);
        assert!(queries[0].contains("search("));
        assert!(queries[1].contains("create("));
        assert!(!queries[1].contains("update("));

        let vars = gql.variables(1);
        assert_eq!(vars["path"], "/notes/Intro");
        assert_eq!(vars["tags"], json!(["guide", "draft"]));

        match outcome {
            PublishOutcome::Created(Some(page)) => assert_eq!(page.id, 5),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(reporter.notices().len(), 1);
        assert!(reporter.notices()[0].starts_with("Published to Wiki.js"));
    }

    #[test]
    fn test_resolved_title_updates() {
        let gql = Scripted::new(vec![
            found(42),
            Ok(json!({"pages": {"update": {"responseResult": {"succeeded": true}}}})),
        ]);
        let reporter = RecordingReporter::new();

        let outcome = Publisher::new(&gql, &reporter).publish(&intro()).unwrap();

        assert_eq!(outcome, PublishOutcome::Updated { id: 42 });
        let queries = gql.queries();
        assert!(queries[1].contains("update("));
        assert!(!queries[1].contains("create("));
        assert_eq!(gql.variables(1)["id"], 42);
        // publish alone does not notify
        assert!(reporter.notices().is_empty());
    }

    #[test]
    fn test_update_rejected_reports_server_message() {
        let gql = Scripted::new(vec![
            found(42),
            Ok(json!({"pages": {"update": {"responseResult": {"succeeded": false, "message": "locked"}}}})),
        ]);
        let reporter = RecordingReporter::new();

        let err = Publisher::new(&gql, &reporter)
            .publish_and_notify(&intro())
            .unwrap_err();

        assert!(matches!(err, Error::Remote(ref m) if m == "locked"));
        let notices = reporter.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("locked"));
    }

    #[test]
    fn test_missing_message_falls_back() {
        let gql = Scripted::new(vec![
            not_found(),
            Ok(json!({"pages": {"create": {"responseResult": {"succeeded": false}}}})),
        ]);
        let reporter = RecordingReporter::new();

        let err = Publisher::new(&gql, &reporter)
            .publish_and_notify(&intro())
            .unwrap_err();

        assert_eq!(err.to_string(), UNKNOWN_ERROR);
        assert_eq!(reporter.notices(), vec![format!("Publish failed: {}", UNKNOWN_ERROR)]);
    }

    #[test]
    fn test_null_succeeded_reports_server_message() {
        let gql = Scripted::new(vec![
            found(42),
            Ok(json!({"pages": {"update": {"responseResult": {"succeeded": null, "message": "Page is locked"}}}})),
        ]);
        let reporter = RecordingReporter::new();

        let err = Publisher::new(&gql, &reporter)
            .publish_and_notify(&intro())
            .unwrap_err();

        assert!(matches!(err, Error::Remote(ref m) if m == "Page is locked"));
        assert_eq!(reporter.notices(), vec!["Publish failed: Page is locked"]);
    }

    #[test]
    fn test_missing_root_notifies_once_without_requests() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Intro.md");
        fs::write(&file, "# Intro\n").unwrap();
        let gql = Scripted::new(vec![]);
        let reporter = RecordingReporter::new();

        let err = Publisher::new(&gql, &reporter)
            .publish_file_and_notify(&file, &temp.path().join("no-such-vault"))
            .unwrap_err();

        assert!(matches!(err, Error::Filesystem(_)));
        assert!(gql.queries().is_empty());
        assert_eq!(reporter.notices().len(), 1);
        assert!(reporter.notices()[0].starts_with("Publish failed:"));
    }

    #[test]
    fn test_file_outside_root_is_not_published() {
        let temp = TempDir::new().unwrap();
        let vault = temp.path().join("vault");
        let other = temp.path().join("other");
        fs::create_dir_all(&vault).unwrap();
        fs::create_dir_all(&other).unwrap();
        let file = other.join("Intro.md");
        fs::write(&file, "# Intro\n").unwrap();
        let gql = Scripted::new(vec![]);
        let reporter = RecordingReporter::new();

        let err = Publisher::new(&gql, &reporter)
            .publish_file_and_notify(&file, &vault)
            .unwrap_err();

        assert!(matches!(err, Error::Document(ref m) if m.contains("is not under root")));
        assert!(gql.queries().is_empty());
        assert_eq!(reporter.notices().len(), 1);
    }

    #[test]
    fn test_publish_file_under_root_uses_relative_path() {
        let temp = TempDir::new().unwrap();
        let notes = temp.path().join("notes");
        fs::create_dir_all(&notes).unwrap();
        let file = notes.join("Intro.md");
        fs::write(&file, "---\ntags: [guide, draft]\n---\n# Intro\n").unwrap();
        let gql = Scripted::new(vec![
            not_found(),
            Ok(json!({"pages": {"create": {"responseResult": {"succeeded": true}}}})),
        ]);
        let reporter = RecordingReporter::new();

        let outcome = Publisher::new(&gql, &reporter)
            .publish_file_and_notify(&file, temp.path())
            .unwrap();

        assert_eq!(outcome, PublishOutcome::Created(None));
        assert_eq!(gql.variables(1)["path"], "/notes/Intro");
        assert_eq!(reporter.notices(), vec!["Published to Wiki.js"]);
    }

    #[test]
    fn test_search_failure_skips_mutation() {
        let gql = Scripted::new(vec![Err(Error::Transport { status: 500 })]);
        let reporter = RecordingReporter::new();

        let err = Publisher::new(&gql, &reporter)
            .publish_and_notify(&intro())
            .unwrap_err();

        assert!(matches!(err, Error::Transport { status: 500 }));
        assert_eq!(gql.queries().len(), 1);
        assert_eq!(reporter.notices().len(), 1);
    }

    #[test]
    fn test_intermediate_steps_are_logged() {
        let gql = Scripted::new(vec![
            found(3),
            Ok(json!({"pages": {"update": {"responseResult": {"succeeded": true}}}})),
        ]);
        let reporter = RecordingReporter::new();

        Publisher::new(&gql, &reporter).publish(&intro()).unwrap();

        let logs = reporter.logs();
        assert!(logs.iter().any(|l| l.contains("Existing(3)")));
    }

    #[test]
    fn test_connection_reports_count() {
        let gql = Scripted::new(vec![Ok(json!({"pages": {"list": [
            {"id": 1, "path": "home", "title": "Home"},
            {"id": 2, "path": "a", "title": "A"},
            {"id": 3, "path": "b", "title": "B"}
        ]}}))]);
        let reporter = RecordingReporter::new();

        let count = Publisher::new(&gql, &reporter)
            .test_connection_and_notify()
            .unwrap();

        assert_eq!(count, 3);
        assert_eq!(reporter.notices(), vec!["Connection OK: 3 pages"]);
    }

    #[test]
    fn test_connection_failure_reports_message() {
        let gql = Scripted::new(vec![Err(Error::Remote("Forbidden".into()))]);
        let reporter = RecordingReporter::new();

        assert!(Publisher::new(&gql, &reporter)
            .test_connection_and_notify()
            .is_err());
        assert_eq!(reporter.notices(), vec!["Connection test failed: Forbidden"]);
    }
}
