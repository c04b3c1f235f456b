//! # Built-in Rules
//!
//! The three custom rules every registry built with
//! [`RuleRegistry::with_builtins`](crate::RuleRegistry::with_builtins) carries.
//! All take a boolean argument; `false` turns the rule into a no-op.
//!
//! | Rule                        | Needs                            |
//! |-----------------------------|----------------------------------|
//! | `value_must_match_filename` | the document identifier          |
//! | `value_must_be_unique`      | the cross-document state         |
//! | `app_must_exist`            | the filesystem (only rule doing I/O) |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use yval_core::{ResourceError, ValidationError, Value};

use crate::model::{SchemaNode, SchemaType};
use crate::registry::{Rule, RuleContext};

/// Argument meta-schema shared by the boolean rules.
fn boolean_argument() -> SchemaNode {
    SchemaNode::of_type(SchemaType::Boolean)
}

/// The argument has passed [`boolean_argument`], so anything but `true` is off.
fn enabled(argument: &Value) -> bool {
    argument.as_bool().unwrap_or(false)
}

/// Strings compare by content, other scalars by their rendering.
fn rendered(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `value_must_match_filename`: the value equals the document's filename
/// without its extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueMustMatchFilename;

impl ValueMustMatchFilename {
    pub const NAME: &'static str = "value_must_match_filename";
}

impl Rule for ValueMustMatchFilename {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn argument_schema(&self) -> SchemaNode {
        boolean_argument()
    }

    fn check(
        &self,
        argument: &Value,
        ctx: &RuleContext<'_>,
    ) -> Result<Vec<ValidationError>, ResourceError> {
        if !enabled(argument) {
            return Ok(Vec::new());
        }
        let value = rendered(ctx.value);
        let stem = ctx.document.file_stem().unwrap_or_default();
        if value == stem {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationError::new(
            ctx.path.clone(),
            Self::NAME,
            ctx.value.clone(),
            format!(
                "'{value}' at '{}' does not match the filename '{stem}' of '{}'",
                ctx.path, ctx.document
            ),
        )])
    }
}

/// `value_must_be_unique`: no two documents in a run may use the same value
/// for the field. The first document to use a value owns it; only later
/// uses are reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueMustBeUnique;

impl ValueMustBeUnique {
    pub const NAME: &'static str = "value_must_be_unique";
}

impl Rule for ValueMustBeUnique {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn argument_schema(&self) -> SchemaNode {
        boolean_argument()
    }

    fn check(
        &self,
        argument: &Value,
        ctx: &RuleContext<'_>,
    ) -> Result<Vec<ValidationError>, ResourceError> {
        if !enabled(argument) {
            return Ok(Vec::new());
        }
        let Some(owner) = ctx.state.record_if_absent(ctx.field, ctx.value, ctx.document) else {
            return Ok(Vec::new());
        };
        Ok(vec![ValidationError::new(
            ctx.path.clone(),
            Self::NAME,
            ctx.value.clone(),
            format!(
                "'{}' at '{}' is not unique: already used for field '{}' in '{owner}'",
                ctx.value, ctx.path, ctx.field
            ),
        )])
    }
}

/// Where `app_must_exist` looks for applications.
///
/// For a document at `<root>/<namespace>/<kind>/<doc>.yml` and the default
/// `namespace_depth` of 2, the namespace directory is `<root>/<namespace>`
/// and an app named `web` exists if `<root>/<namespace>/apps/web` is a
/// directory, or `web.yml` / `web.yaml` exists next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppLayout {
    /// Directory under the namespace holding the apps.
    pub apps_dir: String,
    /// How many directory levels above the document the namespace sits.
    pub namespace_depth: usize,
}

impl Default for AppLayout {
    fn default() -> Self {
        Self {
            apps_dir: "apps".to_string(),
            namespace_depth: 2,
        }
    }
}

impl AppLayout {
    /// Base directory for the document's apps, or `None` when the document
    /// sits too shallow to have a namespace.
    pub fn apps_root(&self, document: &Path) -> Option<PathBuf> {
        let namespace = document.ancestors().nth(self.namespace_depth)?;
        if namespace.as_os_str().is_empty() {
            return None;
        }
        Some(namespace.join(&self.apps_dir))
    }

    /// Paths that, if any exists, satisfy the rule for `app`.
    pub fn candidates(&self, apps_root: &Path, app: &str) -> [PathBuf; 3] {
        [
            apps_root.join(app),
            apps_root.join(format!("{app}.yml")),
            apps_root.join(format!("{app}.yaml")),
        ]
    }
}

/// `app_must_exist`: the value names an app that exists on disk according
/// to the configured [`AppLayout`].
#[derive(Debug, Clone, Default)]
pub struct AppMustExist {
    layout: AppLayout,
}

impl AppMustExist {
    pub const NAME: &'static str = "app_must_exist";

    pub fn new(layout: AppLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &AppLayout {
        &self.layout
    }

    fn failure(&self, ctx: &RuleContext<'_>, message: String) -> Vec<ValidationError> {
        vec![ValidationError::new(
            ctx.path.clone(),
            Self::NAME,
            ctx.value.clone(),
            message,
        )]
    }
}

impl Rule for AppMustExist {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn argument_schema(&self) -> SchemaNode {
        boolean_argument()
    }

    fn check(
        &self,
        argument: &Value,
        ctx: &RuleContext<'_>,
    ) -> Result<Vec<ValidationError>, ResourceError> {
        if !enabled(argument) {
            return Ok(Vec::new());
        }

        let Some(app) = ctx.value.as_str() else {
            return Ok(self.failure(
                ctx,
                format!("'{}' at '{}' is not an app name", ctx.value, ctx.path),
            ));
        };
        if app.is_empty() || app == "." || app == ".." || app.contains(['/', '\\']) {
            return Ok(self.failure(
                ctx,
                format!("'{app}' at '{}' is not a valid app name", ctx.path),
            ));
        }

        let Some(apps_root) = self.layout.apps_root(ctx.document.path()) else {
            return Ok(self.failure(
                ctx,
                format!(
                    "cannot derive the app location for '{app}' from '{}'",
                    ctx.document
                ),
            ));
        };

        for candidate in self.layout.candidates(&apps_root, app) {
            let exists = candidate.try_exists().map_err(|source| ResourceError::Stat {
                path: candidate.clone(),
                source,
            })?;
            if exists {
                tracing::trace!(app, location = %candidate.display(), "app found");
                return Ok(Vec::new());
            }
        }

        Ok(self.failure(
            ctx,
            format!(
                "app '{app}' at '{}' does not exist under '{}'",
                ctx.path,
                apps_root.display()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CrossDocumentState;
    use yval_core::{DocumentId, DocumentPath};

    fn check(
        rule: &dyn Rule,
        argument: bool,
        value: &Value,
        document: &DocumentId,
        state: &CrossDocumentState,
    ) -> Vec<ValidationError> {
        let path = DocumentPath::root().child("name");
        let ctx = RuleContext {
            field: "name",
            value,
            path: &path,
            document,
            state,
        };
        rule.check(&Value::Bool(argument), &ctx).unwrap()
    }

    #[test]
    fn filename_match_passes() {
        let state = CrossDocumentState::new();
        let errors = check(
            &ValueMustMatchFilename,
            true,
            &Value::from("team-a"),
            &DocumentId::from("teams/team-a.yml"),
            &state,
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn filename_mismatch_names_both() {
        let state = CrossDocumentState::new();
        let errors = check(
            &ValueMustMatchFilename,
            true,
            &Value::from("team-b"),
            &DocumentId::from("teams/team-a.yml"),
            &state,
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].constraint, "value_must_match_filename");
        assert!(errors[0].message.contains("team-a"));
        assert!(errors[0].message.contains("team-b"));
    }

    #[test]
    fn filename_rule_disabled_by_false() {
        let state = CrossDocumentState::new();
        let errors = check(
            &ValueMustMatchFilename,
            false,
            &Value::from("team-b"),
            &DocumentId::from("team-a.yml"),
            &state,
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn filename_rule_renders_non_strings() {
        let state = CrossDocumentState::new();
        let errors = check(
            &ValueMustMatchFilename,
            true,
            &Value::from(42i64),
            &DocumentId::from("ids/42.yaml"),
            &state,
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn uniqueness_flags_only_later_documents() {
        let state = CrossDocumentState::new();
        let a = DocumentId::from("a.yml");
        let b = DocumentId::from("b.yml");
        let x = Value::from("x");

        assert!(check(&ValueMustBeUnique, true, &x, &a, &state).is_empty());
        let errors = check(&ValueMustBeUnique, true, &x, &b, &state);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("a.yml"));
        assert_eq!(errors[0].constraint, "value_must_be_unique");
    }

    #[test]
    fn uniqueness_disabled_does_not_record() {
        let state = CrossDocumentState::new();
        let a = DocumentId::from("a.yml");
        assert!(check(&ValueMustBeUnique, false, &Value::from("x"), &a, &state).is_empty());
        assert!(state.is_empty());
    }

    #[test]
    fn layout_derives_namespace_apps_dir() {
        let layout = AppLayout::default();
        assert_eq!(
            layout.apps_root(Path::new("/repo/payments/deployments/web.yml")),
            Some(PathBuf::from("/repo/payments/apps"))
        );
        assert_eq!(layout.apps_root(Path::new("deployments/web.yml")), None);
        assert_eq!(layout.apps_root(Path::new("web.yml")), None);
    }

    fn app_fixture() -> (tempfile::TempDir, DocumentId) {
        let dir = tempfile::tempdir().unwrap();
        let ns = dir.path().join("payments");
        std::fs::create_dir_all(ns.join("deployments")).unwrap();
        std::fs::create_dir_all(ns.join("apps").join("web")).unwrap();
        std::fs::write(ns.join("apps").join("worker.yaml"), "name: worker\n").unwrap();
        let doc = DocumentId::new(ns.join("deployments").join("web.yml"));
        (dir, doc)
    }

    #[test]
    fn app_found_as_directory_or_file() {
        let (_dir, doc) = app_fixture();
        let state = CrossDocumentState::new();
        let rule = AppMustExist::default();
        assert!(check(&rule, true, &Value::from("web"), &doc, &state).is_empty());
        assert!(check(&rule, true, &Value::from("worker"), &doc, &state).is_empty());
    }

    #[test]
    fn missing_app_is_reported() {
        let (_dir, doc) = app_fixture();
        let state = CrossDocumentState::new();
        let errors = check(&AppMustExist::default(), true, &Value::from("billing"), &doc, &state);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("billing"));
        assert!(check(&AppMustExist::default(), false, &Value::from("billing"), &doc, &state).is_empty());
    }

    #[test]
    fn app_names_cannot_escape_the_apps_dir() {
        let (_dir, doc) = app_fixture();
        let state = CrossDocumentState::new();
        let errors = check(&AppMustExist::default(), true, &Value::from("../deployments"), &doc, &state);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("not a valid app name"));
    }

    #[test]
    fn shallow_document_cannot_resolve_app() {
        let state = CrossDocumentState::new();
        let errors = check(
            &AppMustExist::default(),
            true,
            &Value::from("web"),
            &DocumentId::from("web.yml"),
            &state,
        );
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("cannot derive"));
    }
}
