//! Template types for typed variable injection.

use std::borrow::Cow;
use std::marker::PhantomData;
use std::path::Path;

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template with typed variable injection.
///
/// Either embedded in the binary (`new`) or read from disk (`load`).
#[derive(Debug, Clone)]
pub struct Template<V> {
    name: Cow<'static, str>,
    content: Cow<'static, str>,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(name: &'static str, content: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            content: Cow::Borrowed(content),
            _marker: PhantomData,
        }
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self {
            name: Cow::Owned(path.display().to_string()),
            content: Cow::Owned(content),
            _marker: PhantomData,
        })
    }

    /// Display name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(&self.content)
    }
}
