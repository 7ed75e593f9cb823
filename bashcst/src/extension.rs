//! Registry of extensions that teach the parser and renderer custom commands.
//!
//! A [`CommandHandler`] claims commands by a pattern such as `"docker"` or
//! `"docker run"` and turns their tokens into a [`CustomNode`]. A [`Generator`]
//! turns custom nodes back into text.

use std::sync::Arc;

use crate::ast::CustomNode;
use crate::{ExtensionError, ParseError, RenderError, RenderOptions, Token};

/// Parses commands matching a pattern into custom nodes.
pub trait CommandHandler: Send + Sync {
    /// The command name, optionally followed by a space and the next word,
    /// that this handler claims.
    fn pattern(&self) -> &str;

    /// Breaks ties between patterns of equal length; higher wins.
    fn priority(&self) -> i32 {
        0
    }

    /// Parses a command starting at the first of `tokens`. Returns the node
    /// and the number of tokens consumed, which must not be zero.
    ///
    /// # Arguments
    ///
    /// * `tokens` - The remaining tokens, starting with the command name.
    fn parse(&self, tokens: &[Token]) -> Result<(CustomNode, usize), ParseError>;

    /// Reports advisory problems with a parsed node.
    fn validate(&self, _node: &CustomNode) -> Vec<String> {
        vec![]
    }
}

/// Renders custom nodes.
pub trait Generator: Send + Sync {
    /// Returns whether this generator renders nodes of the given kind.
    fn handles(&self, kind: &str) -> bool;

    /// Renders the node.
    fn generate(&self, node: &CustomNode, options: &RenderOptions) -> Result<String, RenderError>;
}

/// A named bundle of command handlers and generators.
pub trait Extension {
    /// Unique name of the extension.
    fn name(&self) -> &str;

    /// Names of extensions that must be registered before this one.
    fn dependencies(&self) -> Vec<String> {
        vec![]
    }

    /// Command handlers contributed by this extension.
    fn command_handlers(&self) -> Vec<Arc<dyn CommandHandler>> {
        vec![]
    }

    /// Generators contributed by this extension.
    fn generators(&self) -> Vec<Arc<dyn Generator>> {
        vec![]
    }
}

/// Holds registered extensions in registration order.
#[derive(Default)]
pub struct ExtensionRegistry {
    names: Vec<String>,
    handlers: Vec<Arc<dyn CommandHandler>>,
    generators: Vec<Arc<dyn Generator>>,
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("names", &self.names)
            .field("handlers", &self.handlers.len())
            .field("generators", &self.generators.len())
            .finish()
    }
}

impl ExtensionRegistry {
    /// Returns an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extension along with its handlers and generators.
    ///
    /// # Arguments
    ///
    /// * `extension` - The extension to register. Its dependencies must
    ///   already be registered.
    pub fn register(&mut self, extension: &dyn Extension) -> Result<(), ExtensionError> {
        let name = extension.name();
        if self.contains(name) {
            return Err(ExtensionError::Duplicate(name.to_owned()));
        }

        if let Some(missing) = extension
            .dependencies()
            .into_iter()
            .find(|dependency| !self.contains(dependency))
        {
            return Err(ExtensionError::MissingDependency {
                extension: name.to_owned(),
                dependency: missing,
            });
        }

        let handlers = extension.command_handlers();
        let generators = extension.generators();
        tracing::debug!(
            target: "extension",
            "registered '{name}': {} handler(s), {} generator(s)",
            handlers.len(),
            generators.len()
        );

        self.names.push(name.to_owned());
        self.handlers.extend(handlers);
        self.generators.extend(generators);

        Ok(())
    }

    /// Returns whether an extension with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Returns the names of registered extensions in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Finds the handler for a command. The longest matching pattern wins;
    /// among equally long ones, the highest priority, then the earliest
    /// registered.
    ///
    /// # Arguments
    ///
    /// * `name` - The command name.
    /// * `next` - The text of the word following the name, if any.
    pub fn find_handler(&self, name: &str, next: Option<&str>) -> Option<&dyn CommandHandler> {
        let candidate = match next {
            Some(next) => format!("{name} {next}"),
            None => name.to_owned(),
        };

        let mut best: Option<&Arc<dyn CommandHandler>> = None;
        for handler in self
            .handlers
            .iter()
            .filter(|h| pattern_matches(h.pattern(), &candidate))
        {
            let better = best.is_none_or(|current| {
                (handler.pattern().len(), handler.priority())
                    > (current.pattern().len(), current.priority())
            });
            if better {
                best = Some(handler);
            }
        }

        best.map(AsRef::as_ref)
    }

    /// Finds the first registered generator that handles `kind`.
    pub fn find_generator(&self, kind: &str) -> Option<&dyn Generator> {
        self.generators
            .iter()
            .find(|g| g.handles(kind))
            .map(AsRef::as_ref)
    }
}

fn pattern_matches(pattern: &str, candidate: &str) -> bool {
    !pattern.is_empty()
        && candidate
            .strip_prefix(pattern)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
}
