//! Built-in templates for entry lines.

use std::fmt;

use crate::error::Result;
use crate::template::Template;

/// One of the built-in line templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// `<amount> <name> <limit> (<type>, <book> p.<page>)`
    Reference,
    /// `<amount> <name> <limit> (<type>)`
    Dependency,
    /// `{{ name }} ({{ type }})`
    NodeName,
    /// `<name> (<type>, <book> p.<page>)`
    NodeNameReference,
}

impl Preset {
    /// Template used for dependency trees.
    pub fn for_dependencies(verbose: bool) -> Self {
        if verbose { Self::Reference } else { Self::Dependency }
    }

    /// Template used for collection trees.
    pub fn for_collections(verbose: bool) -> Self {
        if verbose {
            Self::NodeNameReference
        } else {
            Self::NodeName
        }
    }

    /// The template string.
    pub fn source(self) -> &'static str {
        match self {
            Self::Reference => "<amount> <name> <limit> (<type>, <book> p.<page>)",
            Self::Dependency => "<amount> <name> <limit> (<type>)",
            Self::NodeName => "{{ name }} ({{ type }})",
            Self::NodeNameReference => "<name> (<type>, <book> p.<page>)",
        }
    }

    /// A sample placeholder the delimiters are inferred from.
    pub fn delimiter_sample(self) -> &'static str {
        match self {
            Self::NodeName => "{{ key }}",
            _ => "<x>",
        }
    }

    /// Builds a fresh template for this preset.
    ///
    /// The dependency presets render missing annotations as empty text.
    pub fn build(self) -> Result<Template> {
        let template = Template::new(self.source(), self.delimiter_sample())?;
        Ok(match self {
            Self::Reference | Self::Dependency => template.with_default_value(""),
            Self::NodeName | Self::NodeNameReference => template,
        })
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reference => "reference",
            Self::Dependency => "dependency",
            Self::NodeName => "node-name",
            Self::NodeNameReference => "node-name-reference",
        };
        f.write_str(name)
    }
}
