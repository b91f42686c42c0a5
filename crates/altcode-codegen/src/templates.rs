//! Template engine for generation modes.
//!
//! Backends emit a body; a generation mode wraps it (a component, a struct,
//! a whole app) through a Handlebars template.

use crate::error::{CodegenError, Result};
use convert_case::{Case, Casing};
use handlebars::Handlebars;
use serde::Serialize;

/// Template engine using Handlebars.
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

/// Data every wrapper template receives.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentData<'a> {
    /// Unique name of the first root, used for type and function names.
    pub name: &'a str,
    pub body: &'a str,
    /// Imports or other preamble lines, already joined.
    pub header: &'a str,
}

impl<'a> TemplateEngine<'a> {
    /// Create a new template engine.
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // Output is source code, never HTML to be escaped.
        handlebars.register_escape_fn(handlebars::no_escape);
        Self::register_helpers(&mut handlebars);
        Self { handlebars }
    }

    /// Register a template.
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(CodegenError::InvalidTemplate)?;
        Ok(())
    }

    /// Render a template.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.handlebars
            .render(name, data)
            .map_err(CodegenError::TemplateError)
    }

    /// Register a template once and render it.
    pub fn render_wrapper(&mut self, name: &str, template: &str, data: &DocumentData) -> Result<String> {
        if !self.handlebars.has_template(name) {
            self.register_template(name, template)?;
        }
        self.render(name, data)
    }

    /// Register custom helpers.
    fn register_helpers(handlebars: &mut Handlebars) {
        // Pascal case helper
        handlebars.register_helper(
            "pascal_case",
            Box::new(
                |h: &handlebars::Helper,
                 _r: &Handlebars,
                 _ctx: &handlebars::Context,
                 _rc: &mut handlebars::RenderContext,
                 out: &mut dyn handlebars::Output| {
                    let param = h
                        .param(0)
                        .and_then(|v| v.value().as_str())
                        .unwrap_or("");
                    out.write(&to_pascal_case(param))?;
                    Ok(())
                },
            ),
        );

        // Indent every non-blank line of a block
        handlebars.register_helper(
            "indent",
            Box::new(
                |h: &handlebars::Helper,
                 _r: &Handlebars,
                 _ctx: &handlebars::Context,
                 _rc: &mut handlebars::RenderContext,
                 out: &mut dyn handlebars::Output| {
                    let content = h
                        .param(0)
                        .and_then(|v| v.value().as_str())
                        .unwrap_or("");
                    let spaces = h
                        .param(1)
                        .and_then(|v| v.value().as_u64())
                        .unwrap_or(4) as usize;
                    out.write(&indent_block(content, spaces))?;
                    Ok(())
                },
            ),
        );
    }
}

impl<'a> Default for TemplateEngine<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert to PascalCase, keeping the result a valid identifier.
pub fn to_pascal_case(s: &str) -> String {
    let pascal: String = s
        .to_case(Case::Pascal)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    match pascal.chars().next() {
        None => "Component".to_string(),
        Some(c) if c.is_ascii_digit() => format!("Component{}", pascal),
        Some(_) => pascal,
    }
}

/// Prefix every non-blank line with `spaces` spaces.
pub fn indent_block(content: &str, spaces: usize) -> String {
    let indent = " ".repeat(spaces);
    content
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_wrapper() {
        let mut engine = TemplateEngine::new();
        let data = DocumentData {
            name: "login card",
            body: "Text(\"<hi>\")",
            header: "",
        };
        let out = engine
            .render_wrapper("t", "struct {{pascal_case name}} {\n{{indent body 4}}\n}", &data)
            .unwrap();
        assert_eq!(out, "struct LoginCard {\n    Text(\"<hi>\")\n}");
    }

    #[test]
    fn test_body_is_not_escaped() {
        let mut engine = TemplateEngine::new();
        let data = DocumentData {
            name: "x",
            body: "<div class=\"a\">&</div>",
            header: "",
        };
        let out = engine.render_wrapper("t", "{{body}}", &data).unwrap();
        assert_eq!(out, "<div class=\"a\">&</div>");
    }

    #[test]
    fn test_pascal_case_is_an_identifier() {
        assert_eq!(to_pascal_case("Icon_01"), "Icon01");
        assert_eq!(to_pascal_case("2 columns"), "Component2Columns");
        assert_eq!(to_pascal_case("!!!"), "Component");
    }

    #[test]
    fn test_invalid_template() {
        let mut engine = TemplateEngine::new();
        assert!(matches!(
            engine.register_template("bad", "{{#if}}"),
            Err(CodegenError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_unregistered_helper_fails() {
        let mut engine = TemplateEngine::new();
        let data = DocumentData {
            name: "login card",
            body: "",
            header: "",
        };
        assert!(matches!(
            engine.render_wrapper("t", "{{camel_case name}}", &data),
            Err(CodegenError::TemplateError(_))
        ));
    }
}
