//! Markup rendering shared by the HTML and utility-class backends.

use crate::error::Result;
use crate::format::escape_html;
use crate::fragment::Fragment;
use crate::templates::{indent_block, DocumentData, TemplateEngine};
use altcode_core::MarkupMode;

const JSX_COMPONENT: &str = "export default function {{pascal_case name}}() {
  return (
{{indent body 4}}
  );
}
";

/// How `Fragment::styles` become attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StyleAttr {
    /// CSS declarations in a `style` attribute.
    Inline,
    /// Utility classes in a `class` attribute.
    Classes,
}

pub(crate) fn render(fragment: &Fragment, mode: MarkupMode, attr: StyleAttr) -> String {
    let mut lines = Vec::new();
    write_element(fragment, mode, attr, 0, &mut lines);
    lines.join("\n")
}

fn write_element(
    fragment: &Fragment,
    mode: MarkupMode,
    attr: StyleAttr,
    indent: usize,
    lines: &mut Vec<String>,
) {
    let pad = " ".repeat(indent);
    if let Some(comment) = &fragment.comment {
        match mode {
            MarkupMode::Html => lines.push(format!("{}<!-- {} -->", pad, comment)),
            // A comment cannot precede the returned root expression.
            MarkupMode::Jsx if indent > 0 => lines.push(format!("{}{{/* {} */}}", pad, comment)),
            MarkupMode::Jsx => {}
        }
    }

    let open = format!("{}<{}{}", pad, fragment.element, attributes(fragment, mode, attr));
    let close = format!("</{}>", fragment.element);

    if fragment.children.is_empty() && fragment.content.is_empty() {
        match mode {
            MarkupMode::Html => lines.push(format!("{}>{}", open, close)),
            MarkupMode::Jsx => lines.push(format!("{} />", open)),
        }
        return;
    }

    if fragment.children.is_empty() && fragment.content.len() == 1 {
        lines.push(format!("{}>{}{}", open, fragment.content[0], close));
        return;
    }

    lines.push(format!("{}>", open));
    for line in &fragment.content {
        lines.push(indent_block(line, indent + 2));
    }
    for child in &fragment.children {
        write_element(child, mode, attr, indent + 2, lines);
    }
    lines.push(format!("{}{}", pad, close));
}

fn attributes(fragment: &Fragment, mode: MarkupMode, attr: StyleAttr) -> String {
    let mut out = String::new();

    if !fragment.styles.is_empty() {
        match (attr, mode) {
            (StyleAttr::Classes, MarkupMode::Html) => {
                out.push_str(&format!(" class=\"{}\"", fragment.class_list()))
            }
            (StyleAttr::Classes, MarkupMode::Jsx) => {
                out.push_str(&format!(" className=\"{}\"", fragment.class_list()))
            }
            (StyleAttr::Inline, MarkupMode::Html) => {
                let declarations: Vec<String> = fragment
                    .styles
                    .iter()
                    .map(|(property, value)| format!("{}: {}", property, value))
                    .collect();
                out.push_str(&format!(" style=\"{}\"", declarations.join("; ")));
            }
            (StyleAttr::Inline, MarkupMode::Jsx) => {
                let entries: Vec<String> = fragment
                    .styles
                    .iter()
                    .map(|(property, value)| {
                        let value = value.replace('\\', "\\\\").replace('"', "'");
                        format!("{}: \"{}\"", jsx_property(property), value)
                    })
                    .collect();
                out.push_str(&format!(" style={{{{ {} }}}}", entries.join(", ")));
            }
        }
    }

    for (name, value) in &fragment.args {
        let name = match (mode, name.as_str()) {
            (MarkupMode::Jsx, "class") => "className",
            (MarkupMode::Jsx, "for") => "htmlFor",
            (_, other) => other,
        };
        if mode == MarkupMode::Jsx && value.starts_with('{') {
            out.push_str(&format!(" {}={}", name, value));
        } else {
            out.push_str(&format!(" {}=\"{}\"", name, value));
        }
    }
    out
}

/// CSS property as a React style key: `background-color` becomes
/// `backgroundColor`, `-webkit-background-clip` becomes `WebkitBackgroundClip`.
fn jsx_property(property: &str) -> String {
    let mut out = String::with_capacity(property.len());
    let mut upper = false;
    for (i, c) in property.chars().enumerate() {
        if c == '-' {
            upper = i > 0 || property.len() > 1;
            continue;
        }
        if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Text content escaped for the markup flavour. Line breaks become `<br />`.
pub(crate) fn escape_text(text: &str, mode: MarkupMode) -> String {
    let escaped = escape_html(text);
    let escaped = match mode {
        MarkupMode::Html => escaped,
        MarkupMode::Jsx => escaped.replace('{', "&#123;").replace('}', "&#125;"),
    };
    escaped.replace('\n', "<br />")
}

/// Vector markup: inline for HTML, through `dangerouslySetInnerHTML` for JSX
/// since exported SVG attributes are not valid JSX.
pub(crate) fn vector_fragment(markup: &str, mode: MarkupMode) -> Fragment {
    match mode {
        MarkupMode::Html => markup
            .lines()
            .filter(|line| !line.trim().is_empty())
            .fold(Fragment::new("div"), Fragment::with_content),
        MarkupMode::Jsx => {
            let literal = markup.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${");
            Fragment::new("div").with_arg(
                "dangerouslySetInnerHTML",
                format!("{{{{ __html: `{}` }}}}", literal),
            )
        }
    }
}

/// Wrap rendered roots: plain markup, or a default-exported React component.
pub(crate) fn document(name: &str, bodies: &[String], mode: MarkupMode) -> Result<String> {
    match mode {
        MarkupMode::Html => Ok(bodies.join("\n")),
        MarkupMode::Jsx => {
            let body = match bodies {
                [] => "null".to_string(),
                [single] => single.clone(),
                many => format!("<>\n{}\n</>", indent_block(&many.join("\n"), 2)),
            };
            let mut engine = TemplateEngine::new();
            engine.render_wrapper(
                "jsx-component",
                JSX_COMPONENT,
                &DocumentData {
                    name,
                    body: &body,
                    header: "",
                },
            )
        }
    }
}
