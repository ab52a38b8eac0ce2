//! SVG generation
//!
//! Output is a pure function of the definition: attributes come out in the
//! order they were read and nothing is escaped, since icon data is already
//! made of well-formed coordinate and style strings.

use std::fmt;

use crate::ast::{IconDefinition, IconNode};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Settings for the root `<svg>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgOptions {
    pub width: String,
    pub height: String,
    /// Used when the icon has no (or an empty) `viewBox`
    pub default_view_box: String,
    /// Used when the icon has no (or an empty) `fill`
    pub default_fill: String,
    /// Emit the `<?xml ...?>` line before the root element
    pub xml_declaration: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            width: "24".to_string(),
            height: "24".to_string(),
            default_view_box: "0 0 1024 1024".to_string(),
            default_fill: "currentColor".to_string(),
            xml_declaration: true,
        }
    }
}

/// Render a definition with the default options
pub fn render(icon: &IconDefinition) -> String {
    render_with_options(icon, &SvgOptions::default())
}

pub fn render_with_options(icon: &IconDefinition, options: &SvgOptions) -> String {
    SvgDocument { icon, options }.to_string()
}

/// A definition paired with the options it renders under
pub struct SvgDocument<'a> {
    pub icon: &'a IconDefinition,
    pub options: &'a SvgOptions,
}

impl fmt::Display for SvgDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = self.icon;
        let options = self.options;

        if options.xml_declaration {
            writeln!(f, "{XML_DECLARATION}")?;
        }

        let view_box = icon.root_attr("viewBox").unwrap_or(&options.default_view_box);
        let fill = icon.root_attr("fill").unwrap_or(&options.default_fill);
        write!(
            f,
            r#"<svg width="{}" height="{}" viewBox="{}" fill="{}""#,
            options.width, options.height, view_box, fill
        )?;
        if let Some(fill_rule) = icon.root_attr("fillRule") {
            write!(f, r#" fill-rule="{fill_rule}""#)?;
        }
        writeln!(f, r#" xmlns="{SVG_NAMESPACE}">"#)?;

        for child in &icon.children {
            write_node(f, child)?;
        }
        write!(f, "\n</svg>")
    }
}

impl fmt::Display for IconNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &IconNode) -> fmt::Result {
    write!(f, "<{}", node.tag)?;
    for (name, value) in &node.attributes {
        write!(f, r#" {name}="{value}""#)?;
    }
    if node.is_self_closing() {
        return f.write_str("/>");
    }
    f.write_str(">")?;
    for child in &node.children {
        write_node(f, child)?;
    }
    write!(f, "</{}>", node.tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Attributes;

    fn icon(root: &[(&str, &str)], children: Vec<IconNode>) -> IconDefinition {
        IconDefinition {
            name: "Test".to_string(),
            root_attributes: root
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Attributes>(),
            children,
        }
    }

    #[test]
    fn root_defaults() {
        let svg = render(&icon(&[], vec![]));
        assert_eq!(
            svg,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <svg width=\"24\" height=\"24\" viewBox=\"0 0 1024 1024\" fill=\"currentColor\" xmlns=\"http://www.w3.org/2000/svg\">\n\
             \n\
             </svg>"
        );
    }

    #[test]
    fn fill_rule_only_when_present() {
        let svg = render(&icon(&[("viewBox", "0 0 16 16"), ("fillRule", "evenodd")], vec![]));
        assert!(svg.contains(r#"viewBox="0 0 16 16" fill="currentColor" fill-rule="evenodd" xmlns"#));

        let svg = render(&icon(&[("fillRule", "")], vec![]));
        assert!(!svg.contains("fill-rule"));
    }

    #[test]
    fn empty_root_values_fall_back() {
        let svg = render(&icon(&[("viewBox", ""), ("fill", "")], vec![]));
        assert!(svg.contains(r#"viewBox="0 0 1024 1024" fill="currentColor""#));

        let svg = render(&icon(&[("fill", "none")], vec![]));
        assert!(svg.contains(r#"fill="none""#));
    }

    #[test]
    fn self_closing_iff_no_children() {
        let leaf = IconNode::new("path").with_attr("d", "M0 0");
        assert_eq!(leaf.to_string(), r#"<path d="M0 0"/>"#);

        let group = IconNode::new("g")
            .with_attr("opacity", ".5")
            .with_child(leaf.clone())
            .with_child(IconNode::new("circle").with_attr("r", "2"));
        assert_eq!(
            group.to_string(),
            r#"<g opacity=".5"><path d="M0 0"/><circle r="2"/></g>"#
        );
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let node = IconNode::new("rect")
            .with_attr("y", "1")
            .with_attr("x", "2")
            .with_attr("width", "3");
        assert_eq!(node.to_string(), r#"<rect y="1" x="2" width="3"/>"#);
    }

    #[test]
    fn values_are_not_escaped() {
        let node = IconNode::new("path").with_attr("d", "M0 0 & <x>");
        assert_eq!(node.to_string(), r#"<path d="M0 0 & <x>"/>"#);
    }

    #[test]
    fn custom_options() {
        let options = SvgOptions {
            width: "1em".to_string(),
            height: "1em".to_string(),
            xml_declaration: false,
            ..Default::default()
        };
        let svg = render_with_options(&icon(&[], vec![IconNode::new("path")]), &options);
        assert_eq!(
            svg,
            "<svg width=\"1em\" height=\"1em\" viewBox=\"0 0 1024 1024\" fill=\"currentColor\" xmlns=\"http://www.w3.org/2000/svg\">\n<path/>\n</svg>"
        );
    }
}
