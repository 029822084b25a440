//! Namespace constants and small lookups over WordprocessingML nodes.

use roxmltree::Node;

pub(crate) const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const R_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const WP_NS: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub(crate) const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const VML_NS: &str = "urn:schemas-microsoft-com:vml";
pub(crate) const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
pub(crate) const CP_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
pub(crate) const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
pub(crate) const DCTERMS_NS: &str = "http://purl.org/dc/terms/";

/// Check whether a node is the WordprocessingML element `name`.
pub(crate) fn is_w(node: Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(W_NS)
}

/// First WordprocessingML child element named `name`.
pub(crate) fn w_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_w(*n, name))
}

/// All WordprocessingML child elements named `name`.
pub(crate) fn w_children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| is_w(*n, name))
}

/// A `w:`-qualified attribute of the node itself.
pub(crate) fn w_attr<'a>(node: Node<'a, '_>, attr: &str) -> Option<&'a str> {
    node.attribute((W_NS, attr))
}

/// The `w:val` attribute of the child element `child`.
pub(crate) fn w_val<'a>(node: Node<'a, '_>, child: &str) -> Option<&'a str> {
    w_child(node, child).and_then(|n| n.attribute((W_NS, "val")))
}

/// An on/off property such as `w:b`: present and not switched off by `w:val`.
pub(crate) fn toggle(props: Node, name: &str) -> bool {
    w_child(props, name)
        .map(|n| {
            n.attribute((W_NS, "val"))
                .map_or(true, |v| !matches!(v, "false" | "0" | "none"))
        })
        .unwrap_or(false)
}
