//! Cleanup tables: what counts as metadata, junk, or a no-op.

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Metadata namespaces whose elements are dropped wholesale.
pub const METADATA_NS: &[&str] = &[
    "http://purl.org/dc/elements/1.1/",
    "http://creativecommons.org/ns#",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
];

/// SVG elements that carry no rendering.
pub const METADATA_TAGS: &[&str] = &["title", "desc", "metadata"];

/// Namespace URI prefixes written by design tools.
pub const JUNK_NS: &[&str] = &[
    "http://www.inkscape.org/namespaces/inkscape",
    "http://sodipodi.sourceforge.net/DTD/sodipodi-0",
    "http://www.w3.org/1999/xlink",
    "http://ns.adobe.com/",
    "http://www.sketch.com/ns/svg/1",
    "http://www.bohemiancoding.com/sketch/ns",
    "http://www.figma.com/",
];

/// Root attributes that are obsolete or leftovers.
pub const OBSOLETE_ROOT_ATTRS: &[&str] = &[
    "version",
    "baseProfile",
    "enable-background",
    "xml:space",
    "style",
    "xmlns:xlink",
];

/// Attributes removed regardless of value.
pub const ALWAYS_REDUNDANT: &[&str] = &["data-name", "data-v"];

/// Presentation attributes paired with the values that make them no-ops.
pub const NOOP_VALUES: &[(&str, &[&str])] = &[
    ("display", &["inline"]),
    ("visibility", &["visible"]),
    ("overflow", &["visible"]),
    ("stroke", &["none"]),
    ("stroke-width", &["1"]),
    ("stroke-linecap", &["butt"]),
    ("stroke-linejoin", &["miter"]),
    ("stroke-miterlimit", &["4", "10"]),
    ("stroke-dasharray", &["none"]),
    ("stroke-dashoffset", &["0"]),
    ("stroke-opacity", &["1", "1.0"]),
    ("fill-rule", &["nonzero"]),
    ("fill-opacity", &["1", "1.0"]),
    ("color", &["inherit"]),
    ("image-rendering", &["auto"]),
    ("shape-rendering", &["auto"]),
    ("text-rendering", &["auto"]),
    ("vector-effect", &["none"]),
    ("pointer-events", &["visiblePainted", "all"]),
];

/// Whether a namespace URI belongs to a design tool.
pub fn is_junk_ns(uri: &str) -> bool {
    JUNK_NS.iter().any(|prefix| uri.starts_with(prefix))
}

pub fn is_metadata_ns(uri: &str) -> bool {
    METADATA_NS.contains(&uri)
}

/// Whether an unprefixed attribute is redundant with this value.
pub fn is_noop_attr(name: &str, value: &str) -> bool {
    if ALWAYS_REDUNDANT.contains(&name) {
        return true;
    }
    NOOP_VALUES
        .iter()
        .find(|(attr, _)| *attr == name)
        .is_some_and(|(_, values)| values.contains(&value.trim()))
}
