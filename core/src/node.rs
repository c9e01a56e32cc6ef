use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Text,
    Rectangle,
    Vector,
    #[serde(other)]
    Other,
}

/// A node of the design document as the service returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: NodeType,
    /// `None` marks a leaf. An empty list is a container with nothing inside.
    pub children: Option<Vec<Node>>,
    pub style: Option<TypeStyle>,
    #[serde(default)]
    pub fills: Vec<Paint>,
}

impl Node {
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Every field may be missing upstream. Completeness is checked per leaf when the style is
/// projected, so one odd node cannot fail the whole subtree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default)]
    pub italic: bool,
    pub font_weight: Option<f64>,
    pub font_size: Option<f64>,
    pub line_height_px: Option<f64>,
    pub font_family: Option<String>,
    pub font_post_script_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paint {
    #[serde(rename = "type", default)]
    pub type_: PaintType,
    pub color: Option<FigmaColor>,
    pub opacity: Option<f64>,
}

/// Channels in `[0, 1]`. A missing channel is `None` and the color is rejected when projected.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FigmaColor {
    pub r: Option<f64>,
    pub g: Option<f64>,
    pub b: Option<f64>,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl FigmaColor {
    /// `[r, g, b]` when all three channels are present.
    pub fn channels(&self) -> Option<[f64; 3]> {
        Some([self.r?, self.g?, self.b?])
    }
}

/// Collects the leaves beneath `nodes` in document order.
pub fn flatten(nodes: &[Node]) -> Vec<&Node> {
    let mut leaves = Vec::new();
    collect_leaves(nodes, &mut leaves);
    leaves
}

fn collect_leaves<'a>(nodes: &'a [Node], leaves: &mut Vec<&'a Node>) {
    for node in nodes {
        match &node.children {
            Some(children) => collect_leaves(children, leaves),
            None => leaves.push(node),
        }
    }
}

/// Pre-order search over `nodes` and everything beneath them.
pub fn find<'a>(nodes: &'a [Node], pred: &dyn Fn(&Node) -> bool) -> Option<&'a Node> {
    nodes
        .iter()
        .find_map(|node| if pred(node) { Some(node) } else { find(node.children(), pred) })
}
