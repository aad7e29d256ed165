//! Tree traversal and the top-level render entry point.

use crate::canvas::Canvas;
use crate::config::RenderConfig;
use crate::element::{BoxSizing, Element};
use crate::error::{SnapError, SnapResult};
use crate::image_loader::ImageLoader;
use crate::node::NodeRecord;
use crate::surface::DrawingSurface;
use serde::{Deserialize, Serialize};
use snapcanvas_raster::{FontConfig, RasterContext};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Which list of nodes to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    /// Descendants of the container.
    Root,
    /// Nodes of the component rooted at the node with this id.
    Component(&'a str),
}

/// Source of layout nodes.
pub trait ElementProvider {
    /// The node whose box becomes the canvas.
    fn container(&self) -> SnapResult<NodeRecord>;

    /// Nodes of `scope` in document order.
    fn nodes(&self, scope: Scope<'_>) -> SnapResult<Vec<NodeRecord>>;

    /// Image locator of an exported nested canvas.
    fn nested_canvas(&self, canvas_id: &str) -> Option<String>;
}

/// A captured layout as a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub container: NodeRecord,
    pub nodes: Vec<NodeRecord>,
    /// Component nodes keyed by the id of their root node.
    pub components: HashMap<String, Vec<NodeRecord>>,
    /// Exported nested canvases keyed by canvas id.
    pub canvases: HashMap<String, String>,
}

impl Snapshot {
    pub fn from_json(text: &str) -> SnapResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: &Path) -> SnapResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl ElementProvider for Snapshot {
    fn container(&self) -> SnapResult<NodeRecord> {
        Ok(self.container.clone())
    }

    fn nodes(&self, scope: Scope<'_>) -> SnapResult<Vec<NodeRecord>> {
        match scope {
            Scope::Root => Ok(self.nodes.clone()),
            Scope::Component(id) => match self.components.get(id) {
                Some(nodes) => Ok(nodes.clone()),
                None => {
                    log::warn!("component {id:?} has no nodes in the snapshot");
                    Ok(Vec::new())
                }
            },
        }
    }

    fn nested_canvas(&self, canvas_id: &str) -> Option<String> {
        self.canvases.get(canvas_id).cloned()
    }
}

/// What a node draws between its background and its border.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Video,
    Image,
    Text,
    NestedCanvas(String),
    Empty,
}

impl Content {
    fn of(record: &NodeRecord) -> Self {
        let has_src = record.src.as_deref().is_some_and(|s| !s.is_empty());
        if has_src && record.object_fit.is_some() {
            Content::Video
        } else if has_src {
            Content::Image
        } else if record.dataset.text.is_some() || record.dataset.icon_char().is_some() {
            Content::Text
        } else if let Some(id) = record.canvas_id.as_ref().filter(|id| !id.is_empty()) {
            Content::NestedCanvas(id.clone())
        } else {
            Content::Empty
        }
    }
}

/// Turn a per-node resource failure into a warning.
fn recover(id: &str, result: SnapResult<()>) -> SnapResult<()> {
    match result {
        Err(err) if err.is_resource_failure() => {
            log::warn!("node {id:?}: {err}");
            Ok(())
        }
        other => other,
    }
}

async fn paint_stages<S: DrawingSurface>(
    canvas: &mut Canvas<S>,
    id: &str,
    content: Content,
    provider: &dyn ElementProvider,
    loader: &dyn ImageLoader,
) -> SnapResult<()> {
    canvas.set_transform()?;
    canvas.draw_box_shadow();
    canvas.draw_background_color();
    recover(id, canvas.draw_background_image(loader).await)?;
    match content {
        Content::Video => recover(id, canvas.draw_video(loader).await)?,
        Content::Image => recover(id, canvas.draw_image(loader).await)?,
        Content::Text => canvas.draw_text()?,
        Content::NestedCanvas(canvas_id) => match provider.nested_canvas(&canvas_id) {
            Some(src) => recover(id, canvas.draw_nested_canvas(&src, loader).await)?,
            None => log::debug!("nested canvas {canvas_id:?} not exported"),
        },
        Content::Empty => {}
    }
    canvas.draw_border();
    Ok(())
}

/// Paint one node through every stage.
///
/// The node's save point is popped whatever the outcome. Resource failures
/// are logged and skip only the stage they happen in.
pub async fn paint_node<S: DrawingSurface>(
    canvas: &mut Canvas<S>,
    record: NodeRecord,
    provider: &dyn ElementProvider,
    loader: &dyn ImageLoader,
) -> SnapResult<()> {
    let id = record.id.clone();
    let content = Content::of(&record);
    canvas.set_element(Element::new(record));
    let result = paint_stages(canvas, &id, content, provider, loader).await;
    canvas.reset_transform();
    canvas.restore_context();
    result
}

/// Paint the container, then every node of the root scope in document
/// order.
///
/// Component roots are not painted themselves: their component's nodes
/// take their place, before the following siblings. A component reached a
/// second time is skipped.
pub async fn paint_tree<S: DrawingSurface>(
    canvas: &mut Canvas<S>,
    provider: &dyn ElementProvider,
    loader: &dyn ImageLoader,
) -> SnapResult<()> {
    paint_node(canvas, provider.container()?, provider, loader).await?;

    let mut stack = vec![provider.nodes(Scope::Root)?.into_iter()];
    let mut entered = HashSet::new();
    while let Some(frame) = stack.last_mut() {
        let Some(record) = frame.next() else {
            stack.pop();
            continue;
        };
        if record.dataset.component {
            if !entered.insert(record.id.clone()) {
                log::warn!("component {:?} reached twice, skipping", record.id);
                continue;
            }
            log::debug!("entering component {:?}", record.id);
            stack.push(provider.nodes(Scope::Component(&record.id))?.into_iter());
            continue;
        }
        paint_node(canvas, record, provider, loader).await?;
    }
    Ok(())
}

/// Render a whole layout onto a new raster surface sized to the container
/// at device resolution.
pub async fn render_snapshot(
    provider: &dyn ElementProvider,
    config: RenderConfig,
    loader: &dyn ImageLoader,
    fonts: &FontConfig,
) -> SnapResult<Canvas<RasterContext>> {
    let container = Element::new(provider.container()?);
    let rect = container.box_rect(BoxSizing::Border);
    let scale = config.device_scale();
    let width = (rect.width * scale).round();
    let height = (rect.height * scale).round();
    if !(width >= 1.0 && height >= 1.0 && width <= u32::MAX as f64 && height <= u32::MAX as f64) {
        return Err(SnapError::InvalidSnapshot(format!(
            "container size {}x{} is not drawable",
            rect.width, rect.height
        )));
    }
    log::debug!("rendering {}x{} at scale {scale}", width, height);
    let surface = RasterContext::with_fonts(width as u32, height as u32, fonts)?;
    let mut canvas = Canvas::new(surface, &container, config);
    paint_tree(&mut canvas, provider, loader).await?;
    Ok(canvas)
}
