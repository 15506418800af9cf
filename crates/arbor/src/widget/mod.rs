//! Widget trait.

use std::any::{Any, type_name};

use crate::{
    geom::{Rect, Size},
    paint::DrawContext,
};

/// Widgets are the content payload attached to nodes in the Core arena.
///
/// Geometry, tree links and layout state live on the node. A widget only
/// describes what it looks like and how large its content is. A widget whose
/// content changes should call [`Core::register_for_graphic_update`] on its
/// node.
///
/// [`Core::register_for_graphic_update`]: crate::Core::register_for_graphic_update
pub trait Widget: Any + Send + Sync {
    /// Intrinsic content size, used when the node measures itself as Fit.
    fn content_size(&self) -> Size {
        Size::zero()
    }

    /// Draw this widget's own content. Does not draw children.
    ///
    /// `bounds` is the node's slot in its own coordinate space, so its
    /// origin is always zero.
    fn draw(&self, _ctx: &mut dyn DrawContext, _bounds: Rect) {}

    /// Key used to look up the style initializer applied on construction.
    fn style_key(&self) -> &'static str {
        "Widget"
    }

    /// Called exactly once immediately before the node is removed from the arena.
    fn on_dispose(&mut self) {}

    /// Display name.
    fn name(&self) -> String {
        let name = type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name).to_string()
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}
