//! Dockable windows and the persisted layout of a dock stack.
//!
//! A dock stack is a stack node carrying a [`DockStack`] payload. Its
//! children are docked windows, splitters and nested dock stacks. The whole
//! arrangement can be saved as a single line of text and restored later:
//!
//! ```text
//! Horizontal;(WIN;files;Stretched;Stretched;Left;0,0,200,400;True;|SPL;4;Stretched;4;|STK;Stretched;Stretched;Vertical;(...))
//! ```

use std::{fmt, str::FromStr};

use tracing::warn;

use crate::{
    Core, NodeId, Widget,
    containers::ContainerKind,
    error::{Error, Result},
    geom::{Alignment, Measure, Orientation, Rect, Size},
    paint::DrawContext,
};

/// Payload of a dockable window. The window's content is the child of its
/// private container, and its name is the node name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockWindow {
    /// Edge or corner the window is docked to.
    pub dock_position: Alignment,
    /// Slot the window had before it was docked.
    pub saved_slot: Rect,
    /// Resizability before docking.
    pub was_resizable: bool,
    /// Whether the window can be resized by the user.
    pub resizable: bool,
    /// Whether the window sits in a dock stack.
    pub docked: bool,
}

impl Default for DockWindow {
    fn default() -> Self {
        Self {
            dock_position: Alignment::Center,
            saved_slot: Rect::default(),
            was_resizable: true,
            resizable: true,
            docked: false,
        }
    }
}

impl Widget for DockWindow {
    fn style_key(&self) -> &'static str {
        "DockWindow"
    }
}

/// Payload of a splitter between docked windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splitter {
    /// Thickness of the grip.
    pub thickness: i32,
}

impl Default for Splitter {
    fn default() -> Self {
        Self { thickness: 1 }
    }
}

impl Widget for Splitter {
    fn content_size(&self) -> Size {
        Size::new(self.thickness, self.thickness)
    }

    fn draw(&self, ctx: &mut dyn DrawContext, bounds: Rect) {
        ctx.fill_rect(bounds);
    }

    fn style_key(&self) -> &'static str {
        "Splitter"
    }
}

/// Marker payload of a dock stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DockStack;

impl Widget for DockStack {
    fn style_key(&self) -> &'static str {
        "DockStack"
    }
}

/// Create a detached dock stack.
pub fn create_dock_stack(core: &mut Core, orientation: Orientation) -> NodeId {
    let id = core.create_node(ContainerKind::Stack, Some(Box::new(DockStack)));
    core.set_orientation(id, orientation);
    id
}

/// Create a detached dock window named `name`.
pub fn create_dock_window(core: &mut Core, name: &str) -> NodeId {
    let id = core.create_node(ContainerKind::Single, Some(Box::new(DockWindow::default())));
    core.set_name(id, name);
    id
}

/// Create a detached splitter.
pub fn create_splitter(core: &mut Core, thickness: i32) -> NodeId {
    core.create_widget(Splitter { thickness })
}

/// One entry of a saved dock layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockItem {
    /// A docked window.
    Window {
        /// Window name, also the template it is rebuilt from.
        name: String,
        /// Width property.
        width: Measure,
        /// Height property.
        height: Measure,
        /// Docking position.
        position: Alignment,
        /// Slot before docking.
        saved_slot: Rect,
        /// Resizability before docking.
        was_resizable: bool,
    },
    /// A nested dock stack.
    Stack {
        /// Width property.
        width: Measure,
        /// Height property.
        height: Measure,
        /// Stack orientation.
        orientation: Orientation,
        /// Nested entries.
        items: Vec<DockItem>,
    },
    /// A splitter.
    Splitter {
        /// Width property.
        width: Measure,
        /// Height property.
        height: Measure,
        /// Grip thickness.
        thickness: i32,
    },
}

/// A saved dock layout: the top stack's orientation and its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockLayout {
    /// Orientation of the top stack.
    pub orientation: Orientation,
    /// Entries of the top stack.
    pub items: Vec<DockItem>,
}

/// Text form of a boolean.
fn bool_str(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

/// Write a parenthesized item list.
fn write_items(f: &mut fmt::Formatter<'_>, items: &[DockItem]) -> fmt::Result {
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str("|")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(")")
}

impl fmt::Display for DockItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Window {
                name,
                width,
                height,
                position,
                saved_slot,
                was_resizable,
            } => write!(
                f,
                "WIN;{name};{width};{height};{position};{saved_slot};{};",
                bool_str(*was_resizable)
            ),
            Self::Stack {
                width,
                height,
                orientation,
                items,
            } => {
                write!(f, "STK;{width};{height};{orientation};")?;
                write_items(f, items)
            }
            Self::Splitter {
                width,
                height,
                thickness,
            } => write!(f, "SPL;{width};{height};{thickness};"),
        }
    }
}

impl fmt::Display for DockLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};", self.orientation)?;
        write_items(f, &self.items)
    }
}

/// Reads a layout string front to back.
struct Cursor<'a> {
    /// Full input.
    src: &'a str,
    /// Byte offset of the next unread character.
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// A cursor at the start of `src`.
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Unread input.
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// The next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume one character.
    fn next_char(&mut self) -> Result<char> {
        let c = self
            .peek()
            .ok_or_else(|| Error::Parse("unexpected end of dock layout".into()))?;
        self.pos += c.len_utf8();
        Ok(c)
    }

    /// Consume `c` or fail.
    fn expect(&mut self, c: char) -> Result<()> {
        let at = self.pos;
        match self.next_char()? {
            n if n == c => Ok(()),
            n => Err(Error::Parse(format!("expected {c:?} at {at}, found {n:?}"))),
        }
    }

    /// Consume a field terminated by `;`, returning it without the
    /// terminator.
    fn field(&mut self) -> Result<&'a str> {
        let rest = self.rest();
        let end = rest
            .find(';')
            .ok_or_else(|| Error::Parse(format!("unterminated field at {}", self.pos)))?;
        self.pos += end + 1;
        Ok(&rest[..end])
    }

    /// Consume and parse a field.
    fn parse<T>(&mut self) -> Result<T>
    where
        T: FromStr,
        Error: From<T::Err>,
    {
        Ok(self.field()?.parse::<T>()?)
    }

    /// Consume a `True`/`False` field.
    fn boolean(&mut self) -> Result<bool> {
        let f = self.field()?;
        if f.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if f.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(Error::Parse(format!("invalid boolean {f:?}")))
        }
    }

    /// Consume and parse an integer field.
    fn int(&mut self) -> Result<i32> {
        let f = self.field()?;
        f.trim()
            .parse()
            .map_err(|_| Error::Parse(format!("invalid integer {f:?}")))
    }

    /// Consume a parenthesized item list.
    fn items(&mut self) -> Result<Vec<DockItem>> {
        self.expect('(')?;
        let mut items = Vec::new();
        if self.peek() == Some(')') {
            self.pos += 1;
            return Ok(items);
        }
        loop {
            items.push(self.item()?);
            match self.next_char()? {
                '|' => {}
                ')' => return Ok(items),
                c => return Err(Error::Parse(format!("expected '|' or ')', found {c:?}"))),
            }
        }
    }

    /// Consume one entry.
    fn item(&mut self) -> Result<DockItem> {
        let tag = self
            .rest()
            .get(..4)
            .ok_or_else(|| Error::Parse("truncated dock entry".into()))?;
        self.pos += 4;
        match tag {
            "WIN;" => Ok(DockItem::Window {
                name: self.field()?.to_string(),
                width: self.parse()?,
                height: self.parse()?,
                position: self.parse()?,
                saved_slot: self.parse()?,
                was_resizable: self.boolean()?,
            }),
            "STK;" => Ok(DockItem::Stack {
                width: self.parse()?,
                height: self.parse()?,
                orientation: self.parse()?,
                items: self.items()?,
            }),
            "SPL;" => Ok(DockItem::Splitter {
                width: self.parse()?,
                height: self.parse()?,
                thickness: self.int()?,
            }),
            "TVI;" => Err(Error::Parse("tab view entries are not supported".into())),
            t => Err(Error::Parse(format!("unknown dock entry {t:?}"))),
        }
    }
}

impl FromStr for DockLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut cur = Cursor::new(s.trim());
        let orientation = cur.parse()?;
        let items = cur.items()?;
        if !cur.rest().is_empty() {
            return Err(Error::Parse(format!(
                "trailing input after dock layout: {:?}",
                cur.rest()
            )));
        }
        Ok(Self { orientation, items })
    }
}

/// Snapshot the children of a dock stack.
fn snapshot_items(core: &Core, stack: NodeId) -> Vec<DockItem> {
    let mut items = Vec::new();
    for &c in core.children(stack) {
        let Some(node) = core.node(c) else {
            continue;
        };
        let width = node.props().width;
        let height = node.props().height;
        if let Some(w) = core.widget::<DockWindow>(c) {
            items.push(DockItem::Window {
                name: node.name().unwrap_or_default().to_string(),
                width,
                height,
                position: w.dock_position,
                saved_slot: w.saved_slot,
                was_resizable: w.was_resizable,
            });
        } else if core.widget::<DockStack>(c).is_some()
            && let Some(orientation) = core.orientation(c)
        {
            items.push(DockItem::Stack {
                width,
                height,
                orientation,
                items: snapshot_items(core, c),
            });
        } else if let Some(s) = core.widget::<Splitter>(c) {
            items.push(DockItem::Splitter {
                width,
                height,
                thickness: s.thickness,
            });
        } else {
            warn!("skipping {c:?} in dock layout: not a dock item");
        }
    }
    items
}

/// Capture the layout of a dock stack.
pub fn snapshot(core: &Core, stack: NodeId) -> Result<DockLayout> {
    if core.widget::<DockStack>(stack).is_none() {
        return Err(Error::NotAContainer(stack));
    }
    let orientation = core.orientation(stack).ok_or(Error::NotAContainer(stack))?;
    Ok(DockLayout {
        orientation,
        items: snapshot_items(core, stack),
    })
}

/// Save the layout of a dock stack as text.
pub fn export_config(core: &Core, stack: NodeId) -> Result<String> {
    Ok(snapshot(core, stack)?.to_string())
}

/// Build a window for an entry, from its template when one is registered.
fn build_window(core: &mut Core, name: &str) -> NodeId {
    if core.templates_mut().contains(name) {
        match core.create_instance(name) {
            Ok(id) if core.widget::<DockWindow>(id).is_some() => {
                core.set_name(id, name);
                return id;
            }
            Ok(id) => {
                warn!("template {name:?} did not build a dock window");
                core.dispose(id);
            }
            Err(e) => warn!("template {name:?} failed: {e}"),
        }
    }
    create_dock_window(core, name)
}

/// Rebuild dock entries under `parent`.
fn build_items(core: &mut Core, parent: NodeId, items: &[DockItem]) -> Result<()> {
    for item in items {
        let id = match item {
            DockItem::Window {
                name,
                width,
                height,
                position,
                saved_slot,
                was_resizable,
            } => {
                let id = build_window(core, name);
                core.set_width(id, *width);
                core.set_height(id, *height);
                if let Some(w) = core.widget_mut::<DockWindow>(id) {
                    w.dock_position = *position;
                    w.saved_slot = *saved_slot;
                    w.was_resizable = *was_resizable;
                    w.resizable = false;
                    w.docked = true;
                }
                id
            }
            DockItem::Stack {
                width,
                height,
                orientation,
                items,
            } => {
                let id = create_dock_stack(core, *orientation);
                core.set_width(id, *width);
                core.set_height(id, *height);
                core.add_child(parent, id)?;
                build_items(core, id, items)?;
                continue;
            }
            DockItem::Splitter {
                width,
                height,
                thickness,
            } => {
                let id = create_splitter(core, *thickness);
                core.set_width(id, *width);
                core.set_height(id, *height);
                id
            }
        };
        core.add_child(parent, id)?;
    }
    Ok(())
}

/// Replace the content of a dock stack with a saved layout.
pub fn restore(core: &mut Core, stack: NodeId, layout: &DockLayout) -> Result<()> {
    if core.widget::<DockStack>(stack).is_none() {
        return Err(Error::NotAContainer(stack));
    }
    core.clear_children(stack)?;
    core.set_orientation(stack, layout.orientation);
    build_items(core, stack, &layout.items)
}

/// Replace the content of a dock stack with a layout saved by
/// [`export_config`]. Malformed input leaves the stack untouched.
pub fn import_config(core: &mut Core, stack: NodeId, conf: &str) -> Result<()> {
    let layout: DockLayout = conf.parse()?;
    restore(core, stack, &layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, testing::TestWidget};

    const SAVED: &str = "Horizontal;(WIN;files;200;Stretched;Left;0,0,200,400;True;|\
        SPL;4;Stretched;4;|\
        STK;Stretched;Stretched;Vertical;(WIN;editor;Stretched;Stretched;Center;10,10,300,200;False;|\
        SPL;Stretched;4;4;|WIN;log;Stretched;30%;Bottom;0,0,0,0;True;))";

    fn dock() -> (Core, NodeId) {
        let mut core = Core::new(Config::default(), Size::new(800, 600));
        let ds = create_dock_stack(&mut core, Orientation::Vertical);
        core.add_widget(ds).ok();
        (core, ds)
    }

    #[test]
    fn round_trip() -> Result<()> {
        let (mut core, ds) = dock();
        import_config(&mut core, ds, SAVED)?;
        assert_eq!(export_config(&core, ds)?, SAVED);
        assert_eq!(core.orientation(ds), Some(Orientation::Horizontal));
        assert_eq!(core.children(ds).len(), 3);
        Ok(())
    }

    #[test]
    fn imported_windows_are_docked() -> Result<()> {
        let (mut core, ds) = dock();
        import_config(&mut core, ds, SAVED)?;
        let editor = core.find_by_name("editor").ok_or(Error::Parse("editor".into()))?;
        let w = core
            .widget::<DockWindow>(editor)
            .ok_or(Error::Parse("payload".into()))?;
        assert!(w.docked);
        assert!(!w.resizable);
        assert!(!w.was_resizable);
        assert_eq!(w.saved_slot, Rect::new(10, 10, 300, 200));
        assert_eq!(w.dock_position, Alignment::Center);
        Ok(())
    }

    #[test]
    fn windows_built_from_templates() -> Result<()> {
        let (mut core, ds) = dock();
        core.templates_mut().register("files", |core| {
            let win = create_dock_window(core, "ignored");
            let body = core.create_widget(TestWidget::new(10, 10));
            core.set_name(body, "tree");
            core.set_child(win, Some(body))?;
            Ok(win)
        });
        import_config(&mut core, ds, SAVED)?;
        let files = core.find_by_name("files").ok_or(Error::Parse("files".into()))?;
        assert!(core.template_part(files, "tree").is_ok());
        assert!(core.find_by_name("ignored").is_none());
        Ok(())
    }

    #[test]
    fn reimport_replaces_content() -> Result<()> {
        let (mut core, ds) = dock();
        import_config(&mut core, ds, SAVED)?;
        let before = core.len();
        import_config(&mut core, ds, "Vertical;(SPL;Stretched;2;2;)")?;
        assert_eq!(core.children(ds).len(), 1);
        assert!(core.len() < before);
        assert_eq!(export_config(&core, ds)?, "Vertical;(SPL;Stretched;2;2;)");
        Ok(())
    }

    #[test]
    fn empty_stack() -> Result<()> {
        let (mut core, ds) = dock();
        assert_eq!(export_config(&core, ds)?, "Vertical;()");
        import_config(&mut core, ds, "Horizontal;()")?;
        assert!(core.children(ds).is_empty());
        Ok(())
    }

    #[test]
    fn malformed_input_leaves_stack_untouched() -> Result<()> {
        let (mut core, ds) = dock();
        import_config(&mut core, ds, SAVED)?;
        for bad in [
            "Diagonal;()",
            "Horizontal;(WIN;a;Fit;Fit;Left;0,0,1,1;Maybe;)",
            "Horizontal;(TVI;Fit;Fit;(WIN;a;Fit;Fit;Left;0,0,1,1;True;))",
            "Horizontal;(SPL;1;1;x;)",
            "Horizontal;(SPL;1;1;1;",
            "Horizontal;(XXX;)",
            "Horizontal;()tail",
        ] {
            assert!(
                matches!(import_config(&mut core, ds, bad), Err(Error::Parse(_))),
                "{bad}"
            );
        }
        assert_eq!(export_config(&core, ds)?, SAVED);
        Ok(())
    }

    #[test]
    fn foreign_children_are_skipped() -> Result<()> {
        let (mut core, ds) = dock();
        let w = core.create_widget(TestWidget::new(5, 5));
        core.add_child(ds, w)?;
        let s = create_splitter(&mut core, 3);
        core.add_child(ds, s)?;
        assert_eq!(export_config(&core, ds)?, "Vertical;(SPL;Inherit;Inherit;3;)");
        Ok(())
    }

    #[test]
    fn not_a_dock_stack() {
        let mut core = Core::new(Config::default(), Size::new(10, 10));
        let s = core.create_stack(Orientation::Vertical);
        assert_eq!(export_config(&core, s), Err(Error::NotAContainer(s)));
        assert_eq!(
            import_config(&mut core, s, "Vertical;()"),
            Err(Error::NotAContainer(s))
        );
    }

    #[test]
    fn dock_stack_is_spaced_by_style() {
        let (core, ds) = dock();
        assert_eq!(core.node(ds).map(|n| n.style_key()), Some("DockStack"));
        assert_eq!(core.spacing(ds), Some(2));
    }
}
