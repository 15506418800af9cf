#[cfg(test)]
mod tests {
    use arbor::{
        Config, Core, NodeId,
        error::Result,
        event::{Button, Event, EventKind, KeyCode, Mods},
        geom::{HorizontalAlignment, Point, VerticalAlignment},
        testing::{EventLog, Harness, event_log, record},
    };

    /// A group filling a 100x100 root with a centered 20x20 leaf.
    fn scene(config: Config) -> Result<(Harness, NodeId, NodeId)> {
        let mut h = Harness::with_config(config, 100, 100);
        let g = h.core.create_group();
        h.core.add_widget(g)?;
        let l = fixed(&mut h.core, 20, 20);
        h.core.add_child(g, l)?;
        h.settle(20);
        Ok((h, g, l))
    }

    fn fixed(core: &mut Core, w: i32, h: i32) -> NodeId {
        let l = core.create_leaf();
        core.set_width(l, w);
        core.set_height(l, h);
        l
    }

    fn count(log: &EventLog, id: NodeId, kind: EventKind) -> usize {
        log.lock()
            .iter()
            .filter(|(n, e)| *n == id && e.kind() == kind)
            .count()
    }

    #[test]
    fn hover_follows_the_pointer() -> Result<()> {
        let (mut h, g, l) = scene(Config::default())?;
        let log = event_log();
        for id in [g, l] {
            record(&mut h.core, id, EventKind::MouseEnter, &log, false)?;
            record(&mut h.core, id, EventKind::MouseLeave, &log, false)?;
        }

        assert!(h.core.process_mouse_move((50, 50)));
        assert_eq!(h.core.hover(), Some(l));
        let entered: Vec<NodeId> = log.lock().iter().map(|(n, _)| *n).collect();
        assert_eq!(entered, vec![g, l]);

        assert!(h.core.process_mouse_move((5, 5)));
        assert_eq!(h.core.hover(), Some(g));
        assert_eq!(count(&log, l, EventKind::MouseLeave), 1);
        assert_eq!(count(&log, g, EventKind::MouseLeave), 0);

        assert!(!h.core.process_mouse_move((500, 500)));
        assert_eq!(h.core.hover(), None);
        assert_eq!(count(&log, g, EventKind::MouseLeave), 1);
        Ok(())
    }

    #[test]
    fn disposing_the_hover_target_clears_it() -> Result<()> {
        let (mut h, g, l) = scene(Config::default())?;
        h.core.process_mouse_move((50, 50));
        assert_eq!(h.core.hover(), Some(l));
        h.core.dispose(l);
        assert_eq!(h.core.hover(), None);
        assert!(!h.core.exists(l));

        h.frame();
        h.core.process_mouse_move((51, 51));
        assert_eq!(h.core.hover(), Some(g));
        h.core.dispose(g);
        assert_eq!(h.core.hover(), None);
        Ok(())
    }

    #[test]
    fn hiding_releases_hover() -> Result<()> {
        let (mut h, _, l) = scene(Config::default())?;
        h.core.process_mouse_move((50, 50));
        h.core.set_visible(l, false);
        assert_eq!(h.core.hover(), None);
        Ok(())
    }

    #[test]
    fn higher_top_level_widget_takes_the_pointer() -> Result<()> {
        let mut h = Harness::new(100, 100);
        let a = h.core.create_group();
        let b = h.core.create_group();
        h.core.add_widget(a)?;
        h.core.add_widget(b)?;
        h.settle(20);

        h.core.process_mouse_move((10, 10));
        assert_eq!(h.core.hover(), Some(b));
        h.core.put_widget_on_top(a)?;
        h.core.process_mouse_move((11, 11));
        assert_eq!(h.core.hover(), Some(a));
        Ok(())
    }

    #[test]
    fn click_fires_once_the_delay_expires() -> Result<()> {
        let config = Config {
            double_click_ms: 0,
            ..Config::default()
        };
        let (mut h, _, l) = scene(config)?;
        let log = event_log();
        record(&mut h.core, l, EventKind::MouseClick, &log, false)?;
        record(&mut h.core, l, EventKind::MouseUp, &log, false)?;

        h.core.process_mouse_move((50, 50));
        assert!(h.core.process_mouse_button_down(Button::Left));
        assert_eq!(h.core.active(), Some(l));
        assert!(h.core.process_mouse_button_up(Button::Left));
        assert_eq!(h.core.active(), None);
        assert_eq!(count(&log, l, EventKind::MouseUp), 1);
        assert_eq!(count(&log, l, EventKind::MouseClick), 0);

        h.frame();
        assert_eq!(count(&log, l, EventKind::MouseClick), 1);
        h.frame();
        assert_eq!(count(&log, l, EventKind::MouseClick), 1);
        Ok(())
    }

    #[test]
    fn second_press_makes_a_double_click() -> Result<()> {
        let config = Config {
            double_click_ms: 60_000,
            ..Config::default()
        };
        let (mut h, _, l) = scene(config)?;
        let log = event_log();
        record(&mut h.core, l, EventKind::MouseClick, &log, false)?;
        record(&mut h.core, l, EventKind::MouseDoubleClick, &log, false)?;

        h.core.process_mouse_move((50, 50));
        h.core.process_mouse_button_down(Button::Left);
        h.core.process_mouse_button_up(Button::Left);
        h.core.process_mouse_button_down(Button::Left);
        h.core.process_mouse_button_up(Button::Left);
        h.frame();

        assert_eq!(count(&log, l, EventKind::MouseDoubleClick), 1);
        assert_eq!(count(&log, l, EventKind::MouseClick), 0);
        Ok(())
    }

    #[test]
    fn pending_click_fires_on_the_next_press() -> Result<()> {
        let config = Config {
            double_click_ms: 60_000,
            ..Config::default()
        };
        let mut h = Harness::with_config(config, 100, 100);
        let g = h.core.create_group();
        h.core.add_widget(g)?;
        let left = fixed(&mut h.core, 20, 20);
        h.core.set_horizontal_alignment(left, HorizontalAlignment::Left);
        let right = fixed(&mut h.core, 20, 20);
        h.core.set_horizontal_alignment(right, HorizontalAlignment::Right);
        h.core.add_child(g, left)?;
        h.core.add_child(g, right)?;
        h.settle(20);

        let log = event_log();
        record(&mut h.core, left, EventKind::MouseClick, &log, false)?;
        record(&mut h.core, right, EventKind::MouseDown, &log, false)?;

        h.core.process_mouse_move((10, 50));
        h.core.process_mouse_button_down(Button::Left);
        h.core.process_mouse_button_up(Button::Left);
        assert_eq!(count(&log, left, EventKind::MouseClick), 0);

        h.core.process_mouse_move((90, 50));
        assert_eq!(h.core.hover(), Some(right));
        h.core.process_mouse_button_down(Button::Left);
        let order: Vec<EventKind> = log.lock().iter().map(|(_, e)| e.kind()).collect();
        assert_eq!(order, vec![EventKind::MouseClick, EventKind::MouseDown]);
        Ok(())
    }

    #[test]
    fn focusable_nodes_take_focus_on_press() -> Result<()> {
        let (mut h, g, l) = scene(Config::default())?;
        h.core.set_focusable(l, true);
        let log = event_log();
        record(&mut h.core, l, EventKind::Focused, &log, false)?;
        record(&mut h.core, g, EventKind::MouseDown, &log, false)?;

        h.core.process_mouse_move((50, 50));
        h.core.process_mouse_button_down(Button::Left);
        assert_eq!(h.core.focused(), Some(l));
        assert!(h.core.node(l).is_some_and(|n| n.has_focus()));
        assert_eq!(count(&log, l, EventKind::Focused), 1);
        assert_eq!(count(&log, g, EventKind::MouseDown), 0);
        Ok(())
    }

    #[test]
    fn unhandled_events_bubble_to_the_focus_parent() -> Result<()> {
        let (mut h, g, l) = scene(Config::default())?;
        let log = event_log();
        record(&mut h.core, g, EventKind::MouseDown, &log, false)?;
        record(&mut h.core, g, EventKind::KeyDown, &log, false)?;

        h.core.process_mouse_move((50, 50));
        h.core.process_mouse_button_down(Button::Left);
        assert_eq!(count(&log, g, EventKind::MouseDown), 1);

        h.core.set_focus(Some(l));
        assert!(h.core.process_key_down(KeyCode::Enter));
        assert_eq!(count(&log, g, EventKind::KeyDown), 1);
        Ok(())
    }

    #[test]
    fn subscribers_stop_bubbling() -> Result<()> {
        let mut h = Harness::new(100, 100);
        let outer = h.core.create_group();
        h.core.add_widget(outer)?;
        let middle = h.core.create_group();
        h.core.add_child(outer, middle)?;
        let l = h.core.create_leaf();
        h.core.add_child(middle, l)?;

        let log = event_log();
        record(&mut h.core, middle, EventKind::KeyPress, &log, false)?;
        record(&mut h.core, outer, EventKind::KeyPress, &log, false)?;
        record(&mut h.core, outer, EventKind::KeyUp, &log, false)?;

        h.core.send_event(l, Event::KeyPress('x'));
        assert_eq!(count(&log, middle, EventKind::KeyPress), 1);
        assert_eq!(count(&log, outer, EventKind::KeyPress), 0);

        record(&mut h.core, middle, EventKind::KeyUp, &log, true)?;
        assert!(h.core.send_event(l, Event::KeyUp(KeyCode::Esc.into())));
        assert_eq!(count(&log, outer, EventKind::KeyUp), 0);
        Ok(())
    }

    #[test]
    fn mouse_bubbling_can_be_disabled() -> Result<()> {
        let (mut h, g, l) = scene(Config::default())?;
        h.core.set_bubble_mouse_event(l, false);
        let log = event_log();
        record(&mut h.core, g, EventKind::MouseDown, &log, false)?;
        record(&mut h.core, g, EventKind::KeyPress, &log, false)?;

        h.core.process_mouse_move((50, 50));
        h.core.process_mouse_button_down(Button::Left);
        assert_eq!(count(&log, g, EventKind::MouseDown), 0);

        h.core.send_event(l, Event::KeyPress('k'));
        assert_eq!(count(&log, g, EventKind::KeyPress), 1);
        Ok(())
    }

    #[test]
    fn events_to_disposed_nodes_are_dropped() -> Result<()> {
        let (mut h, _, l) = scene(Config::default())?;
        h.core.dispose(l);
        assert!(!h.core.send_event(l, Event::KeyPress('x')));
        assert!(h.core.subscribe(l, EventKind::KeyPress, |_, _, _| {}).is_err());
        Ok(())
    }

    /// A 100x100 scroller showing a 300x500 leaf anchored top-left.
    fn scrolled() -> Result<(Harness, NodeId, NodeId)> {
        let mut h = Harness::new(100, 100);
        let s = h.core.create_scroller();
        h.core.add_widget(s)?;
        let c = fixed(&mut h.core, 300, 500);
        h.core.set_horizontal_alignment(c, HorizontalAlignment::Left);
        h.core.set_vertical_alignment(c, VerticalAlignment::Top);
        h.core.set_child(s, Some(c))?;
        h.settle(20);
        Ok((h, s, c))
    }

    #[test]
    fn scroller_wheel() -> Result<()> {
        let (mut h, s, c) = scrolled()?;
        assert_eq!(h.core.max_scroll(s), Point::new(200, 400));

        h.core.process_mouse_move((50, 50));
        assert_eq!(h.core.hover(), Some(c));
        h.core.process_mouse_wheel(-1);
        assert_eq!(h.core.scroll(s), Point::new(0, 50));
        h.core.process_mouse_wheel(-100);
        assert_eq!(h.core.scroll(s), Point::new(0, 400));
        h.core.process_mouse_wheel(1);
        assert_eq!(h.core.scroll(s), Point::new(0, 350));

        h.core.set_modifiers(Mods {
            shift: true,
            ..Mods::default()
        });
        h.core.process_mouse_wheel(1);
        assert_eq!(h.core.scroll(s), Point::new(50, 350));

        h.core.process_mouse_move((51, 51));
        assert_eq!(h.core.hover(), Some(c));
        Ok(())
    }

    #[test]
    fn huge_wheel_deltas_clamp_to_the_bounds() -> Result<()> {
        let (mut h, s, _) = scrolled()?;
        h.core.process_mouse_move((50, 50));
        assert!(h.core.process_mouse_wheel(i32::MIN / 2));
        assert_eq!(h.core.scroll(s), Point::new(0, 400));
        assert!(h.core.process_mouse_wheel(i32::MAX));
        assert_eq!(h.core.scroll(s), Point::zero());
        Ok(())
    }

    #[test]
    fn scroller_keys() -> Result<()> {
        let (mut h, s, _) = scrolled()?;
        h.core.set_focus(Some(s));
        h.core.process_key_down(KeyCode::Down);
        h.core.process_key_down(KeyCode::Right);
        assert_eq!(h.core.scroll(s), Point::new(1, 1));
        h.core.process_key_down(KeyCode::End);
        assert_eq!(h.core.scroll(s), Point::new(200, 400));
        h.core.process_key_down(KeyCode::Up);
        h.core.process_key_down(KeyCode::Left);
        assert_eq!(h.core.scroll(s), Point::new(199, 399));
        h.core.process_key_down(KeyCode::Home);
        assert_eq!(h.core.scroll(s), Point::zero());
        h.core.process_key_down(KeyCode::Up);
        assert_eq!(h.core.scroll(s), Point::zero());
        Ok(())
    }

    #[test]
    fn scroll_is_clamped_when_the_child_shrinks() -> Result<()> {
        let (mut h, s, c) = scrolled()?;
        h.core.set_scroll_y(s, 1000);
        assert_eq!(h.core.scroll(s).y, 400);
        h.core.set_height(c, 150);
        h.settle(20);
        assert_eq!(h.core.max_scroll(s).y, 50);
        assert_eq!(h.core.scroll(s).y, 50);
        Ok(())
    }

    #[test]
    fn clearing_a_scrolled_group_resets_the_scroll() -> Result<()> {
        let mut h = Harness::new(100, 100);
        let s = h.core.create_scroller();
        h.core.add_widget(s)?;
        let g = h.core.create_group();
        h.core.set_width(g, 400);
        h.core.set_height(g, 400);
        h.core.set_child(s, Some(g))?;
        let l = h.core.create_leaf();
        h.core.add_child(g, l)?;
        h.settle(20);
        h.core.set_scroll_x(s, 120);
        h.core.set_scroll_y(s, 30);
        assert_eq!(h.core.scroll(s), Point::new(120, 30));

        h.core.clear_children(g)?;
        assert_eq!(h.core.scroll(s), Point::zero());
        assert!(!h.core.exists(l));
        Ok(())
    }

    /// A full-size group holding a draggable 20x20 leaf at (10, 10) and a
    /// 20x20 drop target at (60, 60).
    fn board() -> Result<(Harness, NodeId, NodeId, NodeId)> {
        let mut h = Harness::new(100, 100);
        let g = h.core.create_group();
        h.core.add_widget(g)?;
        let src = fixed(&mut h.core, 20, 20);
        h.core.set_left(src, 10);
        h.core.set_top(src, 10);
        h.core.set_allow_drag(src, true);
        let dst = fixed(&mut h.core, 20, 20);
        h.core.set_left(dst, 60);
        h.core.set_top(dst, 60);
        h.core.set_allow_drop(dst, true);
        h.core.add_child(g, src)?;
        h.core.add_child(g, dst)?;
        h.settle(20);
        Ok((h, g, src, dst))
    }

    fn record_drag(h: &mut Harness, src: NodeId, dst: NodeId) -> Result<EventLog> {
        let log = event_log();
        for kind in [EventKind::StartDrag, EventKind::Drag, EventKind::EndDrag] {
            record(&mut h.core, src, kind, &log, false)?;
        }
        for kind in [EventKind::DragEnter, EventKind::DragLeave, EventKind::Drop] {
            record(&mut h.core, dst, kind, &log, false)?;
        }
        Ok(log)
    }

    #[test]
    fn dragging_onto_a_target_drops_it() -> Result<()> {
        let (mut h, _, src, dst) = board()?;
        let log = record_drag(&mut h, src, dst)?;

        h.core.process_mouse_move((15, 15));
        assert_eq!(h.core.hover(), Some(src));
        h.core.process_mouse_button_down(Button::Left);
        assert!(h.core.drag_drop().is_none());

        h.core.process_mouse_move((20, 20));
        let op = h.core.drag_drop();
        assert_eq!(op.map(|d| (d.source, d.target)), Some((src, None)));
        assert!(h.core.node(src).is_some_and(|n| n.is_dragged()));
        assert_eq!(count(&log, src, EventKind::StartDrag), 1);
        assert_eq!(count(&log, src, EventKind::Drag), 1);

        h.core.process_mouse_move((65, 65));
        assert!(h.core.is_drop_target(dst));
        assert_eq!(count(&log, dst, EventKind::DragEnter), 1);
        h.core.process_mouse_move((90, 90));
        assert!(!h.core.is_drop_target(dst));
        assert_eq!(count(&log, dst, EventKind::DragLeave), 1);
        h.core.process_mouse_move((70, 70));
        assert_eq!(count(&log, dst, EventKind::DragEnter), 2);
        assert_eq!(count(&log, src, EventKind::Drag), 4);
        assert_eq!(count(&log, src, EventKind::StartDrag), 1);

        assert!(h.core.process_mouse_button_up(Button::Left));
        let events: Vec<(NodeId, Event)> = log.lock().iter().rev().take(2).copied().collect();
        assert_eq!(events, vec![(src, Event::EndDrag(Some(dst))), (dst, Event::Drop(src))]);
        assert!(h.core.drag_drop().is_none());
        assert_eq!(h.core.active(), None);
        assert!(h.core.node(src).is_some_and(|n| !n.is_dragged()));
        assert_eq!(count(&log, dst, EventKind::DragLeave), 1);
        Ok(())
    }

    #[test]
    fn drops_go_to_the_nearest_accepting_ancestor() -> Result<()> {
        let (mut h, g, src, dst) = board()?;
        h.core.set_allow_drop(g, true);
        h.core.set_allowed_drop_types(dst, ["Unknown"]);

        h.core.process_mouse_move((15, 15));
        h.core.process_mouse_button_down(Button::Left);
        h.core.process_mouse_move((65, 65));
        assert!(h.core.is_drop_target(g));

        let key = h
            .core
            .node(src)
            .map(|n| n.style_key().to_string())
            .unwrap_or_default();
        h.core.set_allowed_drop_types(dst, [key]);
        h.core.process_mouse_move((66, 66));
        assert!(h.core.is_drop_target(dst));
        Ok(())
    }

    #[test]
    fn moves_without_allow_drag_stay_captured() -> Result<()> {
        let (mut h, _, l) = scene(Config::default())?;
        let log = event_log();
        record(&mut h.core, l, EventKind::MouseMove, &log, false)?;
        record(&mut h.core, l, EventKind::StartDrag, &log, false)?;

        h.core.process_mouse_move((50, 50));
        h.core.process_mouse_button_down(Button::Left);
        h.core.process_mouse_move((90, 90));
        assert_eq!(count(&log, l, EventKind::MouseMove), 2);
        assert_eq!(count(&log, l, EventKind::StartDrag), 0);
        assert!(h.core.drag_drop().is_none());
        Ok(())
    }

    #[test]
    fn removing_drag_participants_ends_cleanly() -> Result<()> {
        let (mut h, _, src, dst) = board()?;
        let log = record_drag(&mut h, src, dst)?;

        h.core.process_mouse_move((15, 15));
        h.core.process_mouse_button_down(Button::Left);
        h.core.process_mouse_move((65, 65));
        assert!(h.core.is_drop_target(dst));

        h.core.set_visible(dst, false);
        assert_eq!(count(&log, dst, EventKind::DragLeave), 1);
        assert_eq!(h.core.drag_drop().map(|d| d.target), Some(None));

        h.core.dispose(src);
        assert!(log.lock().contains(&(src, Event::EndDrag(None))));
        assert_eq!(count(&log, dst, EventKind::Drop), 0);
        assert!(h.core.drag_drop().is_none());
        assert!(!h.core.process_mouse_button_up(Button::Left));
        Ok(())
    }
}
