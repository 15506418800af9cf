#[cfg(test)]
mod tests {
    use arbor::{
        Config, NodeId,
        error::Result,
        geom::{Overlap, Rect},
        testing::{DrawOp, Harness, TestWidget},
    };

    /// A full-size group holding a 10x10 filled leaf at (5, 5).
    fn scene(h: &mut Harness, cached: bool) -> Result<(NodeId, NodeId)> {
        let g = h.core.create_group();
        h.core.set_cache_enabled(g, cached);
        h.core.add_widget(g)?;
        let l = h.core.create_widget(TestWidget::new(10, 10));
        h.core.set_width(l, 10);
        h.core.set_height(l, 10);
        h.core.set_left(l, 5);
        h.core.set_top(l, 5);
        h.core.add_child(g, l)?;
        h.settle(20);
        Ok((g, l))
    }

    #[test]
    fn uncached_leaf_draws_onto_the_target() -> Result<()> {
        let mut h = Harness::new(100, 100);
        let (_, l) = scene(&mut h, false)?;
        assert!(h.ctx.fills().contains(&Rect::new(5, 5, 10, 10)));
        assert!(!h.ctx.ops().iter().any(|op| matches!(op, DrawOp::CreateSurface(_))));
        assert!(h.core.node(l).is_some_and(|n| !n.has_cache()));

        h.ctx.take();
        assert!(!h.frame());
        assert!(h.ctx.ops().is_empty());
        Ok(())
    }

    #[test]
    fn moved_child_clips_old_and_new_areas() -> Result<()> {
        let mut h = Harness::new(100, 100);
        let (g, l) = scene(&mut h, true)?;
        assert!(h.core.node(g).is_some_and(|n| n.has_cache() && !n.is_dirty()));

        h.core.set_left(l, 50);
        h.core.process_layouting();
        h.core.process_clipping();

        let clip = h.core.node(g).map(|n| n.clipping().clone()).unwrap_or_default();
        let old = Rect::new(5, 5, 10, 10);
        let new = Rect::new(50, 5, 10, 10);
        assert_eq!(clip.contains(old), Overlap::In);
        assert_eq!(clip.contains(new), Overlap::In);
        assert_eq!(clip.area(), 200);
        Ok(())
    }

    #[test]
    fn cached_group_updates_in_place() -> Result<()> {
        let mut h = Harness::new(100, 100);
        let (g, l) = scene(&mut h, true)?;
        h.ctx.take();

        h.core.set_left(l, 50);
        assert!(h.frame());
        let ops = h.ctx.take();
        assert!(!ops.iter().any(|op| matches!(op, DrawOp::CreateSurface(_))));
        assert!(!ops.iter().any(|op| matches!(op, DrawOp::Fill(_))));
        let blits = ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Blit { .. }))
            .count();
        assert_eq!(blits, 1);
        assert!(h.core.node(g).is_some_and(|n| n.clipping().is_empty()));
        Ok(())
    }

    #[test]
    fn oversized_cache_is_dropped() -> Result<()> {
        let config = Config {
            max_cache_size: 50,
            ..Config::default()
        };
        let mut h = Harness::with_config(config, 100, 100);
        let (g, _) = scene(&mut h, true)?;
        let node = h.core.node(g);
        assert!(node.is_some_and(|n| !n.props().cache_enabled && !n.has_cache()));
        assert_eq!(h.ctx.blits(), 0);
        assert!(h.ctx.fills().contains(&Rect::new(5, 5, 10, 10)));
        Ok(())
    }

    #[test]
    fn disabled_nodes_are_shaded() -> Result<()> {
        let mut h = Harness::new(100, 100);
        let (_, l) = scene(&mut h, false)?;
        h.ctx.take();
        h.core.set_enabled(l, false);
        assert!(h.frame());
        assert!(h.ctx.ops().contains(&DrawOp::Shade(Rect::new(5, 5, 10, 10))));
        Ok(())
    }

    #[test]
    fn hidden_children_are_not_drawn() -> Result<()> {
        let mut h = Harness::new(100, 100);
        let (_, l) = scene(&mut h, false)?;
        h.ctx.take();
        h.core.set_visible(l, false);
        h.settle(20);
        assert!(!h.ctx.fills().contains(&Rect::new(5, 5, 10, 10)));
        Ok(())
    }
}
