use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a node stored in the Core arena.
    ///
    /// Keys are generational: once a node is disposed its key no longer
    /// resolves, so a stale `NodeId` is a safe weak reference.
    pub struct NodeId;
}
