/// The live media element of the embedded player.
pub trait MediaSurface {
    fn set_muted(&self, muted: bool);
}

/// Resolves the player's media element. The host page can mount, remount or
/// remove the player at any time, so the surface is looked up on every use.
pub trait PlayerHandle {
    fn locate(&self) -> Option<Box<dyn MediaSurface>>;
}
