pub(crate) mod composite;
pub(crate) mod compositor;
pub(crate) mod mask;
pub(crate) mod warp;
