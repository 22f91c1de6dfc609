mod color;
pub mod draw;
mod effects;
mod elements;
mod error;
mod events;
mod galaxy_view;
mod interaction;
mod layouts;
pub mod lists;
mod metadata;
mod mirror;
mod settings;
mod world;

pub use self::color::{parse_css_color, with_alpha, ColorSpec, Theme, ThemeLookup};
pub use self::effects::{ease_out_quad, Comet, Effects, Landing, Particle, Supernova};
pub use self::elements::{new_category_color, ArchivedItem, Category, Item, NewItem, Priority};
pub use self::error::{StoreError, ValidationError};
pub use self::events::{
    Event, EventSink, PayloadCategoryActivate, PayloadCometLanded, PayloadNodeClick,
    PayloadNodeHoverEnter, PayloadNodeHoverLeave, PayloadPan, PayloadZoom,
};
pub use self::galaxy_view::GalaxyView;
pub use self::interaction::{nearest_within, world_radius};
pub use self::layouts::force_directed::{
    Body, CategoryAttraction, Center, Collide, Force, ManyBody, Simulation, SimulationState, Star,
};
pub use self::layouts::CategoryLayout;
pub use self::metadata::{backing_size, Metadata, Transform, ViewportAdapter};
pub use self::mirror::{
    parse_path, ArchiveRecord, CategoryRecord, Changed, Collection, ItemPatch, ItemRecord,
    MemoryStore, OnChange, RemoteStore, Snapshot, StateMirror,
};
pub use self::settings::{
    Household, PredefinedAnchor, SettingsInteraction, SettingsNavigation, SettingsSimulation,
    SettingsStyle, User,
};
pub use self::world::{WorldConfig, WorldState, ADD_BUTTON};
