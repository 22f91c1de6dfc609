mod event;
mod sink;

pub use event::{
    Event, PayloadCategoryActivate, PayloadCometLanded, PayloadNodeClick, PayloadNodeHoverEnter,
    PayloadNodeHoverLeave, PayloadPan, PayloadZoom,
};

pub use sink::EventSink;
