mod archive;
mod category;
mod item;

pub use self::archive::ArchivedItem;
pub use self::category::{new_category_color, Category};
pub use self::item::{Item, NewItem, Priority};
