mod item;
mod list;
mod note;

pub use item::{Item, ItemState};
pub use list::{GroceryList, LIST_FILE, ListCounts, ListState};
pub use note::Note;
