pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{InputEvent, MapEvent, MouseButton};
pub use handler::{Action, EventManager, InputHandler, MapOperations};
